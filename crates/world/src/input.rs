//! Per-tick input consumed by [`GameWorld::update`](crate::GameWorld::update).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::chunk::TileCoord;
use crate::inventory::{PointerButton, SlotTarget};

/// Discrete event delivered since the previous tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum InputEvent {
    /// Switch between walking and running.
    ToggleRun,
    /// Pointer button pressed. The host resolves where it landed: a world tile for
    /// gameplay and, when over the inventory overlay, a slot.
    PointerPress {
        /// Button pressed.
        button: PointerButton,
        /// World tile under the pointer.
        #[serde(default)]
        world_tile: Option<TileCoord>,
        /// Inventory slot under the pointer, if the overlay covers it.
        #[serde(default)]
        slot: Option<SlotTarget>,
    },
    /// A typed character.
    Key {
        /// Character typed.
        key: char,
    },
}

/// Snapshot of held keys plus the events of one frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputState {
    /// Up key held.
    pub up: bool,
    /// Down key held.
    pub down: bool,
    /// Left key held.
    pub left: bool,
    /// Right key held.
    pub right: bool,
    /// Pointer position in world pixels, used to aim throws.
    pub aim: Option<Vec2>,
    /// Events in the order they arrived.
    pub events: Vec<InputEvent>,
}

impl InputState {
    /// No keys held and no events.
    pub fn idle() -> Self {
        Self::default()
    }

    /// Append an event.
    pub fn with_event(mut self, event: InputEvent) -> Self {
        self.events.push(event);
        self
    }

    /// A single typed character.
    pub fn key(key: char) -> Self {
        Self::idle().with_event(InputEvent::Key { key })
    }
}

/// Meaning of a character key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    /// Digits `1`-`8` select hot-bar columns 0-7.
    SelectHotbar(usize),
    /// `i` shows or hides the inventory.
    ToggleInventory,
    /// `q` throws one of the held item.
    Throw,
    /// `]` shows or hides body outlines.
    ToggleDebug,
}

impl KeyCommand {
    /// Map a typed character, or `None` if it means nothing.
    pub fn from_char(key: char) -> Option<Self> {
        match key {
            '1'..='8' => key
                .to_digit(10)
                .map(|digit| KeyCommand::SelectHotbar(digit as usize - 1)),
            'i' => Some(KeyCommand::ToggleInventory),
            'q' => Some(KeyCommand::Throw),
            ']' => Some(KeyCommand::ToggleDebug),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_map_to_commands() {
        assert_eq!(KeyCommand::from_char('1'), Some(KeyCommand::SelectHotbar(0)));
        assert_eq!(KeyCommand::from_char('8'), Some(KeyCommand::SelectHotbar(7)));
        assert_eq!(KeyCommand::from_char('9'), None);
        assert_eq!(KeyCommand::from_char('0'), None);
        assert_eq!(KeyCommand::from_char('i'), Some(KeyCommand::ToggleInventory));
        assert_eq!(KeyCommand::from_char('q'), Some(KeyCommand::Throw));
        assert_eq!(KeyCommand::from_char(']'), Some(KeyCommand::ToggleDebug));
        assert_eq!(KeyCommand::from_char('x'), None);
    }

    #[test]
    fn input_parses_from_json() {
        let json = r#"{
            "right": true,
            "aim": [10.0, 4.0],
            "events": [
                {"event": "toggle_run"},
                {"event": "key", "key": "q"},
                {"event": "pointer_press", "button": "right", "world_tile": {"x": 3, "y": -2}},
                {"event": "pointer_press", "button": "left", "slot": {"target": "crafting", "col": 1, "row": 2}}
            ]
        }"#;
        let input: InputState = serde_json::from_str(json).unwrap();
        assert!(input.right && !input.left);
        assert_eq!(input.aim, Some(Vec2::new(10.0, 4.0)));
        assert_eq!(input.events.len(), 4);
        assert_eq!(
            input.events[2],
            InputEvent::PointerPress {
                button: PointerButton::Right,
                world_tile: Some(TileCoord::new(3, -2)),
                slot: None,
            }
        );
        assert_eq!(
            input.events[3],
            InputEvent::PointerPress {
                button: PointerButton::Left,
                world_tile: None,
                slot: Some(SlotTarget::Crafting { col: 1, row: 2 }),
            }
        );
    }
}
