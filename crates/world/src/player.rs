//! The player avatar: movement, animation state, and the inventory it owns.

use glam::Vec2;
use serde::Serialize;
use skafos_core::ItemKind;
use skafos_physics::{snap_flush, Aabb, Body, BodyKind, CollisionDirection};

use crate::config::WorldConfig;
use crate::inventory::{Container, GridPos, Inventory, InventoryItem};

/// Edge length of the player's body in pixels.
pub const PLAYER_SIZE: f32 = 16.0;
/// Animation frames per walk/swing cycle.
pub const ANIMATION_FRAMES: f32 = 4.0;
/// Walk cycle rate in frames per second.
pub const WALK_FRAME_RATE: f32 = 4.0;
/// Run cycle rate in frames per second.
pub const RUN_FRAME_RATE: f32 = 8.0;
/// Swing rate in frames per second.
pub const SWING_FRAME_RATE: f32 = 20.0;
/// Dirt the player starts with in the first hot-bar slot.
pub const STARTING_DIRT: u32 = 10;

/// Facing and movement direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Direction {
    /// Towards +Y.
    Up,
    /// Towards -Y.
    #[default]
    Down,
    /// Towards -X.
    Left,
    /// Towards +X.
    Right,
}

impl Direction {
    /// Unit vector in world space (+Y up).
    pub fn unit(self) -> Vec2 {
        match self {
            Direction::Up => Vec2::Y,
            Direction::Down => Vec2::NEG_Y,
            Direction::Left => Vec2::NEG_X,
            Direction::Right => Vec2::X,
        }
    }
}

/// Movement speed mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Gait {
    /// Walk speed and walk cycle.
    #[default]
    Walk,
    /// Run speed and run cycle.
    Run,
}

/// The avatar the input drives.
#[derive(Debug, Clone, Serialize)]
pub struct Player {
    /// Min corner in world pixels.
    pub position: Vec2,
    facing: Direction,
    /// Held directions in the order they were pressed.
    held: Vec<Direction>,
    gait: Gait,
    walk_speed: f32,
    run_speed: f32,
    frame: f32,
    swinging: bool,
    inventory_open: bool,
    inventory: Inventory,
}

impl Player {
    /// Player at the origin holding the starting dirt.
    pub fn new(config: &WorldConfig) -> Self {
        let mut inventory = Inventory::new(config.inventory_columns, config.inventory_rows);
        let slot = GridPos::new(0, 0);
        inventory.set(
            slot,
            InventoryItem::new(ItemKind::Dirt, STARTING_DIRT, slot, Container::Inventory),
        );
        Self {
            position: Vec2::ZERO,
            facing: Direction::Down,
            held: Vec::new(),
            gait: Gait::Walk,
            walk_speed: config.walk_speed,
            run_speed: config.run_speed,
            frame: 0.0,
            swinging: false,
            inventory_open: false,
            inventory,
        }
    }

    /// Direction the player last moved or was turned.
    pub fn facing(&self) -> Direction {
        self.facing
    }

    /// Current gait.
    pub fn gait(&self) -> Gait {
        self.gait
    }

    /// True while any direction is held.
    pub fn is_moving(&self) -> bool {
        !self.held.is_empty()
    }

    /// True until the swing animation completes.
    pub fn is_swinging(&self) -> bool {
        self.swinging
    }

    /// Animation frame index in `0..4`.
    pub fn animation_frame(&self) -> usize {
        self.frame.floor() as usize
    }

    /// Carried items.
    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Mutable carried items.
    pub fn inventory_mut(&mut self) -> &mut Inventory {
        &mut self.inventory
    }

    /// Whether the inventory overlay is shown.
    pub fn inventory_open(&self) -> bool {
        self.inventory_open
    }

    /// Flip inventory visibility and return the new state.
    pub fn toggle_inventory(&mut self) -> bool {
        self.inventory_open = !self.inventory_open;
        self.inventory_open
    }

    /// Switch between walking and running.
    pub fn toggle_gait(&mut self) {
        self.gait = match self.gait {
            Gait::Walk => Gait::Run,
            Gait::Run => Gait::Walk,
        };
    }

    /// Pixels per second for the current gait.
    pub fn speed(&self) -> f32 {
        match self.gait {
            Gait::Walk => self.walk_speed,
            Gait::Run => self.run_speed,
        }
    }

    fn set_held(&mut self, direction: Direction, pressed: bool) {
        let index = self.held.iter().position(|held| *held == direction);
        match (pressed, index) {
            (true, None) => self.held.push(direction),
            (false, Some(index)) => {
                self.held.remove(index);
            }
            _ => {}
        }
    }

    /// Sync held directions with the current key state, keeping press order.
    pub fn set_directions(&mut self, up: bool, down: bool, left: bool, right: bool) {
        self.set_held(Direction::Left, left);
        self.set_held(Direction::Right, right);
        self.set_held(Direction::Up, up);
        self.set_held(Direction::Down, down);
    }

    fn holds(&self, direction: Direction) -> bool {
        self.held.contains(&direction)
    }

    /// Begin a swing unless one is already running.
    pub fn start_swing(&mut self) {
        if !self.swinging {
            self.frame = 0.0;
            self.swinging = true;
        }
    }

    /// Move and animate by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        let speed = self.speed();
        let vertical = [Direction::Up, Direction::Down]
            .into_iter()
            .find(|direction| self.holds(*direction));

        if let Some(vertical) = vertical {
            self.facing = vertical;
            self.position += vertical.unit() * speed * dt;
            if let Some(side) = [Direction::Left, Direction::Right]
                .into_iter()
                .find(|direction| self.holds(*direction))
            {
                self.position += side.unit() * (speed / 2.0) * dt;
            }
        } else if let Some(side) = [Direction::Left, Direction::Right]
            .into_iter()
            .find(|direction| self.holds(*direction))
        {
            self.facing = side;
            self.position += side.unit() * speed * dt;
        }

        if self.swinging {
            self.frame += SWING_FRAME_RATE * dt;
        } else if self.is_moving() {
            self.frame += match self.gait {
                Gait::Walk => WALK_FRAME_RATE,
                Gait::Run => RUN_FRAME_RATE,
            } * dt;
        }

        if self.frame >= ANIMATION_FRAMES {
            self.swinging = false;
            self.frame = 0.0;
        }
    }

    /// Push the player flush against a solid box on the resolved side.
    pub fn snap_against(&mut self, solid: &Aabb, direction: CollisionDirection) {
        self.position = snap_flush(self.position, self.size(), solid, direction);
    }
}

impl Body for Player {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn size(&self) -> Vec2 {
        Vec2::splat(PLAYER_SIZE)
    }

    fn is_solid(&self) -> bool {
        true
    }

    fn kind(&self) -> BodyKind {
        BodyKind::Player
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> Player {
        Player::new(&WorldConfig::default())
    }

    #[test]
    fn starts_with_dirt_in_first_slot() {
        let player = player();
        let held = player.inventory().held().unwrap();
        assert_eq!((held.kind, held.amount), (ItemKind::Dirt, STARTING_DIRT));
    }

    #[test]
    fn walks_at_walk_speed() {
        let mut player = player();
        player.set_directions(false, false, false, true);
        player.update(0.5);
        assert_eq!(player.position, Vec2::new(16.0, 0.0));
        assert_eq!(player.facing(), Direction::Right);
    }

    #[test]
    fn run_doubles_speed() {
        let mut player = player();
        player.toggle_gait();
        player.set_directions(true, false, false, false);
        player.update(0.5);
        assert_eq!(player.position, Vec2::new(0.0, 32.0));
    }

    #[test]
    fn vertical_wins_with_half_speed_sideways() {
        let mut player = player();
        player.set_directions(false, false, true, false);
        player.set_directions(false, true, true, false);
        player.update(1.0);
        assert_eq!(player.facing(), Direction::Down);
        assert_eq!(player.position, Vec2::new(-16.0, -32.0));
    }

    #[test]
    fn left_wins_over_right_and_up_over_down() {
        let mut player = player();
        player.set_directions(false, false, false, true);
        player.set_directions(false, false, true, true);
        player.update(1.0);
        assert_eq!(player.facing(), Direction::Left);
        assert_eq!(player.position, Vec2::new(-32.0, 0.0));

        player.set_directions(true, true, false, false);
        player.update(1.0);
        assert_eq!(player.facing(), Direction::Up);
    }

    #[test]
    fn release_removes_held_direction() {
        let mut player = player();
        player.set_directions(false, false, false, true);
        player.set_directions(false, false, false, true);
        assert!(player.is_moving());
        player.set_directions(false, false, false, false);
        assert!(!player.is_moving());
        player.update(1.0);
        assert_eq!(player.position, Vec2::ZERO);
    }

    #[test]
    fn swing_ends_after_four_frames() {
        let mut player = player();
        player.start_swing();
        assert!(player.is_swinging());
        for _ in 0..3 {
            player.update(0.05);
        }
        assert!(player.is_swinging());
        assert_eq!(player.animation_frame(), 3);
        player.update(0.05);
        assert!(!player.is_swinging());
        assert_eq!(player.animation_frame(), 0);
    }

    #[test]
    fn idle_player_does_not_animate() {
        let mut player = player();
        player.update(1.0);
        assert_eq!(player.animation_frame(), 0);
    }

    #[test]
    fn snap_against_block_on_the_right() {
        let mut player = player();
        player.position = Vec2::new(4.0, 0.0);
        let block = Aabb::from_position_size(Vec2::new(16.0, 0.0), Vec2::splat(16.0));
        player.snap_against(&block, CollisionDirection::Right);
        assert_eq!(player.position, Vec2::ZERO);
    }
}
