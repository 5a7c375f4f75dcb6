//! World context owning every piece of simulation state, advanced once per tick.

use std::collections::BTreeSet;

use glam::Vec2;
use serde::Serialize;
use skafos_core::{ItemKind, SimTick};
use skafos_physics::{Aabb, Body, BodyKind};
use tracing::{debug, trace};

use crate::chunk::{ChunkPos, DirtyFlags, TileCoord};
use crate::collision::{CollisionReport, CollisionScene, EntityHandle};
use crate::config::WorldConfig;
use crate::draw::DrawList;
use crate::error::WorldError;
use crate::floater::{FloaterId, FloaterSet, THROW_SPEED};
use crate::input::{InputEvent, InputState, KeyCommand};
use crate::inventory::{PointerButton, Transition};
use crate::map::{BlockRef, ChunkMap};
use crate::player::Player;

/// What happened during one [`GameWorld::update`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TickReport {
    /// Tick number this report belongs to.
    pub tick: u64,
    /// Deleted floaters removed at the start of the tick.
    pub pruned: usize,
    /// Chunks streamed in this tick.
    pub generated: Vec<ChunkPos>,
    /// Chunks the retention policy dropped.
    pub evicted: Vec<ChunkPos>,
    /// Inventory clicks applied, in event order.
    pub transitions: Vec<Transition>,
    /// Layers placed from the held item.
    pub placed: Vec<BlockRef>,
    /// Floaters spawned by throws.
    pub thrown: Vec<FloaterId>,
    /// Result of the collision pass.
    pub collisions: CollisionReport,
}

/// A collideable's bounds for the debug overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebugBody {
    /// Registry entry the body belongs to.
    pub handle: EntityHandle,
    /// Kind, for picking an outline colour.
    pub kind: BodyKind,
    /// World-pixel bounds.
    pub bounds: Aabb,
}

/// Owns the map, the player, floaters, and the collideable registry.
/// ///
/// Hosts drive it with [`GameWorld::update`] once per frame.
pub struct GameWorld {
    config: WorldConfig,
    map: ChunkMap,
    player: Player,
    floaters: FloaterSet,
    /// Registered collideables in registration order.
    collideables: Vec<EntityHandle>,
    tick: SimTick,
    debug_overlay: bool,
}

impl GameWorld {
    /// Build a world with the player at the origin. Nothing is generated until the first tick.
    pub fn new(config: WorldConfig) -> Result<Self, WorldError> {
        let map = ChunkMap::new(&config)?;
        let player = Player::new(&config);
        Ok(Self {
            config,
            map,
            player,
            floaters: FloaterSet::new(),
            collideables: vec![EntityHandle::Player],
            tick: SimTick::ZERO,
            debug_overlay: false,
        })
    }

    /// Configuration the world was built with.
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Ticks completed so far.
    pub fn tick(&self) -> SimTick {
        self.tick
    }

    /// Resident chunks and the streaming focus.
    pub fn map(&self) -> &ChunkMap {
        &self.map
    }

    /// The player.
    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Mutable player, for hosts and fixtures.
    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    /// Dropped items in the world.
    pub fn floaters(&self) -> &FloaterSet {
        &self.floaters
    }

    /// Registered collideables in registration order. The player is always first.
    pub fn collideables(&self) -> &[EntityHandle] {
        &self.collideables
    }

    /// Whether the host should draw body outlines.
    pub fn debug_overlay(&self) -> bool {
        self.debug_overlay
    }

    /// Items held by the player plus those lying in the world.
    pub fn total_item_count(&self) -> u64 {
        self.player.inventory().total_count() + self.floaters.total_count()
    }

    /// Drop an item stack into the world and register it for collision.
    pub fn spawn_floater(&mut self, kind: ItemKind, amount: u32, position: Vec2, velocity: Vec2) -> FloaterId {
        let id = self.floaters.spawn(kind, amount, position, velocity);
        self.collideables.push(EntityHandle::Floater { id });
        id
    }

    /// Regenerate a chunk in place, discarding its contents and edits.
    pub fn regenerate_chunk(&mut self, pos: ChunkPos) {
        self.map.regenerate(pos);
        self.sync_block_bodies();
    }

    /// Advance the simulation by `dt` seconds.
    pub fn update(&mut self, input: &InputState, dt: f32) -> TickReport {
        let mut report = TickReport {
            tick: self.tick.0,
            ..Default::default()
        };

        report.pruned = self.prune_floaters();

        for event in &input.events {
            self.handle_event(*event, input.aim, &mut report);
        }
        self.player
            .set_directions(input.up, input.down, input.left, input.right);

        let focus = self.map.chunk_at(self.player.position);
        self.map.set_focus(focus);
        report.generated = self.map.ensure_chunks_loaded();
        report.evicted = self.map.evict_outside_window();
        if !report.evicted.is_empty() {
            self.forget_chunks(&report.evicted);
        }
        self.sync_block_bodies();

        self.floaters.update(dt);
        self.player.update(dt);

        report.collisions = CollisionScene {
            player: &mut self.player,
            floaters: &mut self.floaters,
            map: &self.map,
        }
        .resolve_all(&self.collideables);

        self.tick = self.tick.advance(1);
        report
    }

    /// Remove deleted floaters from both the floater list and the collideables.
    fn prune_floaters(&mut self) -> usize {
        let pruned = self.floaters.prune();
        if pruned > 0 {
            let floaters = &self.floaters;
            self.collideables.retain(|handle| match handle {
                EntityHandle::Floater { id } => floaters.get(*id).is_some(),
                _ => true,
            });
            trace!(pruned, "pruned floaters");
        }
        pruned
    }

    fn handle_event(&mut self, event: InputEvent, aim: Option<Vec2>, report: &mut TickReport) {
        match event {
            InputEvent::ToggleRun => self.player.toggle_gait(),
            InputEvent::PointerPress {
                button,
                world_tile,
                slot,
            } => {
                if self.player.inventory_open() {
                    if let Some(slot) = slot {
                        let transition = self.player.inventory_mut().click(slot, button);
                        report.transitions.push(transition);
                    }
                    return;
                }
                match button {
                    PointerButton::Left => self.player.start_swing(),
                    PointerButton::Right => {
                        if let Some(block) = world_tile.and_then(|coord| self.place_held(coord)) {
                            report.placed.push(block);
                        }
                    }
                }
            }
            InputEvent::Key { key } => match KeyCommand::from_char(key) {
                Some(KeyCommand::SelectHotbar(col)) => {
                    self.player.inventory_mut().select_hotbar(col);
                }
                Some(KeyCommand::ToggleInventory) => {
                    if !self.player.toggle_inventory() {
                        self.close_inventory(aim, report);
                    }
                }
                Some(KeyCommand::Throw) => {
                    if !self.player.inventory_open() {
                        if let Some(kind) = self.player.inventory_mut().take_one_held() {
                            let id = self.throw(kind, 1, aim);
                            report.thrown.push(id);
                        }
                    }
                }
                Some(KeyCommand::ToggleDebug) => self.debug_overlay = !self.debug_overlay,
                None => trace!(?key, "unbound key"),
            },
        }
    }

    /// Place one unit of the held stack at `coord` if it is placeable.
    fn place_held(&mut self, coord: TileCoord) -> Option<BlockRef> {
        let tile = self.player.inventory().held()?.kind.placed_tile()?;
        let block = self.map.place_tile(coord, tile)?;
        self.player.inventory_mut().take_one_held();
        Some(block)
    }

    /// Return the cursor item to the grid, throwing it when there is no room.
    fn close_inventory(&mut self, aim: Option<Vec2>, report: &mut TickReport) {
        if let Some(item) = self.player.inventory_mut().return_cursor_item() {
            let id = self.throw(item.kind, item.amount, aim);
            report.thrown.push(id);
        }
    }

    /// Launch a floater from the player toward `aim`, or along the facing direction.
    fn throw(&mut self, kind: ItemKind, amount: u32, aim: Option<Vec2>) -> FloaterId {
        let origin = self.player.position;
        let direction = aim
            .map(|aim| (aim - origin).normalize_or_zero())
            .filter(|direction| *direction != Vec2::ZERO)
            .unwrap_or_else(|| self.player.facing().unit());
        self.spawn_floater(kind, amount, origin, direction * THROW_SPEED)
    }

    /// Re-register solid blocks of every chunk whose collision data changed.
    fn sync_block_bodies(&mut self) {
        let dirty = self.map.take_dirty(DirtyFlags::COLLISION);
        if dirty.is_empty() {
            return;
        }
        self.forget_chunks(&dirty);
        for pos in &dirty {
            self.collideables.extend(
                self.map
                    .solid_blocks(*pos)
                    .into_iter()
                    .map(|block| EntityHandle::Block { block }),
            );
        }
        debug!(chunks = dirty.len(), collideables = self.collideables.len(), "block bodies synced");
    }

    fn forget_chunks(&mut self, chunks: &[ChunkPos]) {
        let chunks: BTreeSet<ChunkPos> = chunks.iter().copied().collect();
        let map = &self.map;
        self.collideables.retain(|handle| match handle {
            EntityHandle::Block { block } => !chunks.contains(&map.chunk_of(block.coord)),
            _ => true,
        });
    }

    /// Chunks whose tiles changed since the last call, for renderer batch rebuilds.
    pub fn take_redraw_chunks(&mut self) -> Vec<ChunkPos> {
        self.map.take_dirty(DirtyFlags::TILES)
    }

    /// Tiles around the focus in draw order.
    pub fn draw_list(&self) -> DrawList {
        self.map.draw_list()
    }

    /// Bounds of every live collideable.
    pub fn debug_bodies(&self) -> Vec<DebugBody> {
        self.collideables
            .iter()
            .filter_map(|handle| {
                let (kind, bounds) = match *handle {
                    EntityHandle::Player => (BodyKind::Player, self.player.bounds()),
                    EntityHandle::Floater { id } => {
                        (BodyKind::Floater, self.floaters.get(id)?.bounds())
                    }
                    EntityHandle::Block { block } => {
                        self.map.block(block)?;
                        let size = self.map.tile_size();
                        (
                            BodyKind::Block,
                            Aabb::from_position_size(block.coord.to_world(size), Vec2::splat(size)),
                        )
                    }
                };
                Some(DebugBody {
                    handle: *handle,
                    kind,
                    bounds,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::SlotTarget;
    use skafos_core::{Tile, TileKind};

    const DT: f32 = 1.0 / 60.0;

    fn world() -> GameWorld {
        GameWorld::new(WorldConfig {
            world_seed: Some(11),
            ..Default::default()
        })
        .unwrap()
    }

    fn press(button: PointerButton, world_tile: Option<TileCoord>, slot: Option<SlotTarget>) -> InputState {
        InputState::idle().with_event(InputEvent::PointerPress {
            button,
            world_tile,
            slot,
        })
    }

    #[test]
    fn new_rejects_bad_config() {
        let config = WorldConfig {
            draw_radius: -1,
            ..Default::default()
        };
        assert!(matches!(
            GameWorld::new(config),
            Err(WorldError::InvalidDrawRadius(-1))
        ));
    }

    #[test]
    fn first_tick_streams_window() {
        let mut world = world();
        let report = world.update(&InputState::idle(), DT);
        assert_eq!(report.generated.len(), 64);
        assert_eq!(world.map().len(), 64);
        assert_eq!(world.tick(), SimTick(1));

        let report = world.update(&InputState::idle(), DT);
        assert!(report.generated.is_empty());
        assert_eq!(world.map().generation_count(), 64);
    }

    #[test]
    fn right_click_places_held_dirt() {
        let mut world = world();
        world.update(&InputState::idle(), DT);
        let coord = TileCoord::new(2, 1);
        let report = world.update(&press(PointerButton::Right, Some(coord), None), DT);
        assert_eq!(report.placed.len(), 1);
        assert_eq!(
            world.map().cell_at(coord).unwrap().layers().last(),
            Some(&Tile::of(TileKind::Dirt))
        );
        assert_eq!(world.player().inventory().held().unwrap().amount, 9);
    }

    #[test]
    fn placement_in_ungenerated_space_is_refused() {
        let mut world = world();
        world.update(&InputState::idle(), DT);
        let report = world.update(&press(PointerButton::Right, Some(TileCoord::new(5000, 0)), None), DT);
        assert!(report.placed.is_empty());
        assert_eq!(world.player().inventory().held().unwrap().amount, 10);
    }

    #[test]
    fn placed_sapling_registers_a_block_body() {
        let mut world = world();
        world.update(&InputState::idle(), DT);
        let before = world.collideables().len();
        world
            .player_mut()
            .inventory_mut()
            .add_item(ItemKind::Sapling, 1);
        world.update(&InputState::key('2'), DT);
        world.update(&press(PointerButton::Right, Some(TileCoord::new(-2, 1)), None), DT);
        assert_eq!(world.collideables().len(), before + 1);
        assert!(world
            .debug_bodies()
            .iter()
            .any(|body| body.kind == BodyKind::Block));
    }

    #[test]
    fn throw_spawns_floater_and_conserves_items() {
        let mut world = world();
        world.update(&InputState::idle(), DT);
        let total = world.total_item_count();

        let mut input = InputState::key('q');
        input.aim = Some(Vec2::new(100.0, 0.0));
        let report = world.update(&input, DT);
        assert_eq!(report.thrown.len(), 1);
        assert_eq!(world.floaters().len(), 1);
        assert_eq!(world.total_item_count(), total);

        let floater = world.floaters().get(report.thrown[0]).unwrap();
        assert!(floater.velocity.x > 0.0);
        assert_eq!(floater.velocity.y, 0.0);

        // The floater lands out of reach and stays there.
        for _ in 0..120 {
            world.update(&InputState::idle(), DT);
        }
        assert_eq!(world.floaters().len(), 1);
        assert_eq!(world.total_item_count(), total);
    }

    #[test]
    fn walking_onto_floater_picks_it_up_and_prunes_next_tick() {
        let mut world = world();
        world.update(&InputState::idle(), DT);
        let id = world.spawn_floater(ItemKind::Dirt, 1, Vec2::new(4.0, 4.0), Vec2::ZERO);

        let report = world.update(&InputState::idle(), DT);
        assert_eq!(report.collisions.pickups.len(), 1);
        assert!(world.floaters().get(id).unwrap().is_deleted());
        assert_eq!(world.player().inventory().held().unwrap().amount, 11);

        let report = world.update(&InputState::idle(), DT);
        assert_eq!(report.pruned, 1);
        assert!(world.floaters().get(id).is_none());
        assert!(!world
            .collideables()
            .contains(&EntityHandle::Floater { id }));
    }

    #[test]
    fn world_clicks_ignored_while_inventory_open() {
        let mut world = world();
        world.update(&InputState::idle(), DT);
        world.update(&InputState::key('i'), DT);
        assert!(world.player().inventory_open());

        let report = world.update(&press(PointerButton::Right, Some(TileCoord::new(1, 1)), None), DT);
        assert!(report.placed.is_empty());
        world.update(&press(PointerButton::Left, Some(TileCoord::new(1, 1)), None), DT);
        assert!(!world.player().is_swinging());
    }

    #[test]
    fn slot_clicks_ignored_while_inventory_closed() {
        let mut world = world();
        let slot = SlotTarget::Inventory { col: 0, row: 0 };
        let report = world.update(&press(PointerButton::Left, None, Some(slot)), DT);
        assert!(report.transitions.is_empty());
        assert!(world.player().inventory().cursor().is_none());
        assert!(world.player().is_swinging());
    }

    #[test]
    fn closing_inventory_returns_cursor_item() {
        let mut world = world();
        world.update(&InputState::key('i'), DT);
        let slot = SlotTarget::Inventory { col: 0, row: 0 };
        let report = world.update(&press(PointerButton::Right, None, Some(slot)), DT);
        assert_eq!(report.transitions, vec![Transition::Split { taken: 5 }]);
        assert_eq!(world.player().inventory().cursor().unwrap().amount, 5);

        world.update(&InputState::key('i'), DT);
        assert!(!world.player().inventory_open());
        assert!(world.player().inventory().cursor().is_none());
        assert_eq!(world.player().inventory().held().unwrap().amount, 10);
    }

    #[test]
    fn trash_click_discards_cursor_stack() {
        let mut world = world();
        world.update(&InputState::key('i'), DT);
        let slot = SlotTarget::Inventory { col: 0, row: 0 };
        world.update(&press(PointerButton::Left, None, Some(slot)), DT);
        let report = world.update(&press(PointerButton::Left, None, Some(SlotTarget::Trash)), DT);
        assert_eq!(report.transitions, vec![Transition::Discard { amount: 10 }]);
        assert_eq!(world.total_item_count(), 0);
    }

    #[test]
    fn debug_key_toggles_overlay() {
        let mut world = world();
        world.update(&InputState::key(']'), DT);
        assert!(world.debug_overlay());
        world.update(&InputState::key(']'), DT);
        assert!(!world.debug_overlay());
    }

    #[test]
    fn regenerate_chunk_drops_placed_blocks() {
        let mut world = GameWorld::new(WorldConfig {
            world_seed: Some(11),
            spawn_safe_radius: 10_000,
            ..Default::default()
        })
        .unwrap();
        world.update(&InputState::idle(), DT);
        world
            .player_mut()
            .inventory_mut()
            .add_item(ItemKind::Sapling, 1);
        world.update(&InputState::key('2'), DT);
        let coord = TileCoord::new(1, 2);
        world.update(&press(PointerButton::Right, Some(coord), None), DT);
        let with_sapling = world.collideables().len();

        assert_eq!(with_sapling, 2);

        world.regenerate_chunk(ChunkPos::new(0, 0));
        assert_eq!(world.map().cell_at(coord).unwrap().layers().len(), 1);
        assert_eq!(world.collideables(), &[EntityHandle::Player]);
    }

    #[test]
    fn redraw_chunks_drain_once() {
        let mut world = world();
        world.update(&InputState::idle(), DT);
        assert_eq!(world.take_redraw_chunks().len(), 64);
        assert!(world.take_redraw_chunks().is_empty());
    }
}
