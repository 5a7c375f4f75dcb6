//! Chunk streaming around a moving focus point.

use glam::Vec2;
use skafos_core::Tile;
use tracing::{debug, trace};

use crate::chunk::{Cell, Chunk, ChunkPos, ChunkWindow, DirtyFlags, TileCoord};
use crate::config::{Biome, ChunkRetention, WorldConfig};
use crate::draw::DrawList;
use crate::error::WorldError;
use crate::generator::ChunkGenerator;
use crate::storage::ChunkStorage;

/// A placed layer addressed by world tile and stack index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
pub struct BlockRef {
    /// World tile of the cell.
    pub coord: TileCoord,
    /// Index into the cell stack; 0 is ground.
    pub layer: usize,
}

/// Sparse chunk dictionary plus the focus it streams around.
pub struct ChunkMap {
    generator: ChunkGenerator,
    storage: ChunkStorage,
    chunk_width: usize,
    chunk_height: usize,
    tile_size: f32,
    draw_radius: i32,
    retention: ChunkRetention,
    biome: Biome,
    focus: ChunkPos,
    generations: u64,
}

impl ChunkMap {
    /// Build an empty map. Fails on configurations that cannot stream.
    pub fn new(config: &WorldConfig) -> Result<Self, WorldError> {
        config.validate()?;
        let world_seed = config.world_seed.unwrap_or_else(rand::random);
        debug!(world_seed, "chunk map created");
        Ok(Self {
            generator: ChunkGenerator::new(world_seed, config.spawn_safe_radius),
            storage: ChunkStorage::new(),
            chunk_width: config.chunk_width,
            chunk_height: config.chunk_height,
            tile_size: config.tile_size,
            draw_radius: config.draw_radius,
            retention: config.retention,
            biome: config.biome,
            focus: ChunkPos::default(),
            generations: 0,
        })
    }

    /// Seed in use, drawn from entropy when none was configured.
    pub fn world_seed(&self) -> u64 {
        self.generator.world_seed()
    }

    /// Tile edge in pixels.
    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Chunk the window is centred on.
    pub fn focus(&self) -> ChunkPos {
        self.focus
    }

    /// Move the focus. Returns true when it changed.
    pub fn set_focus(&mut self, focus: ChunkPos) -> bool {
        let changed = self.focus != focus;
        self.focus = focus;
        changed
    }

    /// Chunk containing a world-pixel position.
    pub fn chunk_at(&self, position: Vec2) -> ChunkPos {
        let w = self.chunk_width as f32 * self.tile_size;
        let h = self.chunk_height as f32 * self.tile_size;
        ChunkPos::new((position.x / w).floor() as i32, (position.y / h).floor() as i32)
    }

    /// The square generation window around the focus.
    pub fn window(&self) -> ChunkWindow {
        ChunkWindow::new(self.focus, self.draw_radius)
    }

    /// Generate every window chunk that is not resident yet. Returns the new positions.
    pub fn ensure_chunks_loaded(&mut self) -> Vec<ChunkPos> {
        let window = self.window();
        let mut generated = Vec::new();
        for pos in window.positions() {
            if self.generate_if_absent(pos) {
                generated.push(pos);
            }
        }
        if !generated.is_empty() {
            debug!(focus = %self.focus, count = generated.len(), "streamed chunks in");
        }
        generated
    }

    /// Generate `pos` only when it is not resident. Returns true when a chunk was created.
    pub fn generate_if_absent(&mut self, pos: ChunkPos) -> bool {
        if self.storage.contains(pos) {
            self.storage.touch(pos);
            return false;
        }
        self.regenerate(pos);
        true
    }

    /// Generate `pos` unconditionally, discarding whatever was there (including edits).
    pub fn regenerate(&mut self, pos: ChunkPos) {
        let chunk = self.generator.generate(
            pos,
            self.chunk_width,
            self.chunk_height,
            self.biome,
            self.generations,
        );
        self.generations += 1;
        if self.storage.insert(chunk).is_some() {
            debug!(chunk = %pos, "chunk regenerated over existing contents");
        }
    }

    /// Total generator invocations so far.
    pub fn generation_count(&self) -> u64 {
        self.generations
    }

    /// Apply the retention policy. Window chunks are never evicted.
    pub fn evict_outside_window(&mut self) -> Vec<ChunkPos> {
        let window = self.window();
        self.storage.evict(self.retention, window)
    }

    /// Resident chunk count.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// True before the first chunk streams in.
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Whether `pos` is resident.
    pub fn contains(&self, pos: ChunkPos) -> bool {
        self.storage.contains(pos)
    }

    /// Resident chunk at `pos`.
    pub fn chunk(&self, pos: ChunkPos) -> Option<&Chunk> {
        self.storage.get(pos)
    }

    /// Mutable access; marks the chunk recently used.
    pub fn chunk_mut(&mut self, pos: ChunkPos) -> Option<&mut Chunk> {
        self.storage.get_mut(pos)
    }

    /// Resident positions in coordinate order.
    pub fn positions(&self) -> impl Iterator<Item = ChunkPos> + '_ {
        self.storage.positions()
    }

    /// Positions of chunks with any of `flags` set, clearing those flags.
    pub fn take_dirty(&mut self, flags: DirtyFlags) -> Vec<ChunkPos> {
        self.storage
            .chunks_mut()
            .filter_map(|chunk| (!chunk.take_dirty(flags).is_empty()).then(|| chunk.position()))
            .collect()
    }

    /// Chunk owning a world tile.
    pub fn chunk_of(&self, coord: TileCoord) -> ChunkPos {
        coord.split(self.chunk_width, self.chunk_height).0
    }

    /// Cell at a world tile, if its chunk has been generated.
    pub fn cell_at(&self, coord: TileCoord) -> Option<&Cell> {
        let (pos, x, y) = coord.split(self.chunk_width, self.chunk_height);
        self.storage.get(pos)?.cell(x, y)
    }

    /// Tile at a world tile and layer.
    pub fn block(&self, block: BlockRef) -> Option<Tile> {
        self.cell_at(block.coord)?.layer(block.layer)
    }

    /// Stack `tile` on top of the cell at `coord`.
    ///
    /// Placement into ungenerated space is refused and returns `None`.
    pub fn place_tile(&mut self, coord: TileCoord, tile: Tile) -> Option<BlockRef> {
        let (pos, x, y) = coord.split(self.chunk_width, self.chunk_height);
        let Some(chunk) = self.storage.get_mut(pos) else {
            trace!(?coord, "placement refused: chunk not generated");
            return None;
        };
        let layer = chunk.push_overlay(x, y, tile)?;
        trace!(?coord, layer, kind = ?tile.kind, "tile placed");
        Some(BlockRef { coord, layer })
    }

    /// Solid layers in the given chunk.
    pub fn solid_blocks(&self, pos: ChunkPos) -> Vec<BlockRef> {
        let Some(chunk) = self.storage.get(pos) else {
            return Vec::new();
        };
        chunk
            .cells()
            .flat_map(|(coord, cell)| {
                cell.layers()
                    .iter()
                    .enumerate()
                    .filter(|(_, tile)| tile.is_solid())
                    .map(move |(layer, _)| BlockRef { coord, layer })
            })
            .collect()
    }

    /// Tiles of every resident window chunk, in draw order.
    pub fn draw_list(&self) -> DrawList {
        let mut list = DrawList::default();
        for pos in self.window().positions() {
            if let Some(chunk) = self.storage.get(pos) {
                list.push_chunk(chunk, self.tile_size);
            }
        }
        list.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skafos_core::TileKind;

    fn map() -> ChunkMap {
        ChunkMap::new(&WorldConfig {
            world_seed: Some(42),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn new_rejects_invalid_config() {
        let config = WorldConfig {
            chunk_width: 0,
            ..Default::default()
        };
        assert!(ChunkMap::new(&config).is_err());
    }

    #[test]
    fn chunk_at_floors_negative_positions() {
        let map = map();
        assert_eq!(map.chunk_at(Vec2::new(255.0, 0.0)), ChunkPos::new(0, 0));
        assert_eq!(map.chunk_at(Vec2::new(256.0, -1.0)), ChunkPos::new(1, -1));
    }

    #[test]
    fn ensure_loads_window_once() {
        let mut map = map();
        assert_eq!(map.ensure_chunks_loaded().len(), 64);
        assert_eq!(map.len(), 64);
        assert_eq!(map.generation_count(), 64);
        assert!(map.ensure_chunks_loaded().is_empty());
        assert_eq!(map.generation_count(), 64);
    }

    #[test]
    fn moving_focus_loads_only_new_column() {
        let mut map = map();
        map.ensure_chunks_loaded();
        assert!(map.set_focus(ChunkPos::new(1, 0)));
        let fresh = map.ensure_chunks_loaded();
        assert_eq!(fresh.len(), 8);
        assert!(fresh.iter().all(|pos| pos.x == 4));
        assert_eq!(map.len(), 72);
        assert!(!map.set_focus(ChunkPos::new(1, 0)));
    }

    #[test]
    fn placement_requires_generated_chunk() {
        let mut map = map();
        let coord = TileCoord::new(1, 1);
        assert!(map.place_tile(coord, Tile::of(TileKind::Stone)).is_none());

        map.ensure_chunks_loaded();
        let placed = map.place_tile(coord, Tile::of(TileKind::Stone)).unwrap();
        assert_eq!(placed.layer, 1);
        assert_eq!(map.block(placed), Some(Tile::of(TileKind::Stone)));
        assert_eq!(map.cell_at(coord).unwrap().layers().len(), 2);
    }

    #[test]
    fn regenerate_discards_edits() {
        // A huge safe zone keeps generated trees out of the count.
        let mut map = ChunkMap::new(&WorldConfig {
            world_seed: Some(42),
            spawn_safe_radius: 10_000,
            ..Default::default()
        })
        .unwrap();
        map.ensure_chunks_loaded();
        let coord = TileCoord::new(2, 2);
        map.place_tile(coord, Tile::of(TileKind::Tree));
        assert_eq!(map.solid_blocks(ChunkPos::new(0, 0)).len(), 1);

        map.regenerate(ChunkPos::new(0, 0));
        assert_eq!(map.cell_at(coord).unwrap().layers().len(), 1);
        assert!(map.solid_blocks(ChunkPos::new(0, 0)).is_empty());
        assert_eq!(map.generation_count(), 65);
    }

    #[test]
    fn keep_alive_evicts_after_focus_moves() {
        let mut map = ChunkMap::new(&WorldConfig {
            world_seed: Some(1),
            draw_radius: 1,
            retention: ChunkRetention::KeepAlive { radius: 2 },
            ..Default::default()
        })
        .unwrap();
        map.ensure_chunks_loaded();
        assert!(map.evict_outside_window().is_empty());

        map.set_focus(ChunkPos::new(10, 0));
        map.ensure_chunks_loaded();
        let evicted = map.evict_outside_window();
        assert_eq!(evicted.len(), 4);
        assert_eq!(map.len(), 4);
    }

    #[test]
    fn placement_marks_chunk_dirty() {
        let mut map = map();
        map.ensure_chunks_loaded();
        assert_eq!(map.take_dirty(DirtyFlags::TILES).len(), 64);
        assert!(map.take_dirty(DirtyFlags::TILES).is_empty());

        map.place_tile(TileCoord::new(-1, 0), Tile::of(TileKind::Dirt));
        assert_eq!(map.take_dirty(DirtyFlags::TILES), vec![ChunkPos::new(-1, 0)]);
        assert_eq!(map.chunk_of(TileCoord::new(-1, 0)), ChunkPos::new(-1, 0));
    }

    #[test]
    fn draw_list_covers_window() {
        let mut map = map();
        map.ensure_chunks_loaded();
        let list = map.draw_list();
        assert!(list.ground.len() >= 64 * 256);
        assert_eq!(list.tall_bottoms.len(), list.tall_tops.len());
    }
}
