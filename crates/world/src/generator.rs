//! Chunk generation from weighted tile tables.
//!
//! Each cell gets a ground tile drawn from the biome's frame table, then a single
//! draw over the overlay table picks at most one object (tree, stone, or ore).

use crate::chunk::{Cell, Chunk, ChunkPos};
use crate::config::Biome;
use rand::Rng;
use skafos_core::{scoped_rng, Tile, TileFrame, TileKind};
use tracing::{debug, instrument};

/// Object stacked on top of the ground tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Overlay {
    /// Nothing on this cell.
    None,
    /// A grown tree.
    Tree,
    /// A stone boulder.
    Stone,
    /// A copper ore vein.
    CopperOre,
}

impl Overlay {
    /// Tile placed for this overlay, if any.
    pub fn tile(self) -> Option<Tile> {
        match self {
            Overlay::None => None,
            Overlay::Tree => Some(Tile::new(TileKind::Tree, TileFrame::TreeGrownTop)),
            Overlay::Stone => Some(Tile::of(TileKind::Stone)),
            Overlay::CopperOre => Some(Tile::of(TileKind::CopperOre)),
        }
    }
}

/// Grass frame weights (percent).
pub const GRASS_FRAMES: [(TileFrame, u32); 4] = [
    (TileFrame::Grass1, 80),
    (TileFrame::Grass2, 15),
    (TileFrame::Grass3, 4),
    (TileFrame::Grass4, 1),
];

/// Overlay weights (per mille). One draw per cell keeps the categories exclusive.
pub const OVERLAYS: [(Overlay, u32); 4] = [
    (Overlay::None, 965),
    (Overlay::Tree, 20),
    (Overlay::Stone, 10),
    (Overlay::CopperOre, 5),
];

/// Sum of weights in a table.
pub fn total_weight<T>(table: &[(T, u32)]) -> u32 {
    table.iter().map(|(_, weight)| weight).sum()
}

/// Pick the entry whose cumulative band contains `roll` (`0 <= roll < total`).
///
/// Rolls past the end clamp to the last entry.
pub fn pick_weighted<T: Copy>(table: &[(T, u32)], roll: u32) -> T {
    let mut upper = 0;
    for (value, weight) in table {
        upper += weight;
        if roll < upper {
            return *value;
        }
    }
    table[table.len() - 1].0
}

fn draw<T: Copy, R: Rng>(table: &[(T, u32)], rng: &mut R) -> T {
    pick_weighted(table, rng.gen_range(0..total_weight(table)))
}

/// Produces fresh chunks for the chunk map.
#[derive(Debug, Clone)]
pub struct ChunkGenerator {
    world_seed: u64,
    spawn_safe_radius: i32,
}

impl ChunkGenerator {
    /// Create a generator from world seed.
    pub fn new(world_seed: u64, spawn_safe_radius: i32) -> Self {
        Self {
            world_seed,
            spawn_safe_radius,
        }
    }

    /// Seed used for all draws.
    pub fn world_seed(&self) -> u64 {
        self.world_seed
    }

    /// Whether a world tile lies in the overlay-free square around the origin.
    pub fn is_spawn_safe(&self, x: i32, y: i32) -> bool {
        x.abs() < self.spawn_safe_radius && y.abs() < self.spawn_safe_radius
    }

    /// Generate a chunk at `pos`.
    ///
    /// `generation` scopes the randomness so regenerating a coordinate draws new
    /// content while a given seed stays reproducible.
    #[instrument(skip(self), fields(world_seed = self.world_seed))]
    pub fn generate(
        &self,
        pos: ChunkPos,
        width: usize,
        height: usize,
        biome: Biome,
        generation: u64,
    ) -> Chunk {
        let mut rng = scoped_rng(self.world_seed, pos.hash64(), generation);
        let mut chunk = Chunk::new(pos, width, height);
        let origin = chunk.origin();
        let mut overlays = 0usize;

        for ly in 0..height {
            for lx in 0..width {
                let ground = match biome {
                    Biome::Dirt => Tile::of(TileKind::Dirt),
                    Biome::Grass => Tile::new(TileKind::Grass, draw(&GRASS_FRAMES, &mut rng)),
                };
                let mut cell = Cell::with_ground(ground);

                // Always draw so the RNG stream does not depend on the safe zone.
                let overlay = draw(&OVERLAYS, &mut rng);
                let wx = origin.x + lx as i32;
                let wy = origin.y + ly as i32;
                if !self.is_spawn_safe(wx, wy) {
                    if let Some(tile) = overlay.tile() {
                        cell.push(tile);
                        overlays += 1;
                    }
                }

                chunk.set_cell(lx, ly, cell);
            }
        }

        debug!(overlays, "chunk generated");
        chunk
    }
}
