//! World configuration shared by the simulation and its host.

use crate::error::WorldError;
use serde::{Deserialize, Serialize};

/// Biome used to pick ground tiles for freshly generated chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Biome {
    /// Every cell is dirt.
    Dirt,
    /// Weighted grass variants.
    #[default]
    Grass,
}

/// What happens to chunks that fall outside the streaming window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum ChunkRetention {
    /// Never evict. Memory grows with the explored area.
    #[default]
    Unbounded,
    /// Evict chunks farther than `radius` chunks (Chebyshev) from the focus.
    KeepAlive {
        /// Keep-alive radius in chunks; must be at least the draw radius.
        radius: i32,
    },
    /// Keep at most `capacity` chunks, evicting least recently touched first.
    Lru {
        /// Maximum resident chunks; must hold the full window.
        capacity: usize,
    },
}

/// Tunables for world streaming, generation, and the player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Chunk width in tiles.
    pub chunk_width: usize,
    /// Chunk height in tiles.
    pub chunk_height: usize,
    /// Tile edge length in world pixels.
    pub tile_size: f32,
    /// Chunks generated on each side of the focus.
    pub draw_radius: i32,
    /// Eviction policy for chunks outside the window.
    pub retention: ChunkRetention,
    /// Seed for generation; `None` draws one from entropy.
    pub world_seed: Option<u64>,
    /// Biome for new chunks.
    pub biome: Biome,
    /// Tiles around world origin that never receive overlays.
    pub spawn_safe_radius: i32,
    /// Inventory columns (also hot-bar width).
    pub inventory_columns: usize,
    /// Inventory rows including the hot-bar row.
    pub inventory_rows: usize,
    /// Walking speed in pixels per second.
    pub walk_speed: f32,
    /// Running speed in pixels per second.
    pub run_speed: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            chunk_width: 16,
            chunk_height: 16,
            tile_size: 16.0,
            draw_radius: 4,
            retention: ChunkRetention::Unbounded,
            world_seed: None,
            biome: Biome::Grass,
            spawn_safe_radius: 3,
            inventory_columns: 8,
            inventory_rows: 4,
            walk_speed: 32.0,
            run_speed: 64.0,
        }
    }
}

impl WorldConfig {
    /// Number of chunks in the square streaming window.
    pub fn window_chunks(&self) -> usize {
        let side = (self.draw_radius.max(0) as usize) * 2;
        side * side
    }

    /// Chunk width in world pixels.
    pub fn chunk_pixel_width(&self) -> f32 {
        self.chunk_width as f32 * self.tile_size
    }

    /// Chunk height in world pixels.
    pub fn chunk_pixel_height(&self) -> f32 {
        self.chunk_height as f32 * self.tile_size
    }

    /// Reject configurations the world cannot run with.
    pub fn validate(&self) -> Result<(), WorldError> {
        if self.draw_radius <= 0 {
            return Err(WorldError::InvalidDrawRadius(self.draw_radius));
        }
        if self.chunk_width == 0 || self.chunk_height == 0 {
            return Err(WorldError::InvalidChunkSize {
                width: self.chunk_width,
                height: self.chunk_height,
            });
        }
        if !(self.tile_size.is_finite() && self.tile_size > 0.0) {
            return Err(WorldError::InvalidTileSize(self.tile_size.to_string()));
        }
        match self.retention {
            ChunkRetention::Unbounded => {}
            ChunkRetention::KeepAlive { radius } => {
                if radius < self.draw_radius {
                    return Err(WorldError::KeepAliveTooSmall {
                        keep_alive: radius,
                        draw: self.draw_radius,
                    });
                }
            }
            ChunkRetention::Lru { capacity } => {
                let window = self.window_chunks();
                if capacity < window {
                    return Err(WorldError::LruTooSmall { capacity, window });
                }
            }
        }
        if self.inventory_columns == 0 || self.inventory_rows == 0 {
            return Err(WorldError::InvalidInventory {
                columns: self.inventory_columns,
                rows: self.inventory_rows,
            });
        }
        for speed in [self.walk_speed, self.run_speed] {
            if !(speed.is_finite() && speed >= 0.0) {
                return Err(WorldError::InvalidSpeed(speed.to_string()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = WorldConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.window_chunks(), 64);
        assert_eq!(config.chunk_pixel_width(), 256.0);
    }

    #[test]
    fn rejects_non_positive_radius() {
        let config = WorldConfig {
            draw_radius: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(WorldError::InvalidDrawRadius(0)));
    }

    #[test]
    fn rejects_tight_keep_alive() {
        let config = WorldConfig {
            retention: ChunkRetention::KeepAlive { radius: 2 },
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(WorldError::KeepAliveTooSmall { keep_alive: 2, draw: 4 })
        ));
    }

    #[test]
    fn rejects_lru_smaller_than_window() {
        let config = WorldConfig {
            retention: ChunkRetention::Lru { capacity: 10 },
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(WorldError::LruTooSmall {
                capacity: 10,
                window: 64
            })
        ));
    }

    #[test]
    fn rejects_empty_inventory() {
        let config = WorldConfig {
            inventory_rows: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn retention_round_trips_through_json() {
        let config = WorldConfig {
            retention: ChunkRetention::KeepAlive { radius: 8 },
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: WorldConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
