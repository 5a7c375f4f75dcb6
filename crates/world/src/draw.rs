//! Render-facing enumeration of tiles in stacking order.

use glam::Vec2;
use serde::Serialize;
use skafos_core::{Tile, TileFrame};

use crate::chunk::Chunk;

/// One tile to draw at a world-pixel position (min corner of its cell).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DrawTile {
    /// Min corner in world pixels.
    pub position: Vec2,
    /// Tile and frame to draw.
    pub tile: Tile,
}

/// Tiles split into the three passes a renderer draws around its entities.
///
/// Draw `ground`, then `tall_bottoms`, then entities, then `tall_tops`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DrawList {
    /// Ground tiles and flat overlays.
    pub ground: Vec<DrawTile>,
    /// Lower halves of tall tiles.
    pub tall_bottoms: Vec<DrawTile>,
    /// Upper halves, drawn over entities.
    pub tall_tops: Vec<DrawTile>,
}

impl DrawList {
    /// Append every layer of a chunk.
    pub fn push_chunk(&mut self, chunk: &Chunk, tile_size: f32) {
        for (coord, cell) in chunk.cells() {
            let position = coord.to_world(tile_size);
            for tile in cell.layers() {
                if tile.is_tall() {
                    self.tall_bottoms.push(DrawTile {
                        position,
                        tile: Tile::new(tile.kind, TileFrame::TreeGrownBottom),
                    });
                    self.tall_tops.push(DrawTile {
                        position,
                        tile: Tile::new(tile.kind, TileFrame::TreeGrownTop),
                    });
                } else {
                    self.ground.push(DrawTile {
                        position,
                        tile: *tile,
                    });
                }
            }
        }
    }

    /// Finish the list. Tops are drawn back to front so lower rows overlap the ones above.
    pub fn finish(mut self) -> Self {
        self.tall_tops.reverse();
        self
    }

    /// Tiles across all three passes.
    pub fn len(&self) -> usize {
        self.ground.len() + self.tall_bottoms.len() + self.tall_tops.len()
    }

    /// True when no pass has tiles.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
