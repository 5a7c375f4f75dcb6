//! Tile descriptors - value types naming what occupies a map cell layer.

use serde::{Deserialize, Serialize};

/// What a tile is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TileKind {
    /// Bare dirt ground.
    Dirt,
    /// Grass ground.
    Grass,
    /// Tree overlay (the only solid kind).
    Tree,
    /// Stone boulder overlay.
    Stone,
    /// Copper ore overlay.
    CopperOre,
}

impl TileKind {
    /// Whether blocks of this kind stop movement.
    pub fn is_solid(self) -> bool {
        matches!(self, TileKind::Tree)
    }

    /// Whether this kind can appear as the ground layer of a cell.
    pub fn is_ground(self) -> bool {
        matches!(self, TileKind::Dirt | TileKind::Grass)
    }

    /// Default visual frame for the kind.
    pub fn default_frame(self) -> TileFrame {
        match self {
            TileKind::Dirt => TileFrame::Dirt,
            TileKind::Grass => TileFrame::Grass1,
            TileKind::Tree => TileFrame::TreeGrownTop,
            TileKind::Stone => TileFrame::Stone1,
            TileKind::CopperOre => TileFrame::Copper1,
        }
    }
}

/// Sprite frame selector for a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TileFrame {
    /// Plain dirt.
    Dirt,
    /// Most common grass variant.
    Grass1,
    /// Grass with a few blades.
    Grass2,
    /// Grass with flowers.
    Grass3,
    /// Rare grass variant.
    Grass4,
    /// Young tree.
    TreeSapling,
    /// Canopy half of a grown tree.
    TreeGrownTop,
    /// Trunk half of a grown tree.
    TreeGrownBottom,
    /// Stone boulder.
    Stone1,
    /// Copper ore vein.
    Copper1,
}

/// Immutable tile descriptor. Equality is structural.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    /// Tile kind.
    pub kind: TileKind,
    /// Visual frame.
    pub frame: TileFrame,
}

impl Tile {
    /// Create a tile from kind and frame.
    pub const fn new(kind: TileKind, frame: TileFrame) -> Self {
        Self { kind, frame }
    }

    /// Create a tile using the kind's default frame.
    pub fn of(kind: TileKind) -> Self {
        Self::new(kind, kind.default_frame())
    }

    /// Shortcut for [`TileKind::is_solid`].
    #[inline]
    pub fn is_solid(&self) -> bool {
        self.kind.is_solid()
    }

    /// Whether the tile is drawn in two halves: a bottom under entities and a top over them.
    /// Saplings are drawn flat.
    pub fn is_tall(&self) -> bool {
        self.kind == TileKind::Tree && self.frame != TileFrame::TreeSapling
    }
}
