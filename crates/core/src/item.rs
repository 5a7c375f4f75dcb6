//! Item kinds carried in inventories and dropped into the world.

use crate::tile::{Tile, TileFrame, TileKind};
use serde::{Deserialize, Serialize};

/// Broad behavior class of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemCategory {
    /// Can be placed into the world as a tile.
    PlaceableBlock,
    /// Crafting material only.
    Resource,
}

/// Item type identifier. Stacks merge only when their kinds are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ItemKind {
    /// A clump of dirt.
    Dirt,
    /// A stone boulder.
    Stone,
    /// Raw copper ore.
    CopperOre,
    /// A wooden log.
    Log,
    /// A tree sapling.
    Sapling,
}

impl ItemKind {
    /// Behavior class of this item.
    pub fn category(self) -> ItemCategory {
        match self {
            ItemKind::Dirt | ItemKind::Stone | ItemKind::Sapling => ItemCategory::PlaceableBlock,
            ItemKind::CopperOre | ItemKind::Log => ItemCategory::Resource,
        }
    }

    /// Tile produced when the item is placed, if it is placeable.
    pub fn placed_tile(self) -> Option<Tile> {
        match self {
            ItemKind::Dirt => Some(Tile::of(TileKind::Dirt)),
            ItemKind::Stone => Some(Tile::of(TileKind::Stone)),
            ItemKind::Sapling => Some(Tile::new(TileKind::Tree, TileFrame::TreeSapling)),
            ItemKind::CopperOre | ItemKind::Log => None,
        }
    }

    /// Frame used to draw the item icon.
    pub fn icon_frame(self) -> TileFrame {
        match self {
            ItemKind::Dirt => TileFrame::Dirt,
            ItemKind::Stone => TileFrame::Stone1,
            ItemKind::CopperOre => TileFrame::Copper1,
            ItemKind::Log => TileFrame::TreeGrownBottom,
            ItemKind::Sapling => TileFrame::TreeSapling,
        }
    }

    /// Lowercase display name.
    pub fn name(self) -> &'static str {
        match self {
            ItemKind::Dirt => "dirt",
            ItemKind::Stone => "stone",
            ItemKind::CopperOre => "copper_ore",
            ItemKind::Log => "log",
            ItemKind::Sapling => "sapling",
        }
    }
}
