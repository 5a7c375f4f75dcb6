//! Chunk and tile coordinates, cell stacks, and the streaming window.

use std::fmt;

use glam::Vec2;
use skafos_core::Tile;

/// Chunk coordinate in chunk space.
/// Implements Ord for deterministic iteration in BTreeMap/BTreeSet (sorts by x, then y).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Default,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct ChunkPos {
    /// Chunk column.
    pub x: i32,
    /// Chunk row.
    pub y: i32,
}

impl ChunkPos {
    /// Chunk at column `x`, row `y`.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Chebyshev distance in chunks.
    pub fn distance(self, other: ChunkPos) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }

    /// Stable hash used to scope generation randomness.
    pub fn hash64(self) -> u64 {
        let packed = ((self.x as u32 as u64) << 32) | (self.y as u32 as u64);
        packed.wrapping_mul(0x2545_F491_4F6C_DD1D)
    }
}

impl fmt::Display for ChunkPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// World tile coordinate (one unit per tile, +Y up).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Default,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct TileCoord {
    /// Tile column.
    pub x: i32,
    /// Tile row (+Y up).
    pub y: i32,
}

impl TileCoord {
    /// Tile at column `x`, row `y`.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Tile containing a world-space pixel position.
    pub fn from_world(position: Vec2, tile_size: f32) -> Self {
        Self {
            x: (position.x / tile_size).floor() as i32,
            y: (position.y / tile_size).floor() as i32,
        }
    }

    /// Min corner of the tile in world pixels.
    pub fn to_world(self, tile_size: f32) -> Vec2 {
        Vec2::new(self.x as f32 * tile_size, self.y as f32 * tile_size)
    }

    /// Split into owning chunk and chunk-local (x, y).
    pub fn split(self, chunk_width: usize, chunk_height: usize) -> (ChunkPos, usize, usize) {
        let w = chunk_width as i32;
        let h = chunk_height as i32;
        let chunk = ChunkPos::new(self.x.div_euclid(w), self.y.div_euclid(h));
        (
            chunk,
            self.x.rem_euclid(w) as usize,
            self.y.rem_euclid(h) as usize,
        )
    }
}

/// Square window of chunk coordinates `[focus - radius, focus + radius)` on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkWindow {
    /// Chunk the window is centred on.
    pub focus: ChunkPos,
    /// Half the side length in chunks.
    pub radius: i32,
}

impl ChunkWindow {
    /// Window of `2 * radius` chunks per side around `focus`.
    pub const fn new(focus: ChunkPos, radius: i32) -> Self {
        Self { focus, radius }
    }

    /// Whether `pos` falls inside the half-open window.
    pub fn contains(&self, pos: ChunkPos) -> bool {
        let r = self.radius;
        pos.x >= self.focus.x - r
            && pos.x < self.focus.x + r
            && pos.y >= self.focus.y - r
            && pos.y < self.focus.y + r
    }

    /// Window coordinates, row by row from the lowest y.
    pub fn positions(&self) -> impl Iterator<Item = ChunkPos> {
        let ChunkWindow { focus, radius } = *self;
        (focus.y - radius..focus.y + radius).flat_map(move |y| {
            (focus.x - radius..focus.x + radius).map(move |x| ChunkPos::new(x, y))
        })
    }

    /// Number of coordinates in the window.
    pub fn len(&self) -> usize {
        let side = (self.radius.max(0) as usize) * 2;
        side * side
    }

    /// True for a radius of zero or less.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One tile position's full stack: ground first, then overlays.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cell {
    layers: Vec<Tile>,
}

impl Cell {
    /// Cell with only a ground tile.
    pub fn with_ground(ground: Tile) -> Self {
        Self {
            layers: vec![ground],
        }
    }

    /// Ground tile, if the cell has been populated.
    pub fn ground(&self) -> Option<Tile> {
        self.layers.first().copied()
    }

    /// Overlays stacked on top of the ground.
    pub fn overlays(&self) -> &[Tile] {
        self.layers.get(1..).unwrap_or(&[])
    }

    /// All layers in stacking order.
    pub fn layers(&self) -> &[Tile] {
        &self.layers
    }

    /// Tile at a given layer index.
    pub fn layer(&self, index: usize) -> Option<Tile> {
        self.layers.get(index).copied()
    }

    /// Append a layer and return its index.
    pub fn push(&mut self, tile: Tile) -> usize {
        self.layers.push(tile);
        self.layers.len() - 1
    }
}

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    /// Dirty flags set whenever chunk data changes.
    pub struct DirtyFlags: u8 {
        /// Tile layers changed; draw batches must be rebuilt.
        const TILES = 0b0000_0001;
        /// Solid blocks changed; collidable registrations must be refreshed.
        const COLLISION = 0b0000_0010;
    }
}

impl Default for DirtyFlags {
    fn default() -> Self {
        DirtyFlags::empty()
    }
}

/// Fixed-size rectangular grid of cells, the unit of generation and streaming.
#[derive(Debug, Clone)]
pub struct Chunk {
    position: ChunkPos,
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    dirty: DirtyFlags,
}

impl Chunk {
    /// Allocate a chunk whose cells are all empty.
    pub fn new(position: ChunkPos, width: usize, height: usize) -> Self {
        Self {
            position,
            width,
            height,
            cells: vec![Cell::default(); width * height],
            dirty: DirtyFlags::all(),
        }
    }

    /// Chunk coordinate.
    #[inline]
    pub fn position(&self) -> ChunkPos {
        self.position
    }

    /// Width in tiles.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in tiles.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// World tile coordinate of the chunk's (0, 0) cell.
    pub fn origin(&self) -> TileCoord {
        TileCoord::new(
            self.position.x * self.width as i32,
            self.position.y * self.height as i32,
        )
    }

    fn index(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    /// Borrow a cell by chunk-local coordinates.
    pub fn cell(&self, x: usize, y: usize) -> Option<&Cell> {
        self.index(x, y).map(|idx| &self.cells[idx])
    }

    /// Replace a cell's contents.
    pub fn set_cell(&mut self, x: usize, y: usize, cell: Cell) {
        if let Some(idx) = self.index(x, y) {
            if self.cells[idx] != cell {
                self.cells[idx] = cell;
                self.dirty.insert(DirtyFlags::TILES | DirtyFlags::COLLISION);
            }
        }
    }

    /// Append an overlay to a populated cell. Returns the new layer index.
    ///
    /// Cells without a ground tile refuse overlays.
    pub fn push_overlay(&mut self, x: usize, y: usize, tile: Tile) -> Option<usize> {
        let idx = self.index(x, y)?;
        let cell = &mut self.cells[idx];
        cell.ground()?;
        let layer = cell.push(tile);
        self.dirty.insert(DirtyFlags::TILES);
        if tile.is_solid() {
            self.dirty.insert(DirtyFlags::COLLISION);
        }
        Some(layer)
    }

    /// Iterate cells with their world tile coordinates, row by row.
    pub fn cells(&self) -> impl Iterator<Item = (TileCoord, &Cell)> + '_ {
        let origin = self.origin();
        self.cells.iter().enumerate().map(move |(idx, cell)| {
            let x = (idx % self.width) as i32;
            let y = (idx / self.width) as i32;
            (TileCoord::new(origin.x + x, origin.y + y), cell)
        })
    }

    /// Peek at the current dirty flags.
    pub fn dirty_flags(&self) -> DirtyFlags {
        self.dirty
    }

    /// Clear only `flags`, returning which of them were set.
    pub fn take_dirty(&mut self, flags: DirtyFlags) -> DirtyFlags {
        let taken = self.dirty & flags;
        self.dirty.remove(flags);
        taken
    }

    /// Consume and return the current dirty flags.
    pub fn take_dirty_flags(&mut self) -> DirtyFlags {
        let flags = self.dirty;
        self.dirty = DirtyFlags::empty();
        flags
    }
}
