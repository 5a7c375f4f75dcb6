//! Errors surfaced when constructing world state.

use thiserror::Error;

/// Fatal construction failures. Routine gameplay edge cases are never errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorldError {
    /// Draw radius must cover at least one chunk.
    #[error("draw radius must be positive, got {0}")]
    InvalidDrawRadius(i32),
    /// Chunks need at least one tile per axis.
    #[error("chunk dimensions must be non-zero, got {width}x{height}")]
    InvalidChunkSize {
        /// Configured width in tiles.
        width: usize,
        /// Configured height in tiles.
        height: usize,
    },
    /// Tile size in pixels must be positive and finite.
    #[error("tile size must be positive, got {0}")]
    InvalidTileSize(String),
    /// Keep-alive radius cannot be tighter than the draw radius.
    #[error("keep-alive radius {keep_alive} is smaller than draw radius {draw}")]
    KeepAliveTooSmall {
        /// Configured keep-alive radius.
        keep_alive: i32,
        /// Configured draw radius.
        draw: i32,
    },
    /// LRU capacity must hold the whole streaming window.
    #[error("LRU capacity {capacity} cannot hold the {window}-chunk streaming window")]
    LruTooSmall {
        /// Configured capacity.
        capacity: usize,
        /// Chunks in the streaming window.
        window: usize,
    },
    /// Inventory needs a hot-bar row with at least one column.
    #[error("inventory grid must be at least 1x1, got {columns}x{rows}")]
    InvalidInventory {
        /// Configured column count.
        columns: usize,
        /// Configured row count.
        rows: usize,
    },
    /// Movement speeds must be non-negative and finite.
    #[error("invalid movement speed: {0}")]
    InvalidSpeed(String),
}
