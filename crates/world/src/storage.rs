//! Resident chunk store with recency tracking for eviction.

use std::collections::BTreeMap;

use lru::LruCache;
use tracing::debug;

use crate::chunk::{Chunk, ChunkPos, ChunkWindow};
use crate::config::ChunkRetention;

/// In-memory chunk arena keyed by chunk coordinate.
/// Uses BTreeMap for deterministic iteration order; the LRU only tracks recency.
pub struct ChunkStorage {
    chunks: BTreeMap<ChunkPos, Chunk>,
    recency: LruCache<ChunkPos, ()>,
}

impl Default for ChunkStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl ChunkStorage {
    /// Empty storage with unbounded recency tracking.
    pub fn new() -> Self {
        Self {
            chunks: BTreeMap::new(),
            recency: LruCache::unbounded(),
        }
    }

    /// Number of resident chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Returns true when no chunks are currently stored.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Whether a chunk is resident at `pos`.
    pub fn contains(&self, pos: ChunkPos) -> bool {
        self.chunks.contains_key(&pos)
    }

    /// Store a chunk, replacing (not merging with) any chunk already at its position.
    pub fn insert(&mut self, chunk: Chunk) -> Option<Chunk> {
        let pos = chunk.position();
        self.touch(pos);
        self.chunks.insert(pos, chunk)
    }

    /// Attempt to fetch a chunk immutably. Does not count as a use.
    pub fn get(&self, pos: ChunkPos) -> Option<&Chunk> {
        self.chunks.get(&pos)
    }

    /// Fetch a chunk mutably and mark it recently used.
    pub fn get_mut(&mut self, pos: ChunkPos) -> Option<&mut Chunk> {
        if self.chunks.contains_key(&pos) {
            self.touch(pos);
        }
        self.chunks.get_mut(&pos)
    }

    /// Mark a resident chunk as recently used.
    pub fn touch(&mut self, pos: ChunkPos) {
        self.recency.put(pos, ());
    }

    /// Iterate over currently resident chunk positions.
    pub fn positions(&self) -> impl Iterator<Item = ChunkPos> + '_ {
        self.chunks.keys().copied()
    }

    /// Iterate over resident chunks in coordinate order.
    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> + '_ {
        self.chunks.values()
    }

    /// Mutable iteration in coordinate order. Does not count as a use.
    pub fn chunks_mut(&mut self) -> impl Iterator<Item = &mut Chunk> + '_ {
        self.chunks.values_mut()
    }

    /// Drop a chunk and forget its recency.
    pub fn remove(&mut self, pos: ChunkPos) -> Option<Chunk> {
        self.recency.pop(&pos);
        self.chunks.remove(&pos)
    }

    /// Drop chunks the retention policy no longer wants. Chunks inside `window` always stay.
    ///
    /// Returns the evicted positions in eviction order.
    pub fn evict(&mut self, retention: ChunkRetention, window: ChunkWindow) -> Vec<ChunkPos> {
        let victims: Vec<ChunkPos> = match retention {
            ChunkRetention::Unbounded => Vec::new(),
            ChunkRetention::KeepAlive { radius } => self
                .chunks
                .keys()
                .copied()
                .filter(|pos| !window.contains(*pos) && pos.distance(window.focus) > radius)
                .collect(),
            ChunkRetention::Lru { capacity } => {
                let excess = self.chunks.len().saturating_sub(capacity);
                // Least recently used first.
                self.recency
                    .iter()
                    .rev()
                    .map(|(pos, _)| *pos)
                    .filter(|pos| !window.contains(*pos))
                    .take(excess)
                    .collect()
            }
        };

        for pos in &victims {
            self.remove(*pos);
            debug!(chunk = %pos, "chunk evicted");
        }
        victims
    }
}
