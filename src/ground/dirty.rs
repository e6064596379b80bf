//! Dirty render-chunk tracking for ground mutations.

use std::collections::{HashMap, HashSet};

use super::CHUNK_TILES;

/// Integer coordinate of a render chunk (`CHUNK_TILES` x `CHUNK_TILES` tiles)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    pub x: i32,
    pub y: i32,
}

impl ChunkCoord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Chunk containing the tile at (x, y)
    pub fn from_tile(x: i32, y: i32) -> Self {
        Self {
            x: x.div_euclid(CHUNK_TILES),
            y: y.div_euclid(CHUNK_TILES),
        }
    }
}

/// Tracks which chunks the renderer must rebuild.
///
/// Every mutation marks the chunk of the touched tile and bumps its
/// generation counter, so cached draw buffers can also be validated by
/// version rather than by draining.
#[derive(Debug, Default)]
pub struct DirtyChunks {
    dirty: HashSet<ChunkCoord>,
    generations: HashMap<ChunkCoord, u32>,
}

impl DirtyChunks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the chunk containing tile (x, y) as dirty
    pub fn mark_tile(&mut self, x: i32, y: i32) {
        self.mark_chunk(ChunkCoord::from_tile(x, y));
    }

    /// Mark a chunk as dirty and increment its generation
    pub fn mark_chunk(&mut self, coord: ChunkCoord) {
        self.dirty.insert(coord);
        let generation = self.generations.entry(coord).or_insert(0);
        *generation = generation.wrapping_add(1);
    }

    /// Take all dirty chunks, sorted, and clear the dirty set
    pub fn take(&mut self) -> Vec<ChunkCoord> {
        let mut chunks: Vec<ChunkCoord> = self.dirty.drain().collect();
        chunks.sort_unstable();
        chunks
    }

    /// Generation counter of a chunk (0 = never touched)
    pub fn generation(&self, coord: &ChunkCoord) -> u32 {
        self.generations.get(coord).copied().unwrap_or(0)
    }

    pub fn has_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    pub fn is_dirty(&self, coord: &ChunkCoord) -> bool {
        self.dirty.contains(coord)
    }

    pub fn len(&self) -> usize {
        self.dirty.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dirty.is_empty()
    }

    /// Clear dirty state and reset generation counters
    pub fn clear(&mut self) {
        self.dirty.clear();
        self.generations.clear();
    }
}
