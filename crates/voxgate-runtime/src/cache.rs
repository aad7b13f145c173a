use hashbrown::HashMap;
use voxgate_chunk::Chunk;
use voxgate_world::ChunkCoord;

#[derive(Clone, Copy, Debug, Default)]
pub struct ChunkCacheStats {
    pub hits: u64,
    pub misses: u64,
    pub clears: u64,
    pub dropped: u64,
    pub entries: usize,
}

/// Holding area for chunks that left the live window. Never evicts single
/// entries: once it grows past capacity it is emptied in one go.
pub struct ChunkCache {
    entries: HashMap<ChunkCoord, Chunk>,
    capacity: usize,
    hits: u64,
    misses: u64,
    clears: u64,
    dropped: u64,
}

impl ChunkCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            capacity,
            hits: 0,
            misses: 0,
            clears: 0,
            dropped: 0,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn contains(&self, coord: ChunkCoord) -> bool {
        self.entries.contains_key(&coord)
    }

    /// Remove and return the cached chunk at `coord`.
    pub fn take(&mut self, coord: ChunkCoord) -> Option<Chunk> {
        let hit = self.entries.remove(&coord);
        if hit.is_some() {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
        hit
    }

    /// Empty the cache if it holds more than `capacity` chunks.
    /// Returns whether it was cleared.
    pub fn clear_if_over(&mut self) -> bool {
        if self.entries.len() <= self.capacity {
            return false;
        }
        self.dropped += self.entries.len() as u64;
        self.entries.clear();
        self.clears += 1;
        true
    }

    pub fn insert(&mut self, chunk: Chunk) {
        self.entries.insert(chunk.coord(), chunk);
    }

    pub fn stats(&self) -> ChunkCacheStats {
        ChunkCacheStats {
            hits: self.hits,
            misses: self.misses,
            clears: self.clears,
            dropped: self.dropped,
            entries: self.entries.len(),
        }
    }
}
