use std::sync::Arc;

use hashbrown::HashMap;
use voxgate_chunk::Chunk;
use voxgate_edit::ModificationLog;
use voxgate_geom::{BlockPos, Vec3};
use voxgate_world::{ChunkCoord, WorldConfig};

use crate::cache::ChunkCache;

#[derive(Clone, Copy, Debug, Default)]
pub struct WindowStats {
    pub recenters: u64,
    pub generated: u64,
    pub promoted: u64,
    pub evicted: u64,
    pub cache_clears: u64,
}

/// The `(2·border+1)²` chunks around the player plus the eviction cache.
pub struct WorldWindow {
    cfg: Arc<WorldConfig>,
    center: Option<ChunkCoord>,
    live: HashMap<ChunkCoord, Chunk>,
    cache: ChunkCache,
    stats: WindowStats,
}

impl WorldWindow {
    pub fn new(cfg: Arc<WorldConfig>) -> Self {
        let cache = ChunkCache::new(cfg.cache_size());
        Self {
            cfg,
            center: None,
            live: HashMap::new(),
            cache,
            stats: WindowStats::default(),
        }
    }

    /// Recenter on the chunk under `pos`. Live chunks are kept, cached ones
    /// promoted and missing ones generated with their logged edits replayed.
    /// Chunks leaving the window go to the cache. Returns whether the window
    /// moved.
    pub fn tick(&mut self, pos: Vec3, log: &ModificationLog) -> bool {
        let size = self.cfg.chunks.size;
        let center = ChunkCoord::containing(pos.x, pos.z, size);
        if self.center == Some(center) {
            return false;
        }
        let mut next = HashMap::with_capacity(self.cfg.cache_size());
        for coord in center.window(self.cfg.chunks.border, size) {
            let chunk = if let Some(chunk) = self.live.remove(&coord) {
                chunk
            } else if let Some(chunk) = self.cache.take(coord) {
                self.stats.promoted += 1;
                log::debug!(target: "stream", "promoted chunk ({}, {}) from cache", coord.x, coord.z);
                chunk
            } else {
                let mut chunk = Chunk::generate(coord, self.cfg.clone());
                chunk.update_from_log(&log.for_chunk(coord, size));
                self.stats.generated += 1;
                log::debug!(
                    target: "stream",
                    "generated chunk ({}, {}) with {} cubes",
                    coord.x,
                    coord.z,
                    chunk.num_cubes()
                );
                chunk
            };
            next.insert(coord, chunk);
        }

        if self.cache.clear_if_over() {
            self.stats.cache_clears += 1;
            log::debug!(target: "stream", "cache cleared");
        }
        for (coord, chunk) in std::mem::replace(&mut self.live, next) {
            log::trace!(target: "stream", "evicted chunk ({}, {})", coord.x, coord.z);
            self.stats.evicted += 1;
            self.cache.insert(chunk);
        }
        self.center = Some(center);
        self.stats.recenters += 1;
        log::info!(
            target: "stream",
            "window centered on ({}, {}): {} live, {} cached",
            center.x,
            center.z,
            self.live.len(),
            self.cache.len()
        );
        true
    }

    #[inline]
    pub fn center(&self) -> Option<ChunkCoord> {
        self.center
    }

    pub fn center_chunk(&self) -> Option<&Chunk> {
        self.center.and_then(|c| self.live.get(&c))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.live.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    #[inline]
    pub fn get(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.live.get(&coord)
    }

    /// Live chunk whose footprint contains `pos`.
    pub fn chunk_at(&self, pos: BlockPos) -> Option<&Chunk> {
        let coord = ChunkCoord::containing(pos.x as f32, pos.z as f32, self.cfg.chunks.size);
        self.live.get(&coord)
    }

    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.live.values()
    }

    /// Live coordinates in a stable order.
    pub fn coords(&self) -> Vec<ChunkCoord> {
        let mut v: Vec<ChunkCoord> = self.live.keys().copied().collect();
        v.sort();
        v
    }

    #[inline]
    pub fn cache(&self) -> &ChunkCache {
        &self.cache
    }

    #[inline]
    pub fn stats(&self) -> WindowStats {
        self.stats
    }

    /// Chunks worth testing for collisions at `pos`: the chunk under it,
    /// plus the side and diagonal neighbors whose boundary lies within the
    /// collision band.
    pub fn collision_chunks(&self, pos: Vec3) -> Vec<&Chunk> {
        let size = self.cfg.chunks.size;
        let band = self.cfg.chunks.collision_band;
        let center = ChunkCoord::containing(pos.x, pos.z, size);
        let half = size as f32 / 2.0;
        let (lx, lz) = (pos.x - center.x as f32, pos.z - center.z as f32);
        let near_x = half - lx.abs() <= band;
        let near_z = half - lz.abs() <= band;
        let sx = if lx >= 0.0 { 1 } else { -1 };
        let sz = if lz >= 0.0 { 1 } else { -1 };

        let mut offsets = vec![(0, 0)];
        if near_x {
            offsets.push((sx, 0));
        }
        if near_z {
            offsets.push((0, sz));
        }
        if near_x && near_z {
            offsets.push((sx, sz));
        }
        offsets
            .into_iter()
            .filter_map(|(dx, dz)| self.live.get(&center.offset(dx, dz, size)))
            .collect()
    }

    /// Apply an edit to whichever live chunk owns `cell`.
    pub fn update_landscape(&mut self, remove: bool, cell: BlockPos, portal_mode: bool) -> bool {
        self.live
            .values_mut()
            .fold(false, |hit, c| c.update_landscape(remove, cell, portal_mode) || hit)
    }

    /// Move the highlight in every live chunk; true if `selected` is solid.
    pub fn update_selected(
        &mut self,
        highlight_on: bool,
        selected: Option<BlockPos>,
        portal_mode: bool,
    ) -> bool {
        self.live.values_mut().fold(false, |solid, c| {
            c.update_selected(highlight_on, selected, portal_mode) || solid
        })
    }

    /// Total cubes to draw across the window.
    pub fn num_cubes(&self) -> usize {
        self.live.values().map(Chunk::num_cubes).sum()
    }
}
