//! One live tile of the world: density, heights and the render buffer.
#![forbid(unsafe_code)]

mod collision;
pub mod render;

use std::sync::Arc;

use hashbrown::HashSet;
use voxgate_edit::{CellKind, EditDelta, Modification};
use voxgate_geom::BlockPos;
use voxgate_world::{
    AIR, ChunkCoord, DensityVolume, HeightMap, NoiseField, WorldConfig,
};

pub use render::{CellFlag, RenderBuffer};

/// Density written for an added cell.
const ADDED: f32 = 1.0;

pub struct Chunk {
    coord: ChunkCoord,
    cfg: Arc<WorldConfig>,
    volume: DensityVolume,
    render: RenderBuffer,
    portal_cells: HashSet<BlockPos>,
    highlighted: Option<BlockPos>,
}

impl Chunk {
    /// Run the noise and density passes for `coord`.
    pub fn generate(coord: ChunkCoord, cfg: Arc<WorldConfig>) -> Self {
        let size = cfg.chunks.size;
        let heights = NoiseField::from_config(&cfg).heightmap(coord, size, cfg.terrain.octaves);
        let volume = DensityVolume::materialize(&heights, coord, &cfg);
        Self::from_volume(coord, cfg, volume)
    }

    pub fn from_volume(coord: ChunkCoord, cfg: Arc<WorldConfig>, volume: DensityVolume) -> Self {
        assert_eq!(volume.size(), cfg.chunks.size, "volume does not match chunk size");
        let mut chunk = Self {
            coord,
            cfg,
            volume,
            render: RenderBuffer::new(),
            portal_cells: HashSet::new(),
            highlighted: None,
        };
        chunk.rebuild_render();
        chunk
    }

    #[inline]
    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.cfg.chunks.size
    }

    #[inline]
    pub fn heights(&self) -> &HeightMap {
        self.volume.heights()
    }

    #[inline]
    pub fn volume(&self) -> &DensityVolume {
        &self.volume
    }

    #[inline]
    pub fn render(&self) -> &RenderBuffer {
        &self.render
    }

    /// Number of instanced cubes to draw.
    #[inline]
    pub fn num_cubes(&self) -> usize {
        self.render.len()
    }

    #[inline]
    pub fn highlighted(&self) -> Option<BlockPos> {
        self.highlighted
    }

    /// Local `(i, j)` column of a world position; `None` outside the footprint.
    #[inline]
    pub fn local(&self, pos: BlockPos) -> Option<(i32, i32)> {
        let size = self.size();
        if !self.coord.contains_column(pos.x, pos.z, size) {
            return None;
        }
        let (x0, z0) = self.coord.origin(size);
        Some((pos.z - z0, pos.x - x0))
    }

    #[inline]
    pub fn contains(&self, pos: BlockPos) -> bool {
        self.local(pos).is_some()
    }

    pub fn is_solid(&self, pos: BlockPos) -> bool {
        self.local(pos)
            .is_some_and(|(i, j)| self.volume.is_solid(i, j, pos.y))
    }

    fn world_pos(&self, i: i32, j: i32, k: i32) -> BlockPos {
        let (x0, z0) = self.coord.origin(self.size());
        BlockPos::new(x0 + j, k, z0 + i)
    }

    fn base_flag(&self, pos: BlockPos) -> CellFlag {
        if self.portal_cells.contains(&pos) {
            CellFlag::Portal
        } else {
            CellFlag::Terrain
        }
    }

    /// Redraw every exposed cell from scratch; clears any highlight.
    pub fn rebuild_render(&mut self) {
        self.render.clear();
        self.highlighted = None;
        let cells: Vec<BlockPos> = self
            .volume
            .exposed_cells()
            .map(|(i, j, k)| self.world_pos(i, j, k))
            .collect();
        for pos in cells {
            let flag = self.base_flag(pos);
            self.render.insert(pos, flag);
        }
    }

    /// Re-evaluate exposure for `pos` and its six face neighbors.
    fn refresh_exposure(&mut self, pos: BlockPos) {
        let mut around = [pos; 7];
        around[1..].copy_from_slice(&pos.face_neighbors());
        for p in around {
            let Some((i, j)) = self.local(p) else {
                continue;
            };
            if self.volume.is_exposed(i, j, p.y) {
                let flag = self.base_flag(p);
                self.render.insert(p, flag);
            } else if self.render.remove(p) && self.highlighted == Some(p) {
                self.highlighted = None;
            }
        }
    }

    fn write_cell(&mut self, pos: BlockPos, delta: EditDelta, kind: CellKind) {
        let Some((i, j)) = self.local(pos) else {
            return;
        };
        let (i, j, k) = (i as usize, j as usize, pos.y as usize);
        match delta {
            EditDelta::Remove => {
                self.volume.set(i, j, k, AIR);
                self.portal_cells.remove(&pos);
            }
            EditDelta::Add => {
                self.volume.set(i, j, k, ADDED);
                match kind {
                    CellKind::Portal => self.portal_cells.insert(pos),
                    CellKind::Terrain => self.portal_cells.remove(&pos),
                };
            }
        }
    }

    /// Add or remove one cell. Returns false when `cell` is outside this
    /// chunk or below the world floor.
    pub fn update_landscape(&mut self, remove: bool, cell: BlockPos, portal_mode: bool) -> bool {
        if cell.y < 0 || !self.contains(cell) {
            return false;
        }
        let delta = if remove { EditDelta::Remove } else { EditDelta::Add };
        let kind = if portal_mode { CellKind::Portal } else { CellKind::Terrain };
        self.write_cell(cell, delta, kind);
        if remove {
            self.render.remove(cell);
            if self.highlighted == Some(cell) {
                self.highlighted = None;
            }
        }
        self.refresh_exposure(cell);
        if !remove && self.highlighted != Some(cell) {
            let flag = self.base_flag(cell);
            self.render.set_flag(cell, flag);
        }
        log::debug!(
            target: "edit",
            "chunk ({}, {}) {} {:?} {:?}",
            self.coord.x,
            self.coord.z,
            if remove { "removed" } else { "added" },
            (cell.x, cell.y, cell.z),
            kind
        );
        true
    }

    /// Reconcile with edits made while this chunk was not live: removals
    /// first, then additions, then a full render rebuild.
    pub fn update_from_log(&mut self, entries: &[Modification]) {
        let mine: Vec<&Modification> = entries
            .iter()
            .filter(|m| m.pos.y >= 0 && self.contains(m.pos))
            .collect();
        if mine.is_empty() {
            return;
        }
        let (removes, adds): (Vec<&Modification>, Vec<&Modification>) =
            mine.into_iter().partition(|m| m.delta.is_remove());
        for m in removes.iter().chain(adds.iter()) {
            self.write_cell(m.pos, m.delta, m.kind);
        }
        self.rebuild_render();
        log::debug!(
            target: "edit",
            "chunk ({}, {}) replayed {} removals, {} additions",
            self.coord.x,
            self.coord.z,
            removes.len(),
            adds.len()
        );
    }

    /// Move the highlight to `selected` if it is drawn here. Returns whether
    /// `selected` is currently a solid cell of this chunk, which decides if
    /// the next edit removes or places.
    pub fn update_selected(
        &mut self,
        highlight_on: bool,
        selected: Option<BlockPos>,
        portal_mode: bool,
    ) -> bool {
        if let Some(prev) = self.highlighted.take() {
            let flag = self.base_flag(prev);
            self.render.set_flag(prev, flag);
        }
        let Some(cell) = selected.filter(|c| self.contains(*c)) else {
            return false;
        };
        if highlight_on && self.render.contains(cell) {
            let flag = if portal_mode {
                CellFlag::PortalHighlight
            } else {
                CellFlag::Highlight
            };
            self.render.set_flag(cell, flag);
            self.highlighted = Some(cell);
        }
        self.is_solid(cell)
    }

    /// Every solid cell's exposure matches its presence in the render buffer.
    pub fn render_matches_volume(&self) -> bool {
        let exposed: Vec<BlockPos> = self
            .volume
            .exposed_cells()
            .map(|(i, j, k)| self.world_pos(i, j, k))
            .collect();
        exposed.len() == self.render.len() && exposed.iter().all(|p| self.render.contains(*p))
    }
}
