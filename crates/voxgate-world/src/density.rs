//! Per-column density values built from a height map.
//!
//! A cell is solid when its density is non-negative. Columns only store cells
//! up to the highest solid one; anything above reads as air.

use std::collections::HashMap;

use crate::{ChunkCoord, HeightMap, NoiseMode, WorldConfig, seed};

/// Upward-decreasing bias added to every cell: `0.8 · (40 - k) / 100`.
#[inline]
pub fn vertical_bias(k: usize) -> f32 {
    0.8 * (40.0 - k as f32) / 100.0
}

/// Density stored for removed or padded cells.
pub const AIR: f32 = -1.0;

/// Density values for one column, indexed by height `k`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DensityColumn {
    cells: Vec<f32>,
}

impl DensityColumn {
    pub fn new(cells: Vec<f32>) -> Self {
        Self { cells }
    }

    pub fn solid(height: usize) -> Self {
        Self::new(vec![1.0; height])
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn get(&self, k: i32) -> Option<f32> {
        if k < 0 {
            return None;
        }
        self.cells.get(k as usize).copied()
    }

    #[inline]
    pub fn is_solid(&self, k: i32) -> bool {
        self.get(k).is_some_and(|d| d >= 0.0)
    }

    /// Write `value` at `k`, padding with air if the column is too short.
    pub fn set(&mut self, k: usize, value: f32) {
        if k >= self.cells.len() {
            self.cells.resize(k + 1, AIR);
        }
        self.cells[k] = value;
    }

    pub fn highest_solid(&self) -> Option<usize> {
        self.cells.iter().rposition(|d| *d >= 0.0)
    }

    #[inline]
    pub fn cells(&self) -> &[f32] {
        &self.cells
    }
}

/// Gradient-noise lattice for cave carving. Lattice vectors are derived from
/// world coordinates, so neighboring chunks share them along seams.
pub struct CaveNoise {
    seed: u64,
    spacing: f32,
    lattice: HashMap<(i32, i32, i32), [f32; 3]>,
}

impl CaveNoise {
    pub fn new(seed: u64, spacing: usize) -> Self {
        Self {
            seed,
            spacing: spacing.max(1) as f32,
            lattice: HashMap::new(),
        }
    }

    fn vector(&mut self, ix: i32, iy: i32, iz: i32) -> [f32; 3] {
        let seed = self.seed;
        *self
            .lattice
            .entry((ix, iy, iz))
            .or_insert_with(|| seed::lattice_vector(seed, ix, iy, iz))
    }

    /// Noise at a cell center, roughly in `[-1, 1]`.
    pub fn sample(&mut self, wx: i32, wy: i32, wz: i32) -> f32 {
        let fx = (wx as f32 + 0.5) / self.spacing;
        let fy = (wy as f32 + 0.5) / self.spacing;
        let fz = (wz as f32 + 0.5) / self.spacing;
        let (ix, iy, iz) = (fx.floor() as i32, fy.floor() as i32, fz.floor() as i32);
        let (tx, ty, tz) = (fx - ix as f32, fy - iy as f32, fz - iz as f32);

        let mut corners = [0.0f32; 8];
        for (n, corner) in corners.iter_mut().enumerate() {
            let (dx, dy, dz) = ((n & 1) as i32, ((n >> 1) & 1) as i32, ((n >> 2) & 1) as i32);
            let g = self.vector(ix + dx, iy + dy, iz + dz);
            let off = [tx - dx as f32, ty - dy as f32, tz - dz as f32];
            *corner = g[0] * off[0] + g[1] * off[1] + g[2] * off[2];
        }

        let (sx, sy, sz) = (smooth(tx), smooth(ty), smooth(tz));
        let x00 = lerp(corners[0], corners[1], sx);
        let x10 = lerp(corners[2], corners[3], sx);
        let x01 = lerp(corners[4], corners[5], sx);
        let x11 = lerp(corners[6], corners[7], sx);
        let y0 = lerp(x00, x10, sy);
        let y1 = lerp(x01, x11, sy);
        lerp(y0, y1, sz)
    }
}

#[inline]
fn smooth(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Dense 3-D solidity for one chunk plus its revised heights.
#[derive(Clone, Debug, PartialEq)]
pub struct DensityVolume {
    size: usize,
    columns: Vec<DensityColumn>,
    heights: HeightMap,
}

impl DensityVolume {
    /// Build from explicit columns, row-major with rows along z.
    pub fn from_columns(size: usize, columns: Vec<DensityColumn>) -> Self {
        assert_eq!(columns.len(), size * size, "need size×size columns");
        let heights = columns
            .iter()
            .map(|c| c.highest_solid().map_or(0.0, |k| (k + 1) as f32))
            .collect();
        Self {
            size,
            columns,
            heights: HeightMap::new(size, heights),
        }
    }

    /// Fill columns below each height, then shrink each height to one above
    /// its highest solid cell.
    pub fn materialize(heights: &HeightMap, coord: ChunkCoord, cfg: &WorldConfig) -> Self {
        let size = heights.size();
        let (x0, z0) = coord.origin(size);
        let mut caves = match cfg.terrain.mode {
            NoiseMode::Caves => Some(CaveNoise::new(cfg.terrain.seed, cfg.terrain.cave_spacing)),
            NoiseMode::Flat => None,
        };
        let mut columns = Vec::with_capacity(size * size);
        for i in 0..size {
            for j in 0..size {
                let h = heights.get(i, j).max(0.0).floor() as usize;
                let (wx, wz) = (x0 + j as i32, z0 + i as i32);
                let mut cells = Vec::with_capacity(h);
                for k in 0..h {
                    let base = match caves.as_mut() {
                        Some(noise) => 0.5 * noise.sample(wx, k as i32, wz),
                        None => 1.0,
                    };
                    cells.push(base + vertical_bias(k));
                }
                let mut column = DensityColumn::new(cells);
                let top = column.highest_solid().map_or(0, |k| k + 1);
                column.cells.truncate(top);
                columns.push(column);
            }
        }
        Self::from_columns(size, columns)
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn heights(&self) -> &HeightMap {
        &self.heights
    }

    #[inline]
    pub fn column(&self, i: usize, j: usize) -> &DensityColumn {
        &self.columns[i * self.size + j]
    }

    #[inline]
    pub fn in_bounds(&self, i: i32, j: i32) -> bool {
        i >= 0 && j >= 0 && (i as usize) < self.size && (j as usize) < self.size
    }

    /// Solidity at local `(i, j, k)`; anything outside the chunk is air.
    pub fn is_solid(&self, i: i32, j: i32, k: i32) -> bool {
        self.in_bounds(i, j) && self.column(i as usize, j as usize).is_solid(k)
    }

    /// Set a cell's density and keep the column height in step.
    pub fn set(&mut self, i: usize, j: usize, k: usize, value: f32) {
        let column = &mut self.columns[i * self.size + j];
        column.set(k, value);
        let top = column.highest_solid().map_or(0.0, |t| (t + 1) as f32);
        self.heights.set(i, j, top);
    }

    /// Solid and either on the chunk boundary or next to a non-solid cell.
    pub fn is_exposed(&self, i: i32, j: i32, k: i32) -> bool {
        if !self.is_solid(i, j, k) {
            return false;
        }
        let last = self.size as i32 - 1;
        let top = self.column(i as usize, j as usize).len() as i32 - 1;
        if i == 0 || j == 0 || i == last || j == last || k == 0 || k == top {
            return true;
        }
        const NEIGHBORS: [(i32, i32, i32); 6] = [
            (1, 0, 0),
            (-1, 0, 0),
            (0, 1, 0),
            (0, -1, 0),
            (0, 0, 1),
            (0, 0, -1),
        ];
        NEIGHBORS
            .iter()
            .any(|(di, dj, dk)| !self.is_solid(i + di, j + dj, k + dk))
    }

    /// Local `(i, j, k)` of every exposed cell, column by column.
    pub fn exposed_cells(&self) -> impl Iterator<Item = (i32, i32, i32)> + '_ {
        let size = self.size;
        (0..size * size).flat_map(move |col| {
            let (i, j) = ((col / size) as i32, (col % size) as i32);
            (0..self.columns[col].len() as i32)
                .filter(move |&k| self.is_exposed(i, j, k))
                .map(move |k| (i, j, k))
        })
    }
}
