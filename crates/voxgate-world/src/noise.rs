//! Multi-octave value noise with seam-free chunk borders.
//!
//! Each octave draws a `block_width²` grid of random values for the chunk and
//! pads it with a one-cell border copied from the eight neighbor chunks' grids
//! (regenerated from their own seeds). The padded grid is upsampled by repeated
//! bilinear doubling until it covers the chunk; since every chunk sees the same
//! coarse values on both sides of a seam, adjacent chunks agree exactly.

use crate::{ChunkCoord, WorldConfig, seed};

/// One height per column, row-major with rows along z.
#[derive(Clone, Debug, PartialEq)]
pub struct HeightMap {
    size: usize,
    values: Vec<f32>,
}

impl HeightMap {
    pub fn new(size: usize, values: Vec<f32>) -> Self {
        assert_eq!(values.len(), size * size, "height map must be size×size");
        Self { size, values }
    }

    pub fn flat(size: usize, height: f32) -> Self {
        Self::new(size, vec![height; size * size])
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Height of column `(i, j)` where `i` runs along z and `j` along x.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f32 {
        self.values[i * self.size + j]
    }

    #[inline]
    pub fn set(&mut self, i: usize, j: usize, h: f32) {
        self.values[i * self.size + j] = h;
    }

    #[inline]
    pub fn values(&self) -> &[f32] {
        &self.values
    }
}

/// Weights for the four sub-positions of a 2×2 output block, applied to the
/// 2×2 coarse window `[[top_left, top_right], [bottom_left, bottom_right]]`.
const QUADRANT_KERNELS: [[[f32; 2]; 2]; 4] = [
    [[9.0, 3.0], [3.0, 1.0]],
    [[3.0, 9.0], [1.0, 3.0]],
    [[3.0, 1.0], [9.0, 3.0]],
    [[1.0, 3.0], [3.0, 9.0]],
];

/// Doubles the interior resolution of a padded square grid.
///
/// An `m×m` input (interior `m-2` plus a one-cell border) becomes a
/// `2(m-1)` square: interior `2(m-2)` plus a fresh one-cell border.
///
/// Panics if `grid` is not a perfect square of side at least 2; that signals
/// broken octave/size bookkeeping, not bad input.
pub fn upsample2x(grid: &[f32]) -> Vec<f32> {
    let m = grid.len().isqrt();
    assert!(
        m * m == grid.len() && m >= 2,
        "upsampler input of {} values is not a square grid",
        grid.len()
    );
    let n = 2 * (m - 1);
    let mut out = vec![0.0f32; n * n];
    for r0 in 0..m - 1 {
        for c0 in 0..m - 1 {
            let window = [
                [grid[r0 * m + c0], grid[r0 * m + c0 + 1]],
                [grid[(r0 + 1) * m + c0], grid[(r0 + 1) * m + c0 + 1]],
            ];
            for (q, kernel) in QUADRANT_KERNELS.iter().enumerate() {
                let (p, s) = (q / 2, q % 2);
                let mut acc = 0.0;
                for (wr, kr) in window.iter().zip(kernel.iter()) {
                    for (w, k) in wr.iter().zip(kr.iter()) {
                        acc += w * k;
                    }
                }
                out[(2 * r0 + p) * n + 2 * c0 + s] = acc / 16.0;
            }
        }
    }
    out
}

/// Deterministic value-noise generator for chunk height maps.
#[derive(Clone, Copy, Debug)]
pub struct NoiseField {
    pub seed: u64,
    pub max_height: f32,
}

impl NoiseField {
    pub fn new(seed: u64, max_height: f32) -> Self {
        Self { seed, max_height }
    }

    pub fn from_config(cfg: &WorldConfig) -> Self {
        Self::new(cfg.terrain.seed, cfg.terrain.max_height)
    }

    /// `(block_width+2)²` grid: the chunk's own random values surrounded by
    /// the facing edge cells of its eight neighbors' grids.
    pub fn padded_grid(&self, coord: ChunkCoord, size: usize, block_width: usize) -> Vec<f32> {
        let bw = block_width;
        let m = bw + 2;
        // Neighbor grids indexed by (dz+1)*3 + (dx+1); generated on first use.
        let mut grids: [Option<Vec<f32>>; 9] = Default::default();
        let mut out = vec![0.0f32; m * m];
        for r in 0..m {
            let dz: i32 = if r == 0 { -1 } else if r == m - 1 { 1 } else { 0 };
            let src_r = match dz {
                -1 => bw - 1,
                1 => 0,
                _ => r - 1,
            };
            for c in 0..m {
                let dx: i32 = if c == 0 { -1 } else if c == m - 1 { 1 } else { 0 };
                let src_c = match dx {
                    -1 => bw - 1,
                    1 => 0,
                    _ => c - 1,
                };
                let slot = ((dz + 1) * 3 + (dx + 1)) as usize;
                let grid = grids[slot].get_or_insert_with(|| {
                    seed::random_grid(self.seed, coord.offset(dx, dz, size), bw)
                });
                out[r * m + c] = grid[src_r * bw + src_c];
            }
        }
        out
    }

    /// Padded grid for `octave` upsampled until its interior spans the chunk.
    /// The one-cell border is kept so callers can compare seams.
    pub fn upsampled_octave(&self, coord: ChunkCoord, size: usize, octave: u32) -> Vec<f32> {
        let block_width = size >> octave;
        assert!(block_width > 0, "octave {octave} too fine for chunk size {size}");
        let mut grid = self.padded_grid(coord, size, block_width);
        let mut interior = block_width;
        while interior < size {
            grid = upsample2x(&grid);
            interior *= 2;
        }
        assert_eq!(interior, size, "block width {block_width} does not tile size {size}");
        grid
    }

    /// Sum of `octaves` layers scaled to `[0, max_height)`.
    ///
    /// Octave `i` has block width `size / 2^i`; coarser octaves carry more
    /// weight (`2^i / (2^octaves - 1)`), so the weights sum to one.
    pub fn heightmap(&self, coord: ChunkCoord, size: usize, octaves: u32) -> HeightMap {
        let mut values = vec![0.0f32; size * size];
        let norm = ((1u64 << octaves) - 1) as f32;
        let m = size + 2;
        for octave in 0..octaves {
            let weight = (1u64 << octave) as f32 / norm * self.max_height;
            let grid = self.upsampled_octave(coord, size, octave);
            for i in 0..size {
                for j in 0..size {
                    values[i * size + j] += grid[(i + 1) * m + j + 1] * weight;
                }
            }
        }
        HeightMap::new(size, values)
    }
}
