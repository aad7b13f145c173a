//! Deterministic seed derivation for per-chunk random grids.
//!
//! Every random grid is a pure function of the world seed, the chunk it
//! belongs to and the octave's block width, so two chunks that need the same
//! grid (a neighbor's border) regenerate it bit-for-bit.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::ChunkCoord;

/// Combine the world seed, chunk and block width into a u64 seed.
pub fn derive_grid_seed(world_seed: u64, coord: ChunkCoord, block_width: usize) -> u64 {
    let mut hasher = DefaultHasher::new();
    world_seed.hash(&mut hasher);
    coord.x.hash(&mut hasher);
    coord.z.hash(&mut hasher);
    block_width.hash(&mut hasher);
    hasher.finish()
}

/// Seed for one lattice corner of the 3-D density noise.
pub fn derive_lattice_seed(world_seed: u64, ix: i32, iy: i32, iz: i32) -> u64 {
    let mut hasher = DefaultHasher::new();
    world_seed.hash(&mut hasher);
    0x6C61_7474u32.hash(&mut hasher);
    ix.hash(&mut hasher);
    iy.hash(&mut hasher);
    iz.hash(&mut hasher);
    hasher.finish()
}

/// `block_width²` values in `[0, 1)`, row-major (rows along z).
pub fn random_grid(world_seed: u64, coord: ChunkCoord, block_width: usize) -> Vec<f32> {
    let mut rng = ChaCha8Rng::seed_from_u64(derive_grid_seed(world_seed, coord, block_width));
    (0..block_width * block_width)
        .map(|_| rng.random::<f32>())
        .collect()
}

/// A pseudo-random unit vector, uniform on the sphere.
pub fn lattice_vector(world_seed: u64, ix: i32, iy: i32, iz: i32) -> [f32; 3] {
    let mut rng = ChaCha8Rng::seed_from_u64(derive_lattice_seed(world_seed, ix, iy, iz));
    let z: f32 = rng.random_range(-1.0..=1.0);
    let theta: f32 = rng.random_range(0.0..std::f32::consts::TAU);
    let r = (1.0 - z * z).max(0.0).sqrt();
    [r * theta.cos(), r * theta.sin(), z]
}
