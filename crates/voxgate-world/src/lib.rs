//! World sizing, terrain noise and density materialization.
#![forbid(unsafe_code)]

pub mod chunk_coord;
pub mod config;
pub mod density;
pub mod error;
pub mod noise;
pub mod seed;

pub use chunk_coord::ChunkCoord;
pub use config::{NoiseMode, WorldConfig};
pub use density::{AIR, CaveNoise, DensityColumn, DensityVolume};
pub use error::ConfigError;
pub use noise::{HeightMap, NoiseField, upsample2x};
