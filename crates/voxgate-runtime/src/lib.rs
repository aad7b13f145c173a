//! Live chunk window around the player, with a bulk-cleared eviction cache.
#![forbid(unsafe_code)]

pub mod cache;
pub mod window;

pub use cache::{ChunkCache, ChunkCacheStats};
pub use window::{WindowStats, WorldWindow};
