use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::ConfigError;

/// Immutable world parameters shared by every component.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct WorldConfig {
    #[serde(default)]
    pub chunks: Chunks,
    #[serde(default)]
    pub terrain: Terrain,
    #[serde(default)]
    pub player: Player,
    #[serde(default)]
    pub portals: Portals,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum NoiseMode {
    /// Every cell below the height map is solid.
    #[default]
    Flat,
    /// 3-D density noise carves caves and overhangs.
    Caves,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Chunks {
    #[serde(default = "default_chunk_size")]
    pub size: usize,
    #[serde(default = "default_border")]
    pub border: usize,
    #[serde(default = "default_collision_band")]
    pub collision_band: f32,
}
fn default_chunk_size() -> usize {
    64
}
fn default_border() -> usize {
    1
}
fn default_collision_band() -> f32 {
    2.0
}
impl Default for Chunks {
    fn default() -> Self {
        Self {
            size: default_chunk_size(),
            border: default_border(),
            collision_band: default_collision_band(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Terrain {
    #[serde(default)]
    pub mode: NoiseMode,
    #[serde(default = "default_octaves")]
    pub octaves: u32,
    #[serde(default = "default_max_height")]
    pub max_height: f32,
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_cave_spacing")]
    pub cave_spacing: usize,
}
fn default_octaves() -> u32 {
    6
}
fn default_max_height() -> f32 {
    100.0
}
fn default_seed() -> u64 {
    42
}
fn default_cave_spacing() -> usize {
    16
}
impl Default for Terrain {
    fn default() -> Self {
        Self {
            mode: NoiseMode::Flat,
            octaves: default_octaves(),
            max_height: default_max_height(),
            seed: default_seed(),
            cave_spacing: default_cave_spacing(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Player {
    #[serde(default = "default_radius")]
    pub radius: f32,
    #[serde(default = "default_height")]
    pub height: f32,
    #[serde(default = "default_select_radius")]
    pub select_radius: f32,
    #[serde(default = "default_gravity")]
    pub gravity: f32,
    #[serde(default = "default_jump_velocity")]
    pub jump_velocity: f32,
    #[serde(default = "default_walk_speed")]
    pub walk_speed: f32,
    #[serde(default)]
    pub creative: bool,
    #[serde(default = "default_spawn")]
    pub spawn: [f32; 3],
}
fn default_radius() -> f32 {
    0.4
}
fn default_height() -> f32 {
    2.0
}
fn default_select_radius() -> f32 {
    3.0
}
fn default_gravity() -> f32 {
    -9.8
}
fn default_jump_velocity() -> f32 {
    10.0
}
fn default_walk_speed() -> f32 {
    10.0
}
fn default_spawn() -> [f32; 3] {
    [0.0, 100.0, 0.0]
}
impl Default for Player {
    fn default() -> Self {
        Self {
            radius: default_radius(),
            height: default_height(),
            select_radius: default_select_radius(),
            gravity: default_gravity(),
            jump_velocity: default_jump_velocity(),
            walk_speed: default_walk_speed(),
            creative: false,
            spawn: default_spawn(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Portals {
    #[serde(default = "default_clearance")]
    pub clearance: f32,
    #[serde(default = "default_slab")]
    pub slab: f32,
}
fn default_clearance() -> f32 {
    1.5
}
fn default_slab() -> f32 {
    0.5
}
impl Default for Portals {
    fn default() -> Self {
        Self {
            clearance: default_clearance(),
            slab: default_slab(),
        }
    }
}

impl WorldConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: WorldConfig = toml::from_str(s).map_err(ConfigError::Parse)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let s = fs::read_to_string(path).map_err(ConfigError::Read)?;
        let cfg = Self::from_toml_str(&s)?;
        log::info!("world config loaded from {}", path.display());
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let size = self.chunks.size;
        if size < 4 || !size.is_power_of_two() {
            return Err(ConfigError::Invalid(format!(
                "chunk size {size} must be a power of two >= 4"
            )));
        }
        let octaves = self.terrain.octaves;
        if octaves == 0 || size.checked_shr(octaves - 1).unwrap_or(0) == 0 {
            return Err(ConfigError::Invalid(format!(
                "{octaves} octaves do not fit a chunk of size {size}"
            )));
        }
        if self.terrain.cave_spacing == 0 {
            return Err(ConfigError::Invalid("cave spacing must be positive".into()));
        }
        if self.player.height < 0.0 || self.player.radius < 0.0 {
            return Err(ConfigError::Invalid(
                "player dimensions must be non-negative".into(),
            ));
        }
        Ok(())
    }

    /// Side length of the live window in chunks.
    #[inline]
    pub fn window_span(&self) -> usize {
        2 * self.chunks.border + 1
    }

    /// Number of evicted chunks held before the cache is cleared.
    #[inline]
    pub fn cache_size(&self) -> usize {
        self.window_span() * self.window_span()
    }

    /// Player height in whole cells, used for collision probe windows.
    #[inline]
    pub fn player_cells(&self) -> i32 {
        self.player.height.round() as i32
    }
}
