//! Command-line arguments for the headless driver.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use voxgate_geom::Vec3;
use voxgate_world::{NoiseMode, WorldConfig};

use crate::event::Event;

/// Terrain mode override.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Flat,
    Caves,
}

impl From<ModeArg> for NoiseMode {
    fn from(value: ModeArg) -> Self {
        match value {
            ModeArg::Flat => NoiseMode::Flat,
            ModeArg::Caves => NoiseMode::Caves,
        }
    }
}

/// voxgate command-line arguments.
///
/// CLI values override settings loaded from the TOML config.
#[derive(Parser, Debug)]
#[command(name = "voxgate", about = "Chunked voxel world with linked portals")]
pub struct Args {
    /// World config (TOML). Defaults are used when omitted.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Number of frames to simulate.
    #[arg(long, default_value_t = 600)]
    pub ticks: u64,

    /// Seconds per frame.
    #[arg(long, default_value_t = 1.0 / 60.0)]
    pub dt: f32,

    /// Walk direction as `x,z`.
    #[arg(long, value_parser = parse_walk, default_value = "0,1", allow_hyphen_values = true)]
    pub walk: (f32, f32),

    /// Terrain mode.
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    /// World seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Fly without gravity or collisions.
    #[arg(long)]
    pub creative: bool,

    /// Log level (error, warn, info, debug, trace); `RUST_LOG` wins.
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Build two linked portals and walk through the first.
    #[arg(long)]
    pub portal_demo: bool,

    /// Scripted input `<frame>:<event>`, repeatable. Events: jump, edit,
    /// place, toggle-mode, toggle-highlight, reset, look=x/y/z.
    #[arg(long = "input", value_parser = parse_input)]
    pub inputs: Vec<(u64, Event)>,
}

fn parse_input(s: &str) -> Result<(u64, Event), String> {
    let (frame, name) = s
        .split_once(':')
        .ok_or_else(|| format!("expected `<frame>:<event>`, got `{s}`"))?;
    let frame = frame
        .trim()
        .parse::<u64>()
        .map_err(|e| format!("bad frame `{frame}`: {e}"))?;
    let event = match name.trim() {
        "jump" => Event::Jump,
        "edit" => Event::Edit,
        "place" => Event::Place,
        "toggle-mode" => Event::ToggleEditMode,
        "toggle-highlight" => Event::ToggleHighlight,
        "reset" => Event::Reset,
        other => {
            let dir = other
                .strip_prefix("look=")
                .ok_or_else(|| format!("unknown event `{other}`"))?;
            let parts = dir
                .split('/')
                .map(|v| v.trim().parse::<f32>())
                .collect::<Result<Vec<f32>, _>>()
                .map_err(|e| format!("bad look direction `{dir}`: {e}"))?;
            let [x, y, z] = parts[..] else {
                return Err(format!("look needs three components, got `{dir}`"));
            };
            Event::Look { dir: Vec3::new(x, y, z) }
        }
    };
    Ok((frame, event))
}

fn parse_walk(s: &str) -> Result<(f32, f32), String> {
    let (x, z) = s
        .split_once(',')
        .ok_or_else(|| format!("expected `x,z`, got `{s}`"))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<f32>()
            .map_err(|e| format!("bad walk component `{v}`: {e}"))
    };
    Ok((parse(x)?, parse(z)?))
}

impl Args {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_overrides(&self, cfg: &mut WorldConfig) {
        if let Some(mode) = self.mode {
            cfg.terrain.mode = mode.into();
        }
        if let Some(seed) = self.seed {
            cfg.terrain.seed = seed;
        }
        if self.creative {
            cfg.player.creative = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_config_values() {
        let args = Args::parse_from([
            "voxgate", "--mode", "caves", "--seed", "9", "--walk", "-1,0.5", "--creative",
        ]);
        assert_eq!(args.walk, (-1.0, 0.5));
        let mut cfg = WorldConfig::default();
        args.apply_overrides(&mut cfg);
        assert_eq!(cfg.terrain.mode, NoiseMode::Caves);
        assert_eq!(cfg.terrain.seed, 9);
        assert!(cfg.player.creative);
    }

    #[test]
    fn inputs_parse_frames_and_events() {
        let args = Args::parse_from([
            "voxgate", "--input", "10:jump", "--input", "12:look=0/-1/0", "--input", "3:toggle-mode",
        ]);
        assert_eq!(
            args.inputs,
            vec![
                (10, Event::Jump),
                (12, Event::Look { dir: Vec3::new(0.0, -1.0, 0.0) }),
                (3, Event::ToggleEditMode),
            ]
        );
        assert!(parse_input("x:jump").is_err());
        assert!(parse_input("4:fly").is_err());
        assert!(parse_input("4:look=1/2").is_err());
    }

    #[test]
    fn walk_requires_two_components() {
        assert!(parse_walk("1").is_err());
        assert!(parse_walk("a,1").is_err());
        assert_eq!(parse_walk(" 0 , 2 "), Ok((0.0, 2.0)));
    }
}
