use std::error::Error;
use std::sync::Arc;

use clap::Parser;
use env_logger::Env;
use voxgate_geom::Vec3;
use voxgate_world::WorldConfig;

mod cli;
mod demo;
mod event;
mod player;
mod raycast;
mod session;

use cli::Args;
use session::Session;

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(args.log_level.as_str())).init();

    let mut cfg = match &args.config {
        Some(path) => WorldConfig::load(path)?,
        None => WorldConfig::default(),
    };
    args.apply_overrides(&mut cfg);
    cfg.validate()?;
    let cfg = Arc::new(cfg);
    log::info!(
        "world: chunk size {}, border {}, {:?} terrain, seed {}",
        cfg.chunks.size,
        cfg.chunks.border,
        cfg.terrain.mode,
        cfg.terrain.seed
    );

    let mut session = Session::new(cfg);
    for &(frame, event) in &args.inputs {
        session.events.emit_at(frame, event);
    }
    if args.portal_demo {
        let report = demo::run(&mut session, args.ticks, args.dt)
            .ok_or("portal rings could not be placed and paired in the live window")?;
        log::info!(
            "portal demo: {} -> {}, {} teleport(s), arrived at {:?}",
            report.entry,
            report.exit,
            report.teleports,
            report.arrival
        );
    } else {
        let walk = Vec3::new(args.walk.0, 0.0, args.walk.1);
        for _ in 0..args.ticks {
            session.frame(walk, args.dt);
        }
    }

    let stats = session.stats();
    let window = session.window.stats();
    let pos = session.walker.pos;
    log::info!(
        "{} frames, player at ({:.2}, {:.2}, {:.2}), {} live chunks, {} cubes drawn",
        stats.frames,
        pos.x,
        pos.y,
        pos.z,
        session.window.len(),
        session.window.num_cubes()
    );
    log::info!(
        "chunks: {} generated, {} promoted, {} evicted, {} cache clears; {} edits ({} rejected), {} teleports",
        window.generated,
        window.promoted,
        window.evicted,
        window.cache_clears,
        stats.edits,
        stats.rejected_edits,
        stats.teleports
    );
    Ok(())
}
