//! Scripted portal walk: build two rings in the air, let the session pair
//! them and fly through the first.

use voxgate_geom::{BlockPos, Vec3};
use voxgate_portal::PortalId;

use crate::session::Session;

#[derive(Clone, Copy, Debug)]
pub struct DemoReport {
    pub entry: PortalId,
    pub exit: PortalId,
    /// Player position right after the first teleport.
    pub arrival: Option<Vec3>,
    pub teleports: u64,
}

/// Border cells of a `width × height` rectangle standing on `base`,
/// extending along `axis` (0 = x, 2 = z) and up in y.
fn ring_cells(base: BlockPos, axis: usize, width: i32, height: i32) -> Vec<BlockPos> {
    let at = |a: i32, y: i32| match axis {
        0 => base.offset(a, y, 0),
        _ => base.offset(0, y, a),
    };
    let mut cells = Vec::new();
    for a in 0..width {
        cells.push(at(a, 0));
        cells.push(at(a, height - 1));
    }
    for y in 1..height - 1 {
        cells.push(at(0, y));
        cells.push(at(width - 1, y));
    }
    cells
}

/// Run the demo for up to `ticks` frames. `None` if the rings could not be
/// placed in the live window or never got paired.
pub fn run(session: &mut Session, ticks: u64, dt: f32) -> Option<DemoReport> {
    session.walker.creative = true;
    session.frame(Vec3::ZERO, dt);

    let ring_a = |y| ring_cells(BlockPos::new(-2, y, 8), 0, 5, 6);
    let ring_b = |y| ring_cells(BlockPos::new(20, y, 10), 2, 5, 6);
    let top = ring_a(0)
        .into_iter()
        .chain(ring_b(0))
        .map(|c| session.surface_height(c.x, c.z))
        .try_fold(f32::MIN, |m, h| h.map(|h| m.max(h)))?;
    let base = top.ceil() as i32 + 2;

    session.portal_mode = true;
    for cell in ring_a(base).into_iter().chain(ring_b(base)) {
        if !session.apply_edit(cell, false) {
            session.portal_mode = false;
            return None;
        }
    }
    session.portal_mode = false;
    log::info!(target: "portal", "demo rings built at y={base}, {} portals", session.portals.len());

    session.frame(Vec3::ZERO, dt);
    let entry = session.portals.portal_containing(BlockPos::new(-2, base, 8))?;
    let exit = session.portals.get(entry)?.outlet()?;

    session.walker.pos = Vec3::new(0.0, base as f32 + 3.0, 2.0);
    let walk = Vec3::new(0.0, 0.0, 1.0);
    let mut arrival = None;
    for _ in 0..ticks {
        let before = session.stats().teleports;
        session.frame(walk, dt);
        if arrival.is_none() && session.stats().teleports > before {
            arrival = Some(session.walker.pos);
        }
    }
    Some(DemoReport {
        entry,
        exit,
        arrival,
        teleports: session.stats().teleports,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use voxgate_world::WorldConfig;

    #[test]
    fn ring_cells_form_a_valid_ring() {
        let cells = ring_cells(BlockPos::new(0, 5, 0), 2, 5, 6);
        assert_eq!(cells.len(), 18);
        assert!(voxgate_portal::is_valid_ring(&cells));
    }

    #[test]
    fn walking_through_the_entry_ring_arrives_past_the_exit() {
        let mut cfg = WorldConfig::default();
        cfg.chunks.size = 16;
        cfg.terrain.octaves = 3;
        cfg.terrain.max_height = 20.0;
        cfg.player.spawn = [0.0, 40.0, 0.0];
        let mut session = Session::new(Arc::new(cfg));
        let report = run(&mut session, 60, 1.0 / 60.0).expect("demo runs");
        assert_ne!(report.entry, report.exit);
        assert_eq!(report.teleports, 1);
        let arrival = report.arrival.expect("teleported");
        let frame = session
            .portals
            .get(report.exit)
            .and_then(|p| p.frame())
            .copied()
            .expect("exit frame");
        assert_eq!(frame.normal, Vec3::new(1.0, 0.0, 0.0));
        assert!((arrival.x - (frame.center.x + 1.5)).abs() < 1e-4);
        assert!((arrival.z - frame.center.z).abs() < 1e-4);
    }
}
