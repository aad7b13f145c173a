//! One synchronous frame of the world: streaming, movement, selection,
//! input events, portal pairing and teleports.

use std::sync::Arc;

use voxgate_edit::{CellKind, EditDelta, ModificationLog};
use voxgate_geom::{BlockPos, Vec3};
use voxgate_portal::{PortalGraph, PortalParams};
use voxgate_runtime::WorldWindow;
use voxgate_world::WorldConfig;

use crate::event::{Event, EventQueue, log_event};
use crate::player::Walker;
use crate::raycast::raycast_first_hit;

#[derive(Clone, Copy, Debug, Default)]
pub struct SessionStats {
    pub frames: u64,
    pub edits: u64,
    pub rejected_edits: u64,
    pub teleports: u64,
}

pub struct Session {
    cfg: Arc<WorldConfig>,
    pub window: WorldWindow,
    pub log: ModificationLog,
    pub portals: PortalGraph,
    pub walker: Walker,
    pub events: EventQueue,
    pub look: Vec3,
    pub portal_mode: bool,
    pub highlight_on: bool,
    selected: Option<BlockPos>,
    place_target: Option<BlockPos>,
    remove_next: bool,
    stats: SessionStats,
}

impl Session {
    pub fn new(cfg: Arc<WorldConfig>) -> Self {
        let params = PortalParams::from_config(&cfg);
        Self {
            window: WorldWindow::new(cfg.clone()),
            log: ModificationLog::new(),
            portals: PortalGraph::new(params),
            walker: Walker::new(&cfg),
            events: EventQueue::new(),
            look: Vec3::new(0.0, -0.5, 1.0).normalized(),
            portal_mode: false,
            highlight_on: true,
            selected: None,
            place_target: None,
            remove_next: false,
            stats: SessionStats::default(),
            cfg,
        }
    }

    #[inline]
    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Cell the next edit applies to, and whether it removes.
    #[inline]
    pub fn selection(&self) -> Option<(BlockPos, bool)> {
        self.selected.map(|c| (c, self.remove_next))
    }

    pub fn is_solid(&self, pos: BlockPos) -> bool {
        self.window.chunk_at(pos).is_some_and(|c| c.is_solid(pos))
    }

    /// Top face of the terrain column at `(x, z)`, if that column is live.
    pub fn surface_height(&self, x: i32, z: i32) -> Option<f32> {
        let pos = BlockPos::new(x, 0, z);
        let chunk = self.window.chunk_at(pos)?;
        let (i, j) = chunk.local(pos)?;
        Some(chunk.heights().get(i as usize, j as usize) - 0.5)
    }

    /// Run one frame with the player walking along `walk`.
    pub fn frame(&mut self, walk: Vec3, dt: f32) {
        self.window.tick(self.walker.pos, &self.log);
        self.walker.step(&self.window, walk, dt);
        self.refresh_selection();
        self.drain_events();
        if let Some((a, b)) = self.portals.pair_unlinked() {
            log::info!(target: "portal", "paired {a} <-> {b}");
        }
        self.check_teleport(walk);
        self.stats.frames += 1;
    }

    fn refresh_selection(&mut self) {
        let eye = self.walker.pos;
        let reach = self.cfg.player.select_radius;
        let hit = raycast_first_hit(eye, self.look, reach, |p| self.is_solid(p));
        let cell = match hit {
            Some(h) => h.block,
            None => BlockPos::round(eye + self.look.normalized() * reach),
        };
        self.selected = Some(cell);
        self.place_target = hit.map(|h| h.prev);
        self.remove_next = self
            .window
            .update_selected(self.highlight_on, self.selected, self.portal_mode);
    }

    fn drain_events(&mut self) {
        while let Some(env) = self.events.pop_ready() {
            log_event(&env);
            match env.kind {
                Event::Jump => {
                    self.walker.jump();
                }
                Event::ToggleEditMode => self.portal_mode = !self.portal_mode,
                Event::ToggleHighlight => self.highlight_on = !self.highlight_on,
                Event::Edit => {
                    if let Some((cell, remove)) = self.selection() {
                        self.apply_edit(cell, remove);
                    }
                }
                Event::Place => {
                    if let Some(cell) = self.place_target {
                        self.apply_edit(cell, false);
                    }
                }
                Event::Look { dir } => {
                    if dir.length() > 0.0 {
                        self.look = dir.normalized();
                    }
                }
                Event::Reset => self.walker.reset(),
            }
        }
        self.events.advance_tick();
    }

    fn check_teleport(&mut self, walk: Vec3) {
        let pos = self.walker.pos;
        let Some(id) = self.portals.portal_at(pos) else {
            return;
        };
        let heading = if walk.length() > 0.0 { walk } else { self.look };
        if let Some(exit) = self.portals.teleport(id, pos, heading) {
            self.walker.pos = exit;
            self.walker.vel_y = 0.0;
            self.stats.teleports += 1;
        }
    }

    /// Place or remove `cell` in the current edit mode. Accepted edits are
    /// logged and, for portal cells, reflected in the portal graph. Returns
    /// false when no live chunk owns `cell`.
    pub fn apply_edit(&mut self, cell: BlockPos, remove: bool) -> bool {
        if !self.window.update_landscape(remove, cell, self.portal_mode) {
            self.stats.rejected_edits += 1;
            log::debug!(target: "edit", "edit at {:?} rejected", (cell.x, cell.y, cell.z));
            return false;
        }
        if remove {
            if self.portals.contains_block(cell) {
                self.portals.remove_block(cell);
            }
        } else if self.portal_mode {
            self.portals.add_block(cell);
        }
        let delta = if remove { EditDelta::Remove } else { EditDelta::Add };
        let kind = if self.portal_mode { CellKind::Portal } else { CellKind::Terrain };
        self.log.record(cell, delta, kind);
        self.stats.edits += 1;
        true
    }
}
