use std::collections::BTreeMap;

use voxgate_geom::{BlockPos, Vec3};
use voxgate_world::WorldConfig;

use crate::portal::Portal;
use crate::{PortalError, PortalId};

/// Distances used by intersection and teleport tests.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PortalParams {
    /// Distance from the outlet's opening to the exit point.
    pub clearance: f32,
    /// Half-thickness of the opening's intersection slab.
    pub slab: f32,
    pub player_radius: f32,
    pub player_height: f32,
}

impl PortalParams {
    pub fn from_config(cfg: &WorldConfig) -> Self {
        Self {
            clearance: cfg.portals.clearance,
            slab: cfg.portals.slab,
            player_radius: cfg.player.radius,
            player_height: cfg.player.height,
        }
    }
}

impl Default for PortalParams {
    fn default() -> Self {
        Self::from_config(&WorldConfig::default())
    }
}

/// Registry of portals keyed by id. Outlet links are always symmetric: only
/// [`PortalGraph::link`] and [`PortalGraph::unlink`] change them, and both
/// update both sides.
#[derive(Debug)]
pub struct PortalGraph {
    portals: BTreeMap<PortalId, Portal>,
    next_id: u32,
    params: PortalParams,
}

impl PortalGraph {
    pub fn new(params: PortalParams) -> Self {
        Self {
            portals: BTreeMap::new(),
            next_id: 0,
            params,
        }
    }

    #[inline]
    pub fn params(&self) -> &PortalParams {
        &self.params
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.portals.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.portals.is_empty()
    }

    #[inline]
    pub fn get(&self, id: PortalId) -> Option<&Portal> {
        self.portals.get(&id)
    }

    /// Portals in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Portal> {
        self.portals.values()
    }

    pub fn ids(&self) -> Vec<PortalId> {
        self.portals.keys().copied().collect()
    }

    pub fn clear(&mut self) {
        self.portals.clear();
    }

    fn spawn(&mut self, blocks: Vec<BlockPos>) -> PortalId {
        let id = PortalId(self.next_id);
        self.next_id += 1;
        let portal = Portal::new(id, blocks);
        log::info!(
            target: "portal",
            "portal {id} created with {} blocks (valid: {})",
            portal.len(),
            portal.is_valid()
        );
        self.portals.insert(id, portal);
        id
    }

    /// True if `pos` touches some portal.
    pub fn can_add(&self, pos: BlockPos) -> bool {
        self.portals.values().any(|p| p.can_add(pos))
    }

    pub fn contains_block(&self, pos: BlockPos) -> bool {
        self.portal_containing(pos).is_some()
    }

    pub fn portal_containing(&self, pos: BlockPos) -> Option<PortalId> {
        self.portals
            .values()
            .find(|p| p.contains(pos))
            .map(Portal::id)
    }

    /// Place a portal block. Starts a new portal if nothing is adjacent;
    /// otherwise grows the lowest-id adjacent portal and merges every other
    /// adjacent portal into it.
    pub fn add_block(&mut self, pos: BlockPos) -> PortalId {
        let touching: Vec<PortalId> = self
            .portals
            .values()
            .filter(|p| p.can_add(pos))
            .map(Portal::id)
            .collect();
        let Some((&keep, rest)) = touching.split_first() else {
            return self.spawn(vec![pos]);
        };
        for &other in rest {
            self.detach(other);
            if let Some(absorbed) = self.portals.remove(&other) {
                log::info!(target: "portal", "portal {other} merged into {keep}");
                if let Some(p) = self.portals.get_mut(&keep) {
                    p.absorb(absorbed);
                }
            }
        }
        if let Some(p) = self.portals.get_mut(&keep) {
            p.insert(pos);
            log::debug!(
                target: "portal",
                "portal {keep} grew to {} blocks (valid: {})",
                p.len(),
                p.is_valid()
            );
        }
        self.drop_link_if_invalid(keep);
        keep
    }

    /// Remove a portal block. The owning portal keeps the first connected
    /// group, each further group becomes a new portal, and a portal left with
    /// no blocks is deleted. Returns the groups.
    pub fn remove_block(&mut self, pos: BlockPos) -> Vec<Vec<BlockPos>> {
        let Some(id) = self.portal_containing(pos) else {
            return Vec::new();
        };
        let parts = match self.portals.get_mut(&id) {
            Some(p) => p.remove_cube(pos),
            None => return Vec::new(),
        };
        if parts.is_empty() {
            self.detach(id);
            self.portals.remove(&id);
            log::info!(target: "portal", "portal {id} removed");
            return parts;
        }
        for part in parts.iter().skip(1) {
            let new_id = self.spawn(part.clone());
            log::info!(target: "portal", "portal {id} split off {new_id}");
        }
        self.drop_link_if_invalid(id);
        parts
    }

    fn drop_link_if_invalid(&mut self, id: PortalId) {
        let invalid = self.portals.get(&id).is_some_and(|p| !p.is_valid());
        if invalid {
            self.detach(id);
        }
    }

    /// Clear `id`'s link on both sides.
    fn detach(&mut self, id: PortalId) -> Option<PortalId> {
        let other = self.portals.get(&id)?.outlet()?;
        if let Some(p) = self.portals.get_mut(&id) {
            p.set_outlet(None);
        }
        if let Some(p) = self.portals.get_mut(&other) {
            p.set_outlet(None);
        }
        log::info!(target: "portal", "portals {id} and {other} unlinked");
        Some(other)
    }

    /// Link `a` and `b` to each other, dropping any previous links either had.
    pub fn link(&mut self, a: PortalId, b: PortalId) -> Result<(), PortalError> {
        if a == b {
            return Err(PortalError::SelfLink(a));
        }
        for id in [a, b] {
            if !self.portals.contains_key(&id) {
                return Err(PortalError::UnknownPortal(id));
            }
        }
        if self.portals.get(&a).and_then(Portal::outlet) == Some(b) {
            return Ok(());
        }
        self.detach(a);
        self.detach(b);
        if let Some(p) = self.portals.get_mut(&a) {
            p.set_outlet(Some(b));
        }
        if let Some(p) = self.portals.get_mut(&b) {
            p.set_outlet(Some(a));
        }
        log::info!(target: "portal", "portals {a} and {b} linked");
        Ok(())
    }

    /// Break the link between `a` and `b`. Returns whether they were linked.
    pub fn unlink(&mut self, a: PortalId, b: PortalId) -> Result<bool, PortalError> {
        for id in [a, b] {
            if !self.portals.contains_key(&id) {
                return Err(PortalError::UnknownPortal(id));
            }
        }
        if self.portals.get(&a).and_then(Portal::outlet) != Some(b) {
            return Ok(false);
        }
        self.detach(a);
        Ok(true)
    }

    /// Link the two lowest-id portals that are valid and unlinked.
    pub fn pair_unlinked(&mut self) -> Option<(PortalId, PortalId)> {
        let mut free = self
            .portals
            .values()
            .filter(|p| p.is_valid() && p.outlet().is_none())
            .map(Portal::id);
        let a = free.next()?;
        let b = free.next()?;
        self.link(a, b).ok()?;
        Some((a, b))
    }

    /// First active portal whose opening the player at `pos` overlaps.
    pub fn portal_at(&self, pos: Vec3) -> Option<PortalId> {
        let PortalParams {
            slab,
            player_radius,
            player_height,
            ..
        } = self.params;
        self.portals
            .values()
            .filter(|p| p.outlet().is_some())
            .find(|p| p.intersects(pos, player_radius, player_height, slab))
            .map(Portal::id)
    }

    /// Exit point when travelling through `id` along `direction`: the
    /// outlet's center pushed `clearance` along its normal, on the side the
    /// traveler is heading. `None` unless both ends are valid and linked.
    pub fn teleport(&self, id: PortalId, _position: Vec3, direction: Vec3) -> Option<Vec3> {
        let portal = self.portals.get(&id)?;
        portal.frame()?;
        let outlet = self.portals.get(&portal.outlet()?)?;
        let frame = outlet.frame()?;
        let sign = if frame.normal.dot(direction) < 0.0 { -1.0 } else { 1.0 };
        let exit = frame.center + frame.normal * (sign * self.params.clearance);
        log::info!(
            target: "portal",
            "teleport {id} -> {} to ({:.2}, {:.2}, {:.2})",
            outlet.id(),
            exit.x,
            exit.y,
            exit.z
        );
        Some(exit)
    }

    /// Render buffers for every portal, `(x, y, z, 1.0)` per block.
    pub fn block_buffers(&self) -> Vec<(PortalId, Vec<f32>)> {
        self.portals
            .values()
            .map(|p| (p.id(), p.block_buffer()))
            .collect()
    }

    /// Every link is mirrored by its partner.
    pub fn links_are_symmetric(&self) -> bool {
        self.portals.values().all(|p| match p.outlet() {
            None => true,
            Some(o) => self
                .portals
                .get(&o)
                .is_some_and(|q| q.outlet() == Some(p.id())),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring_z(x0: i32, y0: i32, z: i32) -> Vec<BlockPos> {
        let mut out = Vec::new();
        for y in y0..y0 + 5 {
            for x in x0..x0 + 3 {
                if y == y0 || y == y0 + 4 || x == x0 || x == x0 + 2 {
                    out.push(BlockPos::new(x, y, z));
                }
            }
        }
        out
    }

    fn build(graph: &mut PortalGraph, blocks: &[BlockPos]) -> PortalId {
        let mut id = None;
        for &b in blocks {
            id = Some(graph.add_block(b));
        }
        id.expect("non-empty ring")
    }

    #[test]
    fn params_follow_the_world_config() {
        let cfg = WorldConfig::default();
        let p = PortalParams::default();
        assert_eq!(p.clearance, cfg.portals.clearance);
        assert_eq!(p.slab, cfg.portals.slab);
        assert_eq!(p.player_radius, cfg.player.radius);
        assert_eq!(p.player_height, cfg.player.height);

        let mut custom = WorldConfig::default();
        custom.portals.clearance = 3.0;
        custom.player.height = 1.8;
        let p = PortalParams::from_config(&custom);
        assert_eq!((p.clearance, p.player_height), (3.0, 1.8));
    }

    #[test]
    fn blocks_grow_one_portal() {
        let mut g = PortalGraph::new(PortalParams::default());
        let id = build(&mut g, &ring_z(0, 10, 0));
        assert_eq!(g.len(), 1);
        let p = g.get(id).expect("portal exists");
        assert_eq!(p.len(), 12);
        assert!(p.is_valid());
        assert!(g.can_add(BlockPos::new(-1, 10, 0)));
        assert!(!g.can_add(BlockPos::new(-1, 9, 0)));
    }

    #[test]
    fn bridging_block_merges_portals() {
        let mut g = PortalGraph::new(PortalParams::default());
        let a = g.add_block(BlockPos::new(0, 0, 0));
        let b = g.add_block(BlockPos::new(2, 0, 0));
        assert_ne!(a, b);
        let merged = g.add_block(BlockPos::new(1, 0, 0));
        assert_eq!(merged, a);
        assert_eq!(g.len(), 1);
        assert_eq!(g.get(a).map(Portal::len), Some(3));
    }

    #[test]
    fn split_spawns_new_portal_and_last_block_deletes() {
        let mut g = PortalGraph::new(PortalParams::default());
        for x in 0..3 {
            g.add_block(BlockPos::new(x, 0, 0));
        }
        let parts = g.remove_block(BlockPos::new(1, 0, 0));
        assert_eq!(parts.len(), 2);
        assert_eq!(g.len(), 2);
        assert!(g.remove_block(BlockPos::new(0, 0, 0)).is_empty());
        assert_eq!(g.len(), 1);
        assert!(g.remove_block(BlockPos::new(9, 9, 9)).is_empty());
    }

    #[test]
    fn link_is_symmetric_and_checked() {
        let mut g = PortalGraph::new(PortalParams::default());
        let a = build(&mut g, &ring_z(0, 10, 0));
        let b = build(&mut g, &ring_z(20, 10, 0));
        let c = build(&mut g, &ring_z(40, 10, 0));
        assert_eq!(g.link(a, a), Err(PortalError::SelfLink(a)));
        assert_eq!(g.link(a, PortalId(99)), Err(PortalError::UnknownPortal(PortalId(99))));
        g.link(a, b).expect("link");
        assert_eq!(g.get(b).and_then(Portal::outlet), Some(a));
        g.link(a, c).expect("relink");
        assert_eq!(g.get(b).and_then(Portal::outlet), None);
        assert_eq!(g.get(c).and_then(Portal::outlet), Some(a));
        assert!(g.links_are_symmetric());
        assert_eq!(g.unlink(c, b), Ok(false));
        assert_eq!(g.unlink(c, a), Ok(true));
        assert!(g.iter().all(|p| p.outlet().is_none()));
    }

    #[test]
    fn breaking_a_ring_unlinks_it() {
        let mut g = PortalGraph::new(PortalParams::default());
        let a = build(&mut g, &ring_z(0, 10, 0));
        let b = build(&mut g, &ring_z(20, 10, 0));
        assert_eq!(g.pair_unlinked(), Some((a, b)));
        g.remove_block(BlockPos::new(1, 10, 0));
        assert_eq!(g.get(b).and_then(Portal::outlet), None);
        assert!(g.links_are_symmetric());
        assert_eq!(g.pair_unlinked(), None);
    }

    #[test]
    fn teleport_exits_on_the_far_side() {
        let mut g = PortalGraph::new(PortalParams::default());
        let a = build(&mut g, &ring_z(0, 10, 0));
        let b = build(&mut g, &ring_z(20, 10, 5));
        assert_eq!(g.teleport(a, Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0)), None);
        g.link(a, b).expect("link");
        let center = g.get(b).and_then(Portal::frame).map(|f| f.center).expect("frame");
        assert_eq!(center, Vec3::new(21.0, 12.0, 5.0));
        let forward = g.teleport(a, Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(forward, Some(Vec3::new(21.0, 12.0, 6.5)));
        let back = g.teleport(a, Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(back, Some(Vec3::new(21.0, 12.0, 3.5)));
        let eye = Vec3::new(1.0, 13.0, 0.1);
        assert_eq!(g.portal_at(eye), Some(a));
        assert_eq!(g.portal_at(Vec3::new(1.0, 13.0, 3.0)), None);
    }
}
