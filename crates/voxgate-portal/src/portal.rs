use std::collections::VecDeque;

use hashbrown::HashSet;
use voxgate_geom::{Aabb, BlockPos, Vec3};

use crate::PortalId;

/// Render flag for portal blocks.
const PORTAL_FLAG: f32 = 1.0;

/// Geometry of a valid ring's opening.
///
/// `corner` is the opening's minimum corner on the ring plane; `u` and `v`
/// span the opening along the two in-plane axes; `normal` is the unit vector
/// along the flat axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PortalFrame {
    pub corner: Vec3,
    pub u: Vec3,
    pub v: Vec3,
    pub normal: Vec3,
    pub center: Vec3,
    pub flat_axis: usize,
}

impl PortalFrame {
    /// Box covering the opening, thickened by `slab` along the normal.
    pub fn volume(&self, slab: f32) -> Aabb {
        Aabb::from_corners(self.corner, self.corner + self.u + self.v)
            .expanded_along(self.flat_axis, slab)
    }
}

#[derive(Clone, Debug)]
pub struct Portal {
    id: PortalId,
    blocks: Vec<BlockPos>,
    outlet: Option<PortalId>,
    frame: Option<PortalFrame>,
}

impl Portal {
    pub fn new(id: PortalId, blocks: Vec<BlockPos>) -> Self {
        let mut portal = Self {
            id,
            blocks: Vec::with_capacity(blocks.len()),
            outlet: None,
            frame: None,
        };
        for b in blocks {
            if !portal.blocks.contains(&b) {
                portal.blocks.push(b);
            }
        }
        portal.recompute();
        portal
    }

    #[inline]
    pub fn id(&self) -> PortalId {
        self.id
    }

    #[inline]
    pub fn blocks(&self) -> &[BlockPos] {
        &self.blocks
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    #[inline]
    pub fn outlet(&self) -> Option<PortalId> {
        self.outlet
    }

    pub(crate) fn set_outlet(&mut self, outlet: Option<PortalId>) {
        self.outlet = outlet;
    }

    /// A valid ring has a frame; invalid portals stay inactive.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.frame.is_some()
    }

    #[inline]
    pub fn frame(&self) -> Option<&PortalFrame> {
        self.frame.as_ref()
    }

    /// Opening center for valid rings, block centroid otherwise.
    pub fn center(&self) -> Vec3 {
        if let Some(frame) = &self.frame {
            return frame.center;
        }
        if self.blocks.is_empty() {
            return Vec3::ZERO;
        }
        let sum = self
            .blocks
            .iter()
            .fold(Vec3::ZERO, |acc, b| acc + b.to_vec3());
        sum / self.blocks.len() as f32
    }

    #[inline]
    pub fn contains(&self, pos: BlockPos) -> bool {
        self.blocks.contains(&pos)
    }

    /// `pos` equals or is face-adjacent to one of the blocks.
    pub fn can_add(&self, pos: BlockPos) -> bool {
        self.blocks.iter().any(|b| b.distance_sq(pos) <= 1)
    }

    pub fn is_valid_ring(&self) -> bool {
        is_valid_ring(&self.blocks)
    }

    /// `(x, y, z, 1.0)` per block for the renderer.
    pub fn block_buffer(&self) -> Vec<f32> {
        self.blocks
            .iter()
            .flat_map(|b| [b.x as f32, b.y as f32, b.z as f32, PORTAL_FLAG])
            .collect()
    }

    /// Whether a player body (eye at `pos`, `height` tall, `radius` wide)
    /// overlaps the opening's slab. Always false for invalid rings.
    pub fn intersects(&self, pos: Vec3, radius: f32, height: f32, slab: f32) -> bool {
        let Some(frame) = &self.frame else {
            return false;
        };
        let body = Aabb::new(
            Vec3::new(pos.x - radius, pos.y - height, pos.z - radius),
            Vec3::new(pos.x + radius, pos.y, pos.z + radius),
        );
        frame.volume(slab).intersects(&body)
    }

    pub(crate) fn insert(&mut self, pos: BlockPos) -> bool {
        if self.contains(pos) {
            return false;
        }
        self.blocks.push(pos);
        self.recompute();
        true
    }

    pub(crate) fn absorb(&mut self, other: Portal) {
        for b in other.blocks {
            if !self.blocks.contains(&b) {
                self.blocks.push(b);
            }
        }
        self.recompute();
    }

    /// Drop `pos` and split the remaining blocks into face-connected groups.
    /// This portal keeps the first group; all groups are returned. Empty when
    /// `pos` was the last block, or was not part of the portal.
    pub fn remove_cube(&mut self, pos: BlockPos) -> Vec<Vec<BlockPos>> {
        let Some(i) = self.blocks.iter().position(|b| *b == pos) else {
            return Vec::new();
        };
        self.blocks.remove(i);
        let parts = partition(&self.blocks);
        self.blocks = parts.first().cloned().unwrap_or_default();
        self.recompute();
        parts
    }

    fn recompute(&mut self) {
        self.frame = if is_valid_ring(&self.blocks) {
            Some(ring_frame(&self.blocks))
        } else {
            None
        };
    }
}

fn bounds(blocks: &[BlockPos]) -> ([i32; 3], [i32; 3]) {
    let mut lo = [i32::MAX; 3];
    let mut hi = [i32::MIN; 3];
    for b in blocks {
        for a in 0..3 {
            lo[a] = lo[a].min(b.axis(a));
            hi[a] = hi[a].max(b.axis(a));
        }
    }
    (lo, hi)
}

/// Exactly the border of a planar rectangle with an opening: at least eight
/// blocks, flat along one axis, both in-plane sides longer than two, and one
/// block per border cell with none inside.
pub fn is_valid_ring(blocks: &[BlockPos]) -> bool {
    if blocks.len() < 8 {
        return false;
    }
    let (lo, hi) = bounds(blocks);
    let dims = [hi[0] - lo[0] + 1, hi[1] - lo[1] + 1, hi[2] - lo[2] + 1];
    let flat: Vec<usize> = (0..3).filter(|&a| dims[a] == 1).collect();
    let [f] = flat[..] else {
        return false;
    };
    let (a1, a2) = ((f + 1) % 3, (f + 2) % 3);
    let (d1, d2) = (dims[a1], dims[a2]);
    if d1 <= 2 || d2 <= 2 {
        return false;
    }
    if blocks.len() as i32 != 2 * d1 + 2 * (d2 - 2) {
        return false;
    }
    let unique: HashSet<BlockPos> = blocks.iter().copied().collect();
    unique.len() == blocks.len()
        && blocks.iter().all(|b| {
            let (p1, p2) = (b.axis(a1), b.axis(a2));
            p1 == lo[a1] || p1 == hi[a1] || p2 == lo[a2] || p2 == hi[a2]
        })
}

fn ring_frame(blocks: &[BlockPos]) -> PortalFrame {
    let (lo, hi) = bounds(blocks);
    let f = (0..3).find(|&a| lo[a] == hi[a]).unwrap_or(0);
    let (a1, a2) = ((f + 1) % 3, (f + 2) % 3);
    let mut corner = Vec3::ZERO;
    corner.set_axis(f, lo[f] as f32);
    corner.set_axis(a1, lo[a1] as f32 + 0.5);
    corner.set_axis(a2, lo[a2] as f32 + 0.5);
    let u = Vec3::unit(a1) * (hi[a1] - lo[a1] - 1) as f32;
    let v = Vec3::unit(a2) * (hi[a2] - lo[a2] - 1) as f32;
    PortalFrame {
        corner,
        u,
        v,
        normal: Vec3::unit(f),
        center: corner + (u + v) / 2.0,
        flat_axis: f,
    }
}

/// Face-connected components of `blocks`, in order of first appearance.
pub fn partition(blocks: &[BlockPos]) -> Vec<Vec<BlockPos>> {
    let remaining: HashSet<BlockPos> = blocks.iter().copied().collect();
    let mut seen: HashSet<BlockPos> = HashSet::with_capacity(blocks.len());
    let mut parts = Vec::new();
    for &start in blocks {
        if !seen.insert(start) {
            continue;
        }
        let mut part = Vec::new();
        let mut queue = VecDeque::from([start]);
        while let Some(p) = queue.pop_front() {
            part.push(p);
            for n in p.face_neighbors() {
                if remaining.contains(&n) && seen.insert(n) {
                    queue.push_back(n);
                }
            }
        }
        parts.push(part);
    }
    parts
}
