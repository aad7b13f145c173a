use voxgate_geom::{BlockPos, Vec3};

/// First solid cell along a ray and the empty cell entered just before it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RayHit {
    pub block: BlockPos,
    pub prev: BlockPos,
}

#[inline]
fn inv_or_max(v: f32) -> f32 {
    if v.abs() < 1e-8 { f32::MAX } else { 1.0 / v.abs() }
}

#[inline]
fn step_of(v: f32) -> i32 {
    if v > 0.0 {
        1
    } else if v < 0.0 {
        -1
    } else {
        0
    }
}

/// Grid walk over integer-centered cells (`[x-0.5, x+0.5]`) from `origin`
/// along `dir`, stopping after `max_dist`.
pub fn raycast_first_hit<F>(origin: Vec3, dir: Vec3, max_dist: f32, mut is_solid: F) -> Option<RayHit>
where
    F: FnMut(BlockPos) -> bool,
{
    if dir.length() < 1e-6 {
        return None;
    }
    let d = dir.normalized();
    // Shift so cell boundaries fall on integers.
    let o = origin + Vec3::new(0.5, 0.5, 0.5);
    let mut cell = [o.x.floor() as i32, o.y.floor() as i32, o.z.floor() as i32];
    let mut prev = cell;
    let dv = [d.x, d.y, d.z];
    let ov = [o.x, o.y, o.z];
    let mut step = [0i32; 3];
    let mut t_delta = [f32::MAX; 3];
    let mut t_max = [f32::MAX; 3];
    for a in 0..3 {
        step[a] = step_of(dv[a]);
        if step[a] == 0 {
            continue;
        }
        let inv = inv_or_max(dv[a]);
        let frac = ov[a] - ov[a].floor();
        t_delta[a] = inv;
        t_max[a] = if step[a] > 0 { (1.0 - frac) * inv } else { frac * inv };
    }

    let mut t = 0.0f32;
    while t <= max_dist {
        let pos = BlockPos::new(cell[0], cell[1], cell[2]);
        if is_solid(pos) {
            return Some(RayHit {
                block: pos,
                prev: BlockPos::new(prev[0], prev[1], prev[2]),
            });
        }
        prev = cell;
        let a = if t_max[0] < t_max[1] {
            if t_max[0] < t_max[2] { 0 } else { 2 }
        } else if t_max[1] < t_max[2] {
            1
        } else {
            2
        };
        if t_max[a] == f32::MAX {
            break;
        }
        cell[a] += step[a];
        t = t_max[a];
        t_max[a] += t_delta[a];
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hits_floor_below() {
        let hit = raycast_first_hit(Vec3::new(0.2, 5.0, 0.1), Vec3::new(0.0, -1.0, 0.0), 10.0, |p| {
            p.y <= 1
        })
        .expect("hit");
        assert_eq!(hit.block, BlockPos::new(0, 1, 0));
        assert_eq!(hit.prev, BlockPos::new(0, 2, 0));
    }

    #[test]
    fn respects_max_distance() {
        let solid = |p: BlockPos| p.x == 6;
        assert!(raycast_first_hit(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), 3.0, solid).is_none());
        let hit = raycast_first_hit(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), 6.0, solid).expect("hit");
        assert_eq!(hit.block, BlockPos::new(6, 0, 0));
        assert_eq!(hit.prev, BlockPos::new(5, 0, 0));
    }

    #[test]
    fn diagonal_ray_steps_through_faces() {
        let hit = raycast_first_hit(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 1.0),
            10.0,
            |p| p.x >= 3 && p.z >= 3,
        )
        .expect("hit");
        assert!(hit.block.x >= 3 && hit.block.z >= 3);
        assert_eq!(hit.block.manhattan(hit.prev), 1);
        assert!(raycast_first_hit(Vec3::ZERO, Vec3::ZERO, 10.0, |_| true).is_none());
    }
}
