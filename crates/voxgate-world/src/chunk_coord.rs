/// Center of a chunk in world space. Both components are multiples of the
/// chunk size; a chunk covers `[x - size/2, x + size/2)` on each axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    pub x: i32,
    pub z: i32,
}

impl ChunkCoord {
    #[inline]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Chunk whose footprint contains the world position `(wx, wz)`:
    /// rounds to the nearest multiple of `size`.
    #[inline]
    pub fn containing(wx: f32, wz: f32, size: usize) -> Self {
        let s = size as f32;
        let snap = |v: f32| (((v + s / 2.0) / s).floor() * s) as i32;
        Self::new(snap(wx), snap(wz))
    }

    /// Neighbor `(dx, dz)` chunks away.
    #[inline]
    pub fn offset(self, dx: i32, dz: i32, size: usize) -> Self {
        let s = size as i32;
        Self::new(self.x + dx * s, self.z + dz * s)
    }

    /// World coordinate of the first column on each axis.
    #[inline]
    pub fn origin(self, size: usize) -> (i32, i32) {
        let half = (size / 2) as i32;
        (self.x - half, self.z - half)
    }

    #[inline]
    pub fn contains_column(self, wx: i32, wz: i32, size: usize) -> bool {
        let (x0, z0) = self.origin(size);
        let s = size as i32;
        wx >= x0 && wx < x0 + s && wz >= z0 && wz < z0 + s
    }

    /// All coordinates of a `(2·border+1)²` window centered here, row-major in z.
    pub fn window(self, border: usize, size: usize) -> Vec<ChunkCoord> {
        let b = border as i32;
        let mut out = Vec::with_capacity((2 * border + 1) * (2 * border + 1));
        for dz in -b..=b {
            for dx in -b..=b {
                out.push(self.offset(dx, dz, size));
            }
        }
        out
    }
}
