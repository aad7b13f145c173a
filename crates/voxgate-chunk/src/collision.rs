//! Cylinder-vs-voxel collision against one chunk.
//!
//! Positions are the player's eye point; feet sit `player.height` below it.

use voxgate_geom::{BlockPos, Vec3};

use crate::Chunk;

impl Chunk {
    /// Probe the column under (or over) `pos` for the first solid cell.
    ///
    /// Descending, probes from the rounded feet height down `height + 1`
    /// cells and returns the top face (`k + 0.5`) of the first solid one.
    /// Ascending, probes `height + 1` cells above the rounded eye height and
    /// returns the feet height that keeps a one-cell gap below the hit.
    /// `None` when the column lies outside this chunk or nothing is hit.
    pub fn vertical_collision(&self, pos: Vec3, moving_upward: bool) -> Option<f32> {
        let h = self.cfg.player_cells();
        let column = BlockPos::round(pos);
        self.local(column)?;
        if moving_upward {
            let base = pos.y.round() as i32;
            (1..=h + 1)
                .map(|d| base + d)
                .find(|&k| self.is_solid(BlockPos::new(column.x, k, column.z)))
                .map(|k| k as f32 - 1.5 - h as f32)
        } else {
            let base = (pos.y - self.cfg.player.height).round() as i32;
            (0..=h + 1)
                .map(|d| base - d)
                .find(|&k| self.is_solid(BlockPos::new(column.x, k, column.z)))
                .map(|k| k as f32 + 0.5)
        }
    }

    /// Whether the body at `pos` overlaps a solid cell in the 3×3 columns
    /// around it. Only columns whose footprint comes within the player radius
    /// are probed, over the cells the body spans vertically.
    pub fn side_collision(&self, pos: Vec3) -> bool {
        let radius = self.cfg.player.radius;
        let feet = pos.y - self.cfg.player.height;
        let head = pos.y;
        let k_lo = (feet - 0.5).floor() as i32 + 1;
        let k_hi = (head + 0.5).ceil() as i32 - 1;
        let center = BlockPos::round(pos);
        for dz in -1..=1 {
            for dx in -1..=1 {
                let cx = center.x + dx;
                let cz = center.z + dz;
                if !self.coord.contains_column(cx, cz, self.size()) {
                    continue;
                }
                let nx = pos.x.clamp(cx as f32 - 0.5, cx as f32 + 0.5);
                let nz = pos.z.clamp(cz as f32 - 0.5, cz as f32 + 0.5);
                let (ex, ez) = (pos.x - nx, pos.z - nz);
                if ex * ex + ez * ez >= radius * radius {
                    continue;
                }
                if (k_lo..=k_hi).any(|k| self.is_solid(BlockPos::new(cx, k, cz))) {
                    return true;
                }
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use crate::tests::flat_chunk;
    use voxgate_geom::{BlockPos, Vec3};

    // Columns are solid through k = 9; the player is 2 cells tall.
    #[test]
    fn descending_lands_on_top_face() {
        let chunk = flat_chunk(8, 10);
        for feet in [10.0f32, 10.4, 11.0, 12.0] {
            let eye = Vec3::new(0.2, feet + 2.0, -1.0);
            assert_eq!(chunk.vertical_collision(eye, false), Some(9.5), "feet {feet}");
        }
        assert_eq!(chunk.vertical_collision(Vec3::new(0.0, 30.0, 0.0), false), None);
    }

    #[test]
    fn ascending_stops_below_ceiling() {
        let mut chunk = flat_chunk(8, 3);
        let base = 6;
        chunk.update_landscape(false, BlockPos::new(1, base + 1, 1), false);
        let eye = Vec3::new(1.0, base as f32, 1.0);
        assert_eq!(chunk.vertical_collision(eye, true), Some(base as f32 - 2.0 - 0.5));
        assert_eq!(chunk.vertical_collision(Vec3::new(2.0, base as f32, 1.0), true), None);
    }

    #[test]
    fn vertical_probe_outside_chunk_is_none() {
        let chunk = flat_chunk(8, 10);
        assert_eq!(chunk.vertical_collision(Vec3::new(4.0, 12.0, 0.0), false), None);
        assert_eq!(chunk.vertical_collision(Vec3::new(0.0, 12.0, -4.6), false), None);
    }

    #[test]
    fn side_collision_checks_radius_and_body_span() {
        let mut chunk = flat_chunk(8, 3);
        // Standing on the ground: feet at 2.5, nothing beside the body.
        let eye = Vec3::new(0.0, 4.5, 0.0);
        assert!(!chunk.side_collision(eye));
        chunk.update_landscape(false, BlockPos::new(1, 3, 0), false);
        assert!(!chunk.side_collision(eye));
        assert!(chunk.side_collision(Vec3::new(0.2, 4.5, 0.0)));
        // A cell above the head does not block.
        chunk.update_landscape(true, BlockPos::new(1, 3, 0), false);
        chunk.update_landscape(false, BlockPos::new(1, 5, 0), false);
        assert!(!chunk.side_collision(Vec3::new(0.2, 4.5, 0.0)));
    }
}
