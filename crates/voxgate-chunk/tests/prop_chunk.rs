use std::sync::Arc;

use proptest::prelude::*;
use voxgate_chunk::Chunk;
use voxgate_edit::{CellKind, EditDelta, ModificationLog};
use voxgate_geom::BlockPos;
use voxgate_world::{ChunkCoord, DensityColumn, DensityVolume, WorldConfig};

const SIZE: usize = 8;

fn base_chunk(heights: &[usize]) -> Chunk {
    let mut cfg = WorldConfig::default();
    cfg.chunks.size = SIZE;
    cfg.terrain.octaves = 3;
    let columns = heights.iter().map(|&h| DensityColumn::solid(h)).collect();
    let volume = DensityVolume::from_columns(SIZE, columns);
    Chunk::from_volume(ChunkCoord::new(0, 0), Arc::new(cfg), volume)
}

fn heights() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(0usize..8, SIZE * SIZE)
}

fn edit() -> impl Strategy<Value = (bool, BlockPos, bool)> {
    (any::<bool>(), -4i32..4, 0i32..12, -4i32..4, any::<bool>())
        .prop_map(|(remove, x, y, z, portal)| (remove, BlockPos::new(x, y, z), portal))
}

fn sorted_positions(chunk: &Chunk) -> Vec<BlockPos> {
    let mut v: Vec<BlockPos> = chunk.render().positions().collect();
    v.sort();
    v
}

proptest! {
    // The render buffer holds exactly the solid, exposed cells after any edit sequence
    #[test]
    fn render_tracks_exposure(hs in heights(), edits in prop::collection::vec(edit(), 0..40)) {
        let mut chunk = base_chunk(&hs);
        for (remove, pos, portal) in edits {
            prop_assert!(chunk.update_landscape(remove, pos, portal));
            prop_assert!(chunk.render_matches_volume());
            prop_assert_eq!(chunk.render().as_slice().len(), chunk.num_cubes() * 4);
        }
    }

    // Replaying the net log onto a fresh chunk matches incremental edits
    #[test]
    fn replay_matches_incremental_edits(hs in heights(), edits in prop::collection::vec(edit(), 0..40)) {
        let mut live = base_chunk(&hs);
        let mut log = ModificationLog::new();
        for (remove, pos, portal) in edits {
            live.update_landscape(remove, pos, portal);
            let delta = if remove { EditDelta::Remove } else { EditDelta::Add };
            let kind = if portal { CellKind::Portal } else { CellKind::Terrain };
            log.record(pos, delta, kind);
        }
        let mut replayed = base_chunk(&hs);
        replayed.update_from_log(&log.for_chunk(ChunkCoord::new(0, 0), SIZE));
        prop_assert_eq!(live.volume(), replayed.volume());
        prop_assert_eq!(sorted_positions(&live), sorted_positions(&replayed));
        for pos in live.render().positions() {
            prop_assert_eq!(live.render().flag(pos), replayed.render().flag(pos));
        }
    }

    // Adding the same cell twice through the log leaves one drawn cube
    #[test]
    fn duplicate_log_add_draws_once(x in -4i32..4, z in -4i32..4, y in 8i32..12) {
        let mut log = ModificationLog::new();
        let pos = BlockPos::new(x, y, z);
        log.record(pos, EditDelta::Add, CellKind::Terrain);
        log.record(pos, EditDelta::Add, CellKind::Terrain);
        let mut chunk = base_chunk(&[4; SIZE * SIZE]);
        let before = chunk.num_cubes();
        chunk.update_from_log(log.entries());
        prop_assert_eq!(chunk.render().positions().filter(|p| *p == pos).count(), 1);
        prop_assert_eq!(chunk.num_cubes(), before + 1);
    }
}
