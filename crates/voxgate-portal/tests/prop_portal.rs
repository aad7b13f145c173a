use hashbrown::HashSet;
use proptest::prelude::*;
use voxgate_geom::{BlockPos, Vec3};
use voxgate_portal::{PortalGraph, PortalParams, is_valid_ring, partition};

/// Border of a `w × h` rectangle lying in the plane normal to `flat`.
fn ring(origin: BlockPos, flat: usize, w: i32, h: i32) -> Vec<BlockPos> {
    let (a1, a2) = ((flat + 1) % 3, (flat + 2) % 3);
    let mut out = Vec::new();
    for s in 0..w {
        for t in 0..h {
            if s == 0 || s == w - 1 || t == 0 || t == h - 1 {
                let mut d = [0; 3];
                d[a1] = s;
                d[a2] = t;
                out.push(origin.offset(d[0], d[1], d[2]));
            }
        }
    }
    out
}

fn origin() -> impl Strategy<Value = BlockPos> {
    (-100i32..100, 0i32..60, -100i32..100).prop_map(|(x, y, z)| BlockPos::new(x, y, z))
}

proptest! {
    // Any rectangle border with an opening is a valid ring
    #[test]
    fn rectangle_borders_are_valid(o in origin(), flat in 0usize..3, w in 3i32..9, h in 3i32..9) {
        prop_assert!(is_valid_ring(&ring(o, flat, w, h)));
    }

    // Dropping any one block invalidates the ring; the pieces cover the rest
    #[test]
    fn removing_a_block_breaks_the_ring(o in origin(), flat in 0usize..3, w in 3i32..7, h in 3i32..7, pick in any::<prop::sample::Index>()) {
        let full = ring(o, flat, w, h);
        let cut = full[pick.index(full.len())];
        let rest: Vec<BlockPos> = full.iter().copied().filter(|b| *b != cut).collect();
        prop_assert!(!is_valid_ring(&rest));
        let parts = partition(&rest);
        prop_assert!(!parts.is_empty() && parts.len() <= 2);
        let union: HashSet<BlockPos> = parts.iter().flatten().copied().collect();
        prop_assert_eq!(union.len(), rest.len());
        prop_assert!(rest.iter().all(|b| union.contains(b)));
    }

    // Arbitrary placement and removal keeps links symmetric and blocks owned once
    #[test]
    fn edits_keep_graph_consistent(ops in prop::collection::vec((any::<bool>(), 0i32..6, 0i32..6), 1..80)) {
        let mut g = PortalGraph::new(PortalParams::default());
        for (remove, x, y) in ops {
            let pos = BlockPos::new(x, y, 0);
            if remove {
                g.remove_block(pos);
            } else {
                g.add_block(pos);
            }
            g.pair_unlinked();
            prop_assert!(g.links_are_symmetric());
            let mut owned = HashSet::new();
            for p in g.iter() {
                prop_assert!(!p.is_empty());
                for b in p.blocks() {
                    prop_assert!(owned.insert(*b));
                }
                prop_assert_eq!(partition(p.blocks()).len(), 1);
            }
        }
    }
}

#[test]
fn walking_through_a_linked_pair_exits_beyond_the_outlet() {
    let mut g = PortalGraph::new(PortalParams::default());
    for b in ring(BlockPos::new(0, 20, 0), 2, 3, 5) {
        g.add_block(b);
    }
    for b in ring(BlockPos::new(30, 20, 10), 0, 4, 5) {
        g.add_block(b);
    }
    let ids = g.ids();
    assert_eq!(ids.len(), 2);
    assert!(g.iter().all(|p| p.is_valid()));
    g.link(ids[0], ids[1]).expect("both portals exist");

    // Eye just inside the first opening, walking along +z through it.
    let eye = Vec3::new(1.0, 23.0, 0.2);
    let entered = g.portal_at(eye).expect("inside the opening");
    assert_eq!(entered, ids[0]);
    let outlet = g.get(ids[1]).and_then(|p| p.frame()).copied().expect("valid outlet");
    assert_eq!(outlet.normal, Vec3::new(1.0, 0.0, 0.0));

    let exit = g.teleport(entered, eye, Vec3::new(0.3, 0.0, 1.0)).expect("linked");
    assert_eq!(exit, outlet.center + outlet.normal * 1.5);
    assert!(g.portal_at(exit).is_none());

    let exit_back = g.teleport(entered, eye, Vec3::new(-1.0, 0.0, 0.0)).expect("linked");
    assert_eq!(exit_back, outlet.center - outlet.normal * 1.5);
}
