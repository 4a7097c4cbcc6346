mod util;

use std::collections::BTreeSet;

use tricount::prelude::*;
use util::*;

#[test]
fn every_vertex_owned_exactly_once() {
    let g = random_graph(40, 0.2, 11);
    for strategy in [PartitionStrategy::Hash, PartitionStrategy::Block] {
        let frags = distribute_with(&g, 3, strategy).unwrap();
        let mut seen = BTreeSet::new();
        for f in &frags {
            for v in f.inner_vertices() {
                assert!(seen.insert(f.to_global_id(v)), "{:?} owned twice", f.to_global_id(v));
            }
        }
        assert_eq!(seen.len(), g.vertex_count());
    }
}

#[test]
fn ghosts_are_exactly_remote_neighbours() {
    let g = random_graph(30, 0.25, 5);
    let frags = distribute_with(&g, 4, PartitionStrategy::Hash).unwrap();
    for f in &frags {
        let expected: BTreeSet<Gid> = f
            .inner_vertices()
            .iter()
            .flat_map(|v| g.neighbors(f.to_global_id(v)).collect::<Vec<_>>())
            .filter(|&n| (n.get() % 4) as usize != f.fid())
            .collect();
        let ghosts: BTreeSet<Gid> = f.outer_vertices().iter().map(|v| f.to_global_id(v)).collect();
        assert_eq!(ghosts, expected);
        for u in f.outer_vertices() {
            assert_eq!(f.owner_of(u), (f.to_global_id(u).get() % 4) as usize);
            assert!(f.outgoing_neighbors(u).is_empty());
        }
        f.validate_invariants().unwrap();
    }
}

#[test]
fn mirror_lists_match_ghosts_elsewhere() {
    let g = random_graph(25, 0.3, 9);
    let frags = distribute_with(&g, 3, PartitionStrategy::Block).unwrap();
    for f in &frags {
        for v in f.inner_vertices() {
            let gid = f.to_global_id(v);
            let holders: Vec<usize> = frags
                .iter()
                .filter(|o| o.fid() != f.fid())
                .filter(|o| o.resolve_local_handle(gid).is_some())
                .map(|o| o.fid())
                .collect();
            assert_eq!(f.mirror_workers(v), holders.as_slice());
        }
    }
}

#[test]
fn local_degree_of_inner_is_global_degree() {
    let g = random_graph(20, 0.4, 3);
    let frags = distribute_with(&g, 2, PartitionStrategy::Hash).unwrap();
    for f in &frags {
        for v in f.inner_vertices() {
            assert_eq!(f.local_out_degree(v), g.degree(f.to_global_id(v)));
        }
    }
}
