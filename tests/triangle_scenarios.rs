mod util;

use tricount::prelude::*;
use util::*;

#[test]
fn four_clique_split_two_two() {
    let g = clique(4);
    let counts = run_partitioned(&g, 2, |v| (v.get() >= 2) as usize, CountPolicy::Plain);
    assert_eq!(counts.len(), 4);
    assert!(counts.values().all(|&c| c == 3), "{counts:?}");
}

#[test]
fn single_worker_triangle_with_pendant() {
    let g = graph(&[(0, 1), (1, 2), (0, 2), (2, 3)]);
    let counts = run_local(&g, &config(1, 1)).unwrap();
    assert_eq!(counts, brute_force_counts(&g));
    assert_eq!(counts[&gid(3)], 0);
}

#[test]
fn triangle_split_three_ways() {
    let g = graph(&[(0, 1), (1, 2), (0, 2)]);
    let counts = run_partitioned(&g, 3, |v| v.get() as usize, CountPolicy::Plain);
    assert_eq!(counts.values().copied().collect::<Vec<_>>(), vec![1, 1, 1]);
}

#[test]
fn paths_and_stars_have_no_triangles() {
    for workers in 1..=3 {
        let counts = run_local(&path(9), &config(workers, 2)).unwrap();
        assert_eq!(counts.len(), 9);
        assert!(counts.values().all(|&c| c == 0));
    }
    let star = graph(&[(0, 1), (0, 2), (0, 3), (0, 4)]);
    assert!(run_local(&star, &config(2, 1)).unwrap().values().all(|&c| c == 0));
}

#[test]
fn empty_graph_and_idle_workers() {
    let counts = run_local(&UndirectedGraph::new(), &config(3, 1)).unwrap();
    assert!(counts.is_empty());
    // more workers than vertices
    let g = graph(&[(0, 1), (1, 2), (0, 2)]);
    let counts = run_local(&g, &config(5, 1)).unwrap();
    assert_eq!(counts, brute_force_counts(&g));
}

#[test]
fn cross_group_triangle_three_groups() {
    let g = graph(&[(0, 1), (1, 2), (0, 2)]);
    let cfg = TriangleConfig {
        workers: 2,
        group_count: Some(3),
        ..Default::default()
    };
    let counts = run_local(&g, &cfg).unwrap();
    // equal degrees, so gid 2 is the discovering vertex
    assert_eq!(counts.values().copied().collect::<Vec<_>>(), vec![0, 0, 1]);
}

#[test]
fn cross_group_single_group_counts_nothing() {
    let g = clique(6);
    let cfg = TriangleConfig {
        workers: 3,
        group_count: Some(1),
        ..Default::default()
    };
    assert!(run_local(&g, &cfg).unwrap().values().all(|&c| c == 0));
}

#[test]
fn cross_group_matches_brute_force_on_clique() {
    let g = clique(7);
    for groups in [2i64, 3, 4] {
        let cfg = TriangleConfig {
            workers: 3,
            threads_per_worker: 2,
            group_count: Some(groups),
            partition: PartitionStrategy::Block,
            ..Default::default()
        };
        let counts = run_local(&g, &cfg).unwrap();
        assert_eq!(counts, brute_force_cross(&g, groups as u64), "groups = {groups}");
    }
}

#[test]
fn invalid_group_count_rejected_before_run() {
    let g = clique(3);
    for bad in [0i64, -5] {
        let cfg = TriangleConfig {
            group_count: Some(bad),
            ..Default::default()
        };
        assert_eq!(run_local(&g, &cfg), Err(TriangleError::InvalidGroupCount(bad)));
    }
}

#[test]
fn config_from_json_runs() {
    let cfg: TriangleConfig =
        serde_json::from_str(r#"{"workers": 2, "threads_per_worker": 2, "chunk_size": 1}"#).unwrap();
    let g = random_graph(20, 0.3, 7);
    assert_eq!(run_local(&g, &cfg).unwrap(), brute_force_counts(&g));
}
