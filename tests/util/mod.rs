#![allow(dead_code)]
use std::collections::BTreeMap;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tricount::prelude::*;

pub fn gid(u: u64) -> Gid {
    Gid::new(u)
}

pub fn graph(edges: &[(u64, u64)]) -> UndirectedGraph {
    UndirectedGraph::from_edges(edges.iter().copied()).unwrap()
}

/// Complete graph on `0..n`.
pub fn clique(n: u64) -> UndirectedGraph {
    let mut g = UndirectedGraph::new();
    for u in 0..n {
        g.add_vertex(gid(u));
        for v in (u + 1)..n {
            g.add_edge(gid(u), gid(v)).unwrap();
        }
    }
    g
}

/// Path `0 - 1 - ... - (n-1)`.
pub fn path(n: u64) -> UndirectedGraph {
    let mut g = UndirectedGraph::new();
    for u in 0..n {
        g.add_vertex(gid(u));
        if u + 1 < n {
            g.add_edge(gid(u), gid(u + 1)).unwrap();
        }
    }
    g
}

/// G(n, p) with every vertex present, seeded.
pub fn random_graph(n: u64, p: f64, seed: u64) -> UndirectedGraph {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut g = UndirectedGraph::new();
    for u in 0..n {
        g.add_vertex(gid(u));
        for v in (u + 1)..n {
            if rng.r#gen::<f64>() < p {
                g.add_edge(gid(u), gid(v)).unwrap();
            }
        }
    }
    g
}

/// Every triangle as `(a, b, c)` with `a < b < c`.
pub fn triangles(g: &UndirectedGraph) -> Vec<(Gid, Gid, Gid)> {
    let mut out = Vec::new();
    for (a, b) in g.edges() {
        for c in g.neighbors(b) {
            if c > b && g.contains_edge(a, c) {
                out.push((a, b, c));
            }
        }
    }
    out
}

/// Number of triangles each vertex belongs to.
pub fn brute_force_counts(g: &UndirectedGraph) -> BTreeMap<Gid, u64> {
    let mut counts: BTreeMap<Gid, u64> = g.vertices().map(|v| (v, 0)).collect();
    for (a, b, c) in triangles(g) {
        for v in [a, b, c] {
            *counts.entry(v).or_default() += 1;
        }
    }
    counts
}

/// Cross-group counts: each triangle with three distinct groups is credited
/// to its highest vertex under `(degree, gid)`.
pub fn brute_force_cross(g: &UndirectedGraph, groups: u64) -> BTreeMap<Gid, u64> {
    let mut counts: BTreeMap<Gid, u64> = g.vertices().map(|v| (v, 0)).collect();
    let key = |v: Gid| (g.degree(v), v);
    for (a, b, c) in triangles(g) {
        let (ga, gb, gc) = (a.get() % groups, b.get() % groups, c.get() % groups);
        if ga != gb && gb != gc && ga != gc {
            let top = [a, b, c].into_iter().max_by_key(|&v| key(v)).unwrap();
            *counts.entry(top).or_default() += 1;
        }
    }
    counts
}

pub fn config(workers: usize, threads: usize) -> TriangleConfig {
    TriangleConfig {
        workers,
        threads_per_worker: threads,
        chunk_size: 4,
        ..Default::default()
    }
}

/// Run every worker on its own thread with an explicit owner map.
pub fn run_partitioned<F>(g: &UndirectedGraph, fnum: usize, owner: F, policy: CountPolicy) -> BTreeMap<Gid, u64>
where
    F: Fn(Gid) -> usize,
{
    let frags = distribute_graph(g, fnum, owner).unwrap();
    let comms = LocalComm::world(fnum).unwrap();
    let results: Vec<_> = std::thread::scope(|s| {
        let hs: Vec<_> = frags
            .iter()
            .zip(comms)
            .map(|(f, c)| s.spawn(move || run_worker(f, &c, &SerialScheduler, policy)))
            .collect();
        hs.into_iter().map(|h| h.join().unwrap()).collect()
    });
    let mut merged = BTreeMap::new();
    for r in results {
        merged.extend(r.unwrap());
    }
    merged
}
