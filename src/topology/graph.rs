//! Simple undirected graph keyed by global id, used as the input to
//! [`distribute_graph`](crate::algs::distribute::distribute_graph).
//!
//! Parallel edges collapse into one; self-loops are rejected.

use std::collections::{BTreeMap, BTreeSet};

use crate::topology::vertex::Gid;
use crate::tri_error::TriangleError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UndirectedGraph {
    adj: BTreeMap<Gid, BTreeSet<Gid>>,
}

impl UndirectedGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from raw `(u, v)` pairs.
    pub fn from_edges<I>(edges: I) -> Result<Self, TriangleError>
    where
        I: IntoIterator<Item = (u64, u64)>,
    {
        let mut g = Self::new();
        for (u, v) in edges {
            g.add_edge(Gid::new(u), Gid::new(v))?;
        }
        Ok(g)
    }

    /// Add an isolated vertex (no-op if already present).
    pub fn add_vertex(&mut self, v: Gid) {
        self.adj.entry(v).or_default();
    }

    /// Add the undirected edge `{u, v}`. Returns `true` if it was new.
    pub fn add_edge(&mut self, u: Gid, v: Gid) -> Result<bool, TriangleError> {
        if u == v {
            return Err(TriangleError::SelfLoop(u));
        }
        let fresh = self.adj.entry(u).or_default().insert(v);
        self.adj.entry(v).or_default().insert(u);
        Ok(fresh)
    }

    pub fn vertex_count(&self) -> usize {
        self.adj.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adj.values().map(BTreeSet::len).sum::<usize>() / 2
    }

    /// Vertices in ascending id order.
    pub fn vertices(&self) -> impl Iterator<Item = Gid> + '_ {
        self.adj.keys().copied()
    }

    /// Neighbours of `v` in ascending id order (empty if `v` is unknown).
    pub fn neighbors(&self, v: Gid) -> impl Iterator<Item = Gid> + '_ {
        self.adj.get(&v).into_iter().flatten().copied()
    }

    pub fn degree(&self, v: Gid) -> usize {
        self.adj.get(&v).map_or(0, BTreeSet::len)
    }

    pub fn contains_edge(&self, u: Gid, v: Gid) -> bool {
        self.adj.get(&u).is_some_and(|n| n.contains(&v))
    }

    /// Each edge once, as `(lo, hi)`.
    pub fn edges(&self) -> impl Iterator<Item = (Gid, Gid)> + '_ {
        self.adj
            .iter()
            .flat_map(|(&u, nbrs)| nbrs.range(u..).map(move |&v| (u, v)))
            .filter(|(u, v)| u < v)
    }
}
