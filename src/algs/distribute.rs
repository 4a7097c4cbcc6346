//! Split an [`UndirectedGraph`] into one [`InMemoryFragment`] per worker.
//!
//! Every vertex goes to exactly one owner; each fragment receives its owned
//! vertices with their full adjacency, and ghosts for every remote neighbour.

use hashbrown::HashMap;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::topology::graph::UndirectedGraph;
use crate::topology::in_memory::InMemoryFragment;
use crate::topology::vertex::Gid;
use crate::tri_error::TriangleError;

/// How vertices are assigned to workers when no explicit owner map is given.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartitionStrategy {
    /// `gid mod fnum`.
    #[default]
    Hash,
    /// Contiguous runs of the id-sorted vertex list, sizes differing by at most one.
    Block,
}

impl PartitionStrategy {
    /// Owner of every vertex of `graph`.
    pub fn assign(self, graph: &UndirectedGraph, fnum: usize) -> HashMap<Gid, usize> {
        let fnum = fnum.max(1);
        match self {
            PartitionStrategy::Hash => graph.vertices().map(|g| (g, hash_owner(g, fnum))).collect(),
            PartitionStrategy::Block => {
                let n = graph.vertex_count();
                graph
                    .vertices()
                    .enumerate()
                    .map(|(i, g)| (g, i * fnum / n.max(1)))
                    .collect()
            }
        }
    }
}

/// `gid mod fnum`.
pub fn hash_owner(gid: Gid, fnum: usize) -> usize {
    (gid.get() % fnum.max(1) as u64) as usize
}

/// Build all `fnum` fragments of `graph`, placing each vertex on `owner(gid)`.
///
/// # Errors
/// - `InvalidConfig` if `fnum == 0`.
/// - `InvalidOwner` if `owner` returns a rank `>= fnum`.
pub fn distribute_graph<F>(
    graph: &UndirectedGraph,
    fnum: usize,
    owner: F,
) -> Result<Vec<InMemoryFragment>, TriangleError>
where
    F: Fn(Gid) -> usize,
{
    if fnum == 0 {
        return Err(TriangleError::InvalidConfig("at least one worker is required".into()));
    }
    let mut owned: Vec<Vec<(Gid, Vec<Gid>)>> = vec![Vec::new(); fnum];
    for gid in graph.vertices() {
        let o = owner(gid);
        if o >= fnum {
            return Err(TriangleError::InvalidOwner { gid, owner: o, fnum });
        }
        owned[o].push((gid, graph.neighbors(gid).collect_vec()));
    }
    log::debug!(
        "distributing {} vertices / {} edges over {} workers: sizes {:?}",
        graph.vertex_count(),
        graph.edge_count(),
        fnum,
        owned.iter().map(Vec::len).collect_vec()
    );
    owned
        .iter()
        .enumerate()
        .map(|(fid, inner)| InMemoryFragment::build(fid, fnum, inner, &owner))
        .collect()
}

/// [`distribute_graph`] with an owner map produced by `strategy`.
pub fn distribute_with(
    graph: &UndirectedGraph,
    fnum: usize,
    strategy: PartitionStrategy,
) -> Result<Vec<InMemoryFragment>, TriangleError> {
    let owners = strategy.assign(graph, fnum);
    distribute_graph(graph, fnum, |g| owners.get(&g).copied().unwrap_or(usize::MAX))
}
