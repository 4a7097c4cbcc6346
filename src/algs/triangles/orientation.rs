//! Degree-ordered edge orientation.
//!
//! Vertices are totally ordered by `(degree, global id)`. A vertex keeps
//! exactly the neighbours that sort below it, so every undirected edge is kept
//! by one endpoint and the kept relation has no cycles.

use crate::topology::fragment::PartitionView;
use crate::topology::vertex::{Gid, Vertex};
use crate::tri_error::TriangleError;

/// Sort key of a vertex in the orientation order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RankKey {
    pub degree: u64,
    pub gid: Gid,
}

impl RankKey {
    pub fn new(degree: u64, gid: Gid) -> Self {
        Self { degree, gid }
    }

    pub fn of<V: PartitionView + ?Sized>(view: &V, degrees: &[u64], v: Vertex) -> Self {
        Self::new(degrees[v.index()], view.to_global_id(v))
    }
}

/// `true` if `u` is kept by `v`.
#[inline]
pub fn keeps(v: RankKey, u: RankKey) -> bool {
    u < v
}

/// Neighbours of inner vertex `v` that `v` keeps, in adjacency order.
pub fn kept_neighbors<V: PartitionView + ?Sized>(view: &V, degrees: &[u64], v: Vertex) -> Vec<Vertex> {
    let kv = RankKey::of(view, degrees, v);
    view.outgoing_neighbors(v)
        .iter()
        .copied()
        .filter(|&u| keeps(kv, RankKey::of(view, degrees, u)))
        .collect()
}

/// Check that every oriented list only points strictly downward.
pub fn validate_orientation<V: PartitionView + ?Sized>(
    view: &V,
    degrees: &[u64],
    oriented: &[Vec<Vertex>],
) -> Result<(), TriangleError> {
    for v in view.vertices() {
        let kv = RankKey::of(view, degrees, v);
        let list = oriented.get(v.index()).map_or(&[][..], Vec::as_slice);
        if let Some(&u) = list.iter().find(|&&u| !keeps(kv, RankKey::of(view, degrees, u))) {
            return Err(TriangleError::InvariantViolation(format!(
                "vertex {} keeps {} which does not sort below it",
                view.to_global_id(v),
                view.to_global_id(u)
            )));
        }
    }
    Ok(())
}
