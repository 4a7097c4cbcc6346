//! Per-worker state carried across supersteps.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::algs::triangles::intersect::CountPolicy;
use crate::debug_invariants::DebugInvariants;
use crate::topology::fragment::PartitionView;
use crate::topology::vertex::{Gid, Vertex};
use crate::tri_error::TriangleError;

/// Degree table, oriented lists and counters, all indexed by local handle.
#[derive(Debug)]
pub struct TriangleContext {
    pub(crate) policy: CountPolicy,
    pub(crate) degrees: Vec<u64>,
    pub(crate) oriented: Vec<Vec<Vertex>>,
    pub(crate) counts: Vec<AtomicU64>,
    /// Gid per handle, captured so invariant checks need no view.
    gids: Vec<Gid>,
    inner_len: usize,
}

impl TriangleContext {
    /// Zeroed state sized for every handle of `view`.
    pub fn new<V: PartitionView + ?Sized>(view: &V, policy: CountPolicy) -> Self {
        let n = view.vertices().len();
        Self {
            policy,
            degrees: vec![0; n],
            oriented: vec![Vec::new(); n],
            counts: (0..n).map(|_| AtomicU64::new(0)).collect(),
            gids: view.vertices().iter().map(|v| view.to_global_id(v)).collect(),
            inner_len: view.inner_vertices().len(),
        }
    }

    pub fn policy(&self) -> CountPolicy {
        self.policy
    }

    pub fn degree(&self, v: Vertex) -> u64 {
        self.degrees[v.index()]
    }

    pub fn oriented(&self, v: Vertex) -> &[Vertex] {
        &self.oriented[v.index()]
    }

    pub fn count(&self, v: Vertex) -> u64 {
        self.counts[v.index()].load(Ordering::Relaxed)
    }

    /// `(gid, count)` for every inner vertex, in handle order.
    pub fn inner_counts(&self) -> TriangleCounts {
        (0..self.inner_len)
            .map(|i| (self.gids[i], self.counts[i].load(Ordering::Relaxed)))
            .collect()
    }
}

/// Final per-vertex counts of one worker.
pub type TriangleCounts = Vec<(Gid, u64)>;

impl DebugInvariants for TriangleContext {
    fn validate_invariants(&self) -> Result<(), TriangleError> {
        let n = self.gids.len();
        if self.degrees.len() != n || self.oriented.len() != n || self.counts.len() != n {
            return Err(TriangleError::InvariantViolation(format!(
                "context tables disagree on the number of handles ({n})"
            )));
        }
        if self.inner_len > n {
            return Err(TriangleError::InvariantViolation(
                "more inner vertices than handles".into(),
            ));
        }
        for (i, list) in self.oriented.iter().enumerate() {
            let key = (self.degrees[i], self.gids[i]);
            for u in list {
                let j = u.index();
                if j >= n || (self.degrees[j], self.gids[j]) >= key {
                    return Err(TriangleError::InvariantViolation(format!(
                        "oriented list of {} is not strictly descending",
                        self.gids[i]
                    )));
                }
            }
        }
        Ok(())
    }
}
