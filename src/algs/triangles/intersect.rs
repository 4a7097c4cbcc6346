//! Triangle detection by set intersection over oriented lists.
//!
//! For an inner vertex `v` the kept list `K(v)` goes into a dense membership
//! set; then for every `u` in `K(v)` each `w` in `K(u)` that is also in the set
//! closes a triangle `w < u < v`. Every triangle is therefore found exactly
//! once, at its highest-ordered vertex.

use std::sync::atomic::AtomicU64;

use serde::{Deserialize, Serialize};

use crate::algs::scheduler::Scheduler;
use crate::algs::triangles::group::GroupCount;
use crate::overlap::delta::AddDelta;
use crate::topology::dense_set::DenseVertexSet;
use crate::topology::fragment::PartitionView;
use crate::topology::vertex::Vertex;

/// What a discovered triangle is credited to.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountPolicy {
    /// Every triangle counts once for each of its three vertices.
    #[default]
    Plain,
    /// Only triangles spanning three distinct groups count, and only for the
    /// vertex that discovers them.
    CrossGroup(GroupCount),
}

#[inline]
fn bump(counts: &[AtomicU64], v: Vertex) {
    AddDelta::fuse_atomic(&counts[v.index()], 1);
}

/// Run detection for inner vertex `v`. `set` must be empty on entry and is
/// left empty. Returns the number of triangles found at `v`.
pub fn count_at<V: PartitionView + ?Sized>(
    view: &V,
    oriented: &[Vec<Vertex>],
    counts: &[AtomicU64],
    policy: CountPolicy,
    set: &mut DenseVertexSet,
    v: Vertex,
) -> u64 {
    let kept = &oriented[v.index()];
    let mut found = 0;
    match policy {
        CountPolicy::Plain => {
            for &u in kept {
                set.insert(u);
            }
            for &u in kept {
                for &w in &oriented[u.index()] {
                    if set.contains(w) {
                        bump(counts, v);
                        bump(counts, u);
                        bump(counts, w);
                        found += 1;
                    }
                }
            }
        }
        CountPolicy::CrossGroup(groups) => {
            let group = |x: Vertex| groups.group_of(view.to_global_id(x));
            let gv = group(v);
            for &u in kept {
                if group(u) != gv {
                    set.insert(u);
                }
            }
            for &u in kept {
                let gu = group(u);
                if gu == gv {
                    continue;
                }
                for &w in &oriented[u.index()] {
                    // membership already excludes v's group
                    if set.contains(w) && group(w) != gu {
                        bump(counts, v);
                        found += 1;
                    }
                }
            }
        }
    }
    set.clear();
    found
}

/// Run detection over every inner vertex. Returns the number of triangles
/// discovered on this worker.
pub fn intersect_all<V, S>(
    view: &V,
    sched: &S,
    oriented: &[Vec<Vertex>],
    counts: &[AtomicU64],
    policy: CountPolicy,
) -> u64
where
    V: PartitionView + ?Sized,
    S: Scheduler + ?Sized,
{
    let handles = view.vertices();
    sched
        .for_each(
            view.inner_vertices(),
            |_tid| (DenseVertexSet::for_range(handles), 0u64),
            |_tid, scratch: &mut (DenseVertexSet, u64), v| {
                scratch.1 += count_at(view, oriented, counts, policy, &mut scratch.0, v);
            },
        )
        .into_iter()
        .map(|(_, found)| found)
        .sum()
}
