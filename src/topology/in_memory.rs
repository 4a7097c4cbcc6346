//! In-memory [`PartitionView`] for one worker of an edge-cut partitioning.
//!
//! Inner vertices keep their full adjacency; outer vertices are bare ghosts
//! (id, owner) with no adjacency of their own. Usually built for every worker
//! at once by [`distribute_graph`](crate::algs::distribute::distribute_graph).

use std::collections::BTreeSet;

use hashbrown::HashMap;
use itertools::Itertools;

use crate::debug_invariants::DebugInvariants;
use crate::overlap::overlap::Overlap;
use crate::topology::fragment::PartitionView;
use crate::topology::vertex::{Gid, Vertex, VertexRange};
use crate::tri_error::TriangleError;

#[derive(Clone, Debug)]
pub struct InMemoryFragment {
    fid: usize,
    fnum: usize,
    inner_len: u32,
    /// Global id per handle, inner first then outer.
    gids: Vec<Gid>,
    index: HashMap<Gid, Vertex>,
    /// CSR over inner vertices.
    adj_offsets: Vec<usize>,
    adj: Vec<Vertex>,
    overlap: Overlap,
}

impl InMemoryFragment {
    /// Build fragment `fid` of `fnum` from the vertices it owns and their full
    /// neighbour lists. `owner` must map every referenced id to its worker.
    pub fn build<F>(
        fid: usize,
        fnum: usize,
        inner: &[(Gid, Vec<Gid>)],
        owner: F,
    ) -> Result<Self, TriangleError>
    where
        F: Fn(Gid) -> usize,
    {
        let too_many = || TriangleError::InvalidConfig(format!("fragment {fid} exceeds u32 handles"));

        let mut index = HashMap::with_capacity(inner.len());
        let mut gids = Vec::with_capacity(inner.len());
        for (gid, _) in inner {
            let h = Vertex::new(u32::try_from(gids.len()).map_err(|_| too_many())?);
            if index.insert(*gid, h).is_some() {
                return Err(TriangleError::InvariantViolation(format!(
                    "vertex {gid} listed twice on fragment {fid}"
                )));
            }
            gids.push(*gid);
        }
        let inner_len = gids.len() as u32;

        let outer: BTreeSet<Gid> = inner
            .iter()
            .flat_map(|(_, nbrs)| nbrs.iter().copied())
            .filter(|g| !index.contains_key(g))
            .collect();
        let mut owners = Vec::with_capacity(outer.len());
        for gid in outer {
            let o = owner(gid);
            if o >= fnum {
                return Err(TriangleError::InvalidOwner { gid, owner: o, fnum });
            }
            if o == fid {
                return Err(TriangleError::InvariantViolation(format!(
                    "vertex {gid} is owned by fragment {fid} but missing from its inner set"
                )));
            }
            let h = Vertex::new(u32::try_from(gids.len()).map_err(|_| too_many())?);
            index.insert(gid, h);
            gids.push(gid);
            owners.push(o);
        }

        let mut adj_offsets = Vec::with_capacity(inner.len() + 1);
        adj_offsets.push(0);
        let mut adj = Vec::new();
        let mut mirrors = Vec::with_capacity(inner.len());
        for (gid, nbrs) in inner {
            for n in nbrs {
                if n == gid {
                    return Err(TriangleError::SelfLoop(*gid));
                }
                adj.push(index[n]);
            }
            adj_offsets.push(adj.len());
            let ranks: Vec<usize> = nbrs
                .iter()
                .map(|&n| owner(n))
                .filter(|&o| o != fid)
                .sorted_unstable()
                .dedup()
                .collect();
            mirrors.push(ranks);
        }

        let frag = Self {
            fid,
            fnum,
            inner_len,
            gids,
            index,
            adj_offsets,
            adj,
            overlap: Overlap::new(mirrors, owners),
        };
        frag.check_invariants()?;
        Ok(frag)
    }

    pub fn overlap(&self) -> &Overlap {
        &self.overlap
    }

    pub fn inner_count(&self) -> usize {
        self.inner_len as usize
    }

    pub fn outer_count(&self) -> usize {
        self.gids.len() - self.inner_count()
    }

    fn outer_slot(&self, v: Vertex) -> Option<usize> {
        self.is_outer(v).then(|| v.index() - self.inner_count())
    }
}

impl PartitionView for InMemoryFragment {
    fn fid(&self) -> usize {
        self.fid
    }

    fn fnum(&self) -> usize {
        self.fnum
    }

    fn vertices(&self) -> VertexRange {
        VertexRange::new(0, self.gids.len() as u32)
    }

    fn inner_vertices(&self) -> VertexRange {
        VertexRange::new(0, self.inner_len)
    }

    fn outer_vertices(&self) -> VertexRange {
        VertexRange::new(self.inner_len, self.gids.len() as u32)
    }

    fn outgoing_neighbors(&self, v: Vertex) -> &[Vertex] {
        if !self.is_inner(v) {
            return &[];
        }
        let i = v.index();
        &self.adj[self.adj_offsets[i]..self.adj_offsets[i + 1]]
    }

    fn to_global_id(&self, v: Vertex) -> Gid {
        self.gids[v.index()]
    }

    fn resolve_local_handle(&self, gid: Gid) -> Option<Vertex> {
        self.index.get(&gid).copied()
    }

    fn mirror_workers(&self, v: Vertex) -> &[usize] {
        if !self.is_inner(v) {
            return &[];
        }
        self.overlap.mirrors_of(v.index())
    }

    fn owner_of(&self, v: Vertex) -> usize {
        self.outer_slot(v)
            .and_then(|j| self.overlap.owner_of(j))
            .unwrap_or(self.fid)
    }
}

impl DebugInvariants for InMemoryFragment {
    fn validate_invariants(&self) -> Result<(), TriangleError> {
        let bad = |msg: String| Err(TriangleError::InvariantViolation(msg));
        let total = self.gids.len();
        if self.index.len() != total {
            return bad(format!("index holds {} ids for {total} handles", self.index.len()));
        }
        for v in self.vertices().iter() {
            if self.index.get(&self.gids[v.index()]) != Some(&v) {
                return bad(format!("handle {v:?} does not round-trip through its gid"));
            }
        }
        if self.adj_offsets.len() != self.inner_count() + 1
            || self.adj_offsets.windows(2).any(|w| w[0] > w[1])
            || self.adj_offsets.last() != Some(&self.adj.len())
        {
            return bad("adjacency offsets are not a valid CSR".into());
        }
        for v in self.inner_vertices().iter() {
            if self.outgoing_neighbors(v).iter().any(|&u| u == v || u.index() >= total) {
                return bad(format!("vertex {v:?} has a self-loop or dangling neighbour"));
            }
        }
        if self.overlap.inner_len() != self.inner_count()
            || self.overlap.outer_len() != self.outer_count()
        {
            return bad("overlap shape does not match the handle layout".into());
        }
        if self
            .overlap
            .neighbor_ranks()
            .any(|r| r == self.fid || r >= self.fnum)
        {
            return bad(format!("fragment {} lists itself or an unknown rank as a peer", self.fid));
        }
        Ok(())
    }
}
