//! The worker-local view of a partitioned graph.
//!
//! Each worker (fragment) owns a set of *inner* vertices and holds read-only
//! *outer* copies of remote vertices that its inner vertices reference. Handles
//! are laid out contiguously: inner vertices first, outer vertices after them.
//!
//! All methods are read-only and must be safe to call concurrently; the
//! triangle engine fans them out over a thread pool.

use crate::topology::vertex::{Gid, Vertex, VertexRange};

pub trait PartitionView: Sync {
    /// Index of this worker, `0..fnum()`.
    fn fid(&self) -> usize;

    /// Total number of workers the graph is split across.
    fn fnum(&self) -> usize;

    /// Every local handle, inner and outer.
    fn vertices(&self) -> VertexRange;

    /// Handles of vertices owned by this worker.
    fn inner_vertices(&self) -> VertexRange;

    /// Handles of ghost copies of remote vertices.
    fn outer_vertices(&self) -> VertexRange;

    /// Out-adjacency of `v`. Empty for outer vertices.
    fn outgoing_neighbors(&self, v: Vertex) -> &[Vertex];

    /// Global id of any local handle.
    fn to_global_id(&self, v: Vertex) -> Gid;

    /// The local handle for `gid`, if this worker knows the vertex at all.
    fn resolve_local_handle(&self, gid: Gid) -> Option<Vertex>;

    /// Workers holding an outer copy of inner vertex `v`.
    ///
    /// These are the destinations of a message sent "along the outgoing edges
    /// of `v`". Empty for outer vertices.
    fn mirror_workers(&self, v: Vertex) -> &[usize];

    /// Owning worker of `v` (this worker for inner vertices).
    fn owner_of(&self, v: Vertex) -> usize;

    fn local_out_degree(&self, v: Vertex) -> usize {
        self.outgoing_neighbors(v).len()
    }

    fn is_inner(&self, v: Vertex) -> bool {
        self.inner_vertices().contains(v)
    }

    fn is_outer(&self, v: Vertex) -> bool {
        self.outer_vertices().contains(v)
    }
}
