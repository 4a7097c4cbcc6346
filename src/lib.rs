#![cfg_attr(docsrs, feature(doc_cfg))]
//! # tricount
//!
//! tricount counts triangles in a graph that is partitioned across several
//! workers, in four bulk-synchronous supersteps. Each worker sees only the
//! vertices it owns plus ghost copies of their remote neighbours; degrees,
//! oriented neighbour lists and partial counts travel between workers as
//! encoded message batches at superstep barriers.
//!
//! ## Features
//! - Degree-ordered edge orientation, so each triangle is found exactly once
//! - Plain counting (every vertex gets the number of triangles it is in) and a
//!   cross-group variant (only triangles spanning three distinct id groups)
//! - Pluggable collaborators: any [`PartitionView`], any
//!   [`Communicator`](algs::communicator::Communicator), serial or rayon
//!   [`Scheduler`](algs::scheduler::Scheduler)
//! - An in-process cluster runner, [`run_local`](algs::triangles::run_local)
//!
//! ## Usage
//!
//! ```rust
//! use tricount::prelude::*;
//!
//! let graph = UndirectedGraph::from_edges([(0, 1), (1, 2), (0, 2), (2, 3)])?;
//! let config = TriangleConfig { workers: 2, ..Default::default() };
//! let counts = run_local(&graph, &config)?;
//! assert_eq!(counts[&Gid::new(2)], 1);
//! assert_eq!(counts[&Gid::new(3)], 0);
//! # Ok::<(), TriangleError>(())
//! ```
//!
//! ## Invariant checks
//!
//! Fragments and per-worker state implement [`DebugInvariants`]. Checks run in
//! debug builds, or in release builds with the `check-invariants` feature.

pub mod algs;
pub mod debug_invariants;
pub mod overlap;
pub mod topology;
pub mod tri_error;

pub use debug_invariants::DebugInvariants;
pub use topology::PartitionView;
pub use tri_error::TriangleError;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::algs::communicator::{CommError, Communicator, LocalComm, NoComm, Vote};
    pub use crate::algs::distribute::{PartitionStrategy, distribute_graph, distribute_with};
    pub use crate::algs::message::{Envelope, Payload};
    #[cfg(feature = "rayon")]
    pub use crate::algs::scheduler::RayonScheduler;
    pub use crate::algs::scheduler::{Scheduler, SerialScheduler, WorkerPool};
    pub use crate::algs::triangles::{
        CountPolicy, GroupCount, Stage, TriangleConfig, TriangleContext, TriangleCounts,
        run_local, run_worker,
    };
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::overlap::overlap::Overlap;
    pub use crate::topology::fragment::PartitionView;
    pub use crate::topology::graph::UndirectedGraph;
    pub use crate::topology::in_memory::InMemoryFragment;
    pub use crate::topology::vertex::{Gid, Vertex, VertexRange};
    pub use crate::tri_error::TriangleError;
}
