//! Distributed algorithms and the plumbing they run on.

pub mod communicator;
pub mod distribute;
pub mod message;
pub mod scheduler;
pub mod triangles;
pub mod wire;

pub use distribute::{distribute_graph, distribute_with};
pub use triangles::{run_local, run_worker};
