//! Graph topology: vertex handles, the input graph, and per-worker views.
//!
//! - [`vertex`]: global ids, local handles and handle ranges
//! - [`graph`]: the undirected input graph
//! - [`fragment`]: the [`PartitionView`](fragment::PartitionView) trait
//! - [`in_memory`]: an in-memory fragment implementing it
//! - [`dense_set`]: reusable membership set over local handles

pub mod dense_set;
pub mod fragment;
pub mod graph;
pub mod in_memory;
pub mod vertex;

pub use fragment::PartitionView;
pub use vertex::{Gid, Vertex, VertexRange};
