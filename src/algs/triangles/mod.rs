//! Distributed triangle counting in four bulk-synchronous supersteps.
//!
//! 1. [`Stage::Degrees`]: owners publish degrees to ghost copies.
//! 2. [`Stage::Orient`]: every edge is oriented by `(degree, gid)` and each
//!    vertex publishes the neighbours it kept.
//! 3. [`Stage::Intersect`]: kept lists are intersected; counts gathered on
//!    ghosts are returned to their owners.
//! 4. [`Stage::Reconcile`]: returned counts are folded into the owners.
//!
//! With [`CountPolicy::CrossGroup`] only triangles whose three vertices fall
//! into pairwise distinct groups are counted.

pub mod config;
pub mod context;
pub mod controller;
pub mod driver;
pub mod group;
pub mod intersect;
pub mod orientation;
pub mod stage;

pub use config::TriangleConfig;
pub use context::{TriangleContext, TriangleCounts};
pub use controller::{Step, superstep};
pub use driver::{run_local, run_worker};
pub use group::GroupCount;
pub use intersect::CountPolicy;
pub use stage::Stage;
