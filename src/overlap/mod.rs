//! Overlap module: which workers share which vertices, and how values sent
//! between the copies of a vertex are merged.

pub mod delta;
pub mod overlap;
