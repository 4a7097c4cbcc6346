//! TriangleError: unified error type for tricount public APIs.
//!
//! Conditions that are recovered from locally (a neighbour id that does not
//! resolve on this worker, a trailing drained round) never surface here.
//! Everything below aborts the whole distributed run.

use thiserror::Error;

use crate::algs::communicator::CommError;
use crate::algs::message::PayloadKind;
use crate::algs::triangles::stage::Stage;
use crate::algs::wire::WireError;
use crate::topology::vertex::Gid;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TriangleError {
    /// The cross-group variant needs at least one group.
    #[error("group count must be in 1..={max}, got {0}", max = u32::MAX)]
    InvalidGroupCount(i64),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// Input graphs must be simple.
    #[error("self-loop on vertex {0}")]
    SelfLoop(Gid),
    /// The owner function sent a vertex to a worker that does not exist.
    #[error("vertex {gid} assigned to worker {owner}, but only {fnum} workers exist")]
    InvalidOwner { gid: Gid, owner: usize, fnum: usize },
    #[error("malformed message batch: {0}")]
    Wire(#[from] WireError),
    /// Payload kind does not belong to the stage that received it.
    #[error("stage {stage} received an unexpected {kind} payload")]
    UnexpectedPayload { stage: Stage, kind: PayloadKind },
    /// A message was addressed to a vertex this worker does not know.
    #[error("message addressed to unknown vertex {0}")]
    UnknownVertex(Gid),
    /// A message reached the wrong copy of a vertex (inner vs outer).
    #[error("message for vertex {gid} expected an {expected} copy")]
    MisaddressedMessage { gid: Gid, expected: &'static str },
    /// A received kept list names a vertex that does not sort below its target.
    #[error("kept list of vertex {target} names {neighbor}, which does not sort below it")]
    UnorderedNeighbor { target: Gid, neighbor: Gid },
    #[error("communication failure: {0}")]
    Comm(#[from] CommError),
    /// Another worker failed and the run was torn down.
    #[error("run aborted by a failure on another worker (observed on rank {rank})")]
    Aborted { rank: usize },
    #[error("failed to build worker thread pool: {0}")]
    ThreadPool(String),
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
}
