//! Thin façade over bulk-synchronous message delivery between workers.
//!
//! Messages are *encoded byte batches* (see [`wire`](crate::algs::wire)).
//! `send` only queues; nothing is visible to the peer until both sides have
//! passed the next [`Communicator::exchange`], which doubles as the superstep
//! barrier and as the "another round?" vote.

use std::sync::{Arc, Barrier};

use bytes::Bytes;
use dashmap::DashMap;
use parking_lot::Mutex;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommError {
    #[error("peer rank {peer} out of range for a world of {size}")]
    InvalidPeer { peer: usize, size: usize },
    #[error("a world needs at least one rank")]
    EmptyWorld,
}

/// What a rank asks for at the end of a superstep.
///
/// Ordered so the verdict of a round is the maximum vote: one `Continue`
/// keeps everybody going, one `Abort` tears everybody down.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Vote {
    Halt,
    Continue,
    Abort,
}

/// Everything delivered to one rank at a barrier.
#[derive(Debug)]
pub struct Round {
    /// `(source rank, encoded batch)` in no particular order.
    pub batches: Vec<(usize, Bytes)>,
    pub verdict: Vote,
}

/// Bulk-synchronous communication interface (minimal by design).
pub trait Communicator: Send + Sync {
    fn rank(&self) -> usize;
    fn size(&self) -> usize;

    /// Queue `buf` for `peer`; delivered at the next `exchange`.
    fn send(&self, peer: usize, buf: Bytes) -> Result<(), CommError>;

    /// Superstep barrier. Posts this rank's vote, waits for every rank, and
    /// returns the batches addressed to this rank plus the combined verdict.
    fn exchange(&self, vote: Vote) -> Result<Round, CommError>;
}

/// Single-rank world; sends to rank 0 loop back to itself.
#[derive(Debug, Default)]
pub struct NoComm {
    pending: Mutex<Vec<(usize, Bytes)>>,
}

impl NoComm {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Communicator for NoComm {
    fn rank(&self) -> usize {
        0
    }

    fn size(&self) -> usize {
        1
    }

    fn send(&self, peer: usize, buf: Bytes) -> Result<(), CommError> {
        if peer != 0 {
            return Err(CommError::InvalidPeer { peer, size: 1 });
        }
        self.pending.lock().push((0, buf));
        Ok(())
    }

    fn exchange(&self, vote: Vote) -> Result<Round, CommError> {
        Ok(Round {
            batches: std::mem::take(&mut *self.pending.lock()),
            verdict: vote,
        })
    }
}

// --- LocalComm: one process, one thread per rank ---

struct Hub {
    size: usize,
    barrier: Barrier,
    /// Pending batches keyed by destination rank.
    mailbox: DashMap<usize, Vec<(usize, Bytes)>>,
    votes: Mutex<Vec<Vote>>,
}

/// In-process multi-rank communicator. Every rank must run on its own thread
/// and call `exchange` the same number of times.
#[derive(Clone)]
pub struct LocalComm {
    rank: usize,
    hub: Arc<Hub>,
}

impl std::fmt::Debug for LocalComm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalComm")
            .field("rank", &self.rank)
            .field("size", &self.hub.size)
            .finish()
    }
}

impl LocalComm {
    /// One communicator per rank of a fresh world of `size` ranks.
    pub fn world(size: usize) -> Result<Vec<LocalComm>, CommError> {
        if size == 0 {
            return Err(CommError::EmptyWorld);
        }
        let hub = Arc::new(Hub {
            size,
            barrier: Barrier::new(size),
            mailbox: DashMap::new(),
            votes: Mutex::new(vec![Vote::Halt; size]),
        });
        Ok((0..size)
            .map(|rank| LocalComm {
                rank,
                hub: Arc::clone(&hub),
            })
            .collect())
    }
}

impl Communicator for LocalComm {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.hub.size
    }

    fn send(&self, peer: usize, buf: Bytes) -> Result<(), CommError> {
        if peer >= self.hub.size {
            return Err(CommError::InvalidPeer {
                peer,
                size: self.hub.size,
            });
        }
        self.hub
            .mailbox
            .entry(peer)
            .or_default()
            .push((self.rank, buf));
        Ok(())
    }

    fn exchange(&self, vote: Vote) -> Result<Round, CommError> {
        self.hub.votes.lock()[self.rank] = vote;
        // phase 1: every send and vote of this round is posted
        self.hub.barrier.wait();
        let verdict = self
            .hub
            .votes
            .lock()
            .iter()
            .copied()
            .max()
            .unwrap_or(Vote::Halt);
        let batches = self
            .hub
            .mailbox
            .remove(&self.rank)
            .map(|(_, v)| v)
            .unwrap_or_default();
        // phase 2: every rank has drained, next round's sends may start
        self.hub.barrier.wait();
        Ok(Round { batches, verdict })
    }
}
