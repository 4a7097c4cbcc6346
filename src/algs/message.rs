//! Messages exchanged between supersteps.
//!
//! Every message is addressed to one vertex by global id. The payload is one
//! of three kinds, and each stage of the triangle protocol produces and
//! consumes exactly one kind.

use std::fmt;

use crate::topology::vertex::Gid;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Payload {
    /// Global out-degree of the addressed vertex.
    Degree(u64),
    /// Kept-neighbour ids of the addressed vertex.
    Neighbors(Vec<Gid>),
    /// Partial triangle count to add to the addressed vertex.
    Count(u64),
}

impl Payload {
    pub fn kind(&self) -> PayloadKind {
        match self {
            Payload::Degree(_) => PayloadKind::Degree,
            Payload::Neighbors(_) => PayloadKind::Neighbors,
            Payload::Count(_) => PayloadKind::Count,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum PayloadKind {
    Degree = 1,
    Neighbors = 2,
    Count = 3,
}

impl PayloadKind {
    pub fn tag(self) -> u16 {
        self as u16
    }

    pub fn from_tag(tag: u16) -> Option<Self> {
        match tag {
            1 => Some(PayloadKind::Degree),
            2 => Some(PayloadKind::Neighbors),
            3 => Some(PayloadKind::Count),
            _ => None,
        }
    }
}

impl fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PayloadKind::Degree => "degree",
            PayloadKind::Neighbors => "neighbor-list",
            PayloadKind::Count => "count",
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Envelope {
    pub target: Gid,
    pub payload: Payload,
}

impl Envelope {
    pub fn new(target: Gid, payload: Payload) -> Self {
        Self { target, payload }
    }
}

/// Messages produced by one stage, bucketed by destination rank.
#[derive(Clone, Debug, Default)]
pub struct Outbox {
    per_peer: Vec<Vec<Envelope>>,
}

impl Outbox {
    pub fn new(fnum: usize) -> Self {
        Self {
            per_peer: vec![Vec::new(); fnum],
        }
    }

    pub fn push(&mut self, peer: usize, env: Envelope) {
        if peer >= self.per_peer.len() {
            self.per_peer.resize_with(peer + 1, Vec::new);
        }
        self.per_peer[peer].push(env);
    }

    /// Move every message of `other` into `self`.
    pub fn absorb(&mut self, other: Outbox) {
        for (peer, envs) in other.per_peer.into_iter().enumerate() {
            if envs.is_empty() {
                continue;
            }
            if peer >= self.per_peer.len() {
                self.per_peer.resize_with(peer + 1, Vec::new);
            }
            self.per_peer[peer].extend(envs);
        }
    }

    pub fn len(&self) -> usize {
        self.per_peer.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.per_peer.iter().all(Vec::is_empty)
    }

    /// Non-empty batches as `(peer, envelopes)`.
    pub fn into_batches(self) -> impl Iterator<Item = (usize, Vec<Envelope>)> {
        self.per_peer
            .into_iter()
            .enumerate()
            .filter(|(_, envs)| !envs.is_empty())
    }
}
