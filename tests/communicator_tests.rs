mod util;

use std::thread;

use bytes::Bytes;
use tricount::algs::communicator::Round;
use tricount::algs::wire::{WireError, encode_batch};
use tricount::prelude::*;
use util::*;

#[test]
fn verdict_is_max_vote_across_ranks() {
    let world = LocalComm::world(3).unwrap();
    let votes = [Vote::Halt, Vote::Continue, Vote::Halt];
    let verdicts: Vec<Vote> = thread::scope(|s| {
        let hs: Vec<_> = world
            .iter()
            .zip(votes)
            .map(|(c, v)| s.spawn(move || c.exchange(v).unwrap().verdict))
            .collect();
        hs.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert_eq!(verdicts, vec![Vote::Continue; 3]);
}

#[test]
fn batches_only_visible_after_barrier() {
    let world = LocalComm::world(2).unwrap();
    let got: Vec<Vec<(usize, Bytes)>> = thread::scope(|s| {
        let hs: Vec<_> = world
            .iter()
            .map(|c| {
                s.spawn(move || {
                    let peer = 1 - c.rank();
                    c.send(peer, Bytes::from(vec![c.rank() as u8; 3])).unwrap();
                    let first = c.exchange(Vote::Continue).unwrap().batches;
                    // nothing was sent in the second round
                    assert!(c.exchange(Vote::Halt).unwrap().batches.is_empty());
                    first
                })
            })
            .collect();
        hs.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert_eq!(got[0], vec![(1, Bytes::from_static(&[1, 1, 1]))]);
    assert_eq!(got[1], vec![(0, Bytes::from_static(&[0, 0, 0]))]);
}

#[test]
fn failing_worker_aborts_its_peers() {
    let g = clique(4);
    let frags = distribute_graph(&g, 2, |v| (v.get() % 2) as usize).unwrap();
    let world = LocalComm::world(2).unwrap();
    // rank 1 is handed the wrong fragment
    let results: Vec<_> = thread::scope(|s| {
        let a = s.spawn(|| run_worker(&frags[0], &world[0], &SerialScheduler, CountPolicy::Plain));
        let b = s.spawn(|| run_worker(&frags[0], &world[1], &SerialScheduler, CountPolicy::Plain));
        vec![a.join().unwrap(), b.join().unwrap()]
    });
    assert_eq!(results[0], Err(TriangleError::Aborted { rank: 0 }));
    assert!(matches!(results[1], Err(TriangleError::InvalidConfig(_))));
}

/// Delivers every batch with its last byte cut off.
struct Truncating(LocalComm);

impl Communicator for Truncating {
    fn rank(&self) -> usize {
        self.0.rank()
    }
    fn size(&self) -> usize {
        self.0.size()
    }
    fn send(&self, peer: usize, buf: Bytes) -> Result<(), CommError> {
        let cut = buf.len().saturating_sub(1);
        self.0.send(peer, buf.slice(..cut))
    }
    fn exchange(&self, vote: Vote) -> Result<Round, CommError> {
        self.0.exchange(vote)
    }
}

#[test]
fn malformed_batch_is_fatal_everywhere() {
    let g = clique(4);
    let frags = distribute_graph(&g, 2, |v| (v.get() >= 2) as usize).unwrap();
    let mut world = LocalComm::world(2).unwrap();
    let bad = Truncating(world.pop().unwrap());
    let good = world.pop().unwrap();
    let (r0, r1) = thread::scope(|s| {
        let a = s.spawn(|| run_worker(&frags[0], &good, &SerialScheduler, CountPolicy::Plain));
        let b = s.spawn(|| run_worker(&frags[1], &bad, &SerialScheduler, CountPolicy::Plain));
        (a.join().unwrap(), b.join().unwrap())
    });
    // rank 0 decodes rank 1's truncated degree batch
    assert!(matches!(
        r0,
        Err(TriangleError::Wire(WireError::Truncated { .. }))
    ));
    assert_eq!(r1, Err(TriangleError::Aborted { rank: 1 }));
}

/// Adds a kept list for `target` to the batches delivered at round `at`.
struct Injecting {
    inner: LocalComm,
    at: usize,
    rounds: std::sync::atomic::AtomicUsize,
    batch: Bytes,
}

impl Communicator for Injecting {
    fn rank(&self) -> usize {
        self.inner.rank()
    }
    fn size(&self) -> usize {
        self.inner.size()
    }
    fn send(&self, peer: usize, buf: Bytes) -> Result<(), CommError> {
        self.inner.send(peer, buf)
    }
    fn exchange(&self, vote: Vote) -> Result<Round, CommError> {
        let mut round = self.inner.exchange(vote)?;
        let n = self.rounds.fetch_add(1, std::sync::atomic::Ordering::Relaxed) + 1;
        if n == self.at {
            round.batches.push((1, self.batch.clone()));
        }
        Ok(round)
    }
}

#[test]
fn unordered_kept_list_aborts_without_hanging() {
    let g = clique(4);
    let frags = distribute_graph(&g, 2, |v| (v.get() >= 2) as usize).unwrap();
    let mut world = LocalComm::world(2).unwrap();
    let good = world.pop().unwrap();
    // ghost 2 cannot keep itself
    let batch = encode_batch(&[Envelope::new(gid(2), Payload::Neighbors(vec![gid(2)]))]).unwrap();
    let bad = Injecting {
        inner: world.pop().unwrap(),
        at: 2,
        rounds: Default::default(),
        batch,
    };
    let (r0, r1) = thread::scope(|s| {
        let a = s.spawn(|| run_worker(&frags[0], &bad, &SerialScheduler, CountPolicy::Plain));
        let b = s.spawn(|| run_worker(&frags[1], &good, &SerialScheduler, CountPolicy::Plain));
        (a.join().unwrap(), b.join().unwrap())
    });
    assert_eq!(
        r0,
        Err(TriangleError::UnorderedNeighbor {
            target: gid(2),
            neighbor: gid(2)
        })
    );
    assert_eq!(r1, Err(TriangleError::Aborted { rank: 1 }));
}
