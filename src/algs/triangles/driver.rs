//! Drive the protocol to completion.
//!
//! [`run_worker`] is the per-worker loop: run a stage, send its batches, meet
//! the other workers at the barrier, repeat until every worker halts.
//! [`run_local`] runs a whole cluster in-process, one thread per worker.

use std::collections::BTreeMap;
use std::mem;

use bytes::Bytes;
use itertools::Itertools;

use crate::algs::communicator::{Communicator, LocalComm, Vote};
use crate::algs::distribute::distribute_with;
use crate::algs::message::Envelope;
use crate::algs::scheduler::{Scheduler, WorkerPool};
use crate::algs::triangles::config::TriangleConfig;
use crate::algs::triangles::context::{TriangleContext, TriangleCounts};
use crate::algs::triangles::controller::superstep;
use crate::algs::triangles::intersect::CountPolicy;
use crate::algs::triangles::stage::Stage;
use crate::algs::wire::{decode_batch, encode_batch};
use crate::topology::fragment::PartitionView;
use crate::topology::graph::UndirectedGraph;
use crate::topology::vertex::Gid;
use crate::tri_error::TriangleError;

/// Run one stage and hand its batches to the communicator.
fn run_stage<V, C, S>(
    stage: Stage,
    view: &V,
    comm: &C,
    sched: &S,
    ctx: &mut TriangleContext,
    inbox: Vec<Envelope>,
) -> Result<(Stage, bool), TriangleError>
where
    V: PartitionView + ?Sized,
    C: Communicator + ?Sized,
    S: Scheduler + ?Sized,
{
    let step = superstep(stage, view, sched, ctx, inbox)?;
    for (peer, envs) in step.outbox.into_batches() {
        comm.send(peer, encode_batch(&envs)?)?;
    }
    Ok((step.next, step.more))
}

fn decode_round(batches: Vec<(usize, Bytes)>) -> Result<Vec<Envelope>, TriangleError> {
    let mut inbox = Vec::new();
    for (_src, buf) in batches {
        inbox.extend(decode_batch(&buf)?);
    }
    Ok(inbox)
}

/// Count triangles on one worker of a distributed run.
///
/// Every worker of the world must call this with its own view; the call
/// returns once all of them have halted. A local failure is voted as an abort
/// so the other workers stop at the same barrier instead of waiting forever.
///
/// # Errors
/// The local failure if there was one, `Aborted` if another worker failed,
/// or a communicator error if the barrier itself broke.
pub fn run_worker<V, C, S>(
    view: &V,
    comm: &C,
    sched: &S,
    policy: CountPolicy,
) -> Result<TriangleCounts, TriangleError>
where
    V: PartitionView + ?Sized,
    C: Communicator + ?Sized,
    S: Scheduler + ?Sized,
{
    let rank = comm.rank();
    let mut failure = (view.fid() != rank || view.fnum() != comm.size()).then(|| {
        TriangleError::InvalidConfig(format!(
            "fragment {}/{} paired with communicator rank {}/{}",
            view.fid(),
            view.fnum(),
            rank,
            comm.size()
        ))
    });

    let mut ctx = TriangleContext::new(view, policy);
    let mut stage = Stage::Degrees;
    let mut inbox = Vec::new();
    let mut rounds = 0usize;
    loop {
        let vote = if failure.is_some() {
            Vote::Abort
        } else {
            match run_stage(stage, view, comm, sched, &mut ctx, mem::take(&mut inbox)) {
                Ok((next, more)) => {
                    stage = next;
                    if more { Vote::Continue } else { Vote::Halt }
                }
                Err(e) => {
                    log::error!("[rank {rank}] {stage} failed: {e}");
                    failure = Some(e);
                    Vote::Abort
                }
            }
        };
        let round = comm.exchange(vote)?;
        rounds += 1;
        if round.verdict == Vote::Abort {
            return Err(failure.unwrap_or(TriangleError::Aborted { rank }));
        }
        match decode_round(round.batches) {
            Ok(envs) => inbox = envs,
            Err(e) if round.verdict == Vote::Halt => return Err(e),
            Err(e) => {
                log::error!("[rank {rank}] undecodable batch: {e}");
                failure = Some(e);
            }
        }
        if round.verdict == Vote::Halt {
            break;
        }
    }
    if !inbox.is_empty() {
        // trailing round after everybody halted
        superstep(Stage::Drain, view, sched, &mut ctx, inbox)?;
    }

    let counts = ctx.inner_counts();
    log::info!(
        "[rank {rank}] done after {rounds} rounds: {} vertices, {} credited triangles",
        counts.len(),
        counts.iter().map(|&(_, c)| c).sum::<u64>()
    );
    Ok(counts)
}

/// Count triangles of `graph` on an in-process cluster described by `config`.
///
/// Returns the count of every vertex of the graph. With several failing
/// workers the reported error is a root cause, never an `Aborted` echo.
pub fn run_local(
    graph: &UndirectedGraph,
    config: &TriangleConfig,
) -> Result<BTreeMap<Gid, u64>, TriangleError> {
    config.validate()?;
    let policy = config.policy()?;
    let frags = distribute_with(graph, config.workers, config.partition)?;
    // pools are built before any worker enters the protocol
    let pools: Vec<WorkerPool> = (0..config.workers)
        .map(|_| WorkerPool::new(config.threads_per_worker, config.chunk_size))
        .collect::<Result<_, _>>()?;
    let comms = LocalComm::world(config.workers)?;

    let results: Vec<Result<TriangleCounts, TriangleError>> = std::thread::scope(|s| {
        let handles = frags
            .iter()
            .zip(pools.iter())
            .zip(comms)
            .map(|((frag, pool), comm)| s.spawn(move || run_worker(frag, &comm, pool, policy)))
            .collect_vec();
        handles
            .into_iter()
            .map(|h| {
                h.join().unwrap_or_else(|_| {
                    Err(TriangleError::InvariantViolation("worker thread panicked".into()))
                })
            })
            .collect()
    });

    let mut merged = BTreeMap::new();
    let mut echo = None;
    for res in results {
        match res {
            Ok(counts) => merged.extend(counts),
            Err(e @ TriangleError::Aborted { .. }) => {
                echo.get_or_insert(e);
            }
            Err(e) => return Err(e),
        }
    }
    match echo {
        Some(e) => Err(e),
        None => Ok(merged),
    }
}
