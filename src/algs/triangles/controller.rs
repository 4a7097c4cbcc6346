//! One superstep of the triangle protocol.
//!
//! [`superstep`] takes the current [`Stage`], the messages delivered at the
//! last barrier and the worker state, and returns the next stage together with
//! the messages to send before the next barrier.

use itertools::Itertools;

use crate::algs::message::{Envelope, Outbox, Payload};
use crate::algs::scheduler::Scheduler;
use crate::algs::triangles::context::TriangleContext;
use crate::algs::triangles::intersect::intersect_all;
use crate::algs::triangles::orientation::{RankKey, keeps, kept_neighbors};
use crate::algs::triangles::stage::Stage;
use crate::debug_invariants::DebugInvariants;
use crate::overlap::delta::{AddDelta, CopyDelta, Delta};
use crate::topology::fragment::PartitionView;
use crate::topology::vertex::{Gid, Vertex};
use crate::tri_error::TriangleError;

/// Result of one superstep.
#[derive(Debug)]
pub struct Step {
    pub next: Stage,
    pub outbox: Outbox,
    /// Whether this worker asks for another round.
    pub more: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Side {
    Inner,
    Outer,
}

/// Resolve a message target and check it reached the expected copy.
fn locate<V: PartitionView + ?Sized>(view: &V, gid: Gid, want: Side) -> Result<Vertex, TriangleError> {
    let v = view
        .resolve_local_handle(gid)
        .ok_or(TriangleError::UnknownVertex(gid))?;
    match want {
        Side::Inner if view.is_inner(v) => Ok(v),
        Side::Outer if view.is_outer(v) => Ok(v),
        Side::Inner => Err(TriangleError::MisaddressedMessage { gid, expected: "inner" }),
        Side::Outer => Err(TriangleError::MisaddressedMessage { gid, expected: "outer" }),
    }
}

fn unexpected(stage: Stage, payload: &Payload) -> TriangleError {
    TriangleError::UnexpectedPayload {
        stage,
        kind: payload.kind(),
    }
}

fn gather(fnum: usize, parts: impl IntoIterator<Item = Outbox>) -> Outbox {
    parts.into_iter().fold(Outbox::new(fnum), |mut acc, part| {
        acc.absorb(part);
        acc
    })
}

/// Run `stage` on this worker.
///
/// # Errors
/// Any message of the wrong kind for `stage`, addressed to an unknown vertex
/// or to the wrong copy of a vertex, is fatal. So is a received kept list
/// naming a vertex that does not sort below its target.
pub fn superstep<V, S>(
    stage: Stage,
    view: &V,
    sched: &S,
    ctx: &mut TriangleContext,
    inbox: Vec<Envelope>,
) -> Result<Step, TriangleError>
where
    V: PartitionView + ?Sized,
    S: Scheduler + ?Sized,
{
    let fid = view.fid();
    log::debug!("[rank {fid}] {stage}: {} incoming", inbox.len());
    let step = match stage {
        Stage::Degrees => publish_degrees(view, sched, ctx, inbox)?,
        Stage::Orient => orient(view, sched, ctx, inbox)?,
        Stage::Intersect => intersect(view, sched, ctx, inbox)?,
        Stage::Reconcile => reconcile(view, ctx, inbox)?,
        Stage::Drain => {
            if !inbox.is_empty() {
                log::warn!(
                    "[rank {fid}] discarding {} messages received after the last stage",
                    inbox.len()
                );
            }
            Step {
                next: Stage::Drain,
                outbox: Outbox::new(view.fnum()),
                more: false,
            }
        }
    };
    log::debug!(
        "[rank {fid}] {stage} -> {}: {} outgoing",
        step.next,
        step.outbox.len()
    );
    Ok(step)
}

fn publish_degrees<V, S>(
    view: &V,
    sched: &S,
    ctx: &mut TriangleContext,
    inbox: Vec<Envelope>,
) -> Result<Step, TriangleError>
where
    V: PartitionView + ?Sized,
    S: Scheduler + ?Sized,
{
    if let Some(env) = inbox.first() {
        return Err(unexpected(Stage::Degrees, &env.payload));
    }
    // outer entries hold the local reference count until the owner's value arrives
    ctx.degrees.iter_mut().for_each(|d| *d = 0);
    for v in view.inner_vertices() {
        let nbrs = view.outgoing_neighbors(v);
        ctx.degrees[v.index()] = nbrs.len() as u64;
        for &u in nbrs {
            if view.is_outer(u) {
                ctx.degrees[u.index()] += 1;
            }
        }
    }
    let degrees = &ctx.degrees;
    let parts = sched.for_each(
        view.inner_vertices(),
        |_tid| Outbox::new(view.fnum()),
        |_tid, out: &mut Outbox, v| {
            let part = <CopyDelta as Delta<u64>>::restrict(&degrees[v.index()]);
            let msg = Envelope::new(view.to_global_id(v), Payload::Degree(part));
            for &peer in view.mirror_workers(v) {
                out.push(peer, msg.clone());
            }
        },
    );
    Ok(Step {
        next: Stage::Orient,
        outbox: gather(view.fnum(), parts),
        more: true,
    })
}

fn orient<V, S>(
    view: &V,
    sched: &S,
    ctx: &mut TriangleContext,
    inbox: Vec<Envelope>,
) -> Result<Step, TriangleError>
where
    V: PartitionView + ?Sized,
    S: Scheduler + ?Sized,
{
    for env in inbox {
        match env.payload {
            Payload::Degree(d) => {
                let u = locate(view, env.target, Side::Outer)?;
                <CopyDelta as Delta<u64>>::fuse(&mut ctx.degrees[u.index()], d);
            }
            other => return Err(unexpected(Stage::Orient, &other)),
        }
    }

    let degrees = &ctx.degrees;
    let parts = sched.for_each(
        view.inner_vertices(),
        |_tid| (Outbox::new(view.fnum()), Vec::new()),
        |_tid, scratch: &mut (Outbox, Vec<(Vertex, Vec<Vertex>)>), v| {
            let kept = kept_neighbors(view, degrees, v);
            let mirrors = view.mirror_workers(v);
            if !kept.is_empty() && !mirrors.is_empty() {
                let ids = kept.iter().map(|&u| view.to_global_id(u)).collect_vec();
                let target = view.to_global_id(v);
                for &peer in mirrors {
                    scratch
                        .0
                        .push(peer, Envelope::new(target, Payload::Neighbors(ids.clone())));
                }
            }
            scratch.1.push((v, kept));
        },
    );

    let mut outbox = Outbox::new(view.fnum());
    for (out, kept) in parts {
        outbox.absorb(out);
        for (v, list) in kept {
            ctx.oriented[v.index()] = list;
        }
    }
    Ok(Step {
        next: Stage::Intersect,
        outbox,
        more: true,
    })
}

fn intersect<V, S>(
    view: &V,
    sched: &S,
    ctx: &mut TriangleContext,
    inbox: Vec<Envelope>,
) -> Result<Step, TriangleError>
where
    V: PartitionView + ?Sized,
    S: Scheduler + ?Sized,
{
    let mut skipped = 0usize;
    for env in inbox {
        match env.payload {
            Payload::Neighbors(ids) => {
                let u = locate(view, env.target, Side::Outer)?;
                let ku = RankKey::of(view, &ctx.degrees, u);
                let sent = ids.len();
                let mut resolved = Vec::with_capacity(sent);
                for w in ids.into_iter().filter_map(|g| view.resolve_local_handle(g)) {
                    if !keeps(ku, RankKey::of(view, &ctx.degrees, w)) {
                        return Err(TriangleError::UnorderedNeighbor {
                            target: env.target,
                            neighbor: view.to_global_id(w),
                        });
                    }
                    resolved.push(w);
                }
                skipped += sent - resolved.len();
                ctx.oriented[u.index()].extend(resolved);
            }
            other => return Err(unexpected(Stage::Intersect, &other)),
        }
    }
    if skipped > 0 {
        log::debug!("[rank {}] {skipped} kept ids not visible locally", view.fid());
    }
    ctx.check_invariants()?;

    let found = intersect_all(view, sched, &ctx.oriented, &ctx.counts, ctx.policy());
    log::debug!("[rank {}] {found} triangles discovered", view.fid());

    let mut outbox = Outbox::new(view.fnum());
    for u in view.outer_vertices() {
        let c = ctx.count(u);
        if c > 0 {
            let part = <AddDelta as Delta<u64>>::restrict(&c);
            outbox.push(
                view.owner_of(u),
                Envelope::new(view.to_global_id(u), Payload::Count(part)),
            );
        }
    }
    Ok(Step {
        next: Stage::Reconcile,
        outbox,
        more: true,
    })
}

fn reconcile<V>(view: &V, ctx: &mut TriangleContext, inbox: Vec<Envelope>) -> Result<Step, TriangleError>
where
    V: PartitionView + ?Sized,
{
    for env in inbox {
        match env.payload {
            Payload::Count(c) => {
                let v = locate(view, env.target, Side::Inner)?;
                AddDelta::fuse_atomic(&ctx.counts[v.index()], c);
            }
            other => return Err(unexpected(Stage::Reconcile, &other)),
        }
    }
    Ok(Step {
        next: Stage::Drain,
        outbox: Outbox::new(view.fnum()),
        more: false,
    })
}
