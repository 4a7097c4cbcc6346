//! Delta trait: rules for fusing an incoming value into a local one.
//!
//! Degree messages overwrite the ghost's approximation ([`CopyDelta`]); count
//! messages are summed into the owner's counter ([`AddDelta`]).

use std::sync::atomic::{AtomicU64, Ordering};

pub trait Delta<V>: Sized {
    /// What travels on the wire for one value.
    type Part: Send;

    /// Extract the part of `v` that is sent.
    fn restrict(v: &V) -> Self::Part;

    /// Merge an incoming part into the local value.
    fn fuse(local: &mut V, incoming: Self::Part);
}

/// Copy-overwrites-local.
#[derive(Copy, Clone, Debug)]
pub struct CopyDelta;

impl<V: Clone + Send> Delta<V> for CopyDelta {
    type Part = V;
    #[inline]
    fn restrict(v: &V) -> V {
        v.clone()
    }
    #[inline]
    fn fuse(local: &mut V, incoming: V) {
        *local = incoming;
    }
}

/// Additive delta for counters.
#[derive(Copy, Clone, Debug)]
pub struct AddDelta;

impl<V> Delta<V> for AddDelta
where
    V: std::ops::AddAssign + Copy + Send,
{
    type Part = V;
    #[inline]
    fn restrict(v: &V) -> V {
        *v
    }
    #[inline]
    fn fuse(local: &mut V, incoming: V) {
        *local += incoming;
    }
}

impl AddDelta {
    /// Fuse into a counter shared between threads, without a `&mut`.
    #[inline]
    pub fn fuse_atomic(local: &AtomicU64, incoming: u64) {
        local.fetch_add(incoming, Ordering::Relaxed);
    }
}
