//! Worker-local parallel-for over vertex ranges.
//!
//! A scheduler runs `body(tid, &mut scratch, v)` for every handle of a range.
//! Each thread gets its own scratch value, built once by `init(tid)` and
//! reused for every vertex that thread visits; the scratch values are handed
//! back to the caller when the loop ends, which is where per-thread results
//! (outboxes, kept-neighbour lists) are merged.

use crate::topology::vertex::{Vertex, VertexRange};

pub trait Scheduler: Sync {
    /// Number of scratch slots (threads) a `for_each` call will use.
    fn thread_num(&self) -> usize;

    fn for_each<S, I, F>(&self, range: VertexRange, init: I, body: F) -> Vec<S>
    where
        S: Send,
        I: Fn(usize) -> S + Sync,
        F: Fn(usize, &mut S, Vertex) + Sync;
}

/// Runs everything on the calling thread with a single scratch slot.
#[derive(Clone, Copy, Debug, Default)]
pub struct SerialScheduler;

impl Scheduler for SerialScheduler {
    fn thread_num(&self) -> usize {
        1
    }

    fn for_each<S, I, F>(&self, range: VertexRange, init: I, body: F) -> Vec<S>
    where
        S: Send,
        I: Fn(usize) -> S + Sync,
        F: Fn(usize, &mut S, Vertex) + Sync,
    {
        let mut scratch = init(0);
        for v in range.iter() {
            body(0, &mut scratch, v);
        }
        vec![scratch]
    }
}

#[cfg(feature = "rayon")]
pub use self::rayon_backend::RayonScheduler;

/// The scheduler a worker runs with, picked from its thread budget.
#[derive(Debug)]
pub enum WorkerPool {
    Serial(SerialScheduler),
    #[cfg(feature = "rayon")]
    Rayon(RayonScheduler),
}

impl WorkerPool {
    /// Serial for one thread; a rayon pool otherwise when the `rayon`
    /// feature is on.
    pub fn new(threads: usize, chunk_size: usize) -> Result<Self, crate::tri_error::TriangleError> {
        if threads <= 1 {
            return Ok(WorkerPool::Serial(SerialScheduler));
        }
        #[cfg(feature = "rayon")]
        {
            RayonScheduler::new(threads, chunk_size).map(WorkerPool::Rayon)
        }
        #[cfg(not(feature = "rayon"))]
        {
            let _ = chunk_size;
            log::warn!("{threads} threads requested but the rayon feature is off; running serially");
            Ok(WorkerPool::Serial(SerialScheduler))
        }
    }
}

impl Scheduler for WorkerPool {
    fn thread_num(&self) -> usize {
        match self {
            WorkerPool::Serial(s) => s.thread_num(),
            #[cfg(feature = "rayon")]
            WorkerPool::Rayon(r) => r.thread_num(),
        }
    }

    fn for_each<S, I, F>(&self, range: VertexRange, init: I, body: F) -> Vec<S>
    where
        S: Send,
        I: Fn(usize) -> S + Sync,
        F: Fn(usize, &mut S, Vertex) + Sync,
    {
        match self {
            WorkerPool::Serial(s) => s.for_each(range, init, body),
            #[cfg(feature = "rayon")]
            WorkerPool::Rayon(r) => r.for_each(range, init, body),
        }
    }
}

#[cfg(feature = "rayon")]
mod rayon_backend {
    use super::*;
    use crate::tri_error::TriangleError;
    use parking_lot::Mutex;
    use rayon::prelude::*;

    /// Fixed-size rayon pool; the range is cut into chunks that threads pull
    /// from, and each pool thread owns one slot of a preallocated scratch arena.
    pub struct RayonScheduler {
        pool: rayon::ThreadPool,
        chunk_size: usize,
    }

    impl std::fmt::Debug for RayonScheduler {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("RayonScheduler")
                .field("threads", &self.pool.current_num_threads())
                .field("chunk_size", &self.chunk_size)
                .finish()
        }
    }

    impl RayonScheduler {
        pub fn new(threads: usize, chunk_size: usize) -> Result<Self, TriangleError> {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads.max(1))
                .build()
                .map_err(|e| TriangleError::ThreadPool(e.to_string()))?;
            Ok(Self {
                pool,
                chunk_size: chunk_size.max(1),
            })
        }
    }

    impl Scheduler for RayonScheduler {
        fn thread_num(&self) -> usize {
            self.pool.current_num_threads()
        }

        fn for_each<S, I, F>(&self, range: VertexRange, init: I, body: F) -> Vec<S>
        where
            S: Send,
            I: Fn(usize) -> S + Sync,
            F: Fn(usize, &mut S, Vertex) + Sync,
        {
            let arena: Vec<Mutex<S>> = (0..self.thread_num())
                .map(|tid| Mutex::new(init(tid)))
                .collect();
            let chunks: Vec<VertexRange> = range.chunks(self.chunk_size).collect();
            self.pool.install(|| {
                chunks.into_par_iter().for_each(|chunk| {
                    let tid = rayon::current_thread_index().unwrap_or(0) % arena.len();
                    // only thread `tid` ever locks slot `tid`
                    let mut scratch = arena[tid].lock();
                    for v in chunk.iter() {
                        body(tid, &mut *scratch, v);
                    }
                });
            });
            arena.into_iter().map(Mutex::into_inner).collect()
        }
    }
}
