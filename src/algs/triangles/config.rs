//! Run parameters for the local cluster runner.

use serde::{Deserialize, Serialize};

use crate::algs::distribute::PartitionStrategy;
use crate::algs::triangles::group::GroupCount;
use crate::algs::triangles::intersect::CountPolicy;
use crate::tri_error::TriangleError;

/// Configuration for [`run_local`](crate::algs::triangles::driver::run_local).
///
/// Missing fields take their defaults when deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriangleConfig {
    /// Number of workers (fragments) the graph is split into.
    pub workers: usize,
    /// Threads used inside each worker.
    pub threads_per_worker: usize,
    /// Vertices handed to a thread at a time.
    pub chunk_size: usize,
    /// `None` counts every triangle; `Some(g)` counts only triangles spanning
    /// three of `g` groups.
    pub group_count: Option<i64>,
    pub partition: PartitionStrategy,
}

impl Default for TriangleConfig {
    fn default() -> Self {
        Self {
            workers: 1,
            threads_per_worker: 1,
            chunk_size: 64,
            group_count: None,
            partition: PartitionStrategy::Hash,
        }
    }
}

impl TriangleConfig {
    pub fn validate(&self) -> Result<(), TriangleError> {
        if self.workers == 0 {
            return Err(TriangleError::InvalidConfig("workers must be at least 1".into()));
        }
        if self.threads_per_worker == 0 {
            return Err(TriangleError::InvalidConfig(
                "threads_per_worker must be at least 1".into(),
            ));
        }
        if self.chunk_size == 0 {
            return Err(TriangleError::InvalidConfig("chunk_size must be at least 1".into()));
        }
        self.policy().map(|_| ())
    }

    /// The counting policy selected by `group_count`.
    pub fn policy(&self) -> Result<CountPolicy, TriangleError> {
        match self.group_count {
            None => Ok(CountPolicy::Plain),
            Some(raw) => GroupCount::new(raw).map(CountPolicy::CrossGroup),
        }
    }
}
