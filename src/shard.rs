//! Sharded composition of single-worker pools.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::pool::WorkerPool;
use crate::task::Task;

#[cfg(feature = "telemetry")]
use crate::telemetry::MetricsSnapshot;

/// A pool of independent single-worker pools addressed by shard index.
///
/// Every shard owns its own queue and its one worker thread, so tasks routed
/// to the same shard execute serially in submission order while different
/// shards run concurrently. There is no load balancing and no work movement
/// between shards; routing same-key work to the same index is how callers get
/// per-key serial execution.
pub struct QueuePool {
    shards: Vec<WorkerPool>,
}

impl QueuePool {
    /// Create a pool with `shards` single-worker shards and one priority level.
    pub fn new(shards: usize) -> Result<Self> {
        Self::with_config(shards, Config::default())
    }

    /// One shard per available CPU core.
    pub fn with_shard_per_core() -> Result<Self> {
        Self::new(num_cpus::get())
    }

    /// Create a pool sharing `config` across shards.
    ///
    /// The worker count in `config` is ignored: a shard always has exactly
    /// one worker, which is what makes per-shard ordering hold.
    pub fn with_config(shards: usize, config: Config) -> Result<Self> {
        if shards == 0 {
            return Err(Error::config("shard count must be > 0"));
        }
        if shards > 1024 {
            return Err(Error::config("shard count too large (max 1024)"));
        }

        let mut pools = Vec::with_capacity(shards);
        for shard in 0..shards {
            let shard_config = Config {
                workers: 1,
                thread_name_prefix: format!("{}-shard{}", config.thread_name_prefix, shard),
                ..config.clone()
            };
            pools.push(WorkerPool::with_config(shard_config)?);
        }

        Ok(Self { shards: pools })
    }

    /// Run a closure on the given shard at the highest priority (level 0).
    pub fn push<F>(&self, shard: usize, f: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        self.push_with_priority(shard, f, 0)
    }

    /// Run a closure on the given shard at the given priority level.
    pub fn push_with_priority<F>(&self, shard: usize, f: F, priority: usize) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        self.submit(shard, Task::new(f), priority)
    }

    /// Enqueue a pre-built task on the given shard.
    ///
    /// Fails with [`Error::InvalidShard`] for an out-of-range index; nothing
    /// is enqueued in that case.
    pub fn submit(&self, shard: usize, task: Task, priority: usize) -> Result<()> {
        let pool = self.shards.get(shard).ok_or(Error::InvalidShard {
            shard,
            shards: self.shards.len(),
        })?;
        pool.submit(task, priority)
    }

    /// Number of shards.
    pub fn size(&self) -> usize {
        self.shards.len()
    }

    /// Discarded task panics summed across shards.
    pub fn failed_tasks(&self) -> usize {
        self.shards.iter().map(WorkerPool::failed_tasks).sum()
    }

    /// Snapshot of one shard's execution metrics.
    #[cfg(feature = "telemetry")]
    pub fn shard_metrics(&self, shard: usize) -> Result<MetricsSnapshot> {
        let pool = self.shards.get(shard).ok_or(Error::InvalidShard {
            shard,
            shards: self.shards.len(),
        })?;
        Ok(pool.metrics())
    }

    /// Shut down every shard: close its queue, drain, join its worker.
    pub fn shutdown(&mut self) {
        for pool in &mut self.shards {
            pool.shutdown();
        }
    }
}

impl std::fmt::Debug for QueuePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueuePool")
            .field("shards", &self.shards.len())
            .finish()
    }
}
