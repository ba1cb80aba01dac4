//! Priority task queues and sharded worker pools.
//!
//! The building blocks, leaf-first: a [`PriorityTaskQueue`] is a blocking
//! queue with N FIFO sub-queues (priority 0 served first) and explicit
//! close/drain semantics; a [`WorkerPool`] owns one queue and a fixed set of
//! worker threads that dequeue and execute tasks until shutdown; a
//! [`QueuePool`] composes many independent single-worker pools addressed by
//! shard index, giving per-key serial execution when callers route same-key
//! work to the same shard.
//!
//! # Quick Start
//!
//! ```no_run
//! use strand_pool::{QueuePool, WorkerPool};
//!
//! // a pool of four workers sharing one queue
//! let pool = WorkerPool::new(4)?;
//! pool.execute(|| println!("hello from a worker"))?;
//!
//! // eight shards, each with its own queue and worker
//! let shards = QueuePool::new(8)?;
//! shards.push(3, || println!("runs serially with everything on shard 3"))?;
//! # Ok::<(), strand_pool::Error>(())
//! ```
//!
//! # Guarantees
//!
//! - **Conservation**: every task accepted before shutdown is executed;
//!   shutdown closes the queue, drains it, then joins the workers.
//! - **Strict priority**: a dequeue always returns the head of the
//!   lowest-numbered non-empty sub-queue, FIFO within a level.
//! - **Isolation from task failures**: a panicking task never takes its
//!   worker down; failures are counted and can be observed through the
//!   [`on_task_failure`](ConfigBuilder::on_task_failure) hook.
//! - **Validated indices**: out-of-range priorities and shard indices are
//!   reported as errors at the call site, never mis-indexed.

#![warn(missing_docs, missing_debug_implementations)]

pub mod config;
pub mod error;
pub mod pool;
pub mod queue;
pub mod shard;
pub mod task;

#[cfg(feature = "telemetry")]
pub mod telemetry;

pub use config::{Config, ConfigBuilder};
pub use error::{Error, Result};
pub use pool::{FailureHook, TaskFailure, WorkerPool};
pub use queue::PriorityTaskQueue;
pub use shard::QueuePool;
pub use task::{Task, TaskId};

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_pool_counts_to_one_hundred() {
        let counter = Arc::new(AtomicUsize::new(0));
        {
            let pool = WorkerPool::new(4).unwrap();
            for _ in 0..100 {
                let counter = counter.clone();
                pool.execute(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                })
                .unwrap();
            }
        }
        assert_eq!(counter.load(Ordering::SeqCst), 100);
    }

    #[test]
    fn test_shards_route_independently() {
        let counter = Arc::new(AtomicUsize::new(0));
        {
            let pool = QueuePool::new(2).unwrap();
            for i in 0..10 {
                let counter = counter.clone();
                pool.push(i % 2, move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                })
                .unwrap();
            }
        }
        assert_eq!(counter.load(Ordering::SeqCst), 10);
    }
}
