//! Worker pool built on the priority task queue.
//!
//! A [`WorkerPool`] owns one queue and a fixed set of worker threads that
//! dequeue and execute tasks until shutdown closes the queue and joins them.

pub mod failure;
pub mod worker_pool;

pub(crate) mod worker;

pub use failure::{FailureHook, TaskFailure};
pub use worker_pool::WorkerPool;
