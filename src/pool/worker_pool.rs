//! The pool itself: queue ownership, worker lifecycle, shutdown.

use super::failure::FailureHandler;
use super::worker::{Worker, WorkerId};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::queue::PriorityTaskQueue;
use crate::task::Task;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

#[cfg(feature = "telemetry")]
use crate::telemetry::{Metrics, MetricsSnapshot};

#[cfg(target_os = "linux")]
fn pin_thread_to_core(core_id: usize) {
    unsafe {
        let mut cpuset: libc::cpu_set_t = std::mem::zeroed();
        libc::CPU_SET(core_id, &mut cpuset);
        let result = libc::sched_setaffinity(
            0, // current thread
            std::mem::size_of::<libc::cpu_set_t>(),
            &cpuset,
        );
        if result != 0 {
            tracing::warn!(core = core_id, "failed to pin worker thread");
        }
    }
}

/// A fixed set of worker threads draining one [`PriorityTaskQueue`].
///
/// Workers are spawned at construction and run until the queue is closed and
/// drained. [`shutdown`](Self::shutdown) closes the queue and joins every
/// worker; dropping the pool does the same, so every task accepted before
/// teardown is executed.
pub struct WorkerPool {
    queue: Arc<PriorityTaskQueue>,
    workers: Vec<WorkerHandle>,
    failures: Arc<FailureHandler>,
    #[cfg(feature = "telemetry")]
    metrics: Arc<Metrics>,
}

struct WorkerHandle {
    id: WorkerId,
    thread: Option<JoinHandle<()>>,
}

impl WorkerPool {
    /// Create a pool with `workers` threads and a single priority level.
    pub fn new(workers: usize) -> Result<Self> {
        Self::with_config(Config {
            workers,
            ..Config::default()
        })
    }

    /// Create a pool from a full configuration.
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;

        let queue = Arc::new(PriorityTaskQueue::new(config.priority_levels)?);
        let failures = Arc::new(FailureHandler::new(config.on_task_failure.clone()));
        #[cfg(feature = "telemetry")]
        let metrics = Arc::new(Metrics::new());

        let mut handles: Vec<WorkerHandle> = Vec::with_capacity(config.workers);

        for id in 0..config.workers {
            let worker = Worker::new(id, Arc::clone(&failures));
            #[cfg(feature = "telemetry")]
            let worker = worker.with_metrics(Arc::clone(&metrics));

            let worker_queue = Arc::clone(&queue);
            let name = format!("{}-{}", config.thread_name_prefix, id);
            let pin_workers = config.pin_workers;

            let mut builder = thread::Builder::new().name(name);
            if let Some(stack_size) = config.stack_size {
                builder = builder.stack_size(stack_size);
            }

            let spawned = builder.spawn(move || {
                #[cfg(target_os = "linux")]
                if pin_workers {
                    pin_thread_to_core(id);
                }
                #[cfg(not(target_os = "linux"))]
                let _ = pin_workers;

                worker.run(worker_queue);
            });

            match spawned {
                Ok(handle) => handles.push(WorkerHandle {
                    id,
                    thread: Some(handle),
                }),
                Err(e) => {
                    // never leak the workers that did start: close the queue
                    // so they exit, join them, then report the failure
                    queue.close();
                    for handle in &mut handles {
                        if let Some(thread) = handle.thread.take() {
                            let _ = thread.join();
                        }
                    }
                    return Err(Error::executor(format!("spawn failed: {}", e)));
                }
            }
        }

        tracing::debug!(
            workers = config.workers,
            levels = config.priority_levels,
            "worker pool started"
        );

        Ok(Self {
            queue,
            workers: handles,
            failures,
            #[cfg(feature = "telemetry")]
            metrics,
        })
    }

    /// Run a closure on the pool at the highest priority (level 0).
    pub fn execute<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        self.execute_with_priority(f, 0)
    }

    /// Run a closure on the pool at the given priority level.
    pub fn execute_with_priority<F>(&self, f: F, priority: usize) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        self.submit(Task::new(f), priority)
    }

    /// Enqueue a pre-built task at the given priority level.
    ///
    /// Fails with [`Error::InvalidPriority`] for an out-of-range level and
    /// with [`Error::QueueClosed`] once the pool is shutting down; nothing is
    /// enqueued in either case.
    pub fn submit(&self, task: Task, priority: usize) -> Result<()> {
        self.queue.push(task, priority)
    }

    /// Number of worker threads.
    pub fn num_workers(&self) -> usize {
        self.workers.len()
    }

    /// Number of priority levels.
    pub fn priority_levels(&self) -> usize {
        self.queue.levels()
    }

    /// Tasks currently queued but not yet picked up (a snapshot).
    pub fn pending_tasks(&self) -> usize {
        self.queue.len()
    }

    /// Tasks whose execution panicked and was discarded.
    pub fn failed_tasks(&self) -> usize {
        self.failures.count()
    }

    /// Snapshot of the pool's execution metrics.
    #[cfg(feature = "telemetry")]
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Close the queue and wait for every worker to finish.
    ///
    /// Already-queued tasks are drained before the workers exit. Idempotent;
    /// also invoked on drop.
    pub fn shutdown(&mut self) {
        self.queue.close();

        for worker in &mut self.workers {
            if let Some(thread) = worker.thread.take() {
                let _ = thread.join();
                tracing::trace!(worker = worker.id, "worker joined");
            }
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("workers", &self.workers.len())
            .field("levels", &self.queue.levels())
            .field("pending", &self.queue.len())
            .field("closed", &self.queue.is_closed())
            .finish()
    }
}
