// worker thread loop
use super::failure::{FailureHandler, TaskFailure};
use crate::queue::PriorityTaskQueue;
use crate::task::Task;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

#[cfg(feature = "telemetry")]
use crate::telemetry::Metrics;
#[cfg(feature = "telemetry")]
use std::time::Instant;

pub(crate) type WorkerId = usize;

pub(crate) struct Worker {
    pub id: WorkerId,
    failures: Arc<FailureHandler>,
    #[cfg(feature = "telemetry")]
    metrics: Option<Arc<Metrics>>,
}

impl Worker {
    pub fn new(id: WorkerId, failures: Arc<FailureHandler>) -> Self {
        Self {
            id,
            failures,
            #[cfg(feature = "telemetry")]
            metrics: None,
        }
    }

    #[cfg(feature = "telemetry")]
    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    // main loop: dequeue, execute, repeat; exit once the queue reports
    // closed-and-empty
    pub fn run(&self, queue: Arc<PriorityTaskQueue>) {
        tracing::debug!(worker = self.id, "worker started");

        while let Some(task) = queue.pop() {
            self.execute_task(task);
        }

        tracing::debug!(worker = self.id, "queue closed and drained, worker exiting");
    }

    fn execute_task(&self, task: Task) {
        let id = task.id();

        #[cfg(feature = "telemetry")]
        let queue_wait = task.spawn_time().elapsed();
        #[cfg(feature = "telemetry")]
        let start = Instant::now();

        let result = catch_unwind(AssertUnwindSafe(|| task.run()));

        match result {
            Ok(()) => {
                #[cfg(feature = "telemetry")]
                if let Some(ref metrics) = self.metrics {
                    metrics.record_task_execution(
                        start.elapsed().as_nanos() as u64,
                        queue_wait.as_nanos() as u64,
                    );
                }
            }
            Err(payload) => {
                // the worker must survive any task failure
                #[cfg(feature = "telemetry")]
                if let Some(ref metrics) = self.metrics {
                    metrics.record_task_failure();
                }
                self.failures.record(TaskFailure::from_payload(id, payload));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn worker() -> Worker {
        Worker::new(0, Arc::new(FailureHandler::new(None)))
    }

    #[test]
    fn test_run_drains_then_exits() {
        let queue = Arc::new(PriorityTaskQueue::new(2).unwrap());
        let counter = Arc::new(AtomicUsize::new(0));

        for _ in 0..5 {
            let counter = counter.clone();
            queue
                .push(
                    Task::new(move || {
                        counter.fetch_add(1, Ordering::SeqCst);
                    }),
                    1,
                )
                .unwrap();
        }
        queue.close();

        worker().run(queue);
        assert_eq!(counter.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn test_panicking_task_does_not_stop_loop() {
        let queue = Arc::new(PriorityTaskQueue::new(1).unwrap());
        let counter = Arc::new(AtomicUsize::new(0));

        queue.push(Task::new(|| panic!("bad task")), 0).unwrap();
        {
            let counter = counter.clone();
            queue
                .push(
                    Task::new(move || {
                        counter.fetch_add(1, Ordering::SeqCst);
                    }),
                    0,
                )
                .unwrap();
        }
        queue.close();

        let failures = Arc::new(FailureHandler::new(None));
        Worker::new(0, failures.clone()).run(queue);

        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(failures.count(), 1);
    }
}
