//! Metrics collection for pool monitoring.

use hdrhistogram::Histogram;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Per-pool metrics collector.
///
/// Counters use relaxed atomics; the latency histograms sit behind an
/// `RwLock` for interior mutability.
#[derive(Debug)]
pub struct Metrics {
    tasks_executed: AtomicU64,
    tasks_failed: AtomicU64,

    // execution duration and time spent waiting in the queue, in nanoseconds
    run_latency: RwLock<Histogram<u64>>,
    queue_wait: RwLock<Histogram<u64>>,

    start_time: Instant,
}

impl Metrics {
    /// Create a new metrics collector.
    pub fn new() -> Self {
        // 3 significant figures, values up to one hour in nanoseconds
        let histogram = || {
            Histogram::new_with_max(3_600_000_000_000, 3).expect("failed to create histogram")
        };

        Self {
            tasks_executed: AtomicU64::new(0),
            tasks_failed: AtomicU64::new(0),
            run_latency: RwLock::new(histogram()),
            queue_wait: RwLock::new(histogram()),
            start_time: Instant::now(),
        }
    }

    /// Record one successful task execution.
    pub fn record_task_execution(&self, run_ns: u64, wait_ns: u64) {
        self.tasks_executed.fetch_add(1, Ordering::Relaxed);

        if let Some(mut hist) = self.run_latency.try_write() {
            let _ = hist.record(run_ns);
        }
        if let Some(mut hist) = self.queue_wait.try_write() {
            let _ = hist.record(wait_ns);
        }
    }

    /// Record one discarded task panic.
    pub fn record_task_failure(&self) {
        self.tasks_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of current metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let run = self.run_latency.read();
        let wait = self.queue_wait.read();

        MetricsSnapshot {
            uptime: self.start_time.elapsed(),
            tasks_executed: self.tasks_executed.load(Ordering::Relaxed),
            tasks_failed: self.tasks_failed.load(Ordering::Relaxed),
            avg_run_latency_ns: if run.len() > 0 { run.mean() as u64 } else { 0 },
            p50_run_latency_ns: run.value_at_quantile(0.50),
            p95_run_latency_ns: run.value_at_quantile(0.95),
            p99_run_latency_ns: run.value_at_quantile(0.99),
            max_run_latency_ns: run.max(),
            p50_queue_wait_ns: wait.value_at_quantile(0.50),
            p95_queue_wait_ns: wait.value_at_quantile(0.95),
            p99_queue_wait_ns: wait.value_at_quantile(0.99),
        }
    }

    /// Reset all metrics.
    pub fn reset(&self) {
        self.tasks_executed.store(0, Ordering::Relaxed);
        self.tasks_failed.store(0, Ordering::Relaxed);

        if let Some(mut hist) = self.run_latency.try_write() {
            hist.reset();
        }
        if let Some(mut hist) = self.queue_wait.try_write() {
            hist.reset();
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of metrics at a point in time.
#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    /// Time since the collector was created.
    pub uptime: std::time::Duration,
    /// Successfully executed tasks.
    pub tasks_executed: u64,
    /// Tasks discarded because they panicked.
    pub tasks_failed: u64,
    /// Mean task execution time.
    pub avg_run_latency_ns: u64,
    /// Median task execution time.
    pub p50_run_latency_ns: u64,
    /// 95th percentile task execution time.
    pub p95_run_latency_ns: u64,
    /// 99th percentile task execution time.
    pub p99_run_latency_ns: u64,
    /// Longest observed task execution time.
    pub max_run_latency_ns: u64,
    /// Median time tasks spent queued before execution.
    pub p50_queue_wait_ns: u64,
    /// 95th percentile queue wait.
    pub p95_queue_wait_ns: u64,
    /// 99th percentile queue wait.
    pub p99_queue_wait_ns: u64,
}

impl MetricsSnapshot {
    /// Executed tasks per second of collector uptime.
    pub fn tasks_per_second(&self) -> f64 {
        let seconds = self.uptime.as_secs_f64();
        if seconds == 0.0 {
            return 0.0;
        }
        self.tasks_executed as f64 / seconds
    }
}
