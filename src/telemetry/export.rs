//! Metrics export functionality.

use super::metrics::MetricsSnapshot;
use crate::error::Result;

/// Trait for exporting metrics to different formats.
pub trait MetricsExporter: Send + Sync {
    /// Export a metrics snapshot.
    fn export(&self, snapshot: &MetricsSnapshot) -> Result<()>;
}

/// Export metrics to a JSON file.
#[derive(Debug)]
pub struct JsonExporter {
    output_path: std::path::PathBuf,
}

impl JsonExporter {
    /// Create a new JSON exporter writing to `output_path`.
    pub fn new(output_path: impl Into<std::path::PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
        }
    }
}

impl MetricsExporter for JsonExporter {
    fn export(&self, snapshot: &MetricsSnapshot) -> Result<()> {
        let serializable = SerializableSnapshot::from(snapshot);
        let json = serde_json::to_string_pretty(&serializable).map_err(|e| {
            crate::error::Error::telemetry(format!("JSON serialization failed: {}", e))
        })?;

        std::fs::write(&self.output_path, json)?;

        Ok(())
    }
}

/// Serializable version of [`MetricsSnapshot`].
#[derive(Debug, Clone, serde::Serialize)]
struct SerializableSnapshot {
    uptime_secs: f64,
    tasks_executed: u64,
    tasks_failed: u64,
    avg_run_latency_us: f64,
    p50_run_latency_us: f64,
    p95_run_latency_us: f64,
    p99_run_latency_us: f64,
    max_run_latency_us: f64,
    p50_queue_wait_us: f64,
    p95_queue_wait_us: f64,
    p99_queue_wait_us: f64,
    tasks_per_second: f64,
}

impl From<&MetricsSnapshot> for SerializableSnapshot {
    fn from(snapshot: &MetricsSnapshot) -> Self {
        let us = |ns: u64| ns as f64 / 1_000.0;

        Self {
            uptime_secs: snapshot.uptime.as_secs_f64(),
            tasks_executed: snapshot.tasks_executed,
            tasks_failed: snapshot.tasks_failed,
            avg_run_latency_us: us(snapshot.avg_run_latency_ns),
            p50_run_latency_us: us(snapshot.p50_run_latency_ns),
            p95_run_latency_us: us(snapshot.p95_run_latency_ns),
            p99_run_latency_us: us(snapshot.p99_run_latency_ns),
            max_run_latency_us: us(snapshot.max_run_latency_ns),
            p50_queue_wait_us: us(snapshot.p50_queue_wait_ns),
            p95_queue_wait_us: us(snapshot.p95_queue_wait_ns),
            p99_queue_wait_us: us(snapshot.p99_queue_wait_ns),
            tasks_per_second: snapshot.tasks_per_second(),
        }
    }
}
