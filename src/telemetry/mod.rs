//! Telemetry and observability subsystem.
//!
//! Provides per-pool metrics collection and export, available when the
//! `telemetry` feature is enabled (the default).

pub mod export;
pub mod metrics;

pub use export::{JsonExporter, MetricsExporter};
pub use metrics::{Metrics, MetricsSnapshot};
