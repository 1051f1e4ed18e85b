//! # batchrun-observability
//!
//! OpenTelemetry metrics and structured logging for batchrun.
//!
//! ## Built-in metrics
//! - `batchrun.items_succeeded`   — counter, tagged with runner
//! - `batchrun.items_failed`      — counter, tagged with runner
//! - `batchrun.batches_completed` — counter, tagged with runner
//! - `batchrun.runs_cancelled`    — counter, tagged with runner
//! - `batchrun.batch_size`        — histogram of items per settled batch
//! - `batchrun.run_duration_ms`   — histogram
//!
//! ## Structured logging
//! JSON-structured logs compatible with ELK, Loki, CloudWatch.
//! Log levels configurable per component.

pub mod metrics;
pub mod tracing_setup;

pub use metrics::BatchMetrics;
pub use tracing_setup::{build_directives, init_tracing, LogConfig};
