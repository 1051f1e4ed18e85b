//! batchrun metrics definitions.
//!
//! All metrics use OpenTelemetry conventions.
//! They can be exported via OTLP to Prometheus, Grafana, Datadog, etc.

use batchrun_core::types::{ProgressEvent, RunSummary};
use opentelemetry::{
    metrics::{Counter, Histogram, Meter},
    KeyValue,
};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Central metrics handle for batchrun.
#[derive(Clone)]
pub struct BatchMetrics {
    pub items_succeeded: Counter<u64>,
    pub items_failed: Counter<u64>,
    pub batches_completed: Counter<u64>,
    pub runs_cancelled: Counter<u64>,
    pub batch_size: Histogram<u64>,
    pub run_duration_ms: Histogram<f64>,
}

impl BatchMetrics {
    pub fn new(meter: &Meter) -> Self {
        Self {
            items_succeeded: meter
                .u64_counter("batchrun.items_succeeded")
                .with_description("Items whose work function returned Ok")
                .build(),
            items_failed: meter
                .u64_counter("batchrun.items_failed")
                .with_description("Items whose work function returned Err")
                .build(),
            batches_completed: meter
                .u64_counter("batchrun.batches_completed")
                .with_description("Batches (or sequential windows) fully settled")
                .build(),
            runs_cancelled: meter
                .u64_counter("batchrun.runs_cancelled")
                .with_description("Runs that stopped early on a cancellation request")
                .build(),
            batch_size: meter
                .u64_histogram("batchrun.batch_size")
                .with_description("Number of items settled per batch")
                .build(),
            run_duration_ms: meter
                .f64_histogram("batchrun.run_duration_ms")
                .with_description("Wall-clock duration of a run in milliseconds")
                .build(),
        }
    }

    pub fn record_batch(&self, runner: &str, settled: u64) {
        let attrs = [KeyValue::new("runner", runner.to_string())];
        self.batches_completed.add(1, &attrs);
        self.batch_size.record(settled, &attrs);
    }

    pub fn record_run(&self, runner: &str, summary: &RunSummary) {
        let attrs = [KeyValue::new("runner", runner.to_string())];
        self.items_succeeded.add(summary.succeeded as u64, &attrs);
        self.items_failed.add(summary.failed as u64, &attrs);
        if summary.cancelled {
            self.runs_cancelled.add(1, &attrs);
        }
        self.run_duration_ms
            .record(summary.duration_ms as f64, &attrs);
    }

    /// A progress callback that records one batch per event, deriving the
    /// batch size from the change in `processed`.
    pub fn progress_recorder(
        &self,
        runner: &'static str,
    ) -> impl Fn(&ProgressEvent) + Send + Sync + 'static {
        let metrics = self.clone();
        let last = AtomicUsize::new(0);
        move |event: &ProgressEvent| {
            let prev = last.swap(event.processed, Ordering::Relaxed);
            metrics.record_batch(runner, event.processed.saturating_sub(prev) as u64);
        }
    }
}
