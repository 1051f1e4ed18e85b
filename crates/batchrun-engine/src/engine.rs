//! `BatchEngine` — orchestrates chunked, bounded fan-out execution.
//!
//! For each batch, in order:
//! ```text
//! cancel check → fan-out (join_all) → aggregate → on_batch → on_progress
//!              → [fail-fast check] → cancel check → yield (not after last)
//! ```
//! At most `batch_size` work futures are in flight at any time.

use batchrun_core::{
    cancel::CancellationMonitor,
    chunk::{chunk, Batch},
    config::{EngineConfig, FailureMode},
    error::RunError,
    types::{ItemOutcome, ProgressEvent, RunResult},
    yielder::{SleepYielder, Yielder},
};
use futures::future::join_all;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::aggregator::OutcomeAggregator;
use crate::request::BatchRequest;

/// Batched execution engine.
///
/// Holds only configuration; every [`run`](Self::run) starts from fresh
/// state, so one engine can serve any number of runs.
#[derive(Clone)]
pub struct BatchEngine {
    config: EngineConfig,
    yielder: Arc<dyn Yielder>,
}

impl BatchEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            yielder: Arc::new(SleepYielder),
        }
    }

    /// Engine with the given batch size and default delay / failure mode.
    pub fn with_batch_size(batch_size: usize) -> Self {
        Self::new(EngineConfig::with_batch_size(batch_size))
    }

    /// Replace the inter-batch yielder.
    pub fn with_yielder(mut self, yielder: Arc<dyn Yielder>) -> Self {
        self.yielder = yielder;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Execute `process` over every item of `req`, one batch at a time.
    ///
    /// `process` receives each item with its global index. Items of a batch
    /// run concurrently and are all awaited, whatever their outcome; the
    /// next batch starts only after the previous one fully settled.
    ///
    /// Returns `Err` only for invocation errors, or for an item failure
    /// under [`FailureMode::FailFast`]. Cancellation returns `Ok` with
    /// `cancelled = true`.
    pub async fn run<T, R, E, F, Fut>(
        &self,
        req: BatchRequest<T, R>,
        process: F,
    ) -> Result<RunResult<R, E>, RunError<E>>
    where
        F: Fn(T, usize) -> Fut,
        Fut: Future<Output = Result<R, E>>,
    {
        self.config.validate()?;

        let started = Instant::now();
        let (items, hooks, cancel) = req.into_parts();
        let total = items.len();
        let batch_size = self.config.batch_size;
        let batches = chunk(items, batch_size)?;
        let total_batches = batches.len();

        let mut monitor = CancellationMonitor::new(cancel);
        let mut agg: OutcomeAggregator<R, E> = OutcomeAggregator::with_capacity(total);

        info!(
            "BatchEngine: processing {} items in {} batches (batch_size={}, failure_mode={})",
            total, total_batches, batch_size, self.config.failure_mode
        );

        for batch in batches {
            if monitor.should_stop() {
                return Ok(cancelled(agg, total, monitor.checks(), started));
            }

            let Batch { index, offset, items } = batch;
            let batch_started = Instant::now();
            let results_mark = agg.result_count();
            let errors_mark = agg.error_count();

            let outcomes = join_all(items.into_iter().enumerate().map(|(pos, item)| {
                let global = offset + pos;
                let fut = process(item, global);
                async move { ItemOutcome::from_result(global, fut.await) }
            }))
            .await;

            for outcome in outcomes {
                agg.record(outcome);
            }
            for failed in agg.failed_since(errors_mark) {
                warn!(index = failed, batch = index, "item failed");
            }

            debug!(
                batch = index + 1,
                total_batches,
                succeeded = agg.result_count() - results_mark,
                failed = agg.error_count() - errors_mark,
                elapsed_ms = batch_started.elapsed().as_millis() as u64,
                "batch settled"
            );

            hooks.batch_done(agg.results_since(results_mark), index);
            hooks.progress(&ProgressEvent {
                processed: agg.processed(),
                total,
                batch_index: index + 1,
                total_batches,
                elapsed: started.elapsed(),
            });

            if self.config.failure_mode == FailureMode::FailFast {
                if let Some((index, error)) = agg.take_first_error_since(errors_mark) {
                    warn!(index, "BatchEngine: aborting run (fail-fast)");
                    return Err(RunError::ItemFailed { index, error });
                }
            }

            if monitor.should_stop() {
                return Ok(cancelled(agg, total, monitor.checks(), started));
            }

            if index + 1 < total_batches {
                self.yielder.pause(self.config.yield_delay()).await;
            }
        }

        let result = agg.finish(false, started.elapsed());
        info!(
            "BatchEngine: complete — {} succeeded, {} failed in {:?}",
            result.success_count(),
            result.error_count(),
            result.duration
        );
        Ok(result)
    }
}

impl Default for BatchEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

fn cancelled<R, E>(
    agg: OutcomeAggregator<R, E>,
    total: usize,
    checks: usize,
    started: Instant,
) -> RunResult<R, E> {
    warn!(
        processed = agg.processed(),
        skipped = total - agg.processed(),
        checks,
        "BatchEngine: run cancelled"
    );
    agg.finish(true, started.elapsed())
}
