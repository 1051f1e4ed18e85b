//! `SequentialRunner` — strict one-at-a-time processing.
//!
//! For callers talking to rate-limited services. Compared to
//! [`BatchEngine`](crate::BatchEngine):
//! - concurrency is exactly 1;
//! - cancellation is checked before *every* item, and once more after the
//!   last one, so a token fired during the final item flags the run just as
//!   it does after the batched engine's final batch;
//! - the cooperative pause happens every `yield_every` items, and progress
//!   and batch-completion hooks fire per window of `yield_every` items (a
//!   window cut short by cancellation or fail-fast still reports what
//!   settled in it);
//! - failures follow the same [`FailureMode`] as the batched engine.

use batchrun_core::{
    cancel::CancellationMonitor,
    chunk::batch_count,
    config::{FailureMode, SequentialConfig},
    error::RunError,
    types::{ItemOutcome, ProgressEvent, RunResult},
    yielder::{SleepYielder, Yielder},
};
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::aggregator::OutcomeAggregator;
use crate::request::{BatchRequest, Hooks};

#[derive(Clone)]
pub struct SequentialRunner {
    config: SequentialConfig,
    yielder: Arc<dyn Yielder>,
}

impl SequentialRunner {
    pub fn new(config: SequentialConfig) -> Self {
        Self {
            config,
            yielder: Arc::new(SleepYielder),
        }
    }

    pub fn with_yielder(mut self, yielder: Arc<dyn Yielder>) -> Self {
        self.yielder = yielder;
        self
    }

    pub fn config(&self) -> &SequentialConfig {
        &self.config
    }

    /// Execute `process` over every item of `req`, strictly in order.
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
        let every = self.config.yield_every;
        let total_windows = batch_count(total, every);

        let mut monitor = CancellationMonitor::new(cancel);
        let mut agg: OutcomeAggregator<R, E> = OutcomeAggregator::with_capacity(total);
        // result count and processed count when the current window opened
        let mut results_mark = 0usize;
        let mut window_opened = 0usize;

        info!(
            "SequentialRunner: processing {} items (yield_every={}, failure_mode={})",
            total, every, self.config.failure_mode
        );

        for (index, item) in items.into_iter().enumerate() {
            if monitor.should_stop() {
                if agg.processed() > window_opened {
                    let window = Window {
                        index: window_opened / every,
                        results_mark,
                        total_windows,
                    };
                    window.close(&hooks, &agg, total, started);
                }
                return Ok(cancelled(agg, total, monitor.checks(), started));
            }

            let outcome = ItemOutcome::from_result(index, process(item, index).await);
            let failed = !outcome.is_success();
            if failed {
                warn!(index, "item failed");
            }
            let errors_mark = agg.error_count();
            agg.record(outcome);

            let done = index + 1;
            let abort = failed && self.config.failure_mode == FailureMode::FailFast;
            if abort || done % every == 0 || done == total {
                let window = Window {
                    index: window_opened / every,
                    results_mark,
                    total_windows,
                };
                window.close(&hooks, &agg, total, started);
                results_mark = agg.result_count();
                window_opened = done;

                if abort {
                    if let Some((index, error)) = agg.take_first_error_since(errors_mark) {
                        warn!(index, "SequentialRunner: aborting run (fail-fast)");
                        return Err(RunError::ItemFailed { index, error });
                    }
                }

                if done < total {
                    debug!(done, total, "SequentialRunner: yielding");
                    self.yielder.pause(self.config.yield_delay()).await;
                }
            }
        }

        // a token fired while the last item was running
        if total > 0 && monitor.should_stop() {
            return Ok(cancelled(agg, total, monitor.checks(), started));
        }

        let result = agg.finish(false, started.elapsed());
        info!(
            "SequentialRunner: complete — {} succeeded, {} failed in {:?}",
            result.success_count(),
            result.error_count(),
            result.duration
        );
        Ok(result)
    }
}

/// A window of up to `yield_every` items, reported like one batch.
struct Window {
    index: usize,
    results_mark: usize,
    total_windows: usize,
}

impl Window {
    /// Fire the hooks for everything settled since the window opened.
    fn close<R, E>(
        &self,
        hooks: &Hooks<R>,
        agg: &OutcomeAggregator<R, E>,
        total: usize,
        started: Instant,
    ) {
        hooks.batch_done(agg.results_since(self.results_mark), self.index);
        hooks.progress(&ProgressEvent {
            processed: agg.processed(),
            total,
            batch_index: self.index + 1,
            total_batches: self.total_windows,
            elapsed: started.elapsed(),
        });
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
        "SequentialRunner: run cancelled"
    );
    agg.finish(true, started.elapsed())
}

impl Default for SequentialRunner {
    fn default() -> Self {
        Self::new(SequentialConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use batchrun_core::{cancel::CancellationToken, yielder::NoopYielder};
    use std::cell::Cell;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn runner(yield_every: usize, failure_mode: FailureMode) -> SequentialRunner {
        SequentialRunner::new(SequentialConfig {
            yield_every,
            yield_delay_ms: 0,
            failure_mode,
        })
        .with_yielder(Arc::new(NoopYielder))
    }

    #[tokio::test]
    async fn never_overlaps() {
        let in_flight = &AtomicUsize::new(0);
        let peak = &AtomicUsize::new(0);
        let result = runner(3, FailureMode::Collect)
            .run(BatchRequest::new((0..8u32).collect()), move |x, _| async move {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::task::yield_now().await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
                Ok::<_, String>(x)
            })
            .await
            .unwrap();
        assert_eq!(result.results, (0..8).collect::<Vec<u32>>());
        assert_eq!(peak.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn collects_failures_like_batched_engine() {
        let result = runner(20, FailureMode::Collect)
            .run(BatchRequest::new(vec![1u32, 2, 3]), |x, _| async move {
                if x == 2 { Err("two") } else { Ok(x * 2) }
            })
            .await
            .unwrap();
        assert_eq!(result.results, vec![2, 6]);
        assert_eq!(result.errors, vec![(1, "two")]);
        assert_eq!(result.total_processed, 3);
    }

    #[tokio::test]
    async fn fail_fast_stops_at_failing_item() {
        let calls = Cell::new(0usize);
        let err = runner(20, FailureMode::FailFast)
            .run(BatchRequest::<u32, u32>::new(vec![1, 2, 3]), |x, _| {
                calls.set(calls.get() + 1);
                async move { if x == 2 { Err("two") } else { Ok(x) } }
            })
            .await
            .unwrap_err();
        assert_eq!(err.into_item_error(), Some((1, "two")));
        assert_eq!(calls.get(), 2);
    }

    #[tokio::test]
    async fn cancels_between_items() {
        let token = CancellationToken::new();
        let trigger = token.clone();
        let result = runner(20, FailureMode::Collect)
            .run(
                BatchRequest::new((0..10u32).collect()).cancel_token(token),
                move |x, index| {
                    if index == 3 {
                        trigger.cancel();
                    }
                    async move { Ok::<_, ()>(x) }
                },
            )
            .await
            .unwrap();
        // item 3 was already underway when the token fired
        assert!(result.cancelled);
        assert_eq!(result.total_processed, 4);
        assert_eq!(result.results, vec![0, 1, 2, 3]);
    }

    #[tokio::test]
    async fn progress_per_window() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        let req = BatchRequest::new((0..7u32).collect())
            .on_progress(move |e: &ProgressEvent| sink.lock().unwrap().push(*e));
        runner(3, FailureMode::Collect)
            .run(req, |x, _| async move { Ok::<_, ()>(x) })
            .await
            .unwrap();
        let events = events.lock().unwrap();
        let processed: Vec<_> = events.iter().map(|e| e.processed).collect();
        assert_eq!(processed, vec![3, 6, 7]);
        assert!(events.iter().all(|e| e.total_batches == 3));
        assert!(events.last().unwrap().is_last());
    }

    #[tokio::test]
    async fn zero_yield_interval_rejected() {
        let err = runner(0, FailureMode::Collect)
            .run(BatchRequest::<u32, u32>::new(vec![1]), |x, _| async move { Ok::<_, ()>(x) })
            .await
            .unwrap_err();
        assert!(err.is_invocation());
    }

    type Seen = Arc<Mutex<(Vec<usize>, Vec<(usize, Vec<u32>)>)>>;

    /// A request over `0..n` that records progress counts and batch results.
    fn recording_request(n: u32) -> (BatchRequest<u32, u32>, Seen) {
        let seen: Seen = Arc::default();
        let (progress_sink, batch_sink) = (seen.clone(), seen.clone());
        let req = BatchRequest::new((0..n).collect())
            .on_progress(move |e: &ProgressEvent| progress_sink.lock().unwrap().0.push(e.processed))
            .on_batch(move |results: &[u32], idx| {
                batch_sink.lock().unwrap().1.push((idx, results.to_vec()))
            });
        (req, seen)
    }

    #[tokio::test]
    async fn cancel_mid_window_reports_settled_items() {
        let token = CancellationToken::new();
        let trigger = token.clone();
        let (req, seen) = recording_request(10);
        let result = runner(4, FailureMode::Collect)
            .run(req.cancel_token(token), move |x, index| {
                if index == 5 {
                    trigger.cancel();
                }
                async move { Ok::<_, ()>(x) }
            })
            .await
            .unwrap();

        assert!(result.cancelled);
        assert_eq!(result.total_processed, 6);
        let seen = seen.lock().unwrap();
        assert_eq!(seen.0, vec![4, 6]);
        assert_eq!(seen.1, vec![(0, vec![0, 1, 2, 3]), (1, vec![4, 5])]);
    }

    #[tokio::test]
    async fn fail_fast_mid_window_reports_settled_items() {
        let (req, seen) = recording_request(10);
        let err = runner(4, FailureMode::FailFast)
            .run(req, |x, _| async move { if x == 5 { Err("five") } else { Ok(x) } })
            .await
            .unwrap_err();

        assert_eq!(err.into_item_error(), Some((5, "five")));
        let seen = seen.lock().unwrap();
        assert_eq!(seen.0, vec![4, 6]);
        assert_eq!(seen.1, vec![(0, vec![0, 1, 2, 3]), (1, vec![4])]);
    }

    #[tokio::test]
    async fn cancel_during_last_item_is_flagged() {
        let token = CancellationToken::new();
        let trigger = token.clone();
        let result = runner(20, FailureMode::Collect)
            .run(
                BatchRequest::new(vec![1u32, 2, 3]).cancel_token(token),
                move |x, index| {
                    if index == 2 {
                        trigger.cancel();
                    }
                    async move { Ok::<_, ()>(x) }
                },
            )
            .await
            .unwrap();
        assert!(result.cancelled);
        assert_eq!(result.total_processed, 3);
        assert_eq!(result.results, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn empty_input_is_never_cancelled() {
        let token = CancellationToken::new();
        token.cancel();
        let result = runner(20, FailureMode::Collect)
            .run(
                BatchRequest::<u32, u32>::new(vec![]).cancel_token(token),
                |x, _| async move { Ok::<_, ()>(x) },
            )
            .await
            .unwrap();
        assert!(!result.cancelled);
        assert_eq!(result.total_processed, 0);
    }
}
