//! `batchrun simulate` — push a synthetic workload through a runner.
//!
//! Each item sleeps for `--work-ms` and every `--fail-every`-th item fails,
//! so batching, failure isolation, progress and cancellation can be watched
//! end to end without any real backend.

use anyhow::{Context, Result};
use batchrun_core::{eta::format_eta, types::ProgressEvent, RunSummary};
use batchrun_engine::{BatchEngine, BatchRequest, CancellationToken, FailureMode, SequentialRunner};
use batchrun_observability::BatchMetrics;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

use crate::config::RunnerConfig;

/// Command-line options for `simulate`, already parsed by clap.
#[derive(Debug, Clone)]
pub struct SimulateArgs {
    pub items: u64,
    pub batch_size: Option<usize>,
    pub delay_ms: Option<u64>,
    pub work_ms: u64,
    pub fail_every: u64,
    pub sequential: bool,
    pub fail_fast: bool,
    pub cancel_after_batches: Option<usize>,
    pub json: bool,
}

#[derive(Debug, Error)]
#[error("simulated failure on item {index}")]
pub struct SimulatedFailure {
    pub index: usize,
}

#[derive(Serialize)]
struct Report {
    runner: &'static str,
    #[serde(flatten)]
    summary: RunSummary,
    failed_indices: Vec<usize>,
    checksum: u64,
}

// ─── Entry point ─────────────────────────────────────────────────────────────

pub async fn run(args: SimulateArgs, mut config: RunnerConfig) -> Result<()> {
    apply_overrides(&args, &mut config);
    config.validate()?;

    let runner = if args.sequential { "sequential" } else { "batched" };
    let metrics = BatchMetrics::new(&opentelemetry::global::meter("batchrun"));
    let token = CancellationToken::new();

    let req = BatchRequest::new((0..args.items).collect())
        .cancel_token(token.clone())
        .on_progress(progress_printer(&args, &metrics, runner, token));

    let work_ms = args.work_ms;
    let fail_every = args.fail_every;
    let process = move |value: u64, index: usize| async move {
        if work_ms > 0 {
            tokio::time::sleep(Duration::from_millis(work_ms)).await;
        }
        if fail_every > 0 && (index as u64 + 1) % fail_every == 0 {
            Err(SimulatedFailure { index })
        } else {
            Ok(value * 2)
        }
    };

    let outcome = if args.sequential {
        SequentialRunner::new(config.sequential.clone())
            .run(req, process)
            .await
    } else {
        BatchEngine::new(config.engine.clone())
            .run(req, process)
            .await
    };
    let result = outcome.with_context(|| format!("{runner} simulation aborted"))?;

    let summary = result.summary();
    metrics.record_run(runner, &summary);

    let report = Report {
        runner,
        summary,
        failed_indices: result.failed_indices().collect(),
        checksum: result.results.iter().fold(0u64, |acc, v| acc.wrapping_add(*v)),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn apply_overrides(args: &SimulateArgs, config: &mut RunnerConfig) {
    if let Some(batch_size) = args.batch_size {
        config.engine.batch_size = batch_size;
    }
    if let Some(delay_ms) = args.delay_ms {
        config.engine.yield_delay_ms = delay_ms;
        config.sequential.yield_delay_ms = delay_ms;
    }
    if args.fail_fast {
        config.engine.failure_mode = FailureMode::FailFast;
        config.sequential.failure_mode = FailureMode::FailFast;
    }
}

fn progress_printer(
    args: &SimulateArgs,
    metrics: &BatchMetrics,
    runner: &'static str,
    token: CancellationToken,
) -> impl Fn(&ProgressEvent) + Send + Sync + 'static {
    let record = metrics.progress_recorder(runner);
    let quiet = args.json;
    let cancel_after = args.cancel_after_batches;

    move |event: &ProgressEvent| {
        record(event);
        if !quiet {
            println!(
                "  batch {:>4}/{:<4} {:>8}/{:<8} {:>5.1}%  {}",
                event.batch_index,
                event.total_batches,
                event.processed,
                event.total,
                event.fraction() * 100.0,
                format_eta(event.eta()),
            );
        }
        if cancel_after.is_some_and(|n| event.batch_index >= n) && !token.is_cancelled() {
            tracing::info!(batch = event.batch_index, "requesting cancellation");
            token.cancel();
        }
    }
}

fn print_report(report: &Report) {
    let s = &report.summary;
    println!();
    println!("Runner:     {}", report.runner);
    println!("Processed:  {}", s.total_processed);
    println!("Succeeded:  {}", s.succeeded);
    println!("Failed:     {}", s.failed);
    println!("Cancelled:  {}", if s.cancelled { "yes" } else { "no" });
    println!("Duration:   {} ms", s.duration_ms);
    println!("Checksum:   {}", report.checksum);
    if !report.failed_indices.is_empty() {
        let shown: Vec<String> = report
            .failed_indices
            .iter()
            .take(20)
            .map(|i| i.to_string())
            .collect();
        let more = report.failed_indices.len().saturating_sub(shown.len());
        if more > 0 {
            println!("Failed at:  {} (+{more} more)", shown.join(", "));
        } else {
            println!("Failed at:  {}", shown.join(", "));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> SimulateArgs {
        SimulateArgs {
            items: 10,
            batch_size: Some(4),
            delay_ms: Some(0),
            work_ms: 0,
            fail_every: 3,
            sequential: false,
            fail_fast: false,
            cancel_after_batches: None,
            json: true,
        }
    }

    #[test]
    fn overrides_apply_to_both_runners() {
        let mut config = RunnerConfig::default();
        let mut a = args();
        a.fail_fast = true;
        apply_overrides(&a, &mut config);
        assert_eq!(config.engine.batch_size, 4);
        assert_eq!(config.engine.yield_delay_ms, 0);
        assert_eq!(config.sequential.yield_delay_ms, 0);
        assert_eq!(config.sequential.failure_mode, FailureMode::FailFast);
    }

    #[tokio::test]
    async fn simulate_batched_and_sequential() {
        run(args(), RunnerConfig::default()).await.unwrap();
        let mut a = args();
        a.sequential = true;
        a.cancel_after_batches = Some(1);
        run(a, RunnerConfig::default()).await.unwrap();
    }

    #[tokio::test]
    async fn fail_fast_surfaces_error() {
        let mut a = args();
        a.fail_fast = true;
        let err = run(a, RunnerConfig::default()).await.unwrap_err();
        assert!(format!("{err:#}").contains("simulated failure on item 2"));
    }

    #[tokio::test]
    async fn zero_batch_size_rejected_up_front() {
        let mut a = args();
        a.batch_size = Some(0);
        assert!(run(a, RunnerConfig::default()).await.is_err());
    }
}
