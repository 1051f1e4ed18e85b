//! # batchrun-engine
//!
//! Bounded fan-out batch execution for large, ordered collections of
//! independent work items.
//!
//! ## Features
//! - Order-preserving chunking; at most `batch_size` items in flight
//! - All-settled fan-in: one item failing never cancels its batch-mates
//! - Per-item failures collected with their global index
//! - Cooperative cancellation at batch boundaries, with a partial result
//! - Progress and per-batch callbacks, with ETA helpers
//! - A pluggable yielder between batches (default: short sleep)
//! - A strict one-at-a-time [`SequentialRunner`] sharing the same contract
//!
//! ## Usage
//! ```no_run
//! use batchrun_engine::{BatchEngine, BatchRequest};
//!
//! # async fn example() {
//! let engine = BatchEngine::with_batch_size(3);
//! let result = engine
//!     .run(BatchRequest::new((1..=10u32).collect()), |x, _index| async move {
//!         Ok::<_, std::io::Error>(x * 2)
//!     })
//!     .await
//!     .unwrap();
//! assert_eq!(result.total_processed, 10);
//! # }
//! ```

pub mod aggregator;
pub mod engine;
pub mod request;
pub mod sequential;

pub use aggregator::OutcomeAggregator;
pub use engine::BatchEngine;
pub use request::BatchRequest;
pub use sequential::SequentialRunner;

pub use batchrun_core::{
    CancellationToken, EngineConfig, FailureMode, InvocationError, ItemOutcome, ProgressEvent,
    RunError, RunResult, RunSummary, SequentialConfig,
};

use std::future::Future;

/// Run `process` over `items` with the default engine settings and the
/// given batch size.
pub async fn process_in_batches<T, R, E, F, Fut>(
    items: Vec<T>,
    batch_size: usize,
    process: F,
) -> Result<RunResult<R, E>, RunError<E>>
where
    F: Fn(T, usize) -> Fut,
    Fut: Future<Output = Result<R, E>>,
{
    BatchEngine::with_batch_size(batch_size)
        .run(BatchRequest::new(items), process)
        .await
}

/// Run `process` over `items` one at a time with the default sequential
/// settings.
pub async fn process_sequentially<T, R, E, F, Fut>(
    items: Vec<T>,
    process: F,
) -> Result<RunResult<R, E>, RunError<E>>
where
    F: Fn(T, usize) -> Fut,
    Fut: Future<Output = Result<R, E>>,
{
    SequentialRunner::default()
        .run(BatchRequest::new(items), process)
        .await
}
