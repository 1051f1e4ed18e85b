//! batchrun-core — shared primitives for the batchrun execution engine.
//!
//! # Overview
//!
//! The core crate holds everything the engine needs that is not the
//! scheduling loop itself:
//!
//! - [`chunk`] — order-preserving, fixed-size batch splitting
//! - [`types`] — [`ItemOutcome`], [`RunResult`], [`ProgressEvent`]
//! - [`error`] — [`InvocationError`] and [`RunError`]
//! - [`cancel`] — [`CancellationMonitor`] over a cooperative token
//! - [`yielder`] — the pluggable [`Yielder`] used between batches
//! - [`progress`] — progress and batch-completion callback traits
//! - [`eta`] — remaining-time estimation and formatting
//! - [`config`] — serde-backed engine configuration

pub mod cancel;
pub mod chunk;
pub mod config;
pub mod error;
pub mod eta;
pub mod progress;
pub mod types;
pub mod yielder;

pub use cancel::{CancellationMonitor, CancellationToken};
pub use chunk::{batch_count, chunk, Batch};
pub use config::{EngineConfig, FailureMode, SequentialConfig};
pub use error::{InvocationError, RunError};
pub use eta::{estimate_remaining, format_eta};
pub use progress::{BatchCallback, ProgressCallback};
pub use types::{ItemOutcome, ProgressEvent, RunResult, RunSummary};
pub use yielder::{NoopYielder, SleepYielder, Yielder};
