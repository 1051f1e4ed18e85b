//! Error types for the batchrun engine.
//!
//! Two tiers are kept strictly apart:
//! - [`InvocationError`] — configuration mistakes, raised before any item is
//!   dispatched.
//! - per-item failures — these are *values* in [`RunResult::errors`] and
//!   only surface as [`RunError::ItemFailed`] under
//!   [`FailureMode::FailFast`].
//!
//! [`RunResult::errors`]: crate::types::RunResult::errors
//! [`FailureMode::FailFast`]: crate::config::FailureMode::FailFast

use thiserror::Error;

/// Errors caused by how the engine was invoked, not by any item.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvocationError {
    #[error("Invalid batch size {size}: must be at least 1")]
    InvalidBatchSize { size: usize },

    #[error("Invalid yield interval {every}: must be at least 1")]
    InvalidYieldInterval { every: usize },

    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

/// Errors returned by a run.
///
/// `E` is the caller's per-item error type, carried through untouched.
#[derive(Debug, Error)]
pub enum RunError<E> {
    /// The run was rejected before any item was dispatched.
    #[error(transparent)]
    Invocation(#[from] InvocationError),

    /// An item failed while the run was in fail-fast mode.
    #[error("Item {index} failed: {error}")]
    ItemFailed { index: usize, error: E },
}

impl<E> RunError<E> {
    /// Returns `true` if the run never started because of a configuration error.
    pub fn is_invocation(&self) -> bool {
        matches!(self, Self::Invocation(_))
    }

    /// Global index of the item that aborted the run, if any.
    pub fn failed_index(&self) -> Option<usize> {
        match self {
            Self::ItemFailed { index, .. } => Some(*index),
            Self::Invocation(_) => None,
        }
    }

    /// Consume the error, returning the item error if this was an item failure.
    pub fn into_item_error(self) -> Option<(usize, E)> {
        match self {
            Self::ItemFailed { index, error } => Some((index, error)),
            Self::Invocation(_) => None,
        }
    }
}
