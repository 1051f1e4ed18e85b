//! Outcome aggregator — accumulates settled items into a [`RunResult`].
//!
//! Owned by exactly one run; no synchronization.

use batchrun_core::types::{ItemOutcome, RunResult};
use std::time::Duration;

#[derive(Debug)]
pub struct OutcomeAggregator<R, E> {
    results: Vec<R>,
    errors: Vec<(usize, E)>,
    processed: usize,
}

impl<R, E> OutcomeAggregator<R, E> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(n: usize) -> Self {
        Self {
            results: Vec::with_capacity(n),
            errors: Vec::new(),
            processed: 0,
        }
    }

    /// Record one settled item. Callers feed outcomes in dispatch order.
    pub fn record(&mut self, outcome: ItemOutcome<R, E>) {
        self.processed += 1;
        match outcome {
            ItemOutcome::Success { result, .. } => self.results.push(result),
            ItemOutcome::Failure { index, error } => self.errors.push((index, error)),
        }
    }

    pub fn processed(&self) -> usize {
        self.processed
    }

    pub fn result_count(&self) -> usize {
        self.results.len()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Results recorded since `mark` (a prior [`result_count`](Self::result_count)).
    pub fn results_since(&self, mark: usize) -> &[R] {
        &self.results[mark.min(self.results.len())..]
    }

    /// Global indices of the errors recorded since `mark`.
    pub fn failed_since(&self, mark: usize) -> impl Iterator<Item = usize> + '_ {
        self.errors[mark.min(self.errors.len())..]
            .iter()
            .map(|(index, _)| *index)
    }

    /// Remove and return the first error recorded since `mark`.
    pub fn take_first_error_since(&mut self, mark: usize) -> Option<(usize, E)> {
        if mark < self.errors.len() {
            Some(self.errors.remove(mark))
        } else {
            None
        }
    }

    pub fn finish(self, cancelled: bool, duration: Duration) -> RunResult<R, E> {
        RunResult {
            results: self.results,
            errors: self.errors,
            total_processed: self.processed,
            cancelled,
            duration,
        }
    }
}

impl<R, E> Default for OutcomeAggregator<R, E> {
    fn default() -> Self {
        Self::new()
    }
}
