//! Outcome, result and progress types shared by every runner.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::eta;

/// The settled outcome of one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome<R, E> {
    Success { index: usize, result: R },
    Failure { index: usize, error: E },
}

impl<R, E> ItemOutcome<R, E> {
    /// Build an outcome from a work-function result.
    pub fn from_result(index: usize, result: Result<R, E>) -> Self {
        match result {
            Ok(result) => Self::Success { index, result },
            Err(error) => Self::Failure { index, error },
        }
    }

    /// Global index of the item this outcome belongs to.
    pub fn index(&self) -> usize {
        match self {
            Self::Success { index, .. } | Self::Failure { index, .. } => *index,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Aggregate result of a run.
#[derive(Debug, Clone)]
pub struct RunResult<R, E> {
    /// Successful results, in the original relative order of their items.
    pub results: Vec<R>,
    /// `(global_index, error)` pairs, in original order.
    pub errors: Vec<(usize, E)>,
    /// Items that reached the work function and settled.
    pub total_processed: usize,
    /// `true` when the run stopped early on a cancellation request.
    pub cancelled: bool,
    /// Wall-clock time of the whole run.
    pub duration: Duration,
}

impl<R, E> RunResult<R, E> {
    pub fn success_count(&self) -> usize {
        self.results.len()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Global indices of the failed items.
    pub fn failed_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.errors.iter().map(|(index, _)| *index)
    }

    /// Serializable counters, without the result or error payloads.
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            total_processed: self.total_processed,
            succeeded: self.results.len(),
            failed: self.errors.len(),
            cancelled: self.cancelled,
            duration_ms: self.duration.as_millis() as u64,
        }
    }
}

/// Payload-free view of a [`RunResult`] for logs, metrics and JSON output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub total_processed: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub cancelled: bool,
    pub duration_ms: u64,
}

/// Progress snapshot emitted once per completed batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEvent {
    /// Items settled so far, across all completed batches.
    pub processed: usize,
    /// Total items in the run.
    pub total: usize,
    /// Number of batches completed (1-based).
    pub batch_index: usize,
    pub total_batches: usize,
    /// Time since the run started.
    #[serde(with = "duration_ms")]
    pub elapsed: Duration,
}

impl ProgressEvent {
    /// Completed fraction in `[0.0, 1.0]`; an empty run counts as complete.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        self.processed as f64 / self.total as f64
    }

    /// Estimated time remaining, extrapolated from the pace so far.
    pub fn eta(&self) -> Option<Duration> {
        eta::estimate_remaining(self.processed, self.total, self.elapsed)
    }

    pub fn is_last(&self) -> bool {
        self.batch_index == self.total_batches
    }
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_from_result() {
        let ok: ItemOutcome<u32, String> = ItemOutcome::from_result(3, Ok(6));
        let err: ItemOutcome<u32, String> = ItemOutcome::from_result(4, Err("bad".into()));
        assert!(ok.is_success());
        assert!(!err.is_success());
        assert_eq!(ok.index(), 3);
        assert_eq!(err.index(), 4);
    }

    #[test]
    fn summary_counts() {
        let result: RunResult<u32, &str> = RunResult {
            results: vec![2, 6],
            errors: vec![(1, "odd")],
            total_processed: 3,
            cancelled: false,
            duration: Duration::from_millis(1_250),
        };
        let summary = result.summary();
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.duration_ms, 1_250);
        assert_eq!(result.failed_indices().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn progress_fraction_and_eta() {
        let event = ProgressEvent {
            processed: 25,
            total: 100,
            batch_index: 1,
            total_batches: 4,
            elapsed: Duration::from_secs(10),
        };
        assert!((event.fraction() - 0.25).abs() < f64::EPSILON);
        assert_eq!(event.eta(), Some(Duration::from_secs(30)));
        assert!(!event.is_last());
    }

    #[test]
    fn progress_serializes_elapsed_as_millis() {
        let event = ProgressEvent {
            processed: 3,
            total: 3,
            batch_index: 1,
            total_batches: 1,
            elapsed: Duration::from_millis(42),
        };
        let json = serde_json::to_value(event).unwrap();
        assert_eq!(json["elapsed"], 42);
        assert_eq!(json["batch_index"], 1);
    }
}
