//! Runner configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::InvocationError;

/// How a runner reacts to a failed item.
///
/// The same policy applies to the batched engine and the sequential runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureMode {
    /// Record the failure in `RunResult::errors` and keep going.
    #[default]
    Collect,
    /// Abort the run with `RunError::ItemFailed`. The batched engine still
    /// lets the current batch settle before aborting.
    FailFast,
}

impl std::fmt::Display for FailureMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Collect => write!(f, "collect"),
            Self::FailFast => write!(f, "fail_fast"),
        }
    }
}

/// Configuration for the batched engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Maximum items in flight at once (one batch).
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Advisory pause between batches, in milliseconds (0 = yield only).
    #[serde(default = "default_yield_delay_ms")]
    pub yield_delay_ms: u64,
    #[serde(default)]
    pub failure_mode: FailureMode,
}

fn default_batch_size() -> usize { 10 }
fn default_yield_delay_ms() -> u64 { 50 }

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            yield_delay_ms: default_yield_delay_ms(),
            failure_mode: FailureMode::Collect,
        }
    }
}

impl EngineConfig {
    /// Config with the given batch size and default everything else.
    pub fn with_batch_size(batch_size: usize) -> Self {
        Self {
            batch_size,
            ..Self::default()
        }
    }

    pub fn yield_delay(&self) -> Duration {
        Duration::from_millis(self.yield_delay_ms)
    }

    pub fn validate(&self) -> Result<(), InvocationError> {
        if self.batch_size == 0 {
            return Err(InvocationError::InvalidBatchSize {
                size: self.batch_size,
            });
        }
        Ok(())
    }
}

/// Configuration for the sequential runner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequentialConfig {
    /// Pause (and report progress) after every N items.
    #[serde(default = "default_yield_every")]
    pub yield_every: usize,
    /// Length of that pause, in milliseconds (0 = yield only).
    #[serde(default = "default_sequential_delay_ms")]
    pub yield_delay_ms: u64,
    #[serde(default)]
    pub failure_mode: FailureMode,
}

fn default_yield_every() -> usize { 20 }
fn default_sequential_delay_ms() -> u64 { 10 }

impl Default for SequentialConfig {
    fn default() -> Self {
        Self {
            yield_every: default_yield_every(),
            yield_delay_ms: default_sequential_delay_ms(),
            failure_mode: FailureMode::Collect,
        }
    }
}

impl SequentialConfig {
    pub fn yield_delay(&self) -> Duration {
        Duration::from_millis(self.yield_delay_ms)
    }

    pub fn validate(&self) -> Result<(), InvocationError> {
        if self.yield_every == 0 {
            return Err(InvocationError::InvalidYieldInterval {
                every: self.yield_every,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let engine = EngineConfig::default();
        assert_eq!(engine.batch_size, 10);
        assert_eq!(engine.yield_delay(), Duration::from_millis(50));
        assert_eq!(engine.failure_mode, FailureMode::Collect);

        let seq = SequentialConfig::default();
        assert_eq!(seq.yield_every, 20);
        assert!(seq.validate().is_ok());
    }

    #[test]
    fn zero_batch_size_invalid() {
        let err = EngineConfig::with_batch_size(0).validate().unwrap_err();
        assert_eq!(err, InvocationError::InvalidBatchSize { size: 0 });
    }

    #[test]
    fn zero_yield_interval_invalid() {
        let cfg = SequentialConfig {
            yield_every: 0,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(InvocationError::InvalidYieldInterval { every: 0 })
        ));
    }

    #[test]
    fn deserialize_with_defaults() {
        let cfg: EngineConfig =
            serde_json::from_str(r#"{ "batch_size": 4, "failure_mode": "fail_fast" }"#).unwrap();
        assert_eq!(cfg.batch_size, 4);
        assert_eq!(cfg.yield_delay_ms, 50);
        assert_eq!(cfg.failure_mode, FailureMode::FailFast);
    }
}
