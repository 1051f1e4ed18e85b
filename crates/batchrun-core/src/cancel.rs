//! Cancellation monitor — cooperative, checkpoint-only cancellation.
//!
//! The monitor never interrupts a work-function future. Runners consult it
//! at their own checkpoints: the batched engine at batch boundaries, the
//! sequential runner before each item.

pub use tokio_util::sync::CancellationToken;

/// Wraps an optional caller token and counts how often it was consulted.
#[derive(Debug, Default)]
pub struct CancellationMonitor {
    token: Option<CancellationToken>,
    checks: usize,
}

impl CancellationMonitor {
    pub fn new(token: Option<CancellationToken>) -> Self {
        Self { token, checks: 0 }
    }

    /// Checkpoint: returns `true` if the caller has requested cancellation.
    pub fn should_stop(&mut self) -> bool {
        self.checks += 1;
        self.token.as_ref().is_some_and(|t| t.is_cancelled())
    }

    /// Number of checkpoints consulted so far.
    pub fn checks(&self) -> usize {
        self.checks
    }
}
