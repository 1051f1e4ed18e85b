//! Yield controller — the cooperative pause between batches.
//!
//! A throughput/responsiveness trade-off, not a correctness mechanism.

use async_trait::async_trait;
use std::time::Duration;

/// Hands control back to the host runtime for an advisory duration.
///
/// # Object Safety
/// The trait is object-safe and can be stored as `Arc<dyn Yielder>`.
#[async_trait]
pub trait Yielder: Send + Sync {
    async fn pause(&self, delay: Duration);
}

/// Default yielder: sleeps for `delay`, or yields once to the scheduler when
/// `delay` is zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct SleepYielder;

#[async_trait]
impl Yielder for SleepYielder {
    async fn pause(&self, delay: Duration) {
        if delay.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(delay).await;
        }
    }
}

/// Never pauses. Maximum throughput, no relief for the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopYielder;

#[async_trait]
impl Yielder for NoopYielder {
    async fn pause(&self, _delay: Duration) {}
}
