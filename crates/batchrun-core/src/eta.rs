//! Remaining-time estimation for progress displays.
//!
//! Purely a display aid; nothing in the engine schedules on it.

use std::time::Duration;

/// Linearly extrapolate the time left from the pace so far.
///
/// Returns `None` when nothing has been processed yet, since there is no
/// sample to extrapolate from. The estimate is rounded to the nearest
/// millisecond.
pub fn estimate_remaining(processed: usize, total: usize, elapsed: Duration) -> Option<Duration> {
    if processed == 0 {
        return None;
    }
    let remaining = total.saturating_sub(processed) as f64;
    let per_item_ms = elapsed.as_secs_f64() * 1_000.0 / processed as f64;
    let ms = (remaining * per_item_ms).round() as u64;
    Some(Duration::from_millis(ms))
}

/// Render an estimate as `~Xs` or `~Xm Ys`; an unknown estimate renders empty.
pub fn format_eta(eta: Option<Duration>) -> String {
    let Some(eta) = eta else {
        return String::new();
    };
    let secs = eta.as_millis().saturating_add(500) / 1_000;
    if secs < 60 {
        format!("~{secs}s")
    } else {
        format!("~{}m {}s", secs / 60, secs % 60)
    }
}
