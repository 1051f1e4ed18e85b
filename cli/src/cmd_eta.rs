//! `batchrun eta` — estimate remaining time from a progress sample.

use anyhow::{bail, Result};
use batchrun_core::eta::{estimate_remaining, format_eta};
use std::time::Duration;

pub fn run(processed: usize, total: usize, elapsed_ms: u64) -> Result<()> {
    if processed > total {
        bail!("processed ({processed}) exceeds total ({total})");
    }
    let eta = estimate_remaining(processed, total, Duration::from_millis(elapsed_ms));
    match eta {
        Some(d) => println!("{} ({} ms remaining)", format_eta(Some(d)), d.as_millis()),
        None => println!("unknown (nothing processed yet)"),
    }
    Ok(())
}
