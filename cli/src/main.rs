//! batchrun CLI — drive the batch engine from the command line.
//!
//! # Commands
//! ```
//! batchrun simulate --items <N> [--batch-size <B>] [--sequential] [--fail-every <K>]
//! batchrun eta      --processed <P> --total <T> --elapsed-ms <MS>
//! batchrun config   [--config <path.yaml>]
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cmd_eta;
mod cmd_simulate;
mod config;

use config::RunnerConfig;

#[derive(Parser)]
#[command(
    name = "batchrun",
    about = "Bounded-concurrency batch runner — batchrun CLI",
    long_about = "
batchrun CLI: push synthetic workloads through the batched engine or the
sequential runner, estimate completion times, and check runner configs.

Log levels come from the `log` section of the config file; --verbose
raises the base level to debug.
",
    version
)]
struct Cli {
    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Runner config file (YAML); defaults are used when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a synthetic workload and print a summary
    Simulate {
        /// Number of items to process
        #[arg(long, default_value_t = 200)]
        items: u64,
        /// Items per batch (overrides the config file)
        #[arg(short, long)]
        batch_size: Option<usize>,
        /// Pause between batches in ms (overrides the config file)
        #[arg(long)]
        delay_ms: Option<u64>,
        /// Simulated work per item in ms
        #[arg(long, default_value_t = 5)]
        work_ms: u64,
        /// Fail every K-th item (0 = never)
        #[arg(long, default_value_t = 0)]
        fail_every: u64,
        /// Use the one-at-a-time runner instead of the batched engine
        #[arg(long)]
        sequential: bool,
        /// Abort on the first failure instead of collecting
        #[arg(long)]
        fail_fast: bool,
        /// Request cancellation once this many batches have completed
        #[arg(long)]
        cancel_after_batches: Option<usize>,
        /// Output the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Estimate the remaining time of a run from a progress sample
    Eta {
        #[arg(long)]
        processed: usize,
        #[arg(long)]
        total: usize,
        #[arg(long)]
        elapsed_ms: u64,
    },

    /// Validate the runner config and print it with defaults filled in
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut runner_config = RunnerConfig::load(cli.config.as_deref())?;
    if cli.verbose {
        runner_config.log.level = "debug".into();
    }
    // A second subscriber (e.g. under a test harness) is not an error here.
    let _ = batchrun_observability::init_tracing(&runner_config.log);

    match cli.command {
        Commands::Simulate {
            items,
            batch_size,
            delay_ms,
            work_ms,
            fail_every,
            sequential,
            fail_fast,
            cancel_after_batches,
            json,
        } => {
            let args = cmd_simulate::SimulateArgs {
                items,
                batch_size,
                delay_ms,
                work_ms,
                fail_every,
                sequential,
                fail_fast,
                cancel_after_batches,
                json,
            };
            cmd_simulate::run(args, runner_config).await
        }

        Commands::Eta { processed, total, elapsed_ms } => {
            cmd_eta::run(processed, total, elapsed_ms)
        }

        Commands::Config => cmd_config(&runner_config),
    }
}

fn cmd_config(config: &RunnerConfig) -> Result<()> {
    config.validate()?;
    let yaml = serde_yaml::to_string(config).context("serializing runner config")?;
    print!("{yaml}");
    println!("# config OK");
    Ok(())
}
