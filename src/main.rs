//! craft-diff CLI
//!
//! Runs the differential verification experiment and prints the per-trial
//! and pooled `-log2` probability estimates.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use craft_diff::{Block, Differential, ExperimentConfig, ExperimentRunner, KeyModel};
use tracing_subscriber::EnvFilter;

#[derive(Copy, Clone, ValueEnum)]
enum KeyModelArg {
    /// Master key XOR fresh tweak (CRAFT tweakey schedule)
    Tweakey,
    /// Independent random subkey per round
    Independent,
}

impl From<KeyModelArg> for KeyModel {
    fn from(arg: KeyModelArg) -> Self {
        match arg {
            KeyModelArg::Tweakey => KeyModel::Tweakey,
            KeyModelArg::Independent => KeyModel::IndependentSubkeys,
        }
    }
}

#[derive(Parser)]
#[command(name = "craft-diff")]
#[command(about = "Monte Carlo verification of CRAFT differential probabilities", long_about = None)]
#[command(version)]
struct Cli {
    /// Number of cipher rounds
    #[arg(short, long, default_value_t = 6)]
    rounds: usize,

    /// Independent trials, each under a fresh master key
    #[arg(short = 'n', long, default_value_t = 10)]
    trials: usize,

    /// Parallel workers per trial
    #[arg(short, long, default_value_t = 8)]
    workers: usize,

    /// log2 of the bunches per worker (one fresh tweak per bunch)
    #[arg(short = 'b', long, default_value_t = 10)]
    log2_bunches: u32,

    /// Plaintext pairs per bunch
    #[arg(short, long, default_value_t = 1024)]
    queries: u64,

    /// Input difference, 16 hex digits, nibble 0 first
    #[arg(long, default_value = "AA000A00A00A0A00")]
    input_diff: Block,

    /// Output difference, 16 hex digits, nibble 0 first
    #[arg(long, default_value = "000A0000A00A0A00")]
    output_diff: Block,

    #[arg(long, value_enum, default_value_t = KeyModelArg::Tweakey)]
    key_model: KeyModelArg,

    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Worker pool size (defaults to --workers)
    #[arg(long)]
    threads: Option<usize>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let bunches_per_worker = 1u64
        .checked_shl(cli.log2_bunches)
        .context("--log2-bunches must be below 64")?;

    let config = ExperimentConfig {
        rounds: cli.rounds,
        trials: cli.trials,
        workers: cli.workers,
        bunches_per_worker,
        queries_per_bunch: cli.queries,
        differential: Differential::new(cli.input_diff, cli.output_diff),
        key_model: cli.key_model.into(),
        seed: cli.seed,
        threads: cli.threads,
    };

    let runner = ExperimentRunner::new(config).context("invalid experiment configuration")?;
    let report = runner.run()?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report);
    }
    Ok(())
}
