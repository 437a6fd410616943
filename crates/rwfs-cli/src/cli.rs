use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "rwfs",
    about = "Readers-writers file server: concurrent user simulation over a guarded store",
    version,
)]
pub struct Cli {
    /// Defaults to `run`.
    #[command(subcommand)]
    pub command: Option<Command>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// TOML file with `[guard]` and `[workload]` tables.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Seed records, run the simulated users and print a report
    Run(Overrides),
    /// Print the effective configuration
    Config(Overrides),
}

/// Command-line values that take precedence over the config file.
#[derive(Args, Clone, Debug, Default)]
pub struct Overrides {
    /// Number of simulated users
    #[arg(short, long)]
    pub users: Option<usize>,
    /// Number of seeded records
    #[arg(short, long)]
    pub records: Option<usize>,
    /// Probability that a user writes instead of reads
    #[arg(long)]
    pub write_probability: Option<f64>,
    /// Seed for the user plan (at most i64::MAX, so it fits in TOML)
    #[arg(long, value_parser = clap::value_parser!(u64).range(..=i64::MAX as u64))]
    pub rng_seed: Option<u64>,
    /// Use a sharded lock with this many shards instead of the global lock
    #[arg(long)]
    pub shards: Option<usize>,
    #[arg(long)]
    pub min_latency_ms: Option<u64>,
    #[arg(long)]
    pub max_latency_ms: Option<u64>,
}
