// crates/fcmtune-cli/src/main.rs

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cmd;
mod io;

#[derive(Parser)]
#[command(name = "fcmtune-cli")]
#[command(about = "Sequence complexity and finite-context model tuning", long_about = None)]
pub struct Cli {
    /// Log filter for diagnostics on stderr (e.g. "info", "fcmtune_core=debug")
    #[arg(long, global = true, default_value = "warn")]
    pub log: String,

    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Shannon entropy, order-k conditional entropy and redundancy of a file
    Entropy(cmd::entropy::EntropyArgs),

    /// Grid-search (k, alpha) with the external scorer, or evaluate one configuration
    Tune(cmd::tune::TuneArgs),

    /// Tune alpha for text with k fixed to the mean word length
    TuneWords(cmd::tune_words::TuneWordsArgs),

    /// Export the per-position complexity profile of one configuration
    Profile(cmd::profile::ProfileArgs),

    /// zstd bits/symbol baseline for one or more files
    Baseline(cmd::baseline::BaselineArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cli.log))
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Commands::Entropy(args) => cmd::entropy::run(args),
        Commands::Tune(args) => cmd::tune::run(args),
        Commands::TuneWords(args) => cmd::tune_words::run(args),
        Commands::Profile(args) => cmd::profile::run(args),
        Commands::Baseline(args) => cmd::baseline::run(args),
    }
}
