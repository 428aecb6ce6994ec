//! CLI for the vbatch parallel video downloader.

mod run;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use vbatch_core::config;

pub use run::run_batch_command;

/// Download every URL in a list with a pool of parallel workers.
#[derive(Debug, Parser)]
#[command(name = "vbatch")]
#[command(about = "vbatch: bulk-download video URLs with parallel workers", long_about = None)]
pub struct Cli {
    /// Output directory where the videos will be saved (created if missing).
    #[arg(long, value_name = "PATH")]
    pub outdir: PathBuf,

    /// File containing the video URLs, one per line. Blank lines are ignored.
    #[arg(long, value_name = "PATH")]
    pub file: PathBuf,

    /// Number of parallel workers (default: `workers` from config, else the number of cores).
    #[arg(
        long = "num_processes",
        visible_alias = "num-processes",
        value_name = "N",
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub num_processes: Option<u32>,

    /// Exit with status 2 if any URL failed to download.
    #[arg(long)]
    pub strict: bool,
}

impl Cli {
    /// Parses arguments, loads config and runs the batch. Returns the process exit code.
    pub fn run_from_args() -> Result<i32> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);
        run_batch_command(&cli, &cfg)
    }
}
