//! `vbatch --outdir DIR --file URLS` – run one batch to completion.

use anyhow::Result;
use vbatch_core::batch::{self, BatchRequest};
use vbatch_core::config::VbatchConfig;
use vbatch_core::pool::{self, PoolReport, WorkerPool};
use vbatch_core::source::{self, Dispatcher, SourceKind, YtDlp};

use super::Cli;

/// Exit status when `--strict` is set and at least one URL failed.
pub const EXIT_PARTIAL_FAILURE: i32 = 2;

pub fn run_batch_command(cli: &Cli, cfg: &VbatchConfig) -> Result<i32> {
    let workers = cli
        .num_processes
        .map(|n| n as usize)
        .or(cfg.workers)
        .unwrap_or_else(pool::default_worker_count);
    let pool = WorkerPool::new(workers);

    let request = BatchRequest {
        url_file: cli.file.clone(),
        outdir: cli.outdir.clone(),
    };
    let urls = batch::prepare(&request)?;
    if needs_extractor(&urls) {
        check_extractor(cfg);
    }

    let dispatcher = Dispatcher::from_config(cfg);
    let report = batch::execute(&urls, &request.outdir, &pool, &dispatcher);

    if !report.failures.is_empty() {
        eprintln!("failed URLs:");
        for failure in &report.failures {
            eprintln!("  {} ({}): {}", failure.url, failure.kind, failure.message);
        }
    }
    if report.panicked_workers > 0 {
        eprintln!(
            "{} worker(s) stopped unexpectedly; some URLs were not attempted",
            report.panicked_workers
        );
    }
    println!(
        "Fetched {} of {} URL(s) into {} ({} failed)",
        report.fetched,
        report.attempted,
        cli.outdir.display(),
        report.failures.len()
    );

    Ok(exit_code(&report, cli.strict || cfg.strict))
}

/// 0 unless `strict` is set and the run was not clean.
pub fn exit_code(report: &PoolReport, strict: bool) -> i32 {
    if strict && !report.is_clean() {
        EXIT_PARTIAL_FAILURE
    } else {
        0
    }
}

/// True if any URL will be handed to yt-dlp.
pub(crate) fn needs_extractor(urls: &[String]) -> bool {
    urls.iter()
        .any(|url| source::classify(url).map_or(false, SourceKind::needs_extractor))
}

/// Warns up front when yt-dlp is missing; direct media links still work without it.
fn check_extractor(cfg: &VbatchConfig) {
    match YtDlp::new(cfg.ytdlp_path.clone()).version() {
        Ok(version) => tracing::info!(version = %version, "found yt-dlp"),
        Err(e) => {
            tracing::warn!("yt-dlp unavailable: {}", e);
            eprintln!("warning: {}; only direct media links can be downloaded", e);
        }
    }
}
