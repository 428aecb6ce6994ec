//! Batch orchestration: read URL list → create output dir → run the pool.
//!
//! Input and output-directory errors are fatal and surface before any worker
//! starts. Per-item errors stay inside the pool and come back in the report.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::pool::{PoolReport, WorkerPool};
use crate::source::Fetch;
use crate::url_list;

/// One batch run: where the URLs come from and where files go.
#[derive(Debug, Clone)]
pub struct BatchRequest {
    pub url_file: PathBuf,
    pub outdir: PathBuf,
}

/// Reads the URL list and creates the output directory.
///
/// Nothing is fetched; an unreadable list leaves the filesystem untouched.
pub fn prepare(request: &BatchRequest) -> Result<Vec<String>> {
    let urls = url_list::read_url_list(&request.url_file)?;
    fs::create_dir_all(&request.outdir).with_context(|| {
        format!(
            "failed to create output directory {}",
            request.outdir.display()
        )
    })?;
    Ok(urls)
}

/// Fetches `urls` into `outdir` on `pool` and waits for every worker.
pub fn execute<F: Fetch + ?Sized>(
    urls: &[String],
    outdir: &Path,
    pool: &WorkerPool,
    fetcher: &F,
) -> PoolReport {
    tracing::info!(
        urls = urls.len(),
        workers = pool.workers(),
        outdir = %outdir.display(),
        "starting batch"
    );
    let report = pool.run(outdir, urls, fetcher);
    tracing::info!(
        attempted = report.attempted,
        fetched = report.fetched,
        failed = report.failures.len(),
        panicked_workers = report.panicked_workers,
        "batch finished"
    );
    report
}

/// Runs a batch to completion on `pool` using `fetcher` for every URL.
pub fn run_batch<F: Fetch + ?Sized>(
    request: &BatchRequest,
    pool: &WorkerPool,
    fetcher: &F,
) -> Result<PoolReport> {
    let urls = prepare(request)?;
    Ok(execute(&urls, &request.outdir, pool, fetcher))
}
