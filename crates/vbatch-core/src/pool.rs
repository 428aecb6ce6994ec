//! Fixed-size worker pool.
//!
//! The URL list is split round-robin into one chunk per worker. Every
//! non-empty chunk runs on its own OS thread, fetching its URLs strictly in
//! order. A failed fetch is logged and the worker moves on; nothing a single
//! item does can stop its own worker or any sibling. `run` returns only
//! after every worker thread has been joined.

use std::path::Path;
use std::thread;

use crate::partition;
use crate::source::{FailureKind, Fetch};

/// One URL that could not be fetched.
#[derive(Debug, Clone)]
pub struct ItemFailure {
    pub url: String,
    pub worker: usize,
    pub kind: FailureKind,
    pub message: String,
}

/// Outcome of a pool run.
#[derive(Debug, Clone, Default)]
pub struct PoolReport {
    /// URLs handed to the fetcher.
    pub attempted: usize,
    /// URLs written to the output directory.
    pub fetched: usize,
    pub failures: Vec<ItemFailure>,
    /// Workers whose thread panicked; their remaining URLs were not attempted.
    pub panicked_workers: usize,
}

impl PoolReport {
    /// True if every attempted URL was fetched and no worker panicked.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.panicked_workers == 0
    }

    fn merge(&mut self, other: PoolReport) {
        self.attempted += other.attempted;
        self.fetched += other.fetched;
        self.failures.extend(other.failures);
        self.panicked_workers += other.panicked_workers;
    }
}

/// A pool with a fixed number of workers. Holds no global state; construct
/// one per run and pass it to whoever drives the batch.
#[derive(Debug, Clone, Copy)]
pub struct WorkerPool {
    workers: usize,
}

impl WorkerPool {
    /// Pool with `workers` workers (at least one).
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Partitions `urls` across the workers, fetches every URL into `outdir`
    /// and waits for all workers to finish.
    pub fn run<F: Fetch + ?Sized>(
        &self,
        outdir: &Path,
        urls: &[String],
        fetcher: &F,
    ) -> PoolReport {
        let chunks = partition::round_robin(urls, self.workers);
        let mut report = PoolReport::default();

        thread::scope(|scope| {
            let mut handles = Vec::with_capacity(chunks.len());
            for (index, chunk) in chunks.iter().enumerate() {
                if chunk.is_empty() {
                    tracing::debug!(worker = index, "no URLs assigned; worker idle");
                    continue;
                }
                let spawned = thread::Builder::new()
                    .name(format!("vbatch-worker-{}", index))
                    .spawn_scoped(scope, move || run_chunk(index, chunk, outdir, fetcher));
                match spawned {
                    Ok(handle) => handles.push((index, handle)),
                    Err(e) => {
                        tracing::warn!(
                            worker = index,
                            "could not spawn worker thread ({}); running chunk inline",
                            e
                        );
                        report.merge(run_chunk(index, chunk, outdir, fetcher));
                    }
                }
            }

            for (index, handle) in handles {
                match handle.join() {
                    Ok(worker_report) => report.merge(worker_report),
                    Err(_) => {
                        tracing::error!(worker = index, "worker thread panicked");
                        report.panicked_workers += 1;
                    }
                }
            }
        });

        report
    }
}

/// Number of available cores, falling back to 1.
pub fn default_worker_count() -> usize {
    thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
}

fn run_chunk<F: Fetch + ?Sized>(
    worker: usize,
    chunk: &[String],
    outdir: &Path,
    fetcher: &F,
) -> PoolReport {
    let _span = tracing::info_span!("worker", id = worker).entered();
    tracing::debug!(urls = chunk.len(), "worker started");

    let mut report = PoolReport::default();
    for url in chunk {
        report.attempted += 1;
        match fetcher.fetch(url, outdir) {
            Ok(path) => {
                report.fetched += 1;
                tracing::info!(url = %url, path = %path.display(), "fetched");
            }
            Err(e) => {
                tracing::warn!(url = %url, kind = %e.kind(), "failed to download: {}", e);
                report.failures.push(ItemFailure {
                    url: url.clone(),
                    worker,
                    kind: e.kind(),
                    message: e.to_string(),
                });
            }
        }
    }

    tracing::debug!(
        fetched = report.fetched,
        failed = report.failures.len(),
        "worker finished"
    );
    report
}
