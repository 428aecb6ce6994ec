//! Logging: a detailed file log under the XDG state dir plus a terse stderr
//! console for warnings, so per-URL failures show up while the batch runs.
//!
//! `RUST_LOG` overrides the file filter. The console always shows warnings
//! and errors only.

use anyhow::Result;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

const FILE_FILTER: &str = "info,vbatch_core=debug,vbatch_cli=debug";
const CONSOLE_LEVEL: LevelFilter = LevelFilter::WARN;

/// Path of the log file: `~/.local/state/vbatch/vbatch.log`.
pub fn log_file_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("vbatch")?;
    Ok(xdg_dirs.get_state_home().join("vbatch.log"))
}

fn file_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(FILE_FILTER))
}

/// Warnings and errors on stderr, one line each, tagged with the worker thread.
fn console_layer<S>() -> impl Layer<S>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    fmt::layer()
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .with_thread_names(true)
        .with_ansi(false)
        .with_filter(CONSOLE_LEVEL)
}

/// Install the file log at [`log_file_path`] together with the stderr console.
///
/// Returns Err if the log file cannot be opened (or a subscriber is already
/// set), so the caller can fall back to [`init_logging_stderr`].
pub fn init_logging() -> Result<()> {
    let path = log_file_path()?;
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)?;

    let file_layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_thread_names(true)
        .with_ansi(false)
        .with_filter(file_filter());

    tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer())
        .try_init()?;

    tracing::info!("vbatch logging initialized at {}", path.display());
    Ok(())
}

/// Console only, for when the file log is unavailable.
pub fn init_logging_stderr() {
    if let Err(e) = tracing_subscriber::registry()
        .with(console_layer())
        .try_init()
    {
        eprintln!("vbatch: logging disabled: {}", e);
    }
}
