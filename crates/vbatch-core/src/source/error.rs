//! Per-item fetch error type.

use std::fmt;

/// Why fetching a single URL failed. Never fatal for the batch; the worker
/// logs it and moves on to the next URL in its chunk.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Not a URL we can hand to any source (bad syntax, non-http scheme, no extractor).
    #[error("unsupported URL: {0}")]
    Unsupported(String),
    /// Network-level failure reported by the extractor or an HTTP status error.
    #[error("network error: {0}")]
    Network(String),
    /// Transport failure inside curl (connect, timeout, TLS).
    #[error("network error: {0}")]
    Curl(#[from] curl::Error),
    /// The extractor ran but could not resolve or save a stream.
    #[error("extraction failed: {0}")]
    Extraction(String),
    /// The external extractor could not be started.
    #[error("could not run {program}: {source}")]
    Tool {
        program: String,
        #[source]
        source: std::io::Error,
    },
    /// Disk write or rename failed.
    #[error("storage: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse failure class, used for logging and the run report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Unsupported,
    Network,
    Extraction,
    Tool,
    Storage,
}

impl FetchError {
    pub fn kind(&self) -> FailureKind {
        match self {
            FetchError::Unsupported(_) => FailureKind::Unsupported,
            FetchError::Network(_) | FetchError::Curl(_) => FailureKind::Network,
            FetchError::Extraction(_) => FailureKind::Extraction,
            FetchError::Tool { .. } => FailureKind::Tool,
            FetchError::Io(_) => FailureKind::Storage,
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FailureKind::Unsupported => "unsupported",
            FailureKind::Network => "network",
            FailureKind::Extraction => "extraction",
            FailureKind::Tool => "tool",
            FailureKind::Storage => "storage",
        };
        f.write_str(s)
    }
}
