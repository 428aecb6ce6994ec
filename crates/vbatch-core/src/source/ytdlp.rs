//! Blocking wrapper around the external `yt-dlp` extractor.
//!
//! Site-specific manifest parsing and stream selection live entirely in
//! yt-dlp; this module only builds the command line, waits for the process
//! and classifies its stderr into a `FetchError`.

use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

use super::error::FetchError;

/// Handle to a yt-dlp executable.
#[derive(Debug, Clone)]
pub struct YtDlp {
    program: PathBuf,
}

impl YtDlp {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Runs `yt-dlp --version` and returns the trimmed version string.
    pub fn version(&self) -> Result<String, FetchError> {
        let output = self.run(&["--version"])?;
        if !output.status.success() {
            return Err(classify_failure(&String::from_utf8_lossy(&output.stderr)));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Downloads `url` using `format` and the output template `template`
    /// (a yt-dlp `-o` template, already escaped). Returns the final file path.
    pub fn download(
        &self,
        url: &str,
        format: &str,
        template: &str,
    ) -> Result<PathBuf, FetchError> {
        let output = self.run(&[
            "--no-playlist",
            "--no-progress",
            "--no-simulate",
            "-f",
            format,
            "-o",
            template,
            "--print",
            "after_move:filepath",
            "--",
            url,
        ])?;

        if !output.status.success() {
            return Err(classify_failure(&String::from_utf8_lossy(&output.stderr)));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        stdout
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .last()
            .map(PathBuf::from)
            .ok_or_else(|| FetchError::Extraction("yt-dlp reported no output file".to_string()))
    }

    fn run(&self, args: &[&str]) -> Result<Output, FetchError> {
        tracing::trace!(program = %self.program.display(), ?args, "spawning yt-dlp");
        Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| FetchError::Tool {
                program: self.program.display().to_string(),
                source,
            })
    }
}

/// Escapes `%` so a literal path can be embedded in a yt-dlp output template.
pub fn escape_template(literal: &str) -> String {
    literal.replace('%', "%%")
}

/// Classifies yt-dlp stderr into a fetch error.
///
/// "Unsupported URL" → `Unsupported`; HTTP, DNS, connection and timeout
/// failures → `Network`; anything else → `Extraction`.
pub fn classify_failure(stderr: &str) -> FetchError {
    let message = error_message(stderr);
    let lower = message.to_ascii_lowercase();

    if lower.contains("unsupported url") {
        return FetchError::Unsupported(message);
    }
    const NETWORK_MARKERS: &[&str] = &[
        "http error",
        "unable to download webpage",
        "timed out",
        "connection refused",
        "connection reset",
        "name resolution",
        "name or service not known",
        "getaddrinfo failed",
        "network is unreachable",
        "ssl:",
    ];
    if NETWORK_MARKERS.iter().any(|m| lower.contains(m)) {
        return FetchError::Network(message);
    }
    FetchError::Extraction(message)
}

/// The most relevant stderr line: the last `ERROR:` line, else the last non-empty line.
fn error_message(stderr: &str) -> String {
    let lines: Vec<&str> = stderr
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    lines
        .iter()
        .rev()
        .find(|l| l.starts_with("ERROR:"))
        .or_else(|| lines.last())
        .map(|l| l.trim_start_matches("ERROR:").trim().to_string())
        .unwrap_or_else(|| "yt-dlp exited with an error".to_string())
}
