//! Reading the input URL list (one URL per line).

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Parses URL list text: each line is trimmed, blank lines are dropped.
/// Duplicates and ordering are kept as given.
pub fn parse_url_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Reads and parses the URL list at `path`.
pub fn read_url_list(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read URL list {}", path.display()))?;
    Ok(parse_url_list(&text))
}
