//! Part-file lifecycle for direct downloads.
//!
//! Every fetch writes to its own uniquely named `.<name>.XXXXXX.part` file in
//! the output directory and atomically renames it over `<name>` once the
//! transfer succeeded. Two workers saving the same identifier never share a
//! temp file; the last rename wins.

use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Sequential writer for a temp download file.
pub struct PartFile {
    file: NamedTempFile,
}

impl PartFile {
    /// Create a fresh temp file in `dir` for the eventual file `final_name`.
    pub fn create_in(dir: &Path, final_name: &str) -> io::Result<Self> {
        let file = tempfile::Builder::new()
            .prefix(&format!(".{}.", final_name))
            .suffix(TEMP_SUFFIX)
            .tempfile_in(dir)?;
        Ok(PartFile { file })
    }

    /// Append `data` at the current end of the file.
    pub fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        self.file.write_all(data)
    }

    /// Flush to disk and rename over `final_path`, replacing any existing file.
    pub fn finalize(self, final_path: &Path) -> io::Result<()> {
        self.file.as_file().sync_all()?;
        self.file.persist(final_path).map_err(|e| e.error)?;
        Ok(())
    }

    /// Close and remove the temp file (best effort).
    pub fn discard(self) {
        if let Err(e) = self.file.close() {
            tracing::debug!("could not remove part file: {}", e);
        }
    }
}
