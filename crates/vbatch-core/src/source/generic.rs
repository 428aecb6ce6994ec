//! Generic source: any other http(s) URL, resolved by yt-dlp's own extractors.
//! The identifier is the extractor's `%(id)s`.

use std::path::{Path, PathBuf};

use super::error::FetchError;
use super::ytdlp::{escape_template, YtDlp};
use super::Fetch;

#[derive(Debug, Clone)]
pub struct GenericSource {
    ytdlp: YtDlp,
    format: String,
}

impl GenericSource {
    pub fn new(ytdlp: YtDlp, format: impl Into<String>) -> Self {
        Self {
            ytdlp,
            format: format.into(),
        }
    }
}

impl Fetch for GenericSource {
    fn fetch(&self, url: &str, outdir: &Path) -> Result<PathBuf, FetchError> {
        let template = escape_template(&outdir.to_string_lossy());
        let template = Path::new(&template).join("%(id)s.%(ext)s");
        tracing::debug!(url, format = %self.format, "fetching via generic extractor");
        self.ytdlp
            .download(url, &self.format, &template.to_string_lossy())
    }
}
