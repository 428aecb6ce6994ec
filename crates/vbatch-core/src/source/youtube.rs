//! YouTube source: video id as identifier, lowest quality stream by default.

use std::path::{Path, PathBuf};

use url::Url;

use super::error::FetchError;
use super::identifier;
use super::ytdlp::{escape_template, YtDlp};
use super::Fetch;

#[derive(Debug, Clone)]
pub struct YouTubeSource {
    ytdlp: YtDlp,
    format: String,
}

impl YouTubeSource {
    pub fn new(ytdlp: YtDlp, format: impl Into<String>) -> Self {
        Self {
            ytdlp,
            format: format.into(),
        }
    }
}

impl Fetch for YouTubeSource {
    fn fetch(&self, url: &str, outdir: &Path) -> Result<PathBuf, FetchError> {
        let parsed =
            Url::parse(url).map_err(|e| FetchError::Unsupported(format!("{}: {}", url, e)))?;
        let id = identifier::youtube_video_id(&parsed)
            .ok_or_else(|| FetchError::Extraction(format!("no YouTube video id in {}", url)))?;
        let template = format!(
            "{}.%(ext)s",
            escape_template(&outdir.join(&id).to_string_lossy())
        );
        tracing::debug!(url, id = %id, format = %self.format, "fetching YouTube video");
        self.ytdlp.download(url, &self.format, &template)
    }
}
