//! Direct media links: single-stream HTTP GET via curl.
//!
//! Used for URLs whose last path segment is a media file (e.g. `clip.mp4`),
//! where no extractor is needed. The body is written to a private part file
//! next to `<id>.<ext>` and renamed over it once the response is known to be a 2xx.

use std::path::{Path, PathBuf};
use std::time::Duration;

use url::Url;

use super::error::FetchError;
use super::identifier;
use super::Fetch;
use crate::storage::PartFile;

#[derive(Debug, Clone)]
pub struct DirectSource {
    connect_timeout: Duration,
    transfer_timeout: Duration,
}

impl DirectSource {
    pub fn new(connect_timeout: Duration, transfer_timeout: Duration) -> Self {
        Self {
            connect_timeout,
            transfer_timeout,
        }
    }

    /// GETs `url` into `part`. Returns the number of bytes written.
    fn transfer(&self, url: &str, part: &mut PartFile) -> Result<u64, FetchError> {
        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.connect_timeout(self.connect_timeout)?;
        easy.low_speed_limit(1024)?;
        easy.low_speed_time(Duration::from_secs(60))?;
        easy.timeout(self.transfer_timeout)?;

        let mut written = 0u64;
        let mut write_err: Option<std::io::Error> = None;
        let performed = {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| match part.write_all(data) {
                Ok(()) => {
                    written += data.len() as u64;
                    Ok(data.len())
                }
                Err(e) => {
                    write_err = Some(e);
                    Ok(0) // abort transfer
                }
            })?;
            transfer.perform()
        };

        if let Some(e) = write_err {
            return Err(FetchError::Io(e));
        }
        performed?;

        let code = easy.response_code()?;
        if !(200..300).contains(&code) {
            return Err(FetchError::Network(format!("GET returned HTTP {}", code)));
        }
        Ok(written)
    }
}

impl Fetch for DirectSource {
    fn fetch(&self, url: &str, outdir: &Path) -> Result<PathBuf, FetchError> {
        let parsed =
            Url::parse(url).map_err(|e| FetchError::Unsupported(format!("{}: {}", url, e)))?;
        let (stem, ext) = identifier::direct_file_name(&parsed).ok_or_else(|| {
            FetchError::Extraction(format!("no media file name in {}", url))
        })?;
        let final_name = format!("{}.{}", stem, ext);
        let final_path = outdir.join(&final_name);

        let mut part = PartFile::create_in(outdir, &final_name)?;
        match self.transfer(url, &mut part) {
            Ok(bytes) => {
                part.finalize(&final_path)?;
                tracing::debug!(url, bytes, "direct download finished");
                Ok(final_path)
            }
            Err(e) => {
                part.discard();
                Err(e)
            }
        }
    }
}
