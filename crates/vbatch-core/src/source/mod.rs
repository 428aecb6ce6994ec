//! Resource sources and the shared fetch capability.
//!
//! Every URL is classified into a closed set of source kinds; each kind has
//! a source implementing [`Fetch`]. The [`Dispatcher`] does the
//! classification and forwards to the matching source, so callers only ever
//! see the `Fetch` trait.

mod direct;
mod error;
mod generic;
pub mod identifier;
mod youtube;
pub mod ytdlp;

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use url::Url;

use crate::config::VbatchConfig;

pub use direct::DirectSource;
pub use error::{FailureKind, FetchError};
pub use generic::GenericSource;
pub use youtube::YouTubeSource;
pub use ytdlp::YtDlp;

/// Fetches one resource into `outdir` as `<identifier>.<ext>` and returns the written path.
///
/// Implementations are shared read-only across worker threads.
pub trait Fetch: Sync {
    fn fetch(&self, url: &str, outdir: &Path) -> Result<PathBuf, FetchError>;
}

/// Which source handles a URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    YouTube,
    Direct,
    Generic,
}

impl SourceKind {
    /// True for kinds resolved through yt-dlp.
    pub fn needs_extractor(self) -> bool {
        !matches!(self, SourceKind::Direct)
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SourceKind::YouTube => "youtube",
            SourceKind::Direct => "direct",
            SourceKind::Generic => "generic",
        };
        f.write_str(s)
    }
}

/// Classifies a URL. Unparseable URLs and non-http(s) schemes are `Unsupported`.
pub fn classify(url: &str) -> Result<SourceKind, FetchError> {
    let parsed =
        Url::parse(url).map_err(|e| FetchError::Unsupported(format!("{}: {}", url, e)))?;
    match parsed.scheme() {
        "http" | "https" => {}
        other => {
            return Err(FetchError::Unsupported(format!(
                "{}: scheme {:?} is not http(s)",
                url, other
            )))
        }
    }
    let host = parsed
        .host_str()
        .ok_or_else(|| FetchError::Unsupported(format!("{}: missing host", url)))?;

    if identifier::is_youtube_host(host) {
        Ok(SourceKind::YouTube)
    } else if identifier::direct_file_name(&parsed).is_some() {
        Ok(SourceKind::Direct)
    } else {
        Ok(SourceKind::Generic)
    }
}

/// Routes each URL to the source for its [`SourceKind`].
#[derive(Debug, Clone)]
pub struct Dispatcher {
    youtube: YouTubeSource,
    direct: DirectSource,
    generic: GenericSource,
}

impl Dispatcher {
    pub fn new(youtube: YouTubeSource, direct: DirectSource, generic: GenericSource) -> Self {
        Self {
            youtube,
            direct,
            generic,
        }
    }

    pub fn from_config(cfg: &VbatchConfig) -> Self {
        let ytdlp = YtDlp::new(cfg.ytdlp_path.clone());
        Self::new(
            YouTubeSource::new(ytdlp.clone(), cfg.youtube_format.clone()),
            DirectSource::new(
                Duration::from_secs(cfg.connect_timeout_secs),
                Duration::from_secs(cfg.transfer_timeout_secs),
            ),
            GenericSource::new(ytdlp, cfg.generic_format.clone()),
        )
    }

    pub fn source(&self, kind: SourceKind) -> &dyn Fetch {
        match kind {
            SourceKind::YouTube => &self.youtube,
            SourceKind::Direct => &self.direct,
            SourceKind::Generic => &self.generic,
        }
    }
}

impl Fetch for Dispatcher {
    fn fetch(&self, url: &str, outdir: &Path) -> Result<PathBuf, FetchError> {
        let kind = classify(url)?;
        tracing::debug!(url, %kind, "classified URL");
        self.source(kind).fetch(url, outdir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_youtube() {
        assert_eq!(
            classify("https://www.youtube.com/watch?v=abc").unwrap(),
            SourceKind::YouTube
        );
        assert_eq!(classify("https://youtu.be/abc").unwrap(), SourceKind::YouTube);
    }

    #[test]
    fn classify_direct_media() {
        assert_eq!(
            classify("https://cdn.example.com/v/clip.mp4").unwrap(),
            SourceKind::Direct
        );
        assert_eq!(
            classify("http://127.0.0.1:8080/a.webm?sig=1").unwrap(),
            SourceKind::Direct
        );
    }

    #[test]
    fn classify_generic() {
        assert_eq!(
            classify("https://vimeo.com/123456").unwrap(),
            SourceKind::Generic
        );
        assert_eq!(
            classify("https://example.com/video/page.html").unwrap(),
            SourceKind::Generic
        );
    }

    #[test]
    fn only_direct_links_skip_the_extractor() {
        assert!(SourceKind::YouTube.needs_extractor());
        assert!(SourceKind::Generic.needs_extractor());
        assert!(!SourceKind::Direct.needs_extractor());
    }

    #[test]
    fn classify_unsupported() {
        for url in ["not a url", "ftp://example.com/a.mp4", "file:///tmp/a.mp4", ""] {
            let err = classify(url).unwrap_err();
            assert_eq!(err.kind(), FailureKind::Unsupported, "{:?}", url);
        }
    }

    #[test]
    fn dispatcher_reports_unsupported_without_touching_disk() {
        let dir = tempfile::tempdir().unwrap();
        let dispatcher = Dispatcher::from_config(&VbatchConfig::default());
        let err = dispatcher.fetch("not a url", dir.path()).unwrap_err();
        assert_eq!(err.kind(), FailureKind::Unsupported);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn missing_extractor_is_contained_as_tool_error() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = VbatchConfig {
            ytdlp_path: PathBuf::from("/nonexistent/yt-dlp"),
            ..VbatchConfig::default()
        };
        let dispatcher = Dispatcher::from_config(&cfg);
        let err = dispatcher
            .fetch("https://www.youtube.com/watch?v=abc", dir.path())
            .unwrap_err();
        assert_eq!(err.kind(), FailureKind::Tool);
        let err = dispatcher
            .fetch("https://vimeo.com/123", dir.path())
            .unwrap_err();
        assert_eq!(err.kind(), FailureKind::Tool);
    }

    #[test]
    fn youtube_without_id_is_extraction_error() {
        let dir = tempfile::tempdir().unwrap();
        let dispatcher = Dispatcher::from_config(&VbatchConfig::default());
        let err = dispatcher
            .fetch("https://www.youtube.com/feed/trending", dir.path())
            .unwrap_err();
        assert_eq!(err.kind(), FailureKind::Extraction);
    }

    /// Writes an executable stand-in for yt-dlp into `dir`. It records its
    /// arguments in `args.txt` and reports `fetched.mp4` as the saved file,
    /// or prints `stderr` and exits 1 when `stderr` is set.
    #[cfg(unix)]
    fn fake_ytdlp(dir: &Path, stderr: Option<&str>) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let failure = match stderr {
            Some(line) => format!("echo '{}' >&2\nexit 1\n", line),
            None => String::new(),
        };
        let script = format!(
            "#!/bin/sh\n\
             if [ \"$1\" = \"--version\" ]; then echo 2024.01.01; exit 0; fi\n\
             here=\"$(dirname \"$0\")\"\n\
             printf '%s\\n' \"$@\" > \"$here/args.txt\"\n\
             {}echo \"$here/fetched.mp4\"\n",
            failure
        );
        let path = dir.join("yt-dlp");
        std::fs::write(&path, script).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();

        // Another test forking while the script was open for writing can make
        // the first exec fail with ETXTBSY.
        let ytdlp = YtDlp::new(path.clone());
        for _ in 0..50 {
            if ytdlp.version().is_ok() {
                break;
            }
            std::thread::sleep(Duration::from_millis(20));
        }
        path
    }

    #[cfg(unix)]
    fn recorded_args(dir: &Path) -> Vec<String> {
        std::fs::read_to_string(dir.join("args.txt"))
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[cfg(unix)]
    fn arg_after<'a>(args: &'a [String], flag: &str) -> &'a str {
        let i = args.iter().position(|a| a == flag).unwrap();
        &args[i + 1]
    }

    #[cfg(unix)]
    #[test]
    fn youtube_fetch_runs_extractor_with_video_id_template() {
        let tool = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let cfg = VbatchConfig {
            ytdlp_path: fake_ytdlp(tool.path(), None),
            ..VbatchConfig::default()
        };
        let url = "https://www.youtube.com/watch?v=abc123&t=10";

        let saved = Dispatcher::from_config(&cfg)
            .fetch(url, out.path())
            .unwrap();

        assert_eq!(saved, tool.path().join("fetched.mp4"));
        let args = recorded_args(tool.path());
        assert_eq!(arg_after(&args, "-f"), "worst[ext=mp4]/worst");
        assert_eq!(
            arg_after(&args, "-o"),
            format!("{}.%(ext)s", out.path().join("abc123").display())
        );
        assert_eq!(arg_after(&args, "--print"), "after_move:filepath");
        assert!(args.iter().any(|a| a == "--no-playlist"));
        assert_eq!(args.last().map(String::as_str), Some(url));
        assert_eq!(args[args.len() - 2], "--");
    }

    #[cfg(unix)]
    #[test]
    fn generic_fetch_uses_extractor_id_template() {
        let tool = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let cfg = VbatchConfig {
            ytdlp_path: fake_ytdlp(tool.path(), None),
            ..VbatchConfig::default()
        };

        let saved = Dispatcher::from_config(&cfg)
            .fetch("https://vimeo.com/123456", out.path())
            .unwrap();

        assert_eq!(saved, tool.path().join("fetched.mp4"));
        let args = recorded_args(tool.path());
        assert_eq!(arg_after(&args, "-f"), "best");
        assert_eq!(
            arg_after(&args, "-o"),
            out.path().join("%(id)s.%(ext)s").to_string_lossy()
        );
        assert_eq!(args.last().map(String::as_str), Some("https://vimeo.com/123456"));
    }

    #[cfg(unix)]
    #[test]
    fn extractor_failure_is_classified_from_stderr() {
        let tool = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let cfg = VbatchConfig {
            ytdlp_path: fake_ytdlp(
                tool.path(),
                Some("ERROR: Unsupported URL: https://example.com/page"),
            ),
            ..VbatchConfig::default()
        };

        let err = Dispatcher::from_config(&cfg)
            .fetch("https://example.com/page", out.path())
            .unwrap_err();

        assert_eq!(err.kind(), FailureKind::Unsupported);
        assert!(err.to_string().contains("https://example.com/page"));
        assert_eq!(std::fs::read_dir(out.path()).unwrap().count(), 0);
    }
}
