use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Global configuration loaded from `~/.config/vbatch/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VbatchConfig {
    /// Default number of parallel workers (None = number of available cores).
    pub workers: Option<usize>,
    /// yt-dlp executable used for YouTube and generic sources.
    pub ytdlp_path: PathBuf,
    /// yt-dlp format selector for YouTube URLs. Defaults to the lowest quality stream.
    pub youtube_format: String,
    /// yt-dlp format selector for every other extractor-backed URL.
    pub generic_format: String,
    /// Connect timeout for direct media links.
    pub connect_timeout_secs: u64,
    /// Overall transfer timeout for direct media links.
    pub transfer_timeout_secs: u64,
    /// Exit non-zero when any item failed.
    pub strict: bool,
}

impl Default for VbatchConfig {
    fn default() -> Self {
        Self {
            workers: None,
            ytdlp_path: PathBuf::from("yt-dlp"),
            youtube_format: "worst[ext=mp4]/worst".to_string(),
            generic_format: "best".to_string(),
            connect_timeout_secs: 30,
            transfer_timeout_secs: 3600,
            strict: false,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("vbatch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<VbatchConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = VbatchConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let cfg: VbatchConfig = toml::from_str(&data)
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}
