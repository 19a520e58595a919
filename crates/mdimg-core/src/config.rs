use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Global configuration loaded from `~/.config/mdimg/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MdimgConfig {
    /// Total timeout for one image GET, in seconds.
    pub fetch_timeout_secs: u64,
    /// Pause after a failed fetch before moving to the next image, in seconds.
    pub failure_pause_secs: u64,
    /// Folder next to the document that holds one sub-folder per document.
    pub assets_dir: String,
    /// Longest URL path segment accepted as a filename as-is.
    pub max_filename_len: usize,
    /// Optional `User-Agent` header sent with every GET.
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for MdimgConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_secs: 20,
            failure_pause_secs: 10,
            assets_dir: "assets".to_string(),
            max_filename_len: 80,
            user_agent: None,
        }
    }
}

impl MdimgConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn failure_pause(&self) -> Duration {
        Duration::from_secs(self.failure_pause_secs)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("mdimg")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<MdimgConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = MdimgConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: MdimgConfig = toml::from_str(&data)?;
    Ok(cfg)
}

/// Like `load_or_init`, but never fails: an unreadable or invalid config falls back to defaults.
pub fn load_or_default() -> MdimgConfig {
    match load_or_init() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::warn!("config unavailable, using defaults: {:#}", e);
            MdimgConfig::default()
        }
    }
}
