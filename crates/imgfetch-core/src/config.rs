use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::request::FetchPolicy;

/// HTTP transport parameters (optional `[http]` section in config.toml).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Whole-transfer timeout in seconds.
    pub timeout_secs: u64,
    /// Maximum number of redirects to follow.
    pub max_redirections: u32,
    /// Responses larger than this are rejected before decoding.
    pub max_body_bytes: u64,
    /// Optional User-Agent header.
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 30,
            timeout_secs: 120,
            max_redirections: 10,
            max_body_bytes: 32 * 1024 * 1024,
            user_agent: None,
        }
    }
}

/// Global configuration loaded from `~/.config/imgfetch/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImgfetchConfig {
    /// Cool time (minutes) given to newly created cache entries.
    pub cool_time_minutes: u32,
    /// Policy used when a caller does not pick one.
    #[serde(default)]
    pub default_policy: FetchPolicy,
    /// Optional per-fetch deadline in seconds (None = wait for the transport).
    #[serde(default)]
    pub fetch_timeout_secs: Option<u64>,
    /// Persist decoded images under the XDG cache dir.
    #[serde(default = "default_disk_cache")]
    pub disk_cache: bool,
    /// Optional HTTP section; if missing, built-in defaults are used.
    #[serde(default)]
    pub http: Option<HttpConfig>,
}

fn default_disk_cache() -> bool {
    true
}

impl Default for ImgfetchConfig {
    fn default() -> Self {
        Self {
            cool_time_minutes: 5,
            default_policy: FetchPolicy::Caching,
            fetch_timeout_secs: None,
            disk_cache: true,
            http: None,
        }
    }
}

impl ImgfetchConfig {
    pub fn fetch_timeout(&self) -> Option<Duration> {
        self.fetch_timeout_secs.map(Duration::from_secs)
    }

    /// HTTP settings, falling back to defaults when the section is absent.
    pub fn http_or_default(&self) -> HttpConfig {
        self.http.clone().unwrap_or_default()
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("imgfetch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ImgfetchConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = ImgfetchConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)
        .with_context(|| format!("read config: {}", path.display()))?;
    let cfg: ImgfetchConfig =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    Ok(cfg)
}
