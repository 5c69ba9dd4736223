use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Which request transport checks URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// JSON POST to `api_url`.
    #[default]
    Http,
    /// Canned response, no network.
    Mock,
}

/// Quota parameters, fixed for the lifetime of a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottleConfig {
    /// Submissions admitted per window.
    pub request_limit: u32,
    /// How long input stays blocked once the limit is exceeded.
    pub throttle_period: Duration,
    /// How often the expiration is re-checked while blocked.
    pub poll_interval: Duration,
    /// Also persist the request counter (closes the restart bypass).
    pub persist_request_count: bool,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            request_limit: 10,
            throttle_period: Duration::from_secs(30 * 60),
            poll_interval: Duration::from_secs(60),
            persist_request_count: false,
        }
    }
}

impl ThrottleConfig {
    /// Informational text shown when a session starts.
    pub fn describe(&self) -> String {
        format!(
            "The number of searches is limited to {} every {}.",
            self.request_limit,
            describe_period(self.throttle_period)
        )
    }
}

fn describe_period(d: Duration) -> String {
    let secs = d.as_secs();
    if secs >= 60 && secs % 60 == 0 {
        let mins = secs / 60;
        if mins == 1 {
            "minute".to_string()
        } else {
            format!("{mins} minutes")
        }
    } else if secs == 1 {
        "second".to_string()
    } else {
        format!("{secs} seconds")
    }
}

/// Global configuration loaded from `~/.config/urlcheck/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlCheckConfig {
    /// Endpoint that receives `{"url": ...}` POSTs.
    pub api_url: String,
    /// Transport used for admitted submissions.
    #[serde(default)]
    pub transport: TransportKind,
    /// Maximum admitted submissions per window.
    pub request_limit: u32,
    /// Throttle window length in seconds.
    pub throttle_period_secs: u64,
    /// Expiration re-check interval in seconds while throttled.
    pub poll_interval_secs: u64,
    /// Total timeout for one check request, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Longest URL accepted by the input predicate.
    #[serde(default = "default_max_url_length")]
    pub max_url_length: usize,
    /// Persist the request counter next to the expiration.
    #[serde(default)]
    pub persist_request_count: bool,
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_max_url_length() -> usize {
    crate::validate::DEFAULT_MAX_URL_LENGTH
}

impl Default for UrlCheckConfig {
    fn default() -> Self {
        let throttle = ThrottleConfig::default();
        Self {
            api_url: "http://localhost:8080/checkUrl".to_string(),
            transport: TransportKind::Http,
            request_limit: throttle.request_limit,
            throttle_period_secs: throttle.throttle_period.as_secs(),
            poll_interval_secs: throttle.poll_interval.as_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            max_url_length: default_max_url_length(),
            persist_request_count: throttle.persist_request_count,
        }
    }
}

impl UrlCheckConfig {
    /// Quota parameters; a zero poll interval is bumped to one second so the
    /// timer cannot spin.
    pub fn throttle(&self) -> ThrottleConfig {
        ThrottleConfig {
            request_limit: self.request_limit,
            throttle_period: Duration::from_secs(self.throttle_period_secs),
            poll_interval: Duration::from_secs(self.poll_interval_secs.max(1)),
            persist_request_count: self.persist_request_count,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("urlcheck")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<UrlCheckConfig> {
    load_or_init_at(&config_path()?)
}

pub fn load_or_init_at(path: &Path) -> Result<UrlCheckConfig> {
    if !path.exists() {
        let default_cfg = UrlCheckConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path)?;
    let cfg: UrlCheckConfig = toml::from_str(&data)?;
    Ok(cfg)
}
