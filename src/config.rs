//! Settings file parser for ~/.config/clacks/config.toml.
//!
//! The settings file is optional: a missing file yields `Config::default()`.
//! Feed sources live in `feeds.json` (see [`crate::sources`]), not here.
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large: {0}")]
    TooLarge(String),
}

/// Default User-Agent sent with every feed request.
pub const DEFAULT_USER_AGENT: &str = "Clacks - Terminal Atom/RSS Reader";

/// Top-level application settings.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Upper bound on feeds downloaded at the same time (1..=32).
    pub max_concurrent_fetches: usize,

    /// Per-feed request timeout in seconds.
    pub request_timeout_secs: u64,

    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_concurrent_fetches: 4,
            request_timeout_secs: 30,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    pub const MAX_CONCURRENT_FETCHES: usize = 32;

    const KNOWN_KEYS: [&'static str; 3] =
        ["max_concurrent_fetches", "request_timeout_secs", "user_agent"];

    /// Load settings from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(AppConfigError::Parse)` with line number info
    /// - Unknown keys → accepted, logged as warning
    /// - Out-of-range values → clamped, logged as warning
    pub fn load(path: &Path) -> Result<Self, AppConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(AppConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(AppConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(AppConfigError::Io(e)),
        };

        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config = toml::from_str::<Config>(&content)?.clamped();
        tracing::info!(
            path = %path.display(),
            max_concurrent_fetches = config.max_concurrent_fetches,
            request_timeout_secs = config.request_timeout_secs,
            "Loaded configuration"
        );
        Ok(config)
    }

    fn clamped(mut self) -> Self {
        let limit = self
            .max_concurrent_fetches
            .clamp(1, Self::MAX_CONCURRENT_FETCHES);
        if limit != self.max_concurrent_fetches {
            tracing::warn!(
                requested = self.max_concurrent_fetches,
                using = limit,
                "max_concurrent_fetches out of range"
            );
            self.max_concurrent_fetches = limit;
        }
        if self.request_timeout_secs == 0 {
            tracing::warn!("request_timeout_secs must be positive, using 1");
            self.request_timeout_secs = 1;
        }
        if self.user_agent.trim().is_empty() {
            self.user_agent = DEFAULT_USER_AGENT.to_string();
        }
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
