//! Configuration file parser for ~/.config/movierec/config.toml.
//!
//! The config file is optional; a missing file yields `Config::default()`.
//! Unknown keys are accepted and logged as warnings.
use crate::catalog::{DEFAULT_IMAGE_BASE_URL, DEFAULT_TMDB_BASE_URL};
use secrecy::SecretString;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Environment variable that overrides `tmdb_api_key`.
pub const API_KEY_ENV: &str = "TMDB_API_KEY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large: {0}")]
    TooLarge(String),
}

/// Which catalog backs the home feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FeedSourceKind {
    /// Deterministic generated pages with an artificial delay.
    #[default]
    Simulated,
    /// TMDB discover endpoint.
    Tmdb,
}

/// Top-level application configuration.
///
/// Every field has a default, so any subset of keys can be given.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// "dark" or "light".
    pub theme: String,

    pub feed_source: FeedSourceKind,

    /// TMDB API key. The `TMDB_API_KEY` env var takes precedence.
    pub tmdb_api_key: Option<String>,

    pub tmdb_base_url: String,
    pub image_base_url: String,

    /// Artificial latency of the simulated page source.
    pub simulated_delay_ms: u64,

    /// Simulated sign-in latency.
    pub login_delay_ms: u64,

    pub request_timeout_secs: u64,

    /// Rows from the end of the list at which the next page is requested.
    pub scroll_margin: usize,

    /// Custom keybinding overrides. Keys are action names, values are key strings.
    pub keybindings: HashMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            feed_source: FeedSourceKind::Simulated,
            tmdb_api_key: None,
            tmdb_base_url: DEFAULT_TMDB_BASE_URL.to_string(),
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
            simulated_delay_ms: 500,
            login_delay_ms: 1000,
            request_timeout_secs: 20,
            scroll_margin: 0,
            keybindings: HashMap::new(),
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("theme", &self.theme)
            .field("feed_source", &self.feed_source)
            .field(
                "tmdb_api_key",
                &self.tmdb_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("tmdb_base_url", &self.tmdb_base_url)
            .field("image_base_url", &self.image_base_url)
            .field("simulated_delay_ms", &self.simulated_delay_ms)
            .field("login_delay_ms", &self.login_delay_ms)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("scroll_margin", &self.scroll_margin)
            .field("keybindings", &self.keybindings)
            .finish()
    }
}

const KNOWN_KEYS: [&str; 10] = [
    "theme",
    "feed_source",
    "tmdb_api_key",
    "tmdb_base_url",
    "image_base_url",
    "simulated_delay_ms",
    "login_delay_ms",
    "request_timeout_secs",
    "scroll_margin",
    "keybindings",
];

impl Config {
    const MAX_FILE_SIZE: u64 = 1_048_576;

    /// Load configuration from a TOML file.
    ///
    /// - Missing or blank file → `Ok(Config::default())`
    /// - Invalid TOML or wrong value type → `Err(ConfigError::Parse)`
    /// - Over 1 MB → `Err(ConfigError::TooLarge)`
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        Self::parse(&content, path)
    }

    fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys().filter(|k| !KNOWN_KEYS.contains(&k.as_str())) {
                tracing::warn!(key = %key, "Unknown key in config file, ignoring");
            }
        }

        let config: Config = toml::from_str(content)?;
        tracing::info!(
            path = %path.display(),
            theme = %config.theme,
            source = ?config.feed_source,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// API key to use, preferring `env_value` (the `TMDB_API_KEY` variable)
    /// over the file. Blank values count as unset.
    pub fn resolve_api_key(&self, env_value: Option<String>) -> Option<SecretString> {
        env_value
            .filter(|v| !v.trim().is_empty())
            .or_else(|| {
                self.tmdb_api_key
                    .clone()
                    .filter(|v| !v.trim().is_empty())
            })
            .map(SecretString::from)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn simulated_delay(&self) -> Duration {
        Duration::from_millis(self.simulated_delay_ms)
    }

    pub fn login_delay(&self) -> Duration {
        Duration::from_millis(self.login_delay_ms)
    }
}
