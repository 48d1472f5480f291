use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::util::paths::config_path;

/// Example configuration file contents (bundled with the binary)
pub const EXAMPLE_CONFIG: &str = include_str!("config.toml.example");

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Settings for the live HTTP client used while recording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpConfig {
    /// Whole-request timeout in seconds
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: concat!("statesnap/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub http: HttpConfig,
    /// Origin relative URLs resolve against during replay (None = snapshot URL's origin)
    pub replay_origin: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlHttpConfig {
    pub timeout_secs: Option<u64>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlReplayConfig {
    pub origin: Option<String>,
}

/// TOML representation of the config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub http: Option<TomlHttpConfig>,
    pub replay: Option<TomlReplayConfig>,
}

impl Config {
    /// Load from `~/.statesnap/config.toml`, writing the example file on
    /// first run. Unreadable or invalid files fall back to defaults.
    pub fn load() -> Self {
        let config_file = config_path();

        if !config_file.exists() {
            Self::create_default_config(&config_file);
        }

        match Self::load_from_path(&config_file) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(
                    path = %config_file.display(),
                    error = %err,
                    "using default configuration"
                );
                Config::default()
            }
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let toml_config: TomlConfig = toml::from_str(contents)?;
        let mut config = Config::default();

        if let Some(http) = toml_config.http {
            if let Some(timeout_secs) = http.timeout_secs {
                config.http.timeout_secs = timeout_secs;
            }
            if let Some(user_agent) = http.user_agent.filter(|ua| !ua.trim().is_empty()) {
                config.http.user_agent = user_agent;
            }
        }

        if let Some(replay) = toml_config.replay {
            config.replay_origin = replay.origin.filter(|o| !o.trim().is_empty());
        }

        Ok(config)
    }

    fn create_default_config(path: &Path) {
        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                tracing::debug!(error = %e, "failed to create config directory");
                return;
            }
        }
        if let Err(e) = fs::write(path, EXAMPLE_CONFIG) {
            tracing::debug!(error = %e, "failed to write default config");
        }
    }
}
