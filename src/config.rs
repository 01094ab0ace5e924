use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default log level when neither the config file nor RUST_LOG sets one
pub const DEFAULT_LOG_LEVEL: &str = "warn";

const APP_NAME: &str = "gha-versioning";
const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// CLI configuration structure
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub log: LogConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct LogConfig {
    /// Filter directive, e.g. "debug" or "gha_versioning=trace"
    pub level: String,
    /// Write logs to this file instead of stderr
    pub file: Option<PathBuf>,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            file: None,
            json: false,
        }
    }
}

/// Returns the path to the config directory for gha-versioning.
/// Uses $XDG_CONFIG_HOME/gha-versioning if XDG_CONFIG_HOME is set,
/// otherwise falls back to the platform config directory,
/// or ./gha-versioning if neither is available.
pub fn config_dir() -> PathBuf {
    config_dir_with_env(std::env::var("XDG_CONFIG_HOME").ok(), dirs::config_dir())
}

/// Returns the path to the default config file.
pub fn config_path() -> PathBuf {
    config_dir().join(CONFIG_FILE_NAME)
}

/// Load configuration.
///
/// An explicit path must exist. Without one, the default location is used
/// and a missing file yields the default configuration.
pub fn load(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    load_with_default(explicit, &config_path())
}

fn load_with_default(explicit: Option<&Path>, default_path: &Path) -> Result<Config, ConfigError> {
    match explicit {
        Some(path) => read_config(path),
        None if default_path.exists() => read_config(default_path),
        None => Ok(Config::default()),
    }
}

fn read_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn config_dir_with_env(xdg_config_home: Option<String>, system_dir: Option<PathBuf>) -> PathBuf {
    let config_dir = xdg_config_home
        .map(PathBuf::from)
        .or(system_dir)
        .unwrap_or_else(|| PathBuf::from("."));

    config_dir.join(APP_NAME)
}
