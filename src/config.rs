use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::tag::prerelease::{DEFAULT_PRERELEASE_MARKER, PrereleaseClassifier};
use crate::tag::sources::github::{DEFAULT_BASE_URL, DEFAULT_REPOSITORY, MAX_PER_PAGE};

/// Default time budget for one resolution in seconds (5 minutes)
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid pre-release pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// Tool configuration structure
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub github: GitHubConfig,
    pub prerelease: PrereleaseConfig,
    /// Time budget for one resolution in seconds
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            github: GitHubConfig::default(),
            prerelease: PrereleaseConfig::default(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// GitHub API configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct GitHubConfig {
    pub base_url: String,
    /// Repository as "owner/name"
    pub repository: String,
    /// Tags requested per page when listing tags
    pub per_page: usize,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            repository: DEFAULT_REPOSITORY.to_string(),
            per_page: MAX_PER_PAGE,
        }
    }
}

/// Pre-release detection configuration
///
/// `pattern` takes precedence over `marker` when both are set.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct PrereleaseConfig {
    pub marker: String,
    pub pattern: Option<String>,
}

impl Default for PrereleaseConfig {
    fn default() -> Self {
        Self {
            marker: DEFAULT_PRERELEASE_MARKER.to_string(),
            pattern: None,
        }
    }
}

impl PrereleaseConfig {
    pub fn classifier(&self) -> Result<PrereleaseClassifier, ConfigError> {
        match &self.pattern {
            Some(pattern) => Ok(PrereleaseClassifier::pattern(pattern)?),
            None => Ok(PrereleaseClassifier::Substring(self.marker.clone())),
        }
    }
}

impl Config {
    /// Loads the configuration file
    ///
    /// An explicit `path` must exist. Without one, the default location is read
    /// if present and defaults are used otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let path = config_path();
                if path.is_file() {
                    Self::from_file(&path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Returns the path to the config directory for commit-to-tag.
/// Uses $XDG_CONFIG_HOME/commit-to-tag if XDG_CONFIG_HOME is set,
/// otherwise falls back to ~/.config/commit-to-tag,
/// or ./commit-to-tag if neither is available.
pub fn config_dir() -> PathBuf {
    config_dir_with_env(std::env::var("XDG_CONFIG_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

fn config_dir_with_env(xdg_config_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let config_dir = xdg_config_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".config")))
        .unwrap_or_else(|| PathBuf::from("."));

    config_dir.join("commit-to-tag")
}
