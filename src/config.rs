use serde::Deserialize;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::console::Reporter;

const APP_DIR: &str = "brew-release-notes";

/// Placeholder written into a report when a release has no usable notes
pub const NO_NOTES_PLACEHOLDER: &str = "_No release notes available for this version._";

/// Domain prefix that marks a self-hosted GitLab instance (gitlab.gnome.org, gitlab.com, ...)
pub const GITLAB_DOMAIN_PREFIX: &str = "gitlab.";

/// Releases requested per page from the hosting APIs
pub const TAGS_PER_PAGE: u32 = 100;

/// External tools that must be on PATH before a run starts
pub const REQUIRED_TOOLS: &[&str] = &["brew"];

/// Header shown above the interactive ignore selection
pub const IGNORE_PROMPT: &str =
    "Select packages to ignore from now on (space to toggle, enter to confirm)";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Tool configuration structure
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    /// Root directory under which each run creates its report directory
    pub output_dir: Option<PathBuf>,
    /// Keep tags the host marks as prereleases
    pub include_prereleases: bool,
    /// Exact GitLab domains that do not follow the `gitlab.` naming convention
    pub gitlab_hosts: Vec<String>,
    pub github: GitHubConfig,
}

/// GitHub API configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct GitHubConfig {
    pub api_url: String,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.github.com".to_string(),
        }
    }
}

impl AppConfig {
    /// Load the config file, returning defaults when it does not exist
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load the config file, falling back to defaults (with a warning) when it is
    /// unreadable or invalid
    pub fn load_or_default(path: &Path, reporter: &Reporter) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            reporter.warn(&format!("{}; using default settings", e));
            Self::default()
        })
    }
}

/// Returns the path to the data directory for brew-release-notes.
/// Uses $XDG_DATA_HOME/brew-release-notes if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/brew-release-notes,
/// or ./brew-release-notes if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the config directory, following the same fallback rules as [`data_dir`].
pub fn config_dir() -> PathBuf {
    config_dir_with_env(std::env::var("XDG_CONFIG_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

/// Returns the path to the ignore-list file.
pub fn ignore_path() -> PathBuf {
    data_dir().join("ignore.txt")
}

/// Returns the path to the log file.
pub fn log_path() -> PathBuf {
    data_dir().join("brew-release-notes.log")
}

/// Default root for report directories: ~/Downloads, or the current directory.
pub fn default_output_root() -> PathBuf {
    output_root_with_env(dirs::download_dir())
}

/// GitHub API token from `GITHUB_TOKEN`, then `GH_TOKEN`.
pub fn github_token() -> Option<String> {
    token_with_env(&["GITHUB_TOKEN", "GH_TOKEN"], |name| std::env::var(name).ok())
}

/// GitLab API token from `GITLAB_TOKEN`.
pub fn gitlab_token() -> Option<String> {
    token_with_env(&["GITLAB_TOKEN"], |name| std::env::var(name).ok())
}

fn token_with_env(names: &[&str], lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    names
        .iter()
        .filter_map(|name| lookup(*name))
        .map(|token| token.trim().to_string())
        .find(|token| !token.is_empty())
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join(APP_DIR)
}

fn config_dir_with_env(xdg_config_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let config_dir = xdg_config_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".config")))
        .unwrap_or_else(|| PathBuf::from("."));

    config_dir.join(APP_DIR)
}

fn output_root_with_env(download_dir: Option<PathBuf>) -> PathBuf {
    download_dir.unwrap_or_else(|| PathBuf::from("."))
}
