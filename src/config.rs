use anyhow::{bail, Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::api::PAGE_SIZE;

/// Whitelist picked up from the working directory when none is configured
pub const DEFAULT_WHITELIST_FILE: &str = "whitelist.txt";

/// Main configuration structure for unwatch
///
/// Everything here is optional; command line flags and environment
/// variables take precedence over the file.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    /// Organization whose repositories should be unwatched
    #[serde(default)]
    pub org: Option<String>,

    /// Whitelist file, one `owner/repo` per line
    #[serde(default)]
    pub whitelist_file: Option<String>,

    /// GitHub authentication and API settings
    #[serde(default)]
    pub github: GitHubConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// GitHub configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GitHubConfig {
    /// Authentication method
    #[serde(default = "default_auth_method")]
    pub auth_method: String, // "auto", "gh_cli", "token"

    /// API root, for GitHub Enterprise (defaults to api.github.com)
    #[serde(default)]
    pub base_uri: Option<String>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String, // "info"

    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,
}

// Default value functions
fn default_auth_method() -> String {
    "auto".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_true() -> bool {
    true
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            auth_method: default_auth_method(),
            base_uri: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            color: default_true(),
        }
    }
}

impl Config {
    /// Load configuration from the default location, or fall back to defaults
    pub fn load_or_default() -> Result<Self> {
        let config_path = Self::default_config_path()?;

        if config_path.exists() {
            Self::load(&config_path)
        } else {
            tracing::debug!("No configuration at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let mut config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        // Expand environment variables in paths
        config.expand_paths()?;

        Ok(config)
    }

    /// Get the default configuration file path (XDG compliant)
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = config_dir().context("Failed to get user config directory")?;

        Ok(config_dir.join("unwatch").join("config.yml"))
    }

    /// Expand environment variables and `~` in configuration paths
    pub fn expand_paths(&mut self) -> Result<()> {
        if let Some(whitelist) = &self.whitelist_file {
            self.whitelist_file = Some(
                shellexpand::full(whitelist)
                    .context("Failed to expand whitelist_file path")?
                    .into_owned(),
            );
        }

        Ok(())
    }
}

/// Whether a run only reports or actually changes subscriptions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Report what would be ignored without touching anything
    #[default]
    DryRun,
    /// Ignore every repository on the list
    Execute,
}

impl Mode {
    pub fn from_force(force: bool) -> Self {
        if force {
            Self::Execute
        } else {
            Self::DryRun
        }
    }
}

/// Settings for a single run, resolved once at startup
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub org: String,
    pub whitelist_path: Option<PathBuf>,
    pub mode: Mode,
    pub per_page: u8,
}

impl RunSettings {
    /// Merge command line values over the configuration file
    ///
    /// Fails when no organization is given anywhere. Without a configured
    /// whitelist, `whitelist.txt` in the working directory is used if present.
    pub fn resolve(
        config: &Config,
        org: Option<String>,
        whitelist: Option<PathBuf>,
        force: bool,
    ) -> Result<Self> {
        let org = org
            .or_else(|| config.org.clone())
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty());

        let Some(org) = org else {
            bail!(
                "Please provide an organization: pass --org, set the ORG env var, \
                 or set `org` in the config file"
            );
        };

        let whitelist_path = whitelist
            .or_else(|| config.whitelist_file.as_ref().map(PathBuf::from))
            .or_else(|| default_whitelist_in(Path::new(".")));

        Ok(Self {
            org,
            whitelist_path,
            mode: Mode::from_force(force),
            per_page: PAGE_SIZE,
        })
    }
}

/// `whitelist.txt` inside `dir`, if that file exists
pub fn default_whitelist_in(dir: &Path) -> Option<PathBuf> {
    let path = dir.join(DEFAULT_WHITELIST_FILE);
    path.is_file().then_some(path)
}
