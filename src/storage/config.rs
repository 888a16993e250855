//! Configuration file loading and resolution.
//!
//! Loads configuration from `<config dir>/rainforest/config.toml`
//! (`~/.config/rainforest/config.toml` on Linux).
//!
//! ## Precedence
//!
//! Settings are resolved with the following precedence (highest first):
//! 1. CLI flags
//! 2. Environment variables
//! 3. Config file
//! 4. Built-in defaults
//!
//! ## Environment Variables
//!
//! - `RAINFOREST_API_TOKEN`: API token
//! - `RAINFOREST_API_URL`: API base URL
//! - `RAINFOREST_TIMEOUT`: Request timeout in seconds
//! - `RAINFOREST_SKIP_UPDATE`: Disable the automatic update check (1, true, yes)
//! - `RAINFOREST_CONFIG`: Override config file path

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::AppPaths;
use crate::cli::GlobalOptions;
use crate::error::{RainforestError, Result};

// =============================================================================
// Environment Variable Names
// =============================================================================

/// Environment variable for the API token.
pub const ENV_TOKEN: &str = "RAINFOREST_API_TOKEN";
/// Environment variable for the API base URL.
pub const ENV_API_URL: &str = "RAINFOREST_API_URL";
/// Environment variable for the request timeout in seconds.
pub const ENV_TIMEOUT: &str = "RAINFOREST_TIMEOUT";
/// Environment variable to disable the automatic update check.
pub const ENV_SKIP_UPDATE: &str = "RAINFOREST_SKIP_UPDATE";
/// Environment variable to override config file path.
pub const ENV_CONFIG: &str = "RAINFOREST_CONFIG";

/// Default API base URL.
pub const DEFAULT_API_URL: &str = "https://app.rainforestqa.com/api/1";
/// Default location of the release manifest.
pub const DEFAULT_UPDATE_URL: &str = "https://app.rainforestqa.com/cli/latest.json";

const MAX_TIMEOUT_SECONDS: u64 = 300;

// =============================================================================
// Resolved Configuration
// =============================================================================

/// Fully resolved configuration after merging CLI, env vars, and config file.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// API token, if any source supplied one.
    pub token: Option<String>,
    /// API base URL, without trailing slash.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Delay between run status polls.
    pub poll_interval: Duration,
    /// Whether debug logging was requested.
    pub debug: bool,
    /// Whether to check for a newer release after a command.
    pub check_updates: bool,
    /// Release manifest URL.
    pub update_url: String,
    /// Source of each setting for debugging.
    pub sources: ConfigSources,
}

/// Tracks the source of each configuration value.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    pub token: ConfigSource,
    pub base_url: ConfigSource,
    pub timeout: ConfigSource,
    pub check_updates: ConfigSource,
}

/// Where a configuration value came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// Value from CLI flag.
    Cli,
    /// Value from environment variable.
    Env,
    /// Value from config file.
    ConfigFile,
    /// Built-in default.
    #[default]
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI flag"),
            Self::Env => write!(f, "environment variable"),
            Self::ConfigFile => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

impl ResolvedConfig {
    /// Resolve final configuration from CLI flags, the process environment,
    /// and the config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but is invalid, or any
    /// resolved value is invalid.
    pub fn resolve(globals: &GlobalOptions) -> Result<Self> {
        let config = Self::load_config()?;
        Self::from_sources(globals, &config, |key| std::env::var(key).ok())
    }

    /// Resolve from explicit sources. `env` looks up environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any resolved value is invalid.
    pub fn from_sources(
        globals: &GlobalOptions,
        config: &Config,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        config.validate()?;

        let env = |key: &str| env(key).filter(|value| !value.trim().is_empty());
        let mut sources = ConfigSources::default();

        let token = Self::resolve_token(globals, config, &env, &mut sources.token);
        let base_url = Self::resolve_base_url(config, &env, &mut sources.base_url)?;
        let timeout = Self::resolve_timeout(config, &env, &mut sources.timeout)?;
        let check_updates =
            Self::resolve_check_updates(globals, config, &env, &mut sources.check_updates);

        Ok(Self {
            token,
            base_url,
            timeout,
            poll_interval: Duration::from_secs(config.run.poll_interval_seconds),
            debug: globals.debug,
            check_updates,
            update_url: config
                .update
                .url
                .clone()
                .unwrap_or_else(|| DEFAULT_UPDATE_URL.to_string()),
            sources,
        })
    }

    /// Load config file, respecting `RAINFOREST_CONFIG` override.
    fn load_config() -> Result<Config> {
        let path = AppPaths::new().config_file_with_override(|key| std::env::var(key).ok());
        Config::load_from(&path)
    }

    fn resolve_token(
        globals: &GlobalOptions,
        config: &Config,
        env: &impl Fn(&str) -> Option<String>,
        source: &mut ConfigSource,
    ) -> Option<String> {
        // 1. CLI --token flag
        if let Some(token) = globals.token.as_ref().filter(|t| !t.trim().is_empty()) {
            *source = ConfigSource::Cli;
            return Some(token.clone());
        }

        // 2. Environment variable
        if let Some(token) = env(ENV_TOKEN) {
            *source = ConfigSource::Env;
            return Some(token);
        }

        // 3. Config file
        if let Some(token) = config.api.token.as_ref().filter(|t| !t.trim().is_empty()) {
            *source = ConfigSource::ConfigFile;
            return Some(token.clone());
        }

        *source = ConfigSource::Default;
        None
    }

    fn resolve_base_url(
        config: &Config,
        env: &impl Fn(&str) -> Option<String>,
        source: &mut ConfigSource,
    ) -> Result<String> {
        let (url, from) = if let Some(url) = env(ENV_API_URL) {
            (url, ConfigSource::Env)
        } else if let Some(url) = &config.api.base_url {
            (url.clone(), ConfigSource::ConfigFile)
        } else {
            (DEFAULT_API_URL.to_string(), ConfigSource::Default)
        };

        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(RainforestError::ConfigInvalid {
                key: "api.base_url".to_string(),
                message: format!("\"{url}\" is not an http(s) URL"),
            });
        }

        *source = from;
        Ok(url.trim_end_matches('/').to_string())
    }

    fn resolve_timeout(
        config: &Config,
        env: &impl Fn(&str) -> Option<String>,
        source: &mut ConfigSource,
    ) -> Result<Duration> {
        if let Some(value) = env(ENV_TIMEOUT) {
            let seconds = value
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|s| (1..=MAX_TIMEOUT_SECONDS).contains(s))
                .ok_or_else(|| RainforestError::ConfigInvalid {
                    key: ENV_TIMEOUT.to_string(),
                    message: format!("expected 1-{MAX_TIMEOUT_SECONDS} seconds, got \"{value}\""),
                })?;
            *source = ConfigSource::Env;
            return Ok(Duration::from_secs(seconds));
        }

        *source = ConfigSource::ConfigFile;
        Ok(Duration::from_secs(config.api.timeout_seconds))
    }

    fn resolve_check_updates(
        globals: &GlobalOptions,
        config: &Config,
        env: &impl Fn(&str) -> Option<String>,
        source: &mut ConfigSource,
    ) -> bool {
        // 1. CLI --skip-update flag
        if globals.skip_update {
            *source = ConfigSource::Cli;
            return false;
        }

        // 2. Environment variable
        if env(ENV_SKIP_UPDATE).is_some_and(|v| is_truthy(&v)) {
            *source = ConfigSource::Env;
            return false;
        }

        // 3. Config file
        if !config.update.check {
            *source = ConfigSource::ConfigFile;
            return false;
        }

        *source = ConfigSource::Default;
        true
    }
}

/// Whether an environment value reads as "on".
fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

// =============================================================================
// Config File
// =============================================================================

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// API connection settings.
    pub api: ApiConfig,
    /// Run settings.
    pub run: RunConfig,
    /// Update check settings.
    pub update: UpdateConfig,
}

/// API connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// API token.
    pub token: Option<String>,
    /// Custom API base URL.
    pub base_url: Option<String>,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

/// Run settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Seconds between run status polls.
    pub poll_interval_seconds: u64,
}

/// Update check settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateConfig {
    /// Whether to check for a newer release after commands.
    pub check: bool,
    /// Custom release manifest URL.
    pub url: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            token: None,
            base_url: None,
            timeout_seconds: 30,
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            poll_interval_seconds: 10,
        }
    }
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            check: true,
            url: None,
        }
    }
}

impl Config {
    /// Load configuration from a specific path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(?path, "Config file not found, using defaults");
            return Ok(Self::default());
        }

        tracing::debug!(?path, "Loading config file");
        let content = fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| RainforestError::ConfigParse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns an error if the timeout is outside 1-300 seconds or the poll
    /// interval is zero.
    pub fn validate(&self) -> Result<()> {
        if self.api.timeout_seconds == 0 || self.api.timeout_seconds > MAX_TIMEOUT_SECONDS {
            return Err(RainforestError::ConfigInvalid {
                key: "api.timeout_seconds".to_string(),
                message: format!("must be between 1 and {MAX_TIMEOUT_SECONDS} seconds"),
            });
        }

        if self.run.poll_interval_seconds == 0 {
            return Err(RainforestError::ConfigInvalid {
                key: "run.poll_interval_seconds".to_string(),
                message: "must be at least 1 second".to_string(),
            });
        }

        Ok(())
    }
}
