//! Location of the config file.
//!
//! `RAINFOREST_CONFIG` names the file directly; otherwise it is
//! `config.toml` in the platform config directory
//! (`~/.config/rainforest` on Linux).

use std::path::PathBuf;

use directories::{BaseDirs, ProjectDirs};

use super::config::ENV_CONFIG;

/// Application paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    /// Configuration directory.
    pub config_dir: PathBuf,
}

impl AppPaths {
    /// Platform paths for rainforest, falling back to `~/.config/rainforest`
    /// (or `./.config/rainforest` without a home directory).
    #[must_use]
    pub fn new() -> Self {
        let config_dir = ProjectDirs::from("com", "rainforestqa", "rainforest").map_or_else(
            || {
                BaseDirs::new()
                    .map_or_else(|| PathBuf::from("."), |d| d.home_dir().to_path_buf())
                    .join(".config/rainforest")
            },
            |dirs| dirs.config_dir().to_path_buf(),
        );
        Self { config_dir }
    }

    /// Default config file path.
    #[must_use]
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    /// Config file to load, honouring the `RAINFOREST_CONFIG` override.
    #[must_use]
    pub fn config_file_with_override(&self, env: impl Fn(&str) -> Option<String>) -> PathBuf {
        env(ENV_CONFIG)
            .filter(|path| !path.trim().is_empty())
            .map_or_else(|| self.config_file(), PathBuf::from)
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}
