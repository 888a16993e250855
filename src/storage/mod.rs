//! Configuration storage.

pub mod config;
pub mod paths;

pub use config::{
    Config, ConfigSource, ConfigSources, ENV_API_URL, ENV_CONFIG, ENV_SKIP_UPDATE, ENV_TIMEOUT,
    ENV_TOKEN, ResolvedConfig,
};
pub use paths::AppPaths;
