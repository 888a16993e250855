//! Routes a parsed subcommand to its handler.

use std::path::PathBuf;

use crate::cli::context::CommandContext;
use crate::cli::{
    csv_upload, download, mobile_upload, new, report, resources, rm, run, update, upload,
    validate,
};
use crate::core::ApiClient;
use crate::core::models::ResourceKind;
use crate::error::{RainforestError, Result};
use crate::storage::ResolvedConfig;

/// Shared state handed to every handler.
#[derive(Debug, Clone)]
pub struct Services {
    /// Resolved configuration.
    pub config: ResolvedConfig,
    api: Option<ApiClient>,
}

impl Services {
    /// Build services from configuration. The API client exists only when a
    /// token was resolved.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built.
    pub fn new(config: ResolvedConfig) -> Result<Self> {
        let api = if config.token.is_some() {
            Some(ApiClient::from_config(&config)?)
        } else {
            None
        };
        Ok(Self { config, api })
    }

    /// The API client.
    ///
    /// # Errors
    ///
    /// Returns `AuthNotConfigured` when no token was resolved.
    pub fn api(&self) -> Result<&ApiClient> {
        self.api.as_ref().ok_or(RainforestError::AuthNotConfigured)
    }

    /// The API client, if a token was resolved.
    #[must_use]
    pub const fn api_if_configured(&self) -> Option<&ApiClient> {
        self.api.as_ref()
    }
}

/// Run the handler for `name` and return what it wants printed.
///
/// # Errors
///
/// Returns `UnknownCommand` for names without a handler, otherwise whatever
/// the handler returns.
pub async fn dispatch(
    name: &str,
    ctx: &dyn CommandContext,
    services: &Services,
) -> Result<String> {
    tracing::debug!(command = name, "dispatching");
    match name {
        "run" => run::execute(ctx, services).await,
        "new" => new::execute(ctx),
        "validate" => validate::execute(ctx, services).await,
        "upload" => upload::execute(ctx, services).await,
        "rm" => rm::execute(ctx, services).await,
        "download" => download::execute(ctx, services).await,
        "csv-upload" => csv_upload::execute(ctx, services).await,
        "mobile-upload" => mobile_upload::execute(ctx, services).await,
        "report" => report::execute(ctx, services).await,
        "update" => update::execute(services).await,
        other => match ResourceKind::from_command(other) {
            Some(kind) => resources::execute(kind, services).await,
            None => Err(RainforestError::UnknownCommand(other.to_string())),
        },
    }
}

/// First positional argument as a path, or the current directory.
pub(crate) fn path_or_current_dir(ctx: &dyn CommandContext) -> PathBuf {
    ctx.positional_args()
        .into_iter()
        .next()
        .map_or_else(|| PathBuf::from("."), PathBuf::from)
}

/// First positional argument, which the command requires.
pub(crate) fn required_positional(ctx: &dyn CommandContext, what: &str) -> Result<String> {
    ctx.positional_args()
        .into_iter()
        .next()
        .ok_or_else(|| RainforestError::InvalidArgument(format!("missing {what}")))
}

/// Split a comma-separated option into trimmed, non-empty items.
pub(crate) fn split_commas(value: Option<String>) -> Vec<String> {
    value
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
