//! Listing commands: `sites`, `environments`, `folders`, `filters`,
//! `browsers`, `features` and `run-groups`.

use crate::cli::dispatch::Services;
use crate::core::models::ResourceKind;
use crate::error::Result;
use crate::render::render_resources;

/// Execute a listing command.
///
/// # Errors
///
/// Returns error on API failure.
pub async fn execute(kind: ResourceKind, services: &Services) -> Result<String> {
    let resources = services.api()?.list(kind).await?;
    tracing::debug!(kind = kind.command_name(), count = resources.len(), "listed resources");
    Ok(render_resources(kind, &resources))
}
