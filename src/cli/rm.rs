//! `rm` command: delete a test remotely and locally.

use std::fs;
use std::path::Path;

use crate::cli::context::CommandContext;
use crate::cli::dispatch::{Services, required_positional};
use crate::core::rfml;
use crate::error::Result;

/// Execute the rm command.
///
/// A test that was never uploaded only loses its local file.
///
/// # Errors
///
/// Returns error if the file is missing or malformed, or the API call fails.
/// The local file is kept when the remote delete fails.
pub async fn execute(ctx: &dyn CommandContext, services: &Services) -> Result<String> {
    let api = services.api()?;
    let path = required_positional(ctx, "RFML file")?;
    let file = rfml::read_file(Path::new(&path))?;

    let remote = api
        .rfml_ids()
        .await?
        .into_iter()
        .find(|mapping| mapping.rfml_id == file.test.rfml_id);

    let out = if let Some(mapping) = remote {
        api.delete_test(mapping.id).await?;
        tracing::info!(rfml_id = %file.test.rfml_id, id = mapping.id, "deleted remote test");
        format!("Deleted test {} and {path}\n", mapping.id)
    } else {
        tracing::warn!(rfml_id = %file.test.rfml_id, "no remote test with this RFML id");
        format!("Deleted {path} (it was never uploaded)\n")
    };

    fs::remove_file(&file.path)?;
    Ok(out)
}
