//! `validate` command: parse RFML files and check cross-file references.

use std::collections::HashSet;
use std::path::Path;

use crate::cli::context::CommandContext;
use crate::cli::dispatch::{Services, path_or_current_dir};
use crate::core::models::TestIdMapping;
use crate::core::rfml::{self, RfmlFile};
use crate::error::Result;

/// Local files plus the remote id mapping they were checked against.
#[derive(Debug, Clone, Default)]
pub struct CheckedTests {
    pub files: Vec<RfmlFile>,
    pub remote: Vec<TestIdMapping>,
}

/// Load every RFML file under `path` and check ids and embedded references.
///
/// Embedded tests may refer to remote tests when an API token is available.
///
/// # Errors
///
/// Returns the first parse failure, an API error, or `Validation`.
pub async fn load_and_check(path: &Path, services: &Services) -> Result<CheckedTests> {
    let files = rfml::load(path)?;

    let remote = match services.api_if_configured() {
        Some(api) if !files.is_empty() => api.rfml_ids().await?,
        _ => Vec::new(),
    };
    let remote_ids: HashSet<String> = remote.iter().map(|m| m.rfml_id.clone()).collect();

    rfml::check_references(&files, &remote_ids)?;
    Ok(CheckedTests { files, remote })
}

/// Execute the validate command.
///
/// # Errors
///
/// Returns `Rfml` or `Validation` describing what is wrong.
pub async fn execute(ctx: &dyn CommandContext, services: &Services) -> Result<String> {
    let path = path_or_current_dir(ctx);
    let checked = load_and_check(&path, services).await?;

    Ok(match checked.files.len() {
        0 => format!("No RFML files found in {}\n", path.display()),
        1 => "1 RFML file is valid\n".to_string(),
        n => format!("{n} RFML files are valid\n"),
    })
}
