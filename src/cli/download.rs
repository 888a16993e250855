//! `download` command: write remote tests as RFML files.

use std::fs;
use std::path::PathBuf;

use crate::cli::context::CommandContext;
use crate::cli::dispatch::{Services, split_commas};
use crate::core::models::{TestFilters, TestSummary};
use crate::core::rfml;
use crate::error::Result;

/// Execute the download command.
///
/// Existing files with the same name are overwritten.
///
/// # Errors
///
/// Returns error on API failure or if a file cannot be written.
pub async fn execute(ctx: &dyn CommandContext, services: &Services) -> Result<String> {
    let api = services.api()?;
    let filters = TestFilters {
        tags: split_commas(ctx.string_option("tags")),
        site_id: ctx.int_option("site"),
        smart_folder_id: ctx.int_option("folder"),
    };
    let folder = ctx
        .string_option("test_folder")
        .map_or_else(|| PathBuf::from("."), PathBuf::from);

    let summaries = api.list_tests(&filters).await?;
    if summaries.is_empty() {
        return Ok("No tests matched.\n".to_string());
    }

    fs::create_dir_all(&folder)?;
    for summary in &summaries {
        let mut test = api.get_test(summary.id).await?;
        if test.rfml_id.is_empty() {
            test.rfml_id = fallback_rfml_id(summary);
        }
        let path = folder.join(file_name(summary));
        fs::write(&path, rfml::serialize(&test))?;
        tracing::debug!(id = summary.id, path = %path.display(), "downloaded test");
    }

    Ok(format!(
        "Downloaded {} tests to {}\n",
        summaries.len(),
        folder.display()
    ))
}

/// `<id>_<title>.rfml`, which keeps names unique across equal titles.
#[must_use]
pub fn file_name(summary: &TestSummary) -> String {
    format!(
        "{}_{}.{}",
        summary.id,
        rfml::file_stem_for(&summary.title),
        rfml::EXTENSION
    )
}

fn fallback_rfml_id(summary: &TestSummary) -> String {
    summary
        .rfml_id
        .clone()
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| format!("{}_{}", summary.id, rfml::file_stem_for(&summary.title)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(rfml_id: Option<&str>) -> TestSummary {
        TestSummary {
            id: 17,
            rfml_id: rfml_id.map(str::to_string),
            title: "Sign up: happy path".to_string(),
        }
    }

    #[test]
    fn file_names_are_id_prefixed() {
        assert_eq!(file_name(&summary(None)), "17_sign_up_happy_path.rfml");
    }

    #[test]
    fn fallback_ids() {
        assert_eq!(fallback_rfml_id(&summary(Some("signup"))), "signup");
        assert_eq!(fallback_rfml_id(&summary(Some(""))), "17_sign_up_happy_path");
        assert_eq!(fallback_rfml_id(&summary(None)), "17_sign_up_happy_path");
    }
}
