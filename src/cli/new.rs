//! `new` command: write an RFML skeleton.

use std::fs;
use std::path::PathBuf;

use crate::cli::context::CommandContext;
use crate::core::rfml::{self, RfmlTest, TestElement};
use crate::error::{RainforestError, Result};

/// Title used when `--title` is not given.
pub const DEFAULT_TITLE: &str = "Unnamed Test";

/// Execute the new command.
///
/// # Errors
///
/// Returns `AlreadyExists` if the target file exists, or an I/O error if it
/// cannot be written.
pub fn execute(ctx: &dyn CommandContext) -> Result<String> {
    let title = ctx
        .string_option("title")
        .filter(|title| !title.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_TITLE.to_string());
    let folder = ctx
        .string_option("test_folder")
        .map_or_else(|| PathBuf::from("."), PathBuf::from);

    let stem = ctx.positional_args().into_iter().next().map_or_else(
        || rfml::file_stem_for(&title),
        |name| name.trim_end_matches(".rfml").to_string(),
    );
    if stem.is_empty() {
        return Err(RainforestError::InvalidArgument(
            "test name is empty".to_string(),
        ));
    }

    let path = folder.join(format!("{stem}.{}", rfml::EXTENSION));
    if path.exists() {
        return Err(RainforestError::AlreadyExists(path.display().to_string()));
    }

    let test = RfmlTest {
        rfml_id: rfml::file_stem_for(&stem),
        title,
        start_uri: Some("/".to_string()),
        elements: vec![TestElement::Step {
            action: "This is a step action.".to_string(),
            response: "This is a question?".to_string(),
        }],
        ..RfmlTest::default()
    };

    fs::create_dir_all(&folder)?;
    fs::write(&path, rfml::serialize(&test))?;
    tracing::info!(path = %path.display(), "created test");

    Ok(format!("Created {}\n", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{FakeContext, TestDir};

    fn folder(dir: &TestDir) -> String {
        dir.path().display().to_string()
    }

    #[test]
    fn default_title_and_name() {
        let dir = TestDir::new();
        let out = execute(&FakeContext::new().with_str("test_folder", &folder(&dir))).unwrap();
        assert!(out.contains("unnamed_test.rfml"));

        let parsed = rfml::read_file(&dir.file_path("unnamed_test.rfml")).unwrap();
        assert_eq!(parsed.test.title, DEFAULT_TITLE);
        assert_eq!(parsed.test.rfml_id, "unnamed_test");
        assert_eq!(parsed.test.elements.len(), 1);
    }

    #[test]
    fn explicit_name_and_title() {
        let dir = TestDir::new();
        let ctx = FakeContext::new()
            .with_args(["checkout.rfml"])
            .with_str("title", "Checkout flow")
            .with_str("test_folder", &folder(&dir));
        execute(&ctx).unwrap();

        let parsed = rfml::read_file(&dir.file_path("checkout.rfml")).unwrap();
        assert_eq!(parsed.test.title, "Checkout flow");
        assert_eq!(parsed.test.rfml_id, "checkout");
    }

    #[test]
    fn creates_missing_folder() {
        let dir = TestDir::new();
        let nested = dir.file_path("spec/rainforest");
        let ctx = FakeContext::new()
            .with_args(["x"])
            .with_str("test_folder", &nested.display().to_string());
        execute(&ctx).unwrap();
        assert!(dir.file_exists("spec/rainforest/x.rfml"));
    }

    #[test]
    fn refuses_to_overwrite() {
        let dir = TestDir::new();
        dir.create_file("login.rfml", "keep me");
        let ctx = FakeContext::new()
            .with_args(["login"])
            .with_str("test_folder", &folder(&dir));

        let err = execute(&ctx).unwrap_err();
        assert!(matches!(err, RainforestError::AlreadyExists(_)));
        assert_eq!(dir.read_file("login.rfml"), "keep me");
    }
}
