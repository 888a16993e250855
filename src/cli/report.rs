//! `report` command: summarize a run, optionally as JUnit XML.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::cli::context::CommandContext;
use crate::cli::dispatch::{Services, required_positional};
use crate::error::{RainforestError, Result};
use crate::render::{render_junit, render_run_summary};

/// Execute the report command.
///
/// # Errors
///
/// Returns `InvalidArgument` for a non-numeric run id, an API error, or
/// `Other` naming the path if the JUnit file cannot be written.
pub async fn execute(ctx: &dyn CommandContext, services: &Services) -> Result<String> {
    let raw = required_positional(ctx, "run id")?;
    let run_id: i64 = raw.trim().parse().map_err(|_| {
        RainforestError::InvalidArgument(format!("run id \"{raw}\" is not a number"))
    })?;

    let api = services.api()?;
    let run = api.get_run(run_id).await?;
    let tests = api.run_tests(run_id).await?;

    let mut out = render_run_summary(&run, &tests);
    if let Some(junit_file) = ctx.string_option("junit_file") {
        let path = Path::new(&junit_file);
        write_junit(path, &render_junit(&run, &tests))?;
        tracing::info!(path = %path.display(), "wrote JUnit report");
        let _ = writeln!(out, "Wrote JUnit report to {junit_file}");
    }
    Ok(out)
}

fn write_junit(path: &Path, xml: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            RainforestError::Other(anyhow::anyhow!(
                "writing JUnit report to {}: {e}",
                path.display()
            ))
        })?;
    }
    fs::write(path, xml).map_err(|e| {
        RainforestError::Other(anyhow::anyhow!(
            "writing JUnit report to {}: {e}",
            path.display()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{FakeContext, test_services};

    #[tokio::test]
    async fn non_numeric_run_id_is_rejected() {
        let services = test_services(Some("tok"), "http://127.0.0.1:1");
        let err = execute(&FakeContext::new().with_args(["latest"]), &services)
            .await
            .unwrap_err();
        assert!(matches!(err, RainforestError::InvalidArgument(_)));
    }

    #[test]
    fn unwritable_junit_path_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("blocker"), "").unwrap();
        let target = dir.path().join("blocker/junit.xml");

        let err = write_junit(&target, "<testsuite/>").unwrap_err();
        assert!(matches!(err, RainforestError::Other(_)), "{err:?}");
        assert_eq!(err.error_code(), "RF-X099");
        assert!(err.to_string().contains("writing JUnit report to"), "{err}");
        assert!(err.to_string().contains("junit.xml"), "{err}");
    }
}
