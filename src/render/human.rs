//! Human-readable output.
//!
//! Styling goes through `colored`, which honours `NO_COLOR` and the global
//! override set in `main`.

use std::fmt::Write as _;

use colored::Colorize;

use crate::core::models::{Resource, ResourceKind, Run, RunTest};

/// Render a listing as an id / label table.
#[must_use]
pub fn render_resources(kind: ResourceKind, resources: &[Resource]) -> String {
    if resources.is_empty() {
        return format!("No {} found.\n", kind.command_name().replace('-', " "));
    }

    let ids: Vec<String> = resources
        .iter()
        .map(|r| r.id.map_or_else(|| "-".to_string(), |id| id.to_string()))
        .collect();
    let width = ids.iter().map(String::len).max().unwrap_or(0).max(2);

    let mut out = String::new();
    let _ = writeln!(out, "{}  {}", format!("{:<width$}", "Id").bold(), "Name".bold());
    for (id, resource) in ids.iter().zip(resources) {
        let _ = writeln!(out, "{id:<width$}  {}", resource.label());
    }
    out
}

fn colored_outcome(outcome: &str) -> String {
    match outcome {
        "passed" => outcome.green().to_string(),
        "failed" | "error" | "aborted" => outcome.red().to_string(),
        _ => outcome.yellow().to_string(),
    }
}

/// One line announcing a created run.
#[must_use]
pub fn render_run_started(run: &Run) -> String {
    let mut line = format!("Run {} created", run.id.to_string().bold());
    if let Some(url) = &run.frontend_url {
        let _ = write!(line, ": {url}");
    }
    line.push('\n');
    line
}

/// One progress line while polling a run.
#[must_use]
pub fn render_run_progress(run: &Run) -> String {
    let mut line = format!("Run {} is {}", run.id, run.state);
    if let Some(progress) = &run.current_progress {
        let _ = write!(
            line,
            " ({}% complete, {} passed, {} failed, {} no result)",
            progress.percent, progress.passed, progress.failed, progress.no_result
        );
    }
    line
}

/// Summary of a finished run and its tests.
#[must_use]
pub fn render_run_summary(run: &Run, tests: &[RunTest]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Run {}: {}",
        run.id.to_string().bold(),
        colored_outcome(run.outcome())
    );
    if let Some(description) = run.description.as_deref().filter(|d| !d.is_empty()) {
        let _ = writeln!(out, "  {description}");
    }

    let failed = tests.iter().filter(|t| t.failed()).count();
    let passed = tests.iter().filter(|t| t.result == "passed").count();
    let _ = writeln!(
        out,
        "{} tests: {passed} passed, {failed} failed, {} other",
        tests.len(),
        tests.len() - passed - failed
    );

    for test in tests {
        let _ = writeln!(
            out,
            "  [{}] {} ({})",
            colored_outcome(&test.result),
            test.title,
            test.id
        );
    }
    out
}

/// Report of a release check.
#[must_use]
pub fn render_update_status(current: &str, latest: &str, url: Option<&str>) -> String {
    let mut out = format!(
        "A new version of rainforest is available: {} (current {current})\n",
        latest.green()
    );
    if let Some(url) = url {
        let _ = writeln!(out, "Download it from {url}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(state: &str, result: Option<&str>) -> Run {
        Run {
            id: 99,
            state: state.to_string(),
            result: result.map(str::to_string),
            current_progress: None,
            description: Some("nightly".to_string()),
            frontend_url: Some("https://app.example/runs/99".to_string()),
            created_at: None,
        }
    }

    fn test(id: i64, result: &str) -> RunTest {
        RunTest {
            id,
            title: format!("Test {id}"),
            result: result.to_string(),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn resources_table_lists_rows() {
        let resources = vec![
            Resource {
                id: Some(12),
                name: Some("Staging".to_string()),
                ..Resource::default()
            },
            Resource {
                id: None,
                name: Some("chrome".to_string()),
                ..Resource::default()
            },
        ];
        let out = render_resources(ResourceKind::Sites, &resources);
        assert!(out.contains("12"));
        assert!(out.contains("Staging"));
        assert!(out.contains("chrome"));
        assert_eq!(out.lines().count(), 3);
    }

    #[test]
    fn empty_listing_says_so() {
        assert_eq!(
            render_resources(ResourceKind::RunGroups, &[]),
            "No run groups found.\n"
        );
    }

    #[test]
    fn run_started_includes_url() {
        let out = render_run_started(&run("queued", None));
        assert!(out.contains("99"));
        assert!(out.contains("https://app.example/runs/99"));
    }

    #[test]
    fn summary_counts_results() {
        let tests = vec![test(1, "passed"), test(2, "failed"), test(3, "no_result")];
        let out = render_run_summary(&run("complete", Some("failed")), &tests);
        assert!(out.contains("3 tests: 1 passed, 1 failed, 1 other"), "{out}");
        assert!(out.contains("Test 2 (2)"));
        assert!(out.contains("nightly"));
    }

    #[test]
    fn update_status_mentions_versions() {
        let out = render_update_status("0.1.0", "0.2.0", Some("https://example.com"));
        assert!(out.contains("0.2.0"));
        assert!(out.contains("current 0.1.0"));
        assert!(out.contains("https://example.com"));
    }
}
