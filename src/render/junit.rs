//! JUnit XML reports for CI systems.

use std::fmt::Write as _;

use crate::core::models::{Run, RunTest};

/// Escape text for XML attribute and element content.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render a run as a JUnit `<testsuite>`.
#[must_use]
pub fn render_junit(run: &Run, tests: &[RunTest]) -> String {
    let failures = tests.iter().filter(|t| t.failed()).count();
    let skipped = tests
        .iter()
        .filter(|t| !t.failed() && t.result != "passed")
        .count();
    let total: f64 = tests.iter().map(RunTest::duration_seconds).sum();
    let name = run
        .description
        .as_deref()
        .filter(|d| !d.is_empty())
        .map_or_else(|| format!("Run #{}", run.id), str::to_string);

    let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    let _ = writeln!(
        out,
        "<testsuite name=\"{}\" id=\"{}\" tests=\"{}\" failures=\"{failures}\" skipped=\"{skipped}\" time=\"{total:.3}\">",
        escape(&name),
        run.id,
        tests.len()
    );

    for test in tests {
        let _ = write!(
            out,
            "  <testcase name=\"{}\" classname=\"rainforest\" time=\"{:.3}\"",
            escape(&test.title),
            test.duration_seconds()
        );
        if test.failed() {
            let _ = writeln!(out, ">");
            let _ = writeln!(
                out,
                "    <failure message=\"test {} failed\" type=\"failed\"/>",
                test.id
            );
            let _ = writeln!(out, "  </testcase>");
        } else if test.result == "passed" {
            let _ = writeln!(out, "/>");
        } else {
            let _ = writeln!(out, ">");
            let _ = writeln!(
                out,
                "    <skipped message=\"{}\"/>",
                escape(&test.result)
            );
            let _ = writeln!(out, "  </testcase>");
        }
    }

    out.push_str("</testsuite>\n");
    out
}
