//! Error rendering for the terminal.

use std::fmt::Write as _;

use colored::Colorize;

use crate::error::RainforestError;

/// Render an error with its code and, when known, a hint.
#[must_use]
pub fn render_error(error: &RainforestError) -> String {
    let mut out = format!(
        "{} {}",
        format!("error[{}]:", error.error_code()).red().bold(),
        error
    );
    if let Some(hint) = error.hint() {
        let _ = write!(out, "\n{} {hint}", "hint:".cyan());
    }
    out
}
