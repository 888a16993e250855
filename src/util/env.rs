//! Terminal environment detection.

use std::io::IsTerminal;

/// Whether command output on stdout should be styled.
#[must_use]
pub fn should_use_color() -> bool {
    color_enabled(
        |key| std::env::var(key).ok(),
        std::io::stdout().is_terminal(),
    )
}

/// Color decision for an environment lookup and terminal state.
///
/// `NO_COLOR` (any value) wins, then `CLICOLOR_FORCE` (anything but `0`),
/// then `TERM=dumb`; otherwise color follows whether stdout is a terminal.
pub fn color_enabled(env: impl Fn(&str) -> Option<String>, is_tty: bool) -> bool {
    if env("NO_COLOR").is_some() {
        return false;
    }
    if env("CLICOLOR_FORCE").is_some_and(|value| value != "0") {
        return true;
    }
    if env("TERM").is_some_and(|term| term == "dumb") {
        return false;
    }
    is_tty
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_with(key: &'static str, value: &'static str) -> impl Fn(&str) -> Option<String> {
        move |k| (k == key).then(|| value.to_string())
    }

    #[test]
    fn follows_terminal_by_default() {
        assert!(color_enabled(|_| None, true));
        assert!(!color_enabled(|_| None, false));
    }

    #[test]
    fn no_color_disables_even_on_terminal() {
        assert!(!color_enabled(env_with("NO_COLOR", ""), true));
    }

    #[test]
    fn force_enables_when_piped() {
        assert!(color_enabled(env_with("CLICOLOR_FORCE", "1"), false));
        assert!(!color_enabled(env_with("CLICOLOR_FORCE", "0"), false));
    }

    #[test]
    fn dumb_terminal_disables() {
        assert!(!color_enabled(env_with("TERM", "dumb"), true));
    }
}
