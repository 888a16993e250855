//! Read access to parsed command-line options.
//!
//! Handlers never touch clap types directly. They read options through
//! [`CommandContext`], implemented for [`clap::ArgMatches`] in production and
//! by `FakeContext` (feature `test-utils`) in tests.

use clap::ArgMatches;

/// Id used for positional arguments by every subcommand.
pub const POSITIONAL_ID: &str = "args";

/// Option accessors shared by the real parser output and test doubles.
///
/// Missing or mistyped options read as absent rather than panicking.
pub trait CommandContext {
    /// A string-valued option.
    fn string_option(&self, name: &str) -> Option<String>;

    /// A boolean switch; `false` when absent.
    fn bool_option(&self, name: &str) -> bool;

    /// An integer-valued option.
    fn int_option(&self, name: &str) -> Option<i64>;

    /// A repeatable or multi-value option; empty when absent.
    fn string_list_option(&self, name: &str) -> Vec<String>;

    /// Positional arguments, in order.
    fn positional_args(&self) -> Vec<String>;
}

impl CommandContext for ArgMatches {
    fn string_option(&self, name: &str) -> Option<String> {
        self.try_get_one::<String>(name).ok().flatten().cloned()
    }

    fn bool_option(&self, name: &str) -> bool {
        self.try_get_one::<bool>(name)
            .ok()
            .flatten()
            .copied()
            .unwrap_or(false)
    }

    fn int_option(&self, name: &str) -> Option<i64> {
        if let Ok(value) = self.try_get_one::<i64>(name) {
            return value.copied();
        }
        self.string_option(name)
            .and_then(|value| value.trim().parse().ok())
    }

    fn string_list_option(&self, name: &str) -> Vec<String> {
        self.try_get_many::<String>(name)
            .ok()
            .flatten()
            .map(|values| values.cloned().collect())
            .unwrap_or_default()
    }

    fn positional_args(&self) -> Vec<String> {
        self.string_list_option(POSITIONAL_ID)
    }
}

/// Options owned by the top-level parser.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalOptions {
    pub token: Option<String>,
    pub debug: bool,
    pub skip_update: bool,
}

impl GlobalOptions {
    /// Read the global flags from the top-level context.
    #[must_use]
    pub fn from_context(ctx: &dyn CommandContext) -> Self {
        Self {
            token: ctx.string_option("token"),
            debug: ctx.bool_option("debug"),
            skip_update: ctx.bool_option("skip_update"),
        }
    }
}
