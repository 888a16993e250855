//! Flag metadata registry.
//!
//! Describes every flag the argument normalizer needs to know about: how many
//! value tokens it consumes and whether the top-level parser owns it. The
//! table is built once and passed explicitly to [`crate::cli::normalize`].

/// How many value tokens follow a flag occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arity {
    /// Boolean switch, no value.
    None,
    /// Exactly one value token.
    Single,
    /// Every following token up to the next flag-shaped token.
    Variadic,
}

/// Which parser level recognizes a flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Top-level option; must precede the subcommand.
    Global,
    /// Option belonging to a subcommand.
    Local,
}

/// A registered flag name with its arity and scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FlagDescriptor {
    pub name: &'static str,
    pub arity: Arity,
    pub scope: Scope,
}

impl FlagDescriptor {
    #[must_use]
    pub const fn global(name: &'static str, arity: Arity) -> Self {
        Self {
            name,
            arity,
            scope: Scope::Global,
        }
    }

    #[must_use]
    pub const fn local(name: &'static str, arity: Arity) -> Self {
        Self {
            name,
            arity,
            scope: Scope::Local,
        }
    }

    /// Whether the top-level parser owns this flag.
    #[must_use]
    pub const fn is_global(&self) -> bool {
        matches!(self.scope, Scope::Global)
    }
}

/// Flags understood by the `rainforest` command tree.
///
/// Every value-taking flag of every subcommand must be listed so the scanner
/// never treats a value as a new flag or as the subcommand boundary.
pub const BUILTIN_FLAGS: &[FlagDescriptor] = &[
    // Global
    FlagDescriptor::global("--token", Arity::Single),
    FlagDescriptor::global("--debug", Arity::None),
    FlagDescriptor::global("--skip-update", Arity::None),
    // run / download
    FlagDescriptor::local("--tags", Arity::Single),
    FlagDescriptor::local("--site", Arity::Single),
    FlagDescriptor::local("--run-group-id", Arity::Single),
    FlagDescriptor::local("-f", Arity::Variadic),
    FlagDescriptor::local("--files", Arity::Variadic),
    FlagDescriptor::local("--folder", Arity::Single),
    FlagDescriptor::local("--browser", Arity::Single),
    FlagDescriptor::local("--environment-id", Arity::Single),
    FlagDescriptor::local("--crowd", Arity::Single),
    FlagDescriptor::local("--conflict", Arity::Single),
    FlagDescriptor::local("--description", Arity::Single),
    FlagDescriptor::local("--release", Arity::Single),
    // new / download
    FlagDescriptor::local("--title", Arity::Single),
    FlagDescriptor::local("--test-folder", Arity::Single),
    // report
    FlagDescriptor::local("--junit-file", Arity::Single),
    // csv-upload
    FlagDescriptor::local("--csv-file", Arity::Single),
    FlagDescriptor::local("--import-variable-name", Arity::Single),
    // mobile-upload
    FlagDescriptor::local("--site-id", Arity::Single),
    FlagDescriptor::local("--app-slot", Arity::Single),
];

/// Immutable lookup table of flag descriptors.
#[derive(Debug, Clone)]
pub struct FlagRegistry {
    flags: Vec<FlagDescriptor>,
}

impl FlagRegistry {
    /// Build a registry from a literal descriptor list.
    #[must_use]
    pub fn new(flags: &[FlagDescriptor]) -> Self {
        Self {
            flags: flags.to_vec(),
        }
    }

    /// Registry for the built-in command tree.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(BUILTIN_FLAGS)
    }

    /// Look up a token by exact flag name.
    #[must_use]
    pub fn lookup(&self, token: &str) -> Option<&FlagDescriptor> {
        self.flags.iter().find(|flag| flag.name == token)
    }

    /// All registered descriptors, in registration order.
    #[must_use]
    pub fn descriptors(&self) -> &[FlagDescriptor] {
        &self.flags
    }
}

impl Default for FlagRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Whether a token looks like a flag (`-x`, `--name`).
///
/// A lone `-` is conventionally stdin and is not flag-shaped.
#[must_use]
pub fn is_flag_shaped(token: &str) -> bool {
    token.len() > 1 && token.starts_with('-')
}
