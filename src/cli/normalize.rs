//! Argument normalization.
//!
//! clap only recognizes top-level options when they appear before the
//! subcommand. Users type `rainforest run --token abc` just as often as
//! `rainforest --token abc run`, so the raw argument vector is rewritten
//! before parsing: every global flag group is hoisted to sit right after the
//! program name, and everything else keeps its original relative order.
//!
//! The transform is total. It never drops, duplicates or edits a token; it
//! only reorders them. Missing values, unknown flags and unknown subcommands
//! pass through for clap to report.

use super::flags::{Arity, FlagRegistry, is_flag_shaped};

/// Result of scanning the user-supplied tokens (program name excluded).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScannedArgs {
    /// Global flag groups, in the order they were found.
    pub hoisted: Vec<Vec<String>>,
    /// Every other token, in original relative order.
    pub retained: Vec<String>,
}

impl ScannedArgs {
    /// Number of tokens across all hoisted groups.
    #[must_use]
    pub fn hoisted_len(&self) -> usize {
        self.hoisted.iter().map(Vec::len).sum()
    }
}

/// Rewrite `argv` so that every global flag precedes the subcommand.
///
/// `argv[0]` is the program name and always stays first. An empty vector is
/// returned unchanged.
#[must_use]
pub fn normalize_args(argv: Vec<String>, registry: &FlagRegistry) -> Vec<String> {
    let mut tokens = argv.into_iter();
    let Some(program) = tokens.next() else {
        return Vec::new();
    };

    let scanned = scan(tokens, registry);
    reassemble(program, scanned)
}

/// Classify tokens into hoisted global groups and retained tokens.
///
/// Each registered flag forms a group with the value tokens its arity calls
/// for: one token for [`Arity::Single`] (even if it looks like a flag), every
/// following non-flag token for [`Arity::Variadic`], none for
/// [`Arity::None`]. Unregistered tokens are retained one at a time and
/// scanning continues past them; names match exactly, so `--` and
/// `--token=abc` are ordinary unregistered tokens.
pub fn scan<I>(tokens: I, registry: &FlagRegistry) -> ScannedArgs
where
    I: IntoIterator<Item = String>,
{
    let mut scanned = ScannedArgs::default();
    let mut tokens = tokens.into_iter().peekable();

    while let Some(token) = tokens.next() {
        let Some(flag) = registry.lookup(&token) else {
            scanned.retained.push(token);
            continue;
        };

        let mut group = vec![token];
        match flag.arity {
            Arity::None => {}
            Arity::Single => {
                if let Some(value) = tokens.next() {
                    group.push(value);
                }
            }
            Arity::Variadic => {
                while let Some(value) = tokens.next_if(|next| !is_flag_shaped(next)) {
                    group.push(value);
                }
            }
        }

        if flag.is_global() {
            tracing::debug!(
                flag = flag.name,
                values = group.len() - 1,
                "hoisting global flag"
            );
            scanned.hoisted.push(group);
        } else {
            scanned.retained.extend(group);
        }
    }

    scanned
}

/// Concatenate program name, hoisted groups, then retained tokens.
#[must_use]
pub fn reassemble(program: String, scanned: ScannedArgs) -> Vec<String> {
    let mut argv = Vec::with_capacity(1 + scanned.hoisted_len() + scanned.retained.len());
    argv.push(program);
    argv.extend(scanned.hoisted.into_iter().flatten());
    argv.extend(scanned.retained);
    argv
}
