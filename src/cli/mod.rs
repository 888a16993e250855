//! CLI argument normalization, parsing and command dispatch.

pub mod args;
pub mod context;
pub mod csv_upload;
pub mod dispatch;
pub mod download;
pub mod flags;
pub mod mobile_upload;
pub mod new;
pub mod normalize;
pub mod report;
pub mod resources;
pub mod rm;
pub mod run;
pub mod update;
pub mod upload;
pub mod validate;

pub use args::{Cli, Commands};
pub use context::{CommandContext, GlobalOptions};
pub use dispatch::{Services, dispatch};
pub use flags::{Arity, FlagDescriptor, FlagRegistry, Scope};
pub use normalize::normalize_args;
