//! rainforest - command-line client for the Rainforest test-automation API.
//!
//! Global flags (`--token`, `--debug`, `--skip-update`) may appear anywhere on
//! the command line; [`cli::normalize_args`] moves them in front of the
//! subcommand before clap parses.

#![forbid(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod core;
pub mod error;
pub mod render;
pub mod storage;
pub mod util;

/// Test utilities module - included in test builds or when test-utils feature is enabled.
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use error::{ExitCode, RainforestError, Result};

// Re-export test utilities for external test crates
#[cfg(any(test, feature = "test-utils"))]
pub use test_utils::*;
