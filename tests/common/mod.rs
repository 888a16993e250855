//! Shared helpers for integration tests.
//!
//! - `logger`: structured test logging

pub mod logger;
