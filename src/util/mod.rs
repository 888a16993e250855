//! Utility functions.

pub mod env;
