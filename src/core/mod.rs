//! API client, domain models and test file handling.

pub mod api;
pub mod http;
pub mod logging;
pub mod models;
pub mod rfml;

pub use api::ApiClient;
pub use models::{Resource, ResourceKind, Run, RunParams, RunTest, TestSelection};
pub use rfml::{RfmlFile, RfmlTest, TestElement};
