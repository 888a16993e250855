//! Test utilities for rainforest.
//!
//! Provides a fake [`CommandContext`], service and data factories, and a few
//! assertion helpers shared by unit and integration tests.
//!
//! # Usage
//!
//! ```rust,ignore
//! use rainforest::test_utils::*;
//!
//! let ctx = FakeContext::new().with_args(["42"]).with_str("junit_file", "out.xml");
//! let services = test_services(Some("token"), &server.uri());
//! let dir = TestDir::new();
//! dir.create_file("login.rfml", &make_test_rfml_text("login", "Login"));
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cli::context::CommandContext;
use crate::cli::dispatch::Services;
use crate::cli::GlobalOptions;
use crate::core::models::{Run, RunTest};
use crate::core::rfml::{self, RfmlTest, TestElement};
use crate::storage::config::{Config, ENV_API_URL, ENV_TOKEN, ResolvedConfig};

// =============================================================================
// Fake Context
// =============================================================================

/// A literal option value held by [`FakeContext`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FakeValue {
    Str(String),
    Bool(bool),
    Int(i64),
    List(Vec<String>),
}

/// In-memory [`CommandContext`] for driving handlers without clap.
#[derive(Debug, Clone, Default)]
pub struct FakeContext {
    values: HashMap<String, FakeValue>,
    args: Vec<String>,
}

impl FakeContext {
    /// Empty context: no options, no positional arguments.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a string option.
    #[must_use]
    pub fn with_str(mut self, name: &str, value: &str) -> Self {
        self.values
            .insert(name.to_string(), FakeValue::Str(value.to_string()));
        self
    }

    /// Set a boolean switch.
    #[must_use]
    pub fn with_bool(mut self, name: &str, value: bool) -> Self {
        self.values.insert(name.to_string(), FakeValue::Bool(value));
        self
    }

    /// Set an integer option.
    #[must_use]
    pub fn with_int(mut self, name: &str, value: i64) -> Self {
        self.values.insert(name.to_string(), FakeValue::Int(value));
        self
    }

    /// Set a multi-value option.
    #[must_use]
    pub fn with_list<I, S>(mut self, name: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values.insert(
            name.to_string(),
            FakeValue::List(values.into_iter().map(Into::into).collect()),
        );
        self
    }

    /// Set the positional arguments.
    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }
}

impl CommandContext for FakeContext {
    fn string_option(&self, name: &str) -> Option<String> {
        match self.values.get(name) {
            Some(FakeValue::Str(value)) => Some(value.clone()),
            _ => None,
        }
    }

    fn bool_option(&self, name: &str) -> bool {
        matches!(self.values.get(name), Some(FakeValue::Bool(true)))
    }

    fn int_option(&self, name: &str) -> Option<i64> {
        match self.values.get(name) {
            Some(FakeValue::Int(value)) => Some(*value),
            Some(FakeValue::Str(value)) => value.trim().parse().ok(),
            _ => None,
        }
    }

    fn string_list_option(&self, name: &str) -> Vec<String> {
        match self.values.get(name) {
            Some(FakeValue::List(values)) => values.clone(),
            Some(FakeValue::Str(value)) => vec![value.clone()],
            _ => Vec::new(),
        }
    }

    fn positional_args(&self) -> Vec<String> {
        self.args.clone()
    }
}

// =============================================================================
// Services
// =============================================================================

/// Services pointed at `base_url`, with a fast poll interval and no update
/// check.
///
/// # Panics
///
/// Panics if the configuration or HTTP client cannot be built.
#[must_use]
pub fn test_services(token: Option<&str>, base_url: &str) -> Services {
    let mut env = HashMap::from([(ENV_API_URL.to_string(), base_url.to_string())]);
    if let Some(token) = token {
        env.insert(ENV_TOKEN.to_string(), token.to_string());
    }

    let globals = GlobalOptions {
        skip_update: true,
        ..GlobalOptions::default()
    };
    let mut config = ResolvedConfig::from_sources(&globals, &Config::default(), |key: &str| {
        env.get(key).cloned()
    })
    .expect("test config should resolve");
    config.poll_interval = Duration::from_millis(10);

    Services::new(config).expect("test services should build")
}

// =============================================================================
// Data Factories
// =============================================================================

/// A test with one step.
#[must_use]
pub fn make_test_rfml(rfml_id: &str, title: &str) -> RfmlTest {
    RfmlTest {
        rfml_id: rfml_id.to_string(),
        title: title.to_string(),
        start_uri: Some("/".to_string()),
        elements: vec![TestElement::Step {
            action: "Open the home page.".to_string(),
            response: "Does the page load?".to_string(),
        }],
        ..RfmlTest::default()
    }
}

/// RFML text for [`make_test_rfml`].
#[must_use]
pub fn make_test_rfml_text(rfml_id: &str, title: &str) -> String {
    rfml::serialize(&make_test_rfml(rfml_id, title))
}

/// A run in the given state.
#[must_use]
pub fn make_test_run(id: i64, state: &str, result: Option<&str>) -> Run {
    Run {
        id,
        state: state.to_string(),
        result: result.map(str::to_string),
        current_progress: None,
        description: None,
        frontend_url: None,
        created_at: None,
    }
}

/// A per-test result.
#[must_use]
pub fn make_test_run_test(id: i64, title: &str, result: &str) -> RunTest {
    RunTest {
        id,
        title: title.to_string(),
        result: result.to_string(),
        created_at: None,
        updated_at: None,
    }
}

// =============================================================================
// Temporary Directories
// =============================================================================

/// An isolated temporary directory, removed on drop.
pub struct TestDir {
    inner: tempfile::TempDir,
}

impl TestDir {
    /// Create a new temporary directory.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: tempfile::tempdir().expect("Failed to create temp directory"),
        }
    }

    /// Path to the directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.inner.path()
    }

    /// Write a file, creating parent directories as needed.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be written.
    pub fn create_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.inner.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        fs::write(&path, content).expect("Failed to write test file");
        path
    }

    /// Read a file from the directory.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be read.
    #[must_use]
    pub fn read_file(&self, name: &str) -> String {
        fs::read_to_string(self.inner.path().join(name)).expect("Failed to read test file")
    }

    /// Whether a file exists in the directory.
    #[must_use]
    pub fn file_exists(&self, name: &str) -> bool {
        self.inner.path().join(name).exists()
    }

    /// Full path of a file in the directory.
    #[must_use]
    pub fn file_path(&self, name: &str) -> PathBuf {
        self.inner.path().join(name)
    }
}

impl Default for TestDir {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Assertion Helpers
// =============================================================================

/// Assert that a string contains a substring.
#[macro_export]
macro_rules! assert_contains {
    ($haystack:expr, $needle:expr) => {
        let haystack = $haystack;
        let needle = $needle;
        assert!(
            haystack.contains(needle),
            "Expected string to contain {:?}\n\nActual string:\n{:?}",
            needle,
            haystack
        );
    };
}

/// Strip ANSI escape codes from a string.
#[must_use]
pub fn strip_ansi_codes(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\x1b' {
            if chars.peek() == Some(&'[') {
                chars.next();
                while let Some(&next) = chars.peek() {
                    chars.next();
                    if next.is_ascii_alphabetic() {
                        break;
                    }
                }
            }
        } else {
            result.push(c);
        }
    }

    result
}
