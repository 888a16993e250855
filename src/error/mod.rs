//! Error types for rainforest.
//!
//! Uses `thiserror` for structured error types that map to exit codes.
//!
//! ## Error Taxonomy
//!
//! - **Authentication**: missing or rejected API token
//! - **Network**: connection failures and timeouts
//! - **Configuration**: config file parsing, invalid values
//! - **Api**: non-success responses and unexpected payloads
//! - **Input**: invalid arguments, malformed RFML or CSV files
//! - **Internal**: I/O, serialization, unclassified
//!
//! Each error has a stable error code (e.g., `RF-A001`) for programmatic handling.
//! Usage errors from the argument parser never reach this type; clap reports
//! them and exits with status 2 on its own.

use std::path::PathBuf;

use thiserror::Error;

// =============================================================================
// Error Categories
// =============================================================================

/// High-level error categories for classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Authentication,
    Network,
    Configuration,
    Api,
    Input,
    Internal,
}

impl ErrorCategory {
    /// Returns a human-readable description of the category.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Authentication => "Authentication error",
            Self::Network => "Network error",
            Self::Configuration => "Configuration error",
            Self::Api => "API error",
            Self::Input => "Input error",
            Self::Internal => "Internal error",
        }
    }

    /// Returns a short code prefix for this category.
    #[must_use]
    pub const fn code_prefix(&self) -> &'static str {
        match self {
            Self::Authentication => "A",
            Self::Network => "N",
            Self::Configuration => "C",
            Self::Api => "P",
            Self::Input => "I",
            Self::Internal => "X",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

// =============================================================================
// Exit Codes
// =============================================================================

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// Unexpected failure
    GeneralError = 1,
    /// Invalid invocation; emitted by clap for usage errors
    Usage = 2,
    /// Configuration or input errors
    InvalidInput = 3,
    /// Timeout
    Timeout = 4,
    /// A run finished without passing
    RunFailed = 5,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as Self
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        Self::from(code as u8)
    }
}

/// Main error type for rainforest operations.
#[derive(Error, Debug)]
pub enum RainforestError {
    // ==========================================================================
    // Authentication errors
    // ==========================================================================
    /// No API token was supplied by flag, environment or config file.
    #[error("no API token configured")]
    AuthNotConfigured,

    /// The API rejected the token.
    #[error("API token rejected (HTTP {status})")]
    AuthInvalid { status: u16 },

    // ==========================================================================
    // Network errors
    // ==========================================================================
    /// Request timed out.
    #[error("request timeout after {0} seconds")]
    Timeout(u64),

    /// Transport-level failure.
    #[error("network error: {0}")]
    Network(String),

    // ==========================================================================
    // Configuration errors
    // ==========================================================================
    /// Error parsing the configuration file.
    #[error("config parse error at {path}: {message}")]
    ConfigParse { path: String, message: String },

    /// Invalid value in configuration or environment.
    #[error("invalid config value for '{key}': {message}")]
    ConfigInvalid { key: String, message: String },

    // ==========================================================================
    // API errors
    // ==========================================================================
    /// The API answered with a non-success status.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// The API answered with a payload we could not decode.
    #[error("failed to parse response: {0}")]
    ParseResponse(String),

    /// A run reached a terminal state without passing.
    #[error("run {run_id} finished with result '{result}'")]
    RunFailed { run_id: i64, result: String },

    // ==========================================================================
    // Input errors
    // ==========================================================================
    /// Subcommand without a handler.
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// Argument value the handler cannot use.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Malformed RFML file.
    #[error("{}:{line}: {message}", path.display())]
    Rfml {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// Cross-file RFML validation failed.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Malformed CSV file.
    #[error("CSV error at line {line}: {message}")]
    Csv { line: usize, message: String },

    /// Refusing to overwrite an existing file or remote object.
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// A remote object was not found.
    #[error("not found: {0}")]
    NotFound(String),

    // ==========================================================================
    // Internal errors
    // ==========================================================================
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Catch-all for other errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RainforestError {
    /// Map error to process exit code.
    #[must_use]
    pub const fn exit_code(&self) -> ExitCode {
        match self {
            Self::AuthNotConfigured
            | Self::ConfigParse { .. }
            | Self::ConfigInvalid { .. }
            | Self::UnknownCommand(_)
            | Self::InvalidArgument(_)
            | Self::Rfml { .. }
            | Self::Validation(_)
            | Self::Csv { .. }
            | Self::AlreadyExists(_) => ExitCode::InvalidInput,

            Self::Timeout(_) => ExitCode::Timeout,

            Self::RunFailed { .. } => ExitCode::RunFailed,

            Self::AuthInvalid { .. }
            | Self::Network(_)
            | Self::Api { .. }
            | Self::ParseResponse(_)
            | Self::NotFound(_)
            | Self::Io(_)
            | Self::Json(_)
            | Self::Other(_) => ExitCode::GeneralError,
        }
    }

    /// Returns the error category for classification.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::AuthNotConfigured | Self::AuthInvalid { .. } => ErrorCategory::Authentication,

            Self::Timeout(_) | Self::Network(_) => ErrorCategory::Network,

            Self::ConfigParse { .. } | Self::ConfigInvalid { .. } => ErrorCategory::Configuration,

            Self::Api { .. }
            | Self::ParseResponse(_)
            | Self::RunFailed { .. }
            | Self::NotFound(_) => ErrorCategory::Api,

            Self::UnknownCommand(_)
            | Self::InvalidArgument(_)
            | Self::Rfml { .. }
            | Self::Validation(_)
            | Self::Csv { .. }
            | Self::AlreadyExists(_) => ErrorCategory::Input,

            Self::Io(_) | Self::Json(_) | Self::Other(_) => ErrorCategory::Internal,
        }
    }

    /// Returns a stable error code for programmatic handling.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::AuthNotConfigured => "RF-A001",
            Self::AuthInvalid { .. } => "RF-A002",

            Self::Timeout(_) => "RF-N001",
            Self::Network(_) => "RF-N099",

            Self::ConfigParse { .. } => "RF-C001",
            Self::ConfigInvalid { .. } => "RF-C002",

            Self::Api { .. } => "RF-P001",
            Self::ParseResponse(_) => "RF-P002",
            Self::NotFound(_) => "RF-P003",
            Self::RunFailed { .. } => "RF-P010",

            Self::UnknownCommand(_) => "RF-I001",
            Self::InvalidArgument(_) => "RF-I002",
            Self::Rfml { .. } => "RF-I010",
            Self::Validation(_) => "RF-I011",
            Self::Csv { .. } => "RF-I020",
            Self::AlreadyExists(_) => "RF-I030",

            Self::Io(_) => "RF-X001",
            Self::Json(_) => "RF-X002",
            Self::Other(_) => "RF-X099",
        }
    }

    /// Returns whether retrying the same request might succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout(_) | Self::Network(_) => true,
            Self::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// A short, actionable next step for the user.
    #[must_use]
    pub const fn hint(&self) -> Option<&'static str> {
        match self {
            Self::AuthNotConfigured => Some(
                "Pass --token, set RAINFOREST_API_TOKEN, or add `token` under [api] in the config file.",
            ),
            Self::AuthInvalid { .. } => {
                Some("Check that the API token is current in your Rainforest account settings.")
            }
            Self::Timeout(_) | Self::Network(_) => {
                Some("Check your connection, or raise RAINFOREST_TIMEOUT.")
            }
            Self::ConfigParse { .. } | Self::ConfigInvalid { .. } => {
                Some("Fix the config file or point RAINFOREST_CONFIG at a valid one.")
            }
            Self::Rfml { .. } | Self::Validation(_) => {
                Some("Run `rainforest validate` to list every problem in your test files.")
            }
            Self::RunFailed { .. } => Some("Run `rainforest report <RUN_ID>` for per-test results."),
            _ => None,
        }
    }
}

/// Result type alias for rainforest operations.
pub type Result<T> = std::result::Result<T, RainforestError>;

// =============================================================================
// Tests
// =============================================================================
