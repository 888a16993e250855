//! Test logging for structured test output and debugging.
//!
//! # Usage
//!
//! ```rust,ignore
//! let log = TestLogger::new("uploads_new_tests");
//! log.phase("setup");
//! // ...
//! log.phase("execute");
//! log.finish_ok();
//! ```
//!
//! # Environment Variables
//!
//! - `TEST_LOG_LEVEL` - trace, debug, info, warn, error (default: info)
//! - `NO_COLOR` - disable colored output when set

#![allow(dead_code)]

use std::env;
use std::fmt::Display;
use std::sync::{Mutex, OnceLock};
use std::time::Instant;

use chrono::Utc;

/// Log severity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Parse from string, case-insensitive.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "trace" => Some(Self::Trace),
            "debug" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "warn" | "warning" => Some(Self::Warn),
            "error" | "err" => Some(Self::Error),
            _ => None,
        }
    }

    const fn color_code(self) -> &'static str {
        match self {
            Self::Trace => "\x1b[90m",
            Self::Debug => "\x1b[36m",
            Self::Info => "\x1b[32m",
            Self::Warn => "\x1b[33m",
            Self::Error => "\x1b[31m",
        }
    }
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Trace => "TRACE",
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        };
        write!(f, "{s}")
    }
}

static MIN_LEVEL: OnceLock<LogLevel> = OnceLock::new();

fn min_level() -> LogLevel {
    *MIN_LEVEL.get_or_init(|| {
        env::var("TEST_LOG_LEVEL")
            .ok()
            .and_then(|s| LogLevel::parse(&s))
            .unwrap_or(LogLevel::Info)
    })
}

fn use_color() -> bool {
    env::var_os("NO_COLOR").is_none()
}

/// Per-test logger with phase and duration tracking.
pub struct TestLogger {
    test_name: String,
    start_time: Instant,
    current_phase: Mutex<String>,
}

impl TestLogger {
    /// Create a logger for one test.
    #[must_use]
    pub fn new(test_name: &str) -> Self {
        let logger = Self {
            test_name: test_name.to_string(),
            start_time: Instant::now(),
            current_phase: Mutex::new("init".to_string()),
        };
        logger.log(LogLevel::Info, "Test starting");
        logger
    }

    /// Set the current phase (setup, execute, verify, ...).
    pub fn phase(&self, phase: &str) {
        if let Ok(mut current) = self.current_phase.lock() {
            *current = phase.to_string();
        }
        self.log(LogLevel::Debug, &format!("Phase: {phase}"));
    }

    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    /// Log an HTTP exchange made against a mock server.
    pub fn http_request(&self, method: &str, url: &str) {
        self.debug(&format!("HTTP {method} {url}"));
    }

    /// Mark the test as passed.
    #[allow(clippy::cast_possible_truncation)]
    pub fn finish_ok(&self) {
        let duration_ms = self.start_time.elapsed().as_millis() as u64;
        self.log(
            LogLevel::Info,
            &format!("Test passed (duration: {duration_ms}ms)"),
        );
    }

    fn log(&self, level: LogLevel, message: &str) {
        if level < min_level() {
            return;
        }

        let ts = Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ");
        let phase = self
            .current_phase
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default();

        if use_color() {
            eprintln!(
                "[{ts}] [{}{level}\x1b[0m] [{}:{phase}] {message}",
                level.color_code(),
                self.test_name
            );
        } else {
            eprintln!("[{ts}] [{level}] [{}:{phase}] {message}", self.test_name);
        }
    }
}
