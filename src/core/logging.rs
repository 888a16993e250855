//! Diagnostic logging to stderr (or a log file).
//!
//! Output on stdout belongs to command results, so every tracing event goes
//! to stderr. `--debug` raises the default level; `RAINFOREST_LOG`,
//! `RAINFOREST_LOG_FORMAT` and `RAINFOREST_LOG_FILE` tune it further, and
//! `RUST_LOG` overrides the filter entirely.

use std::fs::{File, OpenOptions};
use std::path::PathBuf;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

pub const ENV_LOG_LEVEL: &str = "RAINFOREST_LOG";
pub const ENV_LOG_FORMAT: &str = "RAINFOREST_LOG_FORMAT";
pub const ENV_LOG_FILE: &str = "RAINFOREST_LOG_FILE";

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable logs.
    #[default]
    Human,
    /// JSON logs (one event per line).
    Json,
    /// Compact logs (single line, terse).
    Compact,
}

impl LogFormat {
    /// Parse from string (case-insensitive).
    #[must_use]
    pub fn from_arg(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "human" => Some(Self::Human),
            "json" => Some(Self::Json),
            "compact" => Some(Self::Compact),
            _ => None,
        }
    }
}

/// Log verbosity. Warnings are shown by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    #[default]
    Warn,
    Error,
}

impl LogLevel {
    /// Parse from string (case-insensitive).
    #[must_use]
    pub fn from_arg(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "trace" => Some(Self::Trace),
            "verbose" | "debug" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "warn" | "warning" => Some(Self::Warn),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    /// Convert to tracing filter string.
    #[must_use]
    pub const fn as_filter(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Everything needed to install the subscriber.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogSettings {
    pub level: LogLevel,
    pub format: LogFormat,
    pub file: Option<PathBuf>,
}

impl LogSettings {
    /// Resolve settings from the `--debug` flag and an environment lookup.
    ///
    /// `--debug` lowers the level to at least `Debug`; it never hides `Trace`.
    /// Blank and unparseable values fall back to the defaults.
    pub fn from_env(debug: bool, env: impl Fn(&str) -> Option<String>) -> Self {
        let env = |key: &str| {
            env(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let level = env(ENV_LOG_LEVEL)
            .and_then(|value| LogLevel::from_arg(&value))
            .unwrap_or_default();

        Self {
            level: if debug { level.min(LogLevel::Debug) } else { level },
            format: env(ENV_LOG_FORMAT)
                .and_then(|value| LogFormat::from_arg(&value))
                .unwrap_or_default(),
            file: env(ENV_LOG_FILE).map(PathBuf::from),
        }
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("rainforest={}", self.level.as_filter())))
    }
}

/// Initialize logging from the process environment plus the `--debug` flag.
pub fn init_from_env(debug: bool) {
    init(&LogSettings::from_env(debug, |key| std::env::var(key).ok()));
}

/// Install the global subscriber.
///
/// Only the first call installs anything. A log file that cannot be opened
/// falls back to stderr.
pub fn init(settings: &LogSettings) {
    let file = settings.file.as_ref().and_then(|path| {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| eprintln!("warning: cannot open log file {}: {e}", path.display()))
            .ok()
    });

    let writer = || -> BoxMakeWriter {
        match file.as_ref().map(File::try_clone) {
            Some(Ok(file)) => BoxMakeWriter::new(file),
            _ => BoxMakeWriter::new(std::io::stderr),
        }
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(settings.filter())
        .with_writer(writer());

    match settings.format {
        LogFormat::Json => {
            builder
                .json()
                .with_span_events(FmtSpan::CLOSE)
                .try_init()
                .ok();
        }
        LogFormat::Compact => {
            builder.compact().with_target(true).try_init().ok();
        }
        LogFormat::Human => {
            builder.with_target(false).without_time().try_init().ok();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let pairs: Vec<(String, String)> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
    }

    #[test]
    fn defaults_without_environment() {
        let settings = LogSettings::from_env(false, |_| None);
        assert_eq!(settings, LogSettings::default());
        assert_eq!(settings.level, LogLevel::Warn);
    }

    #[test]
    fn environment_sets_level_format_and_file() {
        let settings = LogSettings::from_env(
            false,
            env_from(&[
                (ENV_LOG_LEVEL, "INFO"),
                (ENV_LOG_FORMAT, " json "),
                (ENV_LOG_FILE, "/tmp/rainforest.log"),
            ]),
        );
        assert_eq!(settings.level, LogLevel::Info);
        assert_eq!(settings.format, LogFormat::Json);
        assert_eq!(settings.file, Some(PathBuf::from("/tmp/rainforest.log")));
    }

    #[test]
    fn blank_or_unknown_values_fall_back() {
        let settings = LogSettings::from_env(
            false,
            env_from(&[(ENV_LOG_LEVEL, "  "), (ENV_LOG_FORMAT, "xml"), (ENV_LOG_FILE, "")]),
        );
        assert_eq!(settings, LogSettings::default());
    }

    #[test]
    fn debug_flag_raises_level_but_keeps_trace() {
        assert_eq!(LogSettings::from_env(true, |_| None).level, LogLevel::Debug);

        let trace = LogSettings::from_env(true, env_from(&[(ENV_LOG_LEVEL, "trace")]));
        assert_eq!(trace.level, LogLevel::Trace);
    }
}
