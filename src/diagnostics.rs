use std::fmt;
use std::io;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;
use tracing::Dispatch;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;

/// Diagnostic verbosity, named after the levels users already know from
/// the original script's `--log_level` option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum LogLevel {
    NotSet,
    Debug,
    Info,
    #[default]
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    pub const NAMES: [&'static str; 6] = ["NOTSET", "DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"];

    pub fn name(self) -> &'static str {
        match self {
            LogLevel::NotSet => "NOTSET",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
            LogLevel::Critical => "CRITICAL",
        }
    }

    /// NOTSET lets everything through. Nothing is ever logged at critical
    /// severity, so CRITICAL silences all output.
    pub fn filter(self) -> LevelFilter {
        match self {
            LogLevel::NotSet => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warning => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Critical => LevelFilter::OFF,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown log level \"{0}\" (expected one of NOTSET, DEBUG, INFO, WARNING, ERROR, CRITICAL)")]
pub struct ParseLogLevelError(String);

impl FromStr for LogLevel {
    type Err = ParseLogLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let level = match s.to_ascii_uppercase().as_str() {
            "NOTSET" => LogLevel::NotSet,
            "DEBUG" => LogLevel::Debug,
            "INFO" => LogLevel::Info,
            "WARNING" => LogLevel::Warning,
            "ERROR" => LogLevel::Error,
            "CRITICAL" => LogLevel::Critical,
            _ => return Err(ParseLogLevelError(s.to_string())),
        };
        Ok(level)
    }
}

impl TryFrom<String> for LogLevel {
    type Error = ParseLogLevelError;

    fn try_from(s: String) -> Result<Self, ParseLogLevelError> {
        s.parse()
    }
}

/// Where the diagnostics of a run go, and how many of them.
///
/// Holds its own `tracing` dispatcher instead of installing a global one, so
/// a caller can run the core with different sinks side by side.
#[derive(Debug, Clone)]
pub struct Diagnostics {
    level: LogLevel,
    dispatch: Dispatch,
}

impl Diagnostics {
    /// Logs to standard error.
    pub fn new(level: LogLevel) -> Self {
        Self::with_writer(level, io::stderr)
    }

    pub fn silent() -> Self {
        Self::with_writer(LogLevel::Critical, io::sink)
    }

    pub fn with_writer<W>(level: LogLevel, writer: W) -> Self
    where
        W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(level.filter())
            .with_writer(writer)
            .with_ansi(false)
            .with_target(false)
            .without_time()
            .finish();

        Self {
            level,
            dispatch: Dispatch::new(subscriber),
        }
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    /// Runs `f` with this sink receiving every event emitted on the current
    /// thread.
    pub fn scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }
}
