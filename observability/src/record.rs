//! Log records carried through the queue.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// `DD-Mon-YY HH:MM:SS`, 24-hour clock.
pub const TIMESTAMP_FORMAT: &str = "%d-%b-%y %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }
}

impl From<&tracing::Level> for LogLevel {
    fn from(level: &tracing::Level) -> Self {
        match *level {
            tracing::Level::TRACE => LogLevel::Trace,
            tracing::Level::DEBUG => LogLevel::Debug,
            tracing::Level::INFO => LogLevel::Info,
            tracing::Level::WARN => LogLevel::Warn,
            tracing::Level::ERROR => LogLevel::Error,
        }
    }
}

/// One log line waiting to be written by the aggregator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Name of the logical log; selects the destination sink
    pub logger: String,
    pub level: LogLevel,
    pub message: String,
    pub timestamp: DateTime<Local>,
}

impl LogRecord {
    pub fn new(logger: &str, level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            logger: logger.to_string(),
            level,
            message: message.into(),
            timestamp: Local::now(),
        }
    }

    /// Render as `<timestamp> : <message>`, without a line terminator.
    pub fn format(&self) -> String {
        format!("{} : {}", self.timestamp.format(TIMESTAMP_FORMAT), self.message)
    }
}
