use std::path::PathBuf;
use thiserror::Error;

pub type LoggingResult<T> = Result<T, LoggingError>;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Invalid log name: {name:?}")]
    InvalidName { name: String },

    #[error("Cannot open log file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot write log file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No log sink configured for logger {logger:?}")]
    UnknownLogger { logger: String },

    #[error("Log listener is already running")]
    AlreadyStarted,

    #[error("Failed to spawn log listener: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("Blocking log listener cannot run on an async runtime thread")]
    InsideRuntime,

    #[error("Log listener thread panicked")]
    ListenerPanicked,
}
