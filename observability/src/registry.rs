//! File sinks keyed by logger name.
//!
//! A logger may have several sinks (one per distinct file). Attaching is
//! idempotent: the canonical absolute file path is the identity of a sink,
//! and a file is opened at most once per registry even when several
//! loggers write to it.

use crate::error::{LoggingError, LoggingResult};
use crate::listener::DIAGNOSTIC_TARGET;
use crate::record::LogRecord;
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

#[derive(Debug)]
struct FileSink {
    path: PathBuf,
    file: File,
}

impl FileSink {
    fn open(path: PathBuf) -> LoggingResult<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| LoggingError::Open {
                path: path.clone(),
                source,
            })?;
        Ok(Self { path, file })
    }

    fn write_line(&self, line: &str) -> LoggingResult<()> {
        let mut file = &self.file;
        file.write_all(line.as_bytes())
            .and_then(|()| file.write_all(b"\n"))
            .and_then(|()| file.flush())
            .map_err(|source| LoggingError::Write {
                path: self.path.clone(),
                source,
            })
    }
}

/// What a `configure` call resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerHandle {
    pub name: String,
    /// Every file the logger writes to, in attach order.
    pub paths: Vec<PathBuf>,
}

/// Registry of open log files, owned by the aggregator.
#[derive(Debug, Default)]
pub struct SinkRegistry {
    loggers: HashMap<String, Vec<Arc<FileSink>>>,
    open: HashMap<PathBuf, Arc<FileSink>>,
}

impl SinkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `<log_dir>/<log_name>.log` to the logger `log_name`.
    ///
    /// Creates the directory if needed. Configuring the same name and
    /// directory again returns the existing handle without opening or
    /// attaching anything.
    pub fn configure(&mut self, log_name: &str, log_dir: &Path) -> LoggingResult<LoggerHandle> {
        let path = sink_path(log_name, log_dir)?;

        let already_attached = self
            .loggers
            .get(log_name)
            .is_some_and(|sinks| sinks.iter().any(|s| s.path == path));

        if !already_attached {
            let sink = match self.open.get(&path) {
                Some(sink) => Arc::clone(sink),
                None => {
                    let sink = Arc::new(FileSink::open(path.clone())?);
                    self.open.insert(path.clone(), Arc::clone(&sink));
                    sink
                }
            };
            tracing::debug!(
                target: DIAGNOSTIC_TARGET,
                logger = %log_name,
                path = %path.display(),
                "Attached log file"
            );
            self.loggers
                .entry(log_name.to_string())
                .or_default()
                .push(sink);
        }

        Ok(self.handle_for(log_name))
    }

    /// Number of sinks attached to a logger.
    pub fn sink_count(&self, log_name: &str) -> usize {
        self.loggers.get(log_name).map_or(0, Vec::len)
    }

    /// Write one record to every sink of its logger.
    pub fn handle(&self, record: &LogRecord) -> LoggingResult<()> {
        let sinks = self
            .loggers
            .get(&record.logger)
            .filter(|sinks| !sinks.is_empty())
            .ok_or_else(|| LoggingError::UnknownLogger {
                logger: record.logger.clone(),
            })?;

        let line = record.format();
        for sink in sinks {
            sink.write_line(&line)?;
        }
        Ok(())
    }

    fn handle_for(&self, log_name: &str) -> LoggerHandle {
        LoggerHandle {
            name: log_name.to_string(),
            paths: self
                .loggers
                .get(log_name)
                .map(|sinks| sinks.iter().map(|s| s.path.clone()).collect())
                .unwrap_or_default(),
        }
    }
}

/// Canonical `<log_dir>/<log_name>.log`.
fn sink_path(log_name: &str, log_dir: &Path) -> LoggingResult<PathBuf> {
    let mut components = Path::new(log_name).components();
    let single_normal = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );
    if !single_normal {
        return Err(LoggingError::InvalidName {
            name: log_name.to_string(),
        });
    }

    let open_error = |source| LoggingError::Open {
        path: log_dir.to_path_buf(),
        source,
    };
    std::fs::create_dir_all(log_dir).map_err(open_error)?;
    let dir = log_dir.canonicalize().map_err(open_error)?;
    Ok(dir.join(format!("{log_name}.log")))
}
