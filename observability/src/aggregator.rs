//! Dedicated-thread log aggregator.

use crate::error::{LoggingError, LoggingResult};
use crate::listener::{DIAGNOSTIC_TARGET, Listener, ListenerReport, ListenerState, StateCell};
use crate::queue::{LogProducer, LogReceiver, log_queue};
use crate::registry::SinkRegistry;
use std::path::{Path, PathBuf};
use std::thread::JoinHandle;

/// Owns the queue and the listener thread for one log file.
///
/// ```rust,no_run
/// use observability::LogAggregator;
///
/// let mut aggregator = LogAggregator::new("build", "/var/log/dtp");
/// aggregator.start()?;
///
/// let producer = aggregator.producer();
/// std::thread::spawn(move || producer.info("from a worker")).join().unwrap();
///
/// let report = aggregator.shutdown()?;
/// assert_eq!(report.written, 1);
/// # Ok::<(), observability::LoggingError>(())
/// ```
pub struct LogAggregator {
    log_name: String,
    log_dir: PathBuf,
    producer: LogProducer,
    receiver: Option<LogReceiver>,
    thread: Option<JoinHandle<LoggingResult<ListenerReport>>>,
    state: StateCell,
}

impl LogAggregator {
    pub fn new(log_name: &str, log_dir: impl AsRef<Path>) -> Self {
        let (producer, receiver) = log_queue(log_name);
        Self::from_queue(producer, receiver, log_dir)
    }

    /// Take over a queue created earlier, typically one already feeding a
    /// [`crate::QueueLayer`] before the log directory was known. The log name
    /// is the producer's logger name.
    pub fn from_queue(
        producer: LogProducer,
        receiver: LogReceiver,
        log_dir: impl AsRef<Path>,
    ) -> Self {
        Self {
            log_name: producer.logger().to_string(),
            log_dir: log_dir.as_ref().to_path_buf(),
            producer,
            receiver: Some(receiver),
            thread: None,
            state: StateCell::default(),
        }
    }

    /// Create and start in one step.
    pub fn spawn(log_name: &str, log_dir: impl AsRef<Path>) -> LoggingResult<Self> {
        let mut aggregator = Self::new(log_name, log_dir);
        aggregator.start()?;
        Ok(aggregator)
    }

    pub fn log_name(&self) -> &str {
        &self.log_name
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    pub fn state(&self) -> ListenerState {
        self.state.get()
    }

    /// A producer tagging records with this aggregator's log name. Records
    /// queued before [`LogAggregator::start`] are written once it runs.
    pub fn producer(&self) -> LogProducer {
        self.producer.clone()
    }

    /// Spawn the listener thread.
    pub fn start(&mut self) -> LoggingResult<()> {
        let receiver = self.receiver.take().ok_or(LoggingError::AlreadyStarted)?;

        let listener = Listener::with_state(receiver, SinkRegistry::new(), self.state.clone());
        let log_name = self.log_name.clone();
        let log_dir = self.log_dir.clone();

        let handle = std::thread::Builder::new()
            .name(format!("log-listener-{}", self.log_name))
            .spawn(move || listener.run(&log_name, &log_dir))
            .map_err(LoggingError::Spawn)?;

        self.thread = Some(handle);
        Ok(())
    }

    /// Send the sentinel and wait for the listener to finish.
    ///
    /// Records enqueued by any producer before the sentinel are written;
    /// anything enqueued afterwards is discarded.
    pub fn shutdown(mut self) -> LoggingResult<ListenerReport> {
        self.producer.stop();

        let Some(handle) = self.thread.take() else {
            self.state.set(ListenerState::Stopped);
            return Ok(ListenerReport::default());
        };

        handle.join().map_err(|_| LoggingError::ListenerPanicked)?
    }
}

impl Drop for LogAggregator {
    fn drop(&mut self) {
        if let Some(handle) = self.thread.take() {
            self.producer.stop();
            if handle.join().is_err() {
                tracing::error!(target: DIAGNOSTIC_TARGET, "Log listener thread panicked");
            }
        }
    }
}
