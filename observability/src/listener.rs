//! The single-writer listener loop.
//!
//! Drains the shared queue on a dedicated thread and writes each record to
//! its logger's files. Only the listener ever writes to those files, so
//! lines from concurrent producers never interleave mid-line.

use crate::error::{LoggingError, LoggingResult};
use crate::queue::{LogReceiver, QueueItem};
use crate::record::LogRecord;
use crate::registry::SinkRegistry;
use parking_lot::Mutex;
use std::io::{self, Write};
use std::ops::ControlFlow;
use std::path::Path;
use std::sync::Arc;
use tokio::runtime::Handle;

/// Target of the listener's own diagnostics. Events under this target are
/// never fed back into the queue.
pub const DIAGNOSTIC_TARGET: &str = "observability::listener";

/// Lifecycle of an aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerState {
    /// Queue exists, no listener yet.
    Idle,
    /// Blocked on the queue or writing a record.
    Running,
    /// Sentinel seen; finishing the current write.
    Draining,
    /// Loop has returned.
    Stopped,
}

/// Shared view of a listener's state.
#[derive(Debug, Clone)]
pub struct StateCell(Arc<Mutex<ListenerState>>);

impl Default for StateCell {
    fn default() -> Self {
        Self(Arc::new(Mutex::new(ListenerState::Idle)))
    }
}

impl StateCell {
    pub fn get(&self) -> ListenerState {
        *self.0.lock()
    }

    pub(crate) fn set(&self, state: ListenerState) {
        *self.0.lock() = state;
    }
}

/// Outcome of a listener run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListenerReport {
    /// Records written to at least one sink.
    pub written: u64,
    /// Records that could not be handled.
    pub failed: u64,
    /// Whether the loop ended on the sentinel rather than a closed queue.
    pub stopped_by_sentinel: bool,
}

/// Drain `receiver` into `<log_dir>/<log_name>.log` until the sentinel.
///
/// Blocks the calling thread. Call it from a dedicated thread; from inside
/// an async runtime it fails with [`LoggingError::InsideRuntime`], use
/// [`run_listener_async`] there.
pub fn run_listener(
    receiver: LogReceiver,
    log_name: &str,
    log_dir: &Path,
) -> LoggingResult<ListenerReport> {
    Listener::new(receiver).run(log_name, log_dir)
}

/// Async counterpart of [`run_listener`] for callers already on a runtime.
pub async fn run_listener_async(
    receiver: LogReceiver,
    log_name: &str,
    log_dir: &Path,
) -> LoggingResult<ListenerReport> {
    Listener::new(receiver).run_async(log_name, log_dir).await
}

/// Listener with an explicit registry and observable state.
///
/// Per-record failures are written as one line to the diagnostic stream
/// (stderr unless replaced) whether or not a `tracing` subscriber is
/// installed.
pub struct Listener {
    receiver: LogReceiver,
    registry: SinkRegistry,
    state: StateCell,
    diagnostics: Box<dyn Write + Send>,
}

impl Listener {
    pub fn new(receiver: LogReceiver) -> Self {
        Self::with_state(receiver, SinkRegistry::new(), StateCell::default())
    }

    pub fn with_state(receiver: LogReceiver, registry: SinkRegistry, state: StateCell) -> Self {
        Self {
            receiver,
            registry,
            state,
            diagnostics: Box::new(io::stderr()),
        }
    }

    /// Replace the diagnostic stream.
    pub fn with_diagnostics(mut self, writer: impl Write + Send + 'static) -> Self {
        self.diagnostics = Box::new(writer);
        self
    }

    pub fn registry_mut(&mut self) -> &mut SinkRegistry {
        &mut self.registry
    }

    pub fn run(mut self, log_name: &str, log_dir: &Path) -> LoggingResult<ListenerReport> {
        if Handle::try_current().is_ok() {
            self.state.set(ListenerState::Stopped);
            return Err(LoggingError::InsideRuntime);
        }
        self.begin(log_name, log_dir)?;

        let mut report = ListenerReport::default();
        while let Some(item) = self.receiver.recv_blocking() {
            if self.process(item, &mut report).is_break() {
                break;
            }
        }
        Ok(self.finish(report))
    }

    /// Same loop as [`Listener::run`], awaiting the queue instead of
    /// blocking on it. File writes stay synchronous.
    pub async fn run_async(
        mut self,
        log_name: &str,
        log_dir: &Path,
    ) -> LoggingResult<ListenerReport> {
        self.begin(log_name, log_dir)?;

        let mut report = ListenerReport::default();
        while let Some(item) = self.receiver.recv().await {
            if self.process(item, &mut report).is_break() {
                break;
            }
        }
        Ok(self.finish(report))
    }

    fn begin(&mut self, log_name: &str, log_dir: &Path) -> LoggingResult<()> {
        if let Err(e) = self.registry.configure(log_name, log_dir) {
            self.state.set(ListenerState::Stopped);
            return Err(e);
        }
        self.state.set(ListenerState::Running);
        tracing::debug!(target: DIAGNOSTIC_TARGET, logger = %log_name, "Log listener started");
        Ok(())
    }

    fn process(&mut self, item: QueueItem, report: &mut ListenerReport) -> ControlFlow<()> {
        let record = match item {
            QueueItem::Record(record) => record,
            QueueItem::Stop => {
                report.stopped_by_sentinel = true;
                return ControlFlow::Break(());
            }
        };

        match self.registry.handle(&record) {
            Ok(()) => report.written += 1,
            Err(e) => {
                report.failed += 1;
                self.report_failure(&record, &e);
            }
        }
        ControlFlow::Continue(())
    }

    fn report_failure(&mut self, record: &LogRecord, error: &LoggingError) {
        // Best effort: a broken diagnostic stream never stops the loop.
        let _ = writeln!(
            self.diagnostics,
            "Failure in log listener (logger {:?}): {error}",
            record.logger
        );
        let _ = self.diagnostics.flush();
        tracing::debug!(
            target: DIAGNOSTIC_TARGET,
            error = %error,
            logger = %record.logger,
            "Failure in log listener"
        );
    }

    fn finish(self, report: ListenerReport) -> ListenerReport {
        self.state.set(ListenerState::Draining);
        drop(self.registry);
        self.state.set(ListenerState::Stopped);

        tracing::debug!(
            target: DIAGNOSTIC_TARGET,
            written = report.written,
            failed = report.failed,
            "Log listener stopped"
        );
        report
    }
}
