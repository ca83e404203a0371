//! Shared log queue.
//!
//! An unbounded multi-producer, single-consumer FIFO. Producers never block;
//! the single receiver belongs to the aggregator.

use crate::record::{LogLevel, LogRecord};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// An entry in the queue: a record or the stop sentinel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum QueueItem {
    Record(LogRecord),
    Stop,
}

/// Create a queue; records are tagged with `log_name` by the returned
/// producer.
pub fn log_queue(log_name: &str) -> (LogProducer, LogReceiver) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (
        LogProducer {
            logger: log_name.to_string(),
            sender,
        },
        LogReceiver { receiver },
    )
}

/// Producer handle. Cheap to clone; every clone feeds the same queue.
#[derive(Debug, Clone)]
pub struct LogProducer {
    logger: String,
    sender: UnboundedSender<QueueItem>,
}

impl LogProducer {
    pub fn logger(&self) -> &str {
        &self.logger
    }

    /// A producer on the same queue tagging records with another logger
    /// name.
    pub fn for_logger(&self, logger: &str) -> Self {
        Self {
            logger: logger.to_string(),
            sender: self.sender.clone(),
        }
    }

    /// Enqueue a message. Returns `false` once the listener has gone away.
    pub fn log(&self, level: LogLevel, message: impl Into<String>) -> bool {
        self.send(QueueItem::Record(LogRecord::new(&self.logger, level, message)))
    }

    pub fn send_record(&self, record: LogRecord) -> bool {
        self.send(QueueItem::Record(record))
    }

    pub fn debug(&self, message: impl Into<String>) -> bool {
        self.log(LogLevel::Debug, message)
    }

    pub fn info(&self, message: impl Into<String>) -> bool {
        self.log(LogLevel::Info, message)
    }

    pub fn warn(&self, message: impl Into<String>) -> bool {
        self.log(LogLevel::Warn, message)
    }

    pub fn error(&self, message: impl Into<String>) -> bool {
        self.log(LogLevel::Error, message)
    }

    /// Enqueue the stop sentinel. Must be the last item the coordinating
    /// producer sends.
    pub fn stop(&self) -> bool {
        self.send(QueueItem::Stop)
    }

    fn send(&self, item: QueueItem) -> bool {
        self.sender.send(item).is_ok()
    }
}

/// Receiving end, owned by the listener.
#[derive(Debug)]
pub struct LogReceiver {
    receiver: UnboundedReceiver<QueueItem>,
}

impl LogReceiver {
    /// Block the current thread until an item arrives. `None` means every
    /// producer has been dropped.
    ///
    /// Must not be called from inside an async runtime.
    pub fn recv_blocking(&mut self) -> Option<QueueItem> {
        self.receiver.blocking_recv()
    }

    pub async fn recv(&mut self) -> Option<QueueItem> {
        self.receiver.recv().await
    }
}
