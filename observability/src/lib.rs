//! # Observability Module
//!
//! Log aggregation for concurrent workers:
//! - A shared unbounded queue any number of producers can feed
//! - One listener thread that owns every log file
//! - Idempotent sink configuration keyed by canonical file path
//! - A `tracing` layer that forwards events into the queue

pub mod aggregator;
pub mod error;
pub mod layer;
pub mod listener;
pub mod queue;
pub mod record;
pub mod registry;

pub use aggregator::LogAggregator;
pub use error::{LoggingError, LoggingResult};
pub use layer::QueueLayer;
pub use listener::{
    DIAGNOSTIC_TARGET, Listener, ListenerReport, ListenerState, StateCell, run_listener,
    run_listener_async,
};
pub use queue::{LogProducer, LogReceiver, QueueItem, log_queue};
pub use record::{LogLevel, LogRecord, TIMESTAMP_FORMAT};
pub use registry::{LoggerHandle, SinkRegistry};
