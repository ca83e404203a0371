//! Bridge from `tracing` events to the log queue.

use crate::listener::DIAGNOSTIC_TARGET;
use crate::queue::LogProducer;
use crate::record::LogLevel;
use std::fmt::{self, Write as _};
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

/// Forwards every `tracing` event to a [`LogProducer`], so plain
/// `tracing::info!` calls in worker code end up in the aggregated log file.
///
/// The message becomes the record message; other fields are appended as
/// `key=value`. Events from the listener itself are skipped.
#[derive(Debug, Clone)]
pub struct QueueLayer {
    producer: LogProducer,
}

impl QueueLayer {
    pub fn new(producer: LogProducer) -> Self {
        Self { producer }
    }
}

impl<S: Subscriber> Layer<S> for QueueLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if metadata.target() == DIAGNOSTIC_TARGET {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        self.producer
            .log(LogLevel::from(metadata.level()), visitor.finish());
    }
}

#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl MessageVisitor {
    fn finish(self) -> String {
        if self.fields.is_empty() {
            self.message
        } else if self.message.is_empty() {
            self.fields
        } else {
            format!("{} {}", self.message, self.fields)
        }
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            self.record_debug(field, &value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{value:?}");
            return;
        }
        if !self.fields.is_empty() {
            self.fields.push(' ');
        }
        let _ = write!(self.fields, "{}={:?}", field.name(), value);
    }
}
