//! In-memory capture of emitted messages

use crate::layer::{ConsoleLayer, MessageVisitor};
use charmpack_core::LogLevel;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{Event, Subscriber};
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;

/// A message recorded by [`LogCapture`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedRecord {
    pub level: LogLevel,
    pub target: String,
    pub message: String,
}

/// Collects every event emitted while it is installed
///
/// Installation is scoped to the current thread, so concurrently running
/// tests do not see each other's messages.
#[derive(Clone, Default)]
pub struct LogCapture {
    records: Arc<Mutex<Vec<CapturedRecord>>>,
}

impl LogCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install as the current thread's subscriber until the guard drops
    #[must_use = "capturing stops when the guard is dropped"]
    pub fn install(&self) -> DefaultGuard {
        use tracing_subscriber::prelude::*;

        let subscriber = tracing_subscriber::registry().with(self.clone());
        tracing::subscriber::set_default(subscriber)
    }

    /// All records so far, oldest first
    pub fn records(&self) -> Vec<CapturedRecord> {
        self.records.lock().clone()
    }

    /// Messages at `level` or above, oldest first
    pub fn messages_at(&self, level: LogLevel) -> Vec<String> {
        self.records
            .lock()
            .iter()
            .filter(|r| r.level >= level)
            .map(|r| r.message.clone())
            .collect()
    }

    /// Informational and more severe messages, as a user would see them
    pub fn messages(&self) -> Vec<String> {
        self.messages_at(LogLevel::Info)
    }
}

impl<S> Layer<S> for LogCapture
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        self.records.lock().push(CapturedRecord {
            level: ConsoleLayer::convert_level(metadata.level()),
            target: metadata.target().to_string(),
            message: visitor.message.unwrap_or_default(),
        });
    }
}
