//! Tracing layer that renders events for the terminal

use charmpack_core::LogLevel;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;

/// Tracing layer that prints event messages for the user
///
/// Informational messages go to stdout exactly as written. Warnings and errors
/// go to stderr, also verbatim. Debug and trace output goes to stderr with a
/// level prefix.
pub struct ConsoleLayer {
    level: LogLevel,
}

impl ConsoleLayer {
    /// Create a layer that shows events at `level` and above
    pub fn new(level: LogLevel) -> Self {
        Self { level }
    }

    /// Convert tracing Level to our LogLevel
    pub(crate) fn convert_level(level: &Level) -> LogLevel {
        match *level {
            Level::TRACE => LogLevel::Trace,
            Level::DEBUG => LogLevel::Debug,
            Level::INFO => LogLevel::Info,
            Level::WARN => LogLevel::Warn,
            Level::ERROR => LogLevel::Error,
        }
    }

    /// Render a message the way it is shown on the terminal
    pub(crate) fn render(level: LogLevel, message: &str) -> String {
        match level {
            LogLevel::Trace | LogLevel::Debug => format!("{level}: {message}"),
            _ => message.to_string(),
        }
    }

    fn is_enabled(&self, level: LogLevel) -> bool {
        self.level != LogLevel::Off && level >= self.level
    }
}

impl Default for ConsoleLayer {
    fn default() -> Self {
        Self::new(LogLevel::Info)
    }
}

impl<S> Layer<S> for ConsoleLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let level = Self::convert_level(event.metadata().level());
        if !self.is_enabled(level) {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        let line = Self::render(level, &visitor.message.unwrap_or_default());

        // A closed pipe must not turn into a panic while reporting
        let _ = if level == LogLevel::Info {
            writeln!(io::stdout().lock(), "{line}")
        } else {
            writeln!(io::stderr().lock(), "{line}")
        };
    }

    // No `enabled` override: the log file layer may want events this layer hides.
}

/// Visitor to extract the message field from tracing events
#[derive(Default)]
pub(crate) struct MessageVisitor {
    pub(crate) message: Option<String>,
}

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" || self.message.is_none() {
            self.message = Some(format!("{:?}", value));
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" || self.message.is_none() {
            self.message = Some(value.to_string());
        }
    }
}

/// Install the console layer as the global subscriber
///
/// When `log_file` is given, every event at debug level and above is also
/// appended to it with timestamps, as is done inside managed environments.
/// Calling this more than once keeps the first subscriber.
pub fn init_logging(level: LogLevel, log_file: Option<&Path>) -> io::Result<()> {
    use tracing_subscriber::filter::LevelFilter;
    use tracing_subscriber::prelude::*;

    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .with_filter(LevelFilter::DEBUG),
            )
        }
        None => None,
    };

    let subscriber = tracing_subscriber::registry()
        .with(ConsoleLayer::new(level))
        .with(file_layer);

    // Ignore error if a subscriber is already set
    let _ = tracing::subscriber::set_global_default(subscriber);
    Ok(())
}
