//! Tracing layer that forwards to the host log sink

use crate::reload::ReloadHandle;
use crate::sink::{LogSinkManager, StderrSink};
use std::fmt::Write;
use std::sync::Arc;
use taskbridge_core::LogLevel;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;

/// Tracing layer that forwards events to a [`LogSinkManager`]
///
/// Structured fields are appended to the message as `name=value` pairs.
pub struct HostLogLayer {
    manager: &'static LogSinkManager,
}

impl HostLogLayer {
    /// Create a layer using the global sink manager
    pub fn new() -> Self {
        Self {
            manager: LogSinkManager::global(),
        }
    }

    /// Create a layer with a specific sink manager
    pub fn with_manager(manager: &'static LogSinkManager) -> Self {
        Self { manager }
    }

    /// Convert tracing Level to our LogLevel
    fn convert_level(level: &Level) -> LogLevel {
        match *level {
            Level::TRACE => LogLevel::Trace,
            Level::DEBUG => LogLevel::Debug,
            Level::INFO => LogLevel::Info,
            Level::WARN => LogLevel::Warn,
            Level::ERROR => LogLevel::Error,
        }
    }
}

impl Default for HostLogLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Layer<S> for HostLogLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let level = Self::convert_level(metadata.level());

        if !self.manager.is_enabled(level) {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        self.manager
            .log(level, metadata.target(), &visitor.into_message());
    }

    fn enabled(&self, metadata: &tracing::Metadata<'_>, _ctx: Context<'_, S>) -> bool {
        let level = Self::convert_level(metadata.level());
        self.manager.is_enabled(level)
    }
}

/// Collects the `message` field and the remaining fields of an event
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl MessageVisitor {
    fn push_field(&mut self, name: &str, value: std::fmt::Arguments<'_>) {
        if !self.fields.is_empty() {
            self.fields.push(' ');
        }
        let _ = write!(self.fields, "{name}={value}");
    }

    fn into_message(self) -> String {
        match (self.message.is_empty(), self.fields.is_empty()) {
            (_, true) => self.message,
            (true, false) => self.fields,
            (false, false) => format!("{} {}", self.message, self.fields),
        }
    }
}

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.push_field(field.name(), format_args!("{value:?}"));
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.push_field(field.name(), format_args!("{value}"));
        }
    }
}

/// Install the host log layer as the global subscriber
///
/// Sets the level on the global [`LogSinkManager`] and registers a
/// [`StderrSink`] if the host has not registered a sink yet. Safe to call
/// more than once: later calls only change the level.
pub fn init_logging(level: LogLevel) {
    use tracing_subscriber::prelude::*;

    let manager = LogSinkManager::global();
    manager.set_level(level);
    if !manager.has_sink() {
        manager.set_sink(Arc::new(StderrSink));
    }

    let (filter, handle) = tracing_subscriber::reload::Layer::new(ReloadHandle::filter_for(level));
    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(HostLogLayer::with_manager(manager));

    if tracing::subscriber::set_global_default(subscriber).is_ok() {
        ReloadHandle::global().set_handle(handle);
    } else if let Err(e) = ReloadHandle::global().reload_level(level) {
        tracing::debug!(error = %e, "global subscriber not installed by init_logging");
    }
}

/// Change the level of the global logging setup at runtime
pub fn set_log_level(level: LogLevel) {
    LogSinkManager::global().set_level(level);
    if let Err(e) = ReloadHandle::global().reload_level(level) {
        tracing::debug!(error = %e, "log filter not reloaded");
    }
}
