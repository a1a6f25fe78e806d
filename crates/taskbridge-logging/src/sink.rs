//! Host log sink management

use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use taskbridge_core::LogLevel;

/// Destination for log records, registered by the host
///
/// Called from whichever thread emitted the event, including native
/// runtime workers, so implementations must be thread-safe and must not
/// block on the host loop.
pub trait LogSink: Send + Sync {
    fn log(&self, level: LogLevel, target: &str, message: &str);
}

impl<F> LogSink for F
where
    F: Fn(LogLevel, &str, &str) + Send + Sync,
{
    fn log(&self, level: LogLevel, target: &str, message: &str) {
        self(level, target, message)
    }
}

/// Sink writing `LEVEL target: message` lines to standard error
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrSink;

impl LogSink for StderrSink {
    fn log(&self, level: LogLevel, target: &str, message: &str) {
        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(stderr, "{level} {target}: {message}");
    }
}

/// Global sink manager
static SINK_MANAGER: OnceCell<LogSinkManager> = OnceCell::new();

/// Holds the registered [`LogSink`] and the minimum level forwarded to it
pub struct LogSinkManager {
    sink: RwLock<Option<Arc<dyn LogSink>>>,
    level: AtomicU8,
}

impl LogSinkManager {
    /// Create a manager with no sink at `Info` level
    pub fn new() -> Self {
        Self {
            sink: RwLock::new(None),
            level: AtomicU8::new(LogLevel::Info as u8),
        }
    }

    /// Get the global manager instance
    pub fn global() -> &'static LogSinkManager {
        SINK_MANAGER.get_or_init(LogSinkManager::new)
    }

    pub fn set_sink(&self, sink: Arc<dyn LogSink>) {
        *self.sink.write() = Some(sink);
    }

    /// Remove the sink; later records are dropped
    pub fn clear_sink(&self) {
        *self.sink.write() = None;
    }

    pub fn has_sink(&self) -> bool {
        self.sink.read().is_some()
    }

    pub fn set_level(&self, level: LogLevel) {
        self.level.store(level as u8, Ordering::SeqCst);
    }

    pub fn level(&self) -> LogLevel {
        LogLevel::from_u8(self.level.load(Ordering::SeqCst))
    }

    /// Check if a log level is enabled
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        level != LogLevel::Off && level >= self.level()
    }

    /// Forward a record to the sink if one is set and `level` is enabled
    pub fn log(&self, level: LogLevel, target: &str, message: &str) {
        if !self.is_enabled(level) {
            return;
        }

        // Clone out so the sink runs without the lock held.
        let sink = self.sink.read().clone();
        if let Some(sink) = sink {
            sink.log(level, target, message);
        }
    }
}

impl Default for LogSinkManager {
    fn default() -> Self {
        Self::new()
    }
}
