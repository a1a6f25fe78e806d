//! taskbridge-logging - Tracing to host log sink bridge
//!
//! This crate provides:
//! - [`HostLogLayer`] tracing layer that forwards events to a [`LogSink`]
//! - [`LogSinkManager`] holding the registered sink and its level
//! - [`init_logging`] and [`set_log_level`] for process-wide setup

mod layer;
mod reload;
mod sink;

pub use layer::{HostLogLayer, init_logging, set_log_level};
pub use reload::ReloadHandle;
pub use sink::{LogSink, LogSinkManager, StderrSink};
pub use taskbridge_core::LogLevel;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{HostLogLayer, LogLevel, LogSink, LogSinkManager, init_logging};
}
