//! taskbridge-core - Core error, configuration, and logging types
//!
//! This crate provides the foundational types shared by every taskbridge crate:
//! - [`TaskError`] for failures raised by native tasks
//! - [`BridgeError`] for failures of the bridging machinery itself
//! - [`BridgeConfig`] for runtime and logging configuration
//! - [`LogLevel`] for host-facing log filtering

mod config;
mod error;

pub use config::BridgeConfig;
pub use error::{BridgeError, BridgeResult, TaskError, TaskResult};

/// Log levels understood by host log sinks
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
    Off = 5,
}

impl LogLevel {
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => LogLevel::Trace,
            1 => LogLevel::Debug,
            2 => LogLevel::Info,
            3 => LogLevel::Warn,
            4 => LogLevel::Error,
            _ => LogLevel::Off,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "TRACE"),
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warn => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
            LogLevel::Off => write!(f, "OFF"),
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = BridgeError;

    /// Parse a level name, case-insensitively (`"warning"` is accepted for `Warn`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            "off" => Ok(LogLevel::Off),
            other => Err(BridgeError::Config(format!("unknown log level: {other}"))),
        }
    }
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{BridgeConfig, BridgeError, BridgeResult, LogLevel, TaskError, TaskResult};
}

#[cfg(test)]
mod lib_tests;
