//! Bridge configuration

use crate::{BridgeError, LogLevel};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for a bridge host
///
/// Loadable from JSON or TOML; every field has a default so an empty
/// document is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Number of native worker threads (default: number of CPU cores)
    #[serde(default)]
    pub worker_threads: Option<usize>,

    /// Name prefix for native worker threads
    #[serde(default = "default_thread_name")]
    pub thread_name: String,

    /// Maximum blocking threads (delivery runs on these)
    #[serde(default = "default_max_blocking_threads")]
    pub max_blocking_threads: usize,

    /// Initial log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// How long a host waits for in-flight bridges at shutdown, in milliseconds
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_ms: u64,
}

fn default_thread_name() -> String {
    "taskbridge-worker".to_string()
}

fn default_max_blocking_threads() -> usize {
    512
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_shutdown_timeout() -> u64 {
    5000
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            worker_threads: None,
            thread_name: default_thread_name(),
            max_blocking_threads: default_max_blocking_threads(),
            log_level: default_log_level(),
            shutdown_timeout_ms: default_shutdown_timeout(),
        }
    }
}

impl BridgeConfig {
    /// Create a default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create configuration from JSON bytes
    pub fn from_json(bytes: &[u8]) -> Result<Self, BridgeError> {
        if bytes.is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_json::from_slice(bytes)?;
        config.validate()?;
        Ok(config)
    }

    /// Create configuration from TOML text
    pub fn from_toml(text: &str) -> Result<Self, BridgeError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the number of worker threads
    pub fn with_worker_threads(mut self, threads: usize) -> Self {
        self.worker_threads = Some(threads);
        self
    }

    /// Set the thread name prefix
    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    /// Set the log level
    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level.to_string().to_ascii_lowercase();
        self
    }

    /// Parsed log level
    pub fn level(&self) -> Result<LogLevel, BridgeError> {
        self.log_level.parse()
    }

    /// Shutdown timeout as a duration
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }

    /// Check field values that serde cannot
    pub fn validate(&self) -> Result<(), BridgeError> {
        if self.worker_threads == Some(0) {
            return Err(BridgeError::Config(
                "worker_threads must be at least 1".to_string(),
            ));
        }
        if self.max_blocking_threads == 0 {
            return Err(BridgeError::Config(
                "max_blocking_threads must be at least 1".to_string(),
            ));
        }
        self.level()?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "config/config_tests.rs"]
mod config_tests;
