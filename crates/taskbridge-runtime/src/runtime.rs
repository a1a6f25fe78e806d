//! Tokio runtime management

use std::sync::atomic::{AtomicBool, Ordering};
use taskbridge_core::{BridgeConfig, BridgeError, BridgeResult};
use tokio::runtime::{Builder, Runtime};

/// Configuration for the native runtime
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Number of worker threads (None = number of CPU cores)
    pub worker_threads: Option<usize>,
    /// Name prefix for worker threads
    pub thread_name: String,
    /// Enable I/O driver
    pub enable_io: bool,
    /// Enable time driver
    pub enable_time: bool,
    /// Maximum blocking threads
    pub max_blocking_threads: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            worker_threads: None,
            thread_name: "taskbridge-worker".to_string(),
            enable_io: true,
            enable_time: true,
            max_blocking_threads: 512,
        }
    }
}

impl RuntimeConfig {
    /// Create a new runtime configuration
    pub fn new() -> Self {
        Self::default()
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
}

impl From<&BridgeConfig> for RuntimeConfig {
    fn from(config: &BridgeConfig) -> Self {
        Self {
            worker_threads: config.worker_threads,
            thread_name: config.thread_name.clone(),
            max_blocking_threads: config.max_blocking_threads,
            ..Default::default()
        }
    }
}

/// Manages the Tokio runtime native tasks run on
pub struct AsyncRuntime {
    runtime: Runtime,
    shutting_down: AtomicBool,
    config: RuntimeConfig,
}

impl AsyncRuntime {
    /// Create a new async runtime with the given configuration
    pub fn new(config: RuntimeConfig) -> BridgeResult<Self> {
        let mut builder = Builder::new_multi_thread();

        if let Some(threads) = config.worker_threads {
            builder.worker_threads(threads);
        }

        builder
            .thread_name(&config.thread_name)
            .max_blocking_threads(config.max_blocking_threads);

        if config.enable_io {
            builder.enable_io();
        }

        if config.enable_time {
            builder.enable_time();
        }

        let runtime = builder
            .build()
            .map_err(|e| BridgeError::Runtime(format!("Failed to create runtime: {}", e)))?;

        tracing::info!(
            worker_threads = ?config.worker_threads,
            thread_name = %config.thread_name,
            "native runtime started"
        );

        Ok(Self {
            runtime,
            shutting_down: AtomicBool::new(false),
            config,
        })
    }

    /// Get the runtime configuration
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Get a handle to the underlying Tokio runtime
    pub fn handle(&self) -> tokio::runtime::Handle {
        self.runtime.handle().clone()
    }

    /// Spawn a task on the runtime
    pub fn spawn<F>(&self, future: F) -> tokio::task::JoinHandle<F::Output>
    where
        F: std::future::Future + Send + 'static,
        F::Output: Send + 'static,
    {
        self.runtime.spawn(future)
    }

    /// Stop accepting new work
    ///
    /// Tasks already running are left to finish; wait for them with
    /// [`ShutdownBarrier::wait_until_idle`](crate::ShutdownBarrier::wait_until_idle).
    pub fn begin_shutdown(&self) {
        if !self.shutting_down.swap(true, Ordering::SeqCst) {
            tracing::info!("native runtime shutting down");
        }
    }

    /// Check if shutdown has been triggered
    pub fn is_shutting_down(&self) -> bool {
        self.shutting_down.load(Ordering::SeqCst)
    }
}

impl Drop for AsyncRuntime {
    fn drop(&mut self) {
        self.begin_shutdown();
    }
}
