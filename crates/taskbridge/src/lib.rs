//! # taskbridge
//!
//! Run native async work on a tokio runtime and deliver each outcome, exactly
//! once, onto a single-threaded host event loop.
//!
//! taskbridge takes care of the awkward parts:
//! - Results are marshalled and resolved on the loop thread, under the host
//!   interpreter's exclusivity token
//! - Failures are translated into the host's error taxonomy
//! - Outcomes for closed loops or cancelled futures are discarded quietly
//! - A shutdown barrier lets the host wait for in-flight work before exit
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use taskbridge::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let interpreter = Interpreter::new();
//! let bridge = Bridge::from_config(&BridgeConfig::default(), Arc::clone(&interpreter))?;
//! let mut event_loop = EventLoop::new(Arc::clone(&interpreter));
//!
//! let task = NativeTask::new(async {
//!     taskbridge::tokio::time::sleep(std::time::Duration::from_millis(10)).await;
//!     Ok::<_, TaskError>(42)
//! });
//! let future = bridge.start(&event_loop.handle(), task)?;
//!
//! let outcome = event_loop.run_until_complete(future.into_future())?;
//! assert_eq!(outcome, Ok(HostValue::Int(42)));
//!
//! event_loop.close();
//! bridge.wait_idle(&mut interpreter.acquire());
//! # Ok(())
//! # }
//! ```
//!
//! ## Crate Structure
//!
//! This is a facade crate that re-exports from:
//! - [`taskbridge_core`] - Errors, configuration and log levels
//! - [`taskbridge_loop`] - The host event loop and loop-owned futures
//! - [`taskbridge_runtime`] - The bridge, its runtime and shutdown barrier
//! - [`taskbridge_logging`] - Forwarding `tracing` events to a host log sink

// Re-export core types
pub use taskbridge_core::{
    BridgeConfig, BridgeError, BridgeResult, LogLevel, TaskError, TaskResult,
};

// Re-export host loop types
pub use taskbridge_loop::{
    EventLoop, ExclusivityToken, HostError, HostErrorKind, HostValue, Interpreter, IntoHostValue,
    LoopError, LoopFuture, LoopHandle, sleep, timeout,
};

// Re-export bridge types
pub use taskbridge_runtime::{
    AsyncRuntime, Bridge, Delivery, ErrorTranslator, NativeTask, PendingTask, ResultSlot,
    RuntimeConfig, ShutdownBarrier,
};

// Re-export logging
pub use taskbridge_logging::{HostLogLayer, LogSink, LogSinkManager, init_logging, set_log_level};

pub use tokio;
pub use tracing;

/// Prelude module for convenient imports.
///
/// Use `use taskbridge::prelude::*;` to import commonly used types.
pub mod prelude {
    pub use crate::{
        Bridge, BridgeConfig, BridgeError, EventLoop, HostError, HostErrorKind, HostValue,
        Interpreter, IntoHostValue, LogLevel, LoopFuture, NativeTask, PendingTask, TaskError,
        TaskResult,
    };
}
