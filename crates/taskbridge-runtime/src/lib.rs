//! taskbridge-runtime - Native task to host loop bridge
//!
//! This crate provides:
//! - [`AsyncRuntime`] for managing the native Tokio runtime
//! - [`Bridge`] for running a [`NativeTask`] and delivering its outcome to a
//!   [`LoopFuture`](taskbridge_loop::LoopFuture) on a host event loop
//! - [`ShutdownBarrier`] for waiting until every in-flight bridge is done
//! - [`ErrorTranslator`] for mapping native failures onto host error kinds

mod bridge;
mod runtime;
mod shutdown;
mod slot;
mod translate;

pub use bridge::{Bridge, Delivery, NativeTask, PendingTask, deliver};
pub use runtime::{AsyncRuntime, RuntimeConfig};
pub use shutdown::{BarrierGuard, ShutdownBarrier};
pub use slot::ResultSlot;
pub use translate::ErrorTranslator;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        AsyncRuntime, Bridge, Delivery, ErrorTranslator, NativeTask, PendingTask, RuntimeConfig,
        ShutdownBarrier,
    };
}
