//! taskbridge-loop - Host-side event loop model
//!
//! This crate models the foreign side of a bridge: a single-threaded
//! cooperative event loop whose completion objects may only be mutated on the
//! loop's own thread while holding the interpreter's exclusivity token.
//!
//! - [`Interpreter`] / [`ExclusivityToken`] for scoped exclusive access
//! - [`EventLoop`] / [`LoopHandle`] for running and reaching the loop
//! - [`LoopFuture`] for loop-owned completion objects
//! - [`HostValue`] / [`HostError`] for the host's value and error representation
//! - [`sleep`] / [`timeout`] for loop-side timers

mod error;
mod event_loop;
mod future;
mod interpreter;
mod time;
mod value;

pub use error::{HostError, HostErrorKind, LoopError};
pub use event_loop::{EventLoop, LoopHandle};
pub use future::{Awaiting, LoopFuture};
pub use interpreter::{ExclusivityToken, Interpreter};
pub use time::{Sleep, Timeout, sleep, timeout};
pub use value::{HostValue, IntoHostValue};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        EventLoop, ExclusivityToken, HostError, HostErrorKind, HostValue, Interpreter,
        IntoHostValue, LoopError, LoopFuture, LoopHandle, sleep, timeout,
    };
}
