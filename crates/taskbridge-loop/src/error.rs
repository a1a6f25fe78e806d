//! Host error representation and loop errors

use thiserror::Error;

/// Error taxonomy of the host runtime
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HostErrorKind {
    /// Generic error, used when nothing more specific applies
    Exception,
    RuntimeError,
    ValueError,
    IndexError,
    OverflowError,
    OSError,
    TimeoutError,
    CancelledError,
    /// Error class registered by an extension module
    Registered(String),
}

impl HostErrorKind {
    /// Name of the host error class
    pub fn name(&self) -> &str {
        match self {
            HostErrorKind::Exception => "Exception",
            HostErrorKind::RuntimeError => "RuntimeError",
            HostErrorKind::ValueError => "ValueError",
            HostErrorKind::IndexError => "IndexError",
            HostErrorKind::OverflowError => "OverflowError",
            HostErrorKind::OSError => "OSError",
            HostErrorKind::TimeoutError => "TimeoutError",
            HostErrorKind::CancelledError => "CancelledError",
            HostErrorKind::Registered(name) => name.as_str(),
        }
    }
}

impl std::fmt::Display for HostErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Error object of the host runtime, as seen by code awaiting a [`LoopFuture`]
///
/// [`LoopFuture`]: crate::LoopFuture
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct HostError {
    kind: HostErrorKind,
    message: String,
}

impl HostError {
    pub fn new(kind: HostErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Error raised into code awaiting a cancelled future
    pub fn cancelled() -> Self {
        Self::new(HostErrorKind::CancelledError, "future was cancelled")
    }

    /// Error raised when a loop-side timeout expires
    pub fn timeout() -> Self {
        Self::new(HostErrorKind::TimeoutError, "timed out waiting for future")
    }

    pub fn kind(&self) -> &HostErrorKind {
        &self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Misuse of the event loop or its futures
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopError {
    /// The loop has been closed
    #[error("event loop is closed")]
    Closed,

    /// A loop-confined operation was attempted from another thread
    #[error("operation must run on the event loop thread")]
    WrongThread,

    /// The future is already resolved or cancelled
    #[error("future is already done")]
    InvalidState,

    /// The token was acquired from a different interpreter
    #[error("exclusivity token belongs to another interpreter")]
    ForeignToken,
}
