//! Error types for native tasks and the bridge machinery

use thiserror::Error;

/// Result type alias for native task outcomes
pub type TaskResult<T> = Result<T, TaskError>;

/// Result type alias for bridge infrastructure operations
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Failure raised by a native task
///
/// The display text of every variant is the message a host sees after
/// translation, so message-carrying variants display the bare message.
#[derive(Error, Debug)]
pub enum TaskError {
    /// Generic runtime failure
    #[error("{0}")]
    Runtime(String),

    /// An argument was rejected by the task
    #[error("{0}")]
    InvalidArgument(String),

    /// A value was outside the domain the operation is defined on
    #[error("{0}")]
    Domain(String),

    /// An index or key was out of range
    #[error("{0}")]
    OutOfRange(String),

    /// Arithmetic overflow
    #[error("{0}")]
    Overflow(String),

    /// I/O failure
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The task gave up waiting
    #[error("task timed out")]
    Timeout,

    /// The task was cancelled by the native runtime
    #[error("task cancelled")]
    Cancelled,

    /// Application-defined failure kind, matched by name during translation
    #[error("{message}")]
    Custom { kind: String, message: String },

    /// The task panicked
    #[error("task panicked: {0}")]
    Panicked(String),

    /// Anything without a more specific kind
    #[error("{0}")]
    Other(String),
}

impl TaskError {
    /// Create an application-defined failure
    pub fn custom(kind: impl Into<String>, message: impl Into<String>) -> Self {
        TaskError::Custom {
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// Stable name of this failure's kind
    pub fn kind_name(&self) -> &str {
        match self {
            TaskError::Runtime(_) => "runtime_error",
            TaskError::InvalidArgument(_) => "invalid_argument",
            TaskError::Domain(_) => "domain_error",
            TaskError::OutOfRange(_) => "out_of_range",
            TaskError::Overflow(_) => "overflow_error",
            TaskError::Io(_) => "io_error",
            TaskError::Timeout => "timeout",
            TaskError::Cancelled => "cancelled",
            TaskError::Custom { kind, .. } => kind.as_str(),
            TaskError::Panicked(_) => "panicked",
            TaskError::Other(_) => "other",
        }
    }

    /// Message text carried across the boundary
    pub fn message(&self) -> String {
        self.to_string()
    }
}

/// Failure of the bridging machinery itself
///
/// Unlike [`TaskError`], these are never delivered to a host future. Once a
/// bridge holds foreign-runtime exclusivity, any of them is fatal.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// Native runtime could not be created or used
    #[error("runtime error: {0}")]
    Runtime(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error
    #[error("serialization error: {0}")]
    Serialization(String),

    /// A native value has no host representation
    #[error("cannot convert {type_name} to a host value: {reason}")]
    Marshal {
        type_name: &'static str,
        reason: String,
    },

    /// A native failure could not be translated
    #[error("error translation failed: {0}")]
    Translation(String),

    /// Result slot was written twice
    #[error("result slot already filled")]
    SlotFilled,

    /// Result slot was read before it was written
    #[error("result slot read before write")]
    SlotEmpty,

    /// The host loop rejected the hand-off for a reason other than closing
    #[error("delivery failed: {0}")]
    Delivery(String),
}

impl BridgeError {
    /// Stable numeric code for this error
    pub fn error_code(&self) -> u32 {
        match self {
            BridgeError::Runtime(_) => 1,
            BridgeError::Config(_) => 2,
            BridgeError::Serialization(_) => 3,
            BridgeError::Marshal { .. } => 4,
            BridgeError::Translation(_) => 5,
            BridgeError::SlotFilled => 6,
            BridgeError::SlotEmpty => 7,
            BridgeError::Delivery(_) => 8,
        }
    }

    /// Whether this error may only be raised on the fatal delivery path
    pub fn is_delivery_fault(&self) -> bool {
        matches!(
            self,
            BridgeError::Marshal { .. }
                | BridgeError::Translation(_)
                | BridgeError::SlotFilled
                | BridgeError::SlotEmpty
                | BridgeError::Delivery(_)
        )
    }
}

impl From<serde_json::Error> for BridgeError {
    fn from(err: serde_json::Error) -> Self {
        BridgeError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for BridgeError {
    fn from(err: toml::de::Error) -> Self {
        BridgeError::Serialization(err.to_string())
    }
}
