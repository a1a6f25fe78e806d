//! Native failure to host error translation

use parking_lot::RwLock;
use std::collections::HashMap;
use taskbridge_core::{BridgeError, BridgeResult, TaskError};
use taskbridge_loop::{ExclusivityToken, HostError, HostErrorKind, Interpreter};

/// Maps [`TaskError`]s onto the host's error taxonomy
///
/// Built-in kinds have a fixed mapping. Application kinds
/// ([`TaskError::Custom`]) map to a host error class only once registered;
/// anything else becomes the generic `Exception`.
pub struct ErrorTranslator {
    interpreter_id: u64,
    registered: RwLock<HashMap<String, String>>,
}

impl ErrorTranslator {
    /// Create a translator for host errors of `interpreter`
    pub fn new(interpreter: &Interpreter) -> Self {
        Self {
            interpreter_id: interpreter.id(),
            registered: RwLock::new(HashMap::new()),
        }
    }

    /// Map the custom failure kind `kind` to the host error class `host_name`
    ///
    /// Registering the same kind again replaces the earlier class.
    pub fn register(&self, kind: impl Into<String>, host_name: impl Into<String>) {
        let kind = kind.into();
        let host_name = host_name.into();
        tracing::debug!(kind = %kind, host_name = %host_name, "registered error kind");
        self.registered.write().insert(kind, host_name);
    }

    pub fn is_registered(&self, kind: &str) -> bool {
        self.registered.read().contains_key(kind)
    }

    /// Host error kind `failure` translates to
    pub fn host_kind(&self, failure: &TaskError) -> HostErrorKind {
        match failure {
            TaskError::Runtime(_) => HostErrorKind::RuntimeError,
            TaskError::InvalidArgument(_) | TaskError::Domain(_) => HostErrorKind::ValueError,
            TaskError::OutOfRange(_) => HostErrorKind::IndexError,
            TaskError::Overflow(_) => HostErrorKind::OverflowError,
            TaskError::Io(_) => HostErrorKind::OSError,
            TaskError::Timeout => HostErrorKind::TimeoutError,
            TaskError::Cancelled => HostErrorKind::CancelledError,
            TaskError::Custom { kind, .. } => match self.registered.read().get(kind) {
                Some(host_name) => HostErrorKind::Registered(host_name.clone()),
                None => HostErrorKind::Exception,
            },
            TaskError::Panicked(_) | TaskError::Other(_) => HostErrorKind::Exception,
        }
    }

    /// Build the host error for `failure`
    ///
    /// Host errors are host objects, so this needs a token of the
    /// interpreter the translator was built for.
    pub fn translate(
        &self,
        failure: &TaskError,
        token: &ExclusivityToken<'_>,
    ) -> BridgeResult<HostError> {
        if token.interpreter_id() != self.interpreter_id {
            return Err(BridgeError::Translation(format!(
                "token belongs to interpreter {}, translator to interpreter {}",
                token.interpreter_id(),
                self.interpreter_id
            )));
        }

        Ok(HostError::new(self.host_kind(failure), failure.message()))
    }
}

impl std::fmt::Debug for ErrorTranslator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorTranslator")
            .field("interpreter_id", &self.interpreter_id)
            .field("registered", &self.registered.read().len())
            .finish()
    }
}

#[cfg(test)]
#[path = "translate/translate_tests.rs"]
mod translate_tests;

#[cfg(test)]
#[path = "translate/translate_parameterized_tests.rs"]
mod translate_parameterized_tests;
