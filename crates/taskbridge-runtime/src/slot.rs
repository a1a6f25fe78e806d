//! Single-use outcome storage

use taskbridge_core::{BridgeError, BridgeResult, TaskError, TaskResult};

enum SlotState<T> {
    Empty,
    Value(T),
    Failure(TaskError),
    Taken,
}

/// Holds the outcome of one native task between completion and delivery
///
/// Written exactly once by the task's driver and read exactly once by the
/// delivery step. Both misuse cases are reported as errors rather than
/// silently overwriting or inventing a value.
pub struct ResultSlot<T> {
    state: SlotState<T>,
}

impl<T> ResultSlot<T> {
    pub fn new() -> Self {
        Self {
            state: SlotState::Empty,
        }
    }

    /// Store the task outcome
    ///
    /// Fails with [`BridgeError::SlotFilled`] if an outcome was already stored.
    pub fn store(&mut self, outcome: TaskResult<T>) -> BridgeResult<()> {
        if !matches!(self.state, SlotState::Empty) {
            return Err(BridgeError::SlotFilled);
        }
        self.state = match outcome {
            Ok(value) => SlotState::Value(value),
            Err(failure) => SlotState::Failure(failure),
        };
        Ok(())
    }

    /// Outcome stored and not yet taken
    pub fn is_filled(&self) -> bool {
        matches!(self.state, SlotState::Value(_) | SlotState::Failure(_))
    }

    /// Stored a failure rather than a value
    pub fn is_failure(&self) -> bool {
        matches!(self.state, SlotState::Failure(_))
    }

    /// Move the outcome out
    ///
    /// Fails with [`BridgeError::SlotEmpty`] if nothing was stored or the
    /// outcome was already taken.
    pub fn take(&mut self) -> BridgeResult<TaskResult<T>> {
        match std::mem::replace(&mut self.state, SlotState::Taken) {
            SlotState::Value(value) => Ok(Ok(value)),
            SlotState::Failure(failure) => Ok(Err(failure)),
            previous @ (SlotState::Empty | SlotState::Taken) => {
                self.state = previous;
                Err(BridgeError::SlotEmpty)
            }
        }
    }
}

impl<T> Default for ResultSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for ResultSlot<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match &self.state {
            SlotState::Empty => "empty",
            SlotState::Value(_) => "value",
            SlotState::Failure(_) => "failure",
            SlotState::Taken => "taken",
        };
        f.debug_struct("ResultSlot").field("state", &state).finish()
    }
}
