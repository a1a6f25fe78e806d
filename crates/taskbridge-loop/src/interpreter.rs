//! Host runtime exclusivity

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_INTERPRETER_ID: AtomicU64 = AtomicU64::new(1);

/// The host runtime that owns every loop, future, and error object
///
/// Host objects may only be touched while holding this interpreter's
/// [`ExclusivityToken`]. The lock is reentrant: the loop thread holds it
/// while running callbacks and may acquire it again from inside them.
pub struct Interpreter {
    id: u64,
    lock: ReentrantMutex<()>,
}

impl Interpreter {
    /// Create a new interpreter
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            id: NEXT_INTERPRETER_ID.fetch_add(1, Ordering::Relaxed),
            lock: ReentrantMutex::new(()),
        })
    }

    /// Unique id of this interpreter
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Block until exclusive access is available
    pub fn acquire(&self) -> ExclusivityToken<'_> {
        ExclusivityToken {
            interpreter_id: self.id,
            guard: self.lock.lock(),
        }
    }

    /// Acquire exclusive access if no other thread holds it
    pub fn try_acquire(&self) -> Option<ExclusivityToken<'_>> {
        self.lock.try_lock().map(|guard| ExclusivityToken {
            interpreter_id: self.id,
            guard,
        })
    }
}

/// Scoped proof of exclusive access to an [`Interpreter`]
///
/// Released when dropped, on every exit path.
pub struct ExclusivityToken<'a> {
    interpreter_id: u64,
    guard: ReentrantMutexGuard<'a, ()>,
}

impl ExclusivityToken<'_> {
    /// Id of the interpreter this token was acquired from
    pub fn interpreter_id(&self) -> u64 {
        self.interpreter_id
    }

    /// Run `f` with exclusivity temporarily released, then re-acquire it
    ///
    /// Only releases the outermost acquisition: a thread holding nested
    /// tokens keeps the interpreter locked.
    pub fn unlocked<F, R>(&mut self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        ReentrantMutexGuard::unlocked(&mut self.guard, f)
    }
}

impl std::fmt::Debug for ExclusivityToken<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExclusivityToken")
            .field("interpreter_id", &self.interpreter_id)
            .finish()
    }
}
