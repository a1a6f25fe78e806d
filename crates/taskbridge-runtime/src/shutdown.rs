//! Shutdown barrier counting in-flight bridges

use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Counter of in-flight bridges that the host can block on
///
/// Each bridge calls [`begin`](Self::begin) when it starts and
/// [`end`](Self::end) after its delivery step has run (or been skipped).
/// [`wait_until_idle`](Self::wait_until_idle) returns once the count is zero.
///
/// Share one barrier per host process through an `Arc`; it is never reset.
#[derive(Default)]
pub struct ShutdownBarrier {
    active: Mutex<usize>,
    idle: Condvar,
}

impl ShutdownBarrier {
    /// Create a barrier with no active bridges
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that a bridge has started
    pub fn begin(&self) {
        let mut active = self.active.lock();
        *active += 1;
        tracing::trace!(active = *active, "bridge begin");
    }

    /// Record that a bridge has finished
    ///
    /// Calling `end` with no active bridges is a no-op.
    pub fn end(&self) {
        let mut active = self.active.lock();
        if *active == 0 {
            tracing::warn!("barrier end() without a matching begin()");
            return;
        }

        *active -= 1;
        tracing::trace!(active = *active, "bridge end");
        if *active == 0 {
            self.idle.notify_all();
        }
    }

    /// Number of bridges between `begin` and `end`
    pub fn active(&self) -> usize {
        *self.active.lock()
    }

    /// Call `begin` now and `end` when the returned guard is dropped
    pub fn guard(self: &Arc<Self>) -> BarrierGuard {
        self.begin();
        BarrierGuard {
            barrier: Arc::clone(self),
        }
    }

    /// Block until no bridges are active
    ///
    /// Returns immediately when the count is already zero.
    pub fn wait_until_idle(&self) {
        let mut active = self.active.lock();
        while *active > 0 {
            self.idle.wait(&mut active);
        }
    }

    /// Block until no bridges are active or `timeout` elapses
    ///
    /// Returns `true` if the barrier became idle.
    pub fn wait_until_idle_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut active = self.active.lock();
        while *active > 0 {
            if self.idle.wait_until(&mut active, deadline).timed_out() {
                return *active == 0;
            }
        }
        true
    }
}

impl std::fmt::Debug for ShutdownBarrier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShutdownBarrier")
            .field("active", &self.active())
            .finish()
    }
}

/// Ends one bridge on the owning [`ShutdownBarrier`] when dropped
#[must_use = "dropping the guard immediately ends the bridge"]
pub struct BarrierGuard {
    barrier: Arc<ShutdownBarrier>,
}

impl Drop for BarrierGuard {
    fn drop(&mut self) {
        self.barrier.end();
    }
}
