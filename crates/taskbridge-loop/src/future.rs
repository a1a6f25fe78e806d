//! Loop-owned completion objects

use crate::{ExclusivityToken, HostError, HostValue, LoopError, LoopHandle};
use parking_lot::Mutex;
use std::future::{Future, IntoFuture};
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::task::{Context, Poll, Waker};

static NEXT_FUTURE_ID: AtomicU64 = AtomicU64::new(1);

enum FutureState {
    Pending(Option<Waker>),
    Done(Result<HostValue, HostError>),
    Cancelled,
}

struct FutureInner {
    id: u64,
    event_loop: LoopHandle,
    state: Mutex<FutureState>,
    resolve_calls: AtomicUsize,
}

/// Completion object owned by an [`EventLoop`](crate::EventLoop)
///
/// Clones share the same underlying object. Queries take an
/// [`ExclusivityToken`]; mutators additionally require the loop's own thread,
/// so other threads resolve a future by scheduling a callback through
/// [`LoopHandle::call_soon_threadsafe`].
#[derive(Clone)]
pub struct LoopFuture {
    inner: Arc<FutureInner>,
}

impl LoopFuture {
    pub(crate) fn new(event_loop: LoopHandle) -> Self {
        Self {
            inner: Arc::new(FutureInner {
                id: NEXT_FUTURE_ID.fetch_add(1, Ordering::Relaxed),
                event_loop,
                state: Mutex::new(FutureState::Pending(None)),
                resolve_calls: AtomicUsize::new(0),
            }),
        }
    }

    pub fn id(&self) -> u64 {
        self.inner.id
    }

    /// Loop this future belongs to
    pub fn event_loop(&self) -> &LoopHandle {
        &self.inner.event_loop
    }

    /// Resolved or cancelled
    pub fn is_done(&self, _token: &ExclusivityToken<'_>) -> bool {
        !matches!(*self.inner.state.lock(), FutureState::Pending(_))
    }

    pub fn is_cancelled(&self, _token: &ExclusivityToken<'_>) -> bool {
        matches!(*self.inner.state.lock(), FutureState::Cancelled)
    }

    /// Outcome, if done; a cancelled future yields a `CancelledError`
    pub fn result(&self, _token: &ExclusivityToken<'_>) -> Option<Result<HostValue, HostError>> {
        match &*self.inner.state.lock() {
            FutureState::Pending(_) => None,
            FutureState::Done(outcome) => Some(outcome.clone()),
            FutureState::Cancelled => Some(Err(HostError::cancelled())),
        }
    }

    /// Number of times `set_result`/`set_exception` has been called
    pub fn resolve_calls(&self) -> usize {
        self.inner.resolve_calls.load(Ordering::SeqCst)
    }

    /// Cancel the future; returns `false` if it was already done
    pub fn cancel(&self, token: &ExclusivityToken<'_>) -> Result<bool, LoopError> {
        self.check_access(token)?;
        let waker = {
            let mut state = self.inner.state.lock();
            match &mut *state {
                FutureState::Pending(waker) => {
                    let waker = waker.take();
                    *state = FutureState::Cancelled;
                    waker
                }
                _ => return Ok(false),
            }
        };
        tracing::trace!(future_id = self.inner.id, "future cancelled");
        if let Some(waker) = waker {
            waker.wake();
        }
        Ok(true)
    }

    pub fn set_result(&self, token: &ExclusivityToken<'_>, value: HostValue) -> Result<(), LoopError> {
        self.resolve(token, Ok(value))
    }

    pub fn set_exception(&self, token: &ExclusivityToken<'_>, error: HostError) -> Result<(), LoopError> {
        self.resolve(token, Err(error))
    }

    /// Resolve with either outcome
    ///
    /// Fails with [`LoopError::InvalidState`] if the future is already done.
    pub fn resolve(
        &self,
        token: &ExclusivityToken<'_>,
        outcome: Result<HostValue, HostError>,
    ) -> Result<(), LoopError> {
        self.inner.resolve_calls.fetch_add(1, Ordering::SeqCst);
        self.check_access(token)?;
        let waker = {
            let mut state = self.inner.state.lock();
            match &mut *state {
                FutureState::Pending(waker) => {
                    let waker = waker.take();
                    *state = FutureState::Done(outcome);
                    waker
                }
                _ => return Err(LoopError::InvalidState),
            }
        };
        if let Some(waker) = waker {
            waker.wake();
        }
        Ok(())
    }

    fn check_access(&self, token: &ExclusivityToken<'_>) -> Result<(), LoopError> {
        if token.interpreter_id() != self.inner.event_loop.interpreter().id() {
            return Err(LoopError::ForeignToken);
        }
        if !self.inner.event_loop.is_loop_thread() {
            return Err(LoopError::WrongThread);
        }
        Ok(())
    }

    fn poll_outcome(&self, cx: &mut Context<'_>) -> Poll<Result<HostValue, HostError>> {
        let mut state = self.inner.state.lock();
        match &mut *state {
            FutureState::Pending(waker) => {
                let stale = waker
                    .as_ref()
                    .is_none_or(|existing| !existing.will_wake(cx.waker()));
                if stale {
                    *waker = Some(cx.waker().clone());
                }
                Poll::Pending
            }
            FutureState::Done(outcome) => Poll::Ready(outcome.clone()),
            FutureState::Cancelled => Poll::Ready(Err(HostError::cancelled())),
        }
    }
}

impl std::fmt::Debug for LoopFuture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoopFuture")
            .field("id", &self.inner.id)
            .field("loop_id", &self.inner.event_loop.id())
            .finish()
    }
}

impl IntoFuture for LoopFuture {
    type Output = Result<HostValue, HostError>;
    type IntoFuture = Awaiting;

    fn into_future(self) -> Self::IntoFuture {
        Awaiting { future: self }
    }
}

/// Future returned by awaiting a [`LoopFuture`] on its loop
pub struct Awaiting {
    future: LoopFuture,
}

impl Awaiting {
    pub(crate) fn loop_future(&self) -> &LoopFuture {
        &self.future
    }
}

impl Future for Awaiting {
    type Output = Result<HostValue, HostError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.future.poll_outcome(cx)
    }
}
