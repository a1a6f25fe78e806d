//! Loop-side timers

use crate::event_loop::{TimerKey, with_timers};
use crate::{Awaiting, HostError, HostValue, LoopFuture};
use std::future::{Future, IntoFuture};
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

/// Future that completes after a duration on the running [`EventLoop`]
///
/// # Panics
///
/// Polling outside [`EventLoop::run_until_complete`] panics, since there is no
/// loop to register the timer with.
///
/// A duration too large to represent as a deadline never completes.
///
/// [`EventLoop`]: crate::EventLoop
/// [`EventLoop::run_until_complete`]: crate::EventLoop::run_until_complete
pub fn sleep(duration: Duration) -> Sleep {
    Sleep {
        deadline: Instant::now().checked_add(duration),
        key: None,
    }
}

/// Await `future`, cancelling it if it is not done within `duration`
///
/// The native work behind a cancelled future keeps running; only delivery
/// is suppressed.
pub fn timeout(duration: Duration, future: LoopFuture) -> Timeout {
    Timeout {
        awaiting: future.into_future(),
        sleep: sleep(duration),
    }
}

/// Future returned by [`sleep`]
pub struct Sleep {
    // None never fires
    deadline: Option<Instant>,
    key: Option<TimerKey>,
}

impl Future for Sleep {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let Some(deadline) = self.deadline else {
            return match with_timers(|_| ()) {
                Some(()) => Poll::Pending,
                None => panic!("sleep polled outside of a running EventLoop"),
            };
        };

        if Instant::now() >= deadline {
            if let Some(key) = self.key.take() {
                with_timers(|timers| timers.remove(key));
            }
            return Poll::Ready(());
        }

        let key = self.key;
        let registered = with_timers(|timers| match key {
            Some(key) => {
                timers.update(key, cx.waker());
                key
            }
            None => timers.insert(deadline, cx.waker().clone()),
        });

        match registered {
            Some(key) => {
                self.key = Some(key);
                Poll::Pending
            }
            None => panic!("sleep polled outside of a running EventLoop"),
        }
    }
}

impl Drop for Sleep {
    fn drop(&mut self) {
        if let Some(key) = self.key.take() {
            with_timers(|timers| timers.remove(key));
        }
    }
}

/// Future returned by [`timeout`]
pub struct Timeout {
    awaiting: Awaiting,
    sleep: Sleep,
}

impl Future for Timeout {
    type Output = Result<HostValue, HostError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        if let Poll::Ready(outcome) = Pin::new(&mut self.awaiting).poll(cx) {
            return Poll::Ready(outcome);
        }
        if Pin::new(&mut self.sleep).poll(cx).is_pending() {
            return Poll::Pending;
        }

        let future = self.awaiting.loop_future();
        let interpreter = future.event_loop().interpreter().clone();
        let token = interpreter.acquire();
        if let Err(e) = future.cancel(&token) {
            tracing::warn!(future_id = future.id(), error = %e, "failed to cancel timed out future");
        }
        Poll::Ready(Err(HostError::timeout()))
    }
}

#[cfg(test)]
#[path = "time/time_tests.rs"]
mod time_tests;
