//! Single-threaded cooperative event loop

use crate::{ExclusivityToken, Interpreter, LoopError, LoopFuture};
use parking_lot::Mutex;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::future::Future;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::task::{Context, Poll, Wake, Waker};
use std::thread::{self, ThreadId};
use std::time::{Duration, Instant};

static NEXT_LOOP_ID: AtomicU64 = AtomicU64::new(1);

/// Longest single idle wait when no timer is pending.
const MAX_IDLE_WAIT: Duration = Duration::from_secs(1);

type Callback = Box<dyn FnOnce(&ExclusivityToken<'_>) + Send + 'static>;

enum LoopMessage {
    Call(Callback),
    Wake,
}

struct LoopShared {
    id: u64,
    interpreter: Arc<Interpreter>,
    thread: ThreadId,
    closed: AtomicBool,
    // Taken on close; sending and closing are serialized by this lock.
    sender: Mutex<Option<Sender<LoopMessage>>>,
}

impl LoopShared {
    fn send(&self, message: LoopMessage) -> bool {
        if self.closed.load(Ordering::Acquire) {
            return false;
        }
        match self.sender.lock().as_ref() {
            Some(sender) => sender.send(message).is_ok(),
            None => false,
        }
    }
}

/// Thread-safe reference to an [`EventLoop`]
///
/// Cheap to clone and usable from any thread. Everything that mutates loop
/// state goes through [`call_soon_threadsafe`](Self::call_soon_threadsafe).
#[derive(Clone)]
pub struct LoopHandle {
    shared: Arc<LoopShared>,
}

impl LoopHandle {
    /// Unique id of the loop
    pub fn id(&self) -> u64 {
        self.shared.id
    }

    /// Interpreter whose exclusivity guards this loop's objects
    pub fn interpreter(&self) -> &Arc<Interpreter> {
        &self.shared.interpreter
    }

    pub fn is_closed(&self) -> bool {
        self.shared.closed.load(Ordering::Acquire)
    }

    /// Whether the calling thread is the loop's own thread
    pub fn is_loop_thread(&self) -> bool {
        thread::current().id() == self.shared.thread
    }

    /// Create a pending future owned by this loop
    pub fn create_future(&self) -> LoopFuture {
        LoopFuture::new(self.clone())
    }

    /// Schedule `callback` to run on the loop thread under exclusivity
    ///
    /// Returns `false` without scheduling anything if the loop is closed.
    /// Callbacks still queued when the loop closes are dropped unrun.
    pub fn call_soon_threadsafe<F>(&self, callback: F) -> bool
    where
        F: FnOnce(&ExclusivityToken<'_>) + Send + 'static,
    {
        let scheduled = self.shared.send(LoopMessage::Call(Box::new(callback)));
        if !scheduled {
            tracing::trace!(loop_id = self.shared.id, "loop closed, callback dropped");
        }
        scheduled
    }

    pub(crate) fn waker(&self) -> Waker {
        Waker::from(Arc::new(LoopWaker {
            shared: self.shared.clone(),
        }))
    }
}

impl std::fmt::Debug for LoopHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoopHandle")
            .field("id", &self.shared.id)
            .field("closed", &self.is_closed())
            .finish()
    }
}

struct LoopWaker {
    shared: Arc<LoopShared>,
}

impl Wake for LoopWaker {
    fn wake(self: Arc<Self>) {
        self.wake_by_ref();
    }

    fn wake_by_ref(self: &Arc<Self>) {
        self.shared.send(LoopMessage::Wake);
    }
}

pub(crate) type TimerKey = (Instant, u64);

#[derive(Default)]
pub(crate) struct Timers {
    next_id: u64,
    entries: BTreeMap<TimerKey, Waker>,
}

impl Timers {
    pub(crate) fn insert(&mut self, deadline: Instant, waker: Waker) -> TimerKey {
        self.next_id += 1;
        let key = (deadline, self.next_id);
        self.entries.insert(key, waker);
        key
    }

    pub(crate) fn update(&mut self, key: TimerKey, waker: &Waker) {
        if let Some(existing) = self.entries.get_mut(&key) {
            if !existing.will_wake(waker) {
                *existing = waker.clone();
            }
        }
    }

    pub(crate) fn remove(&mut self, key: TimerKey) {
        self.entries.remove(&key);
    }

    fn next_deadline(&self) -> Option<Instant> {
        self.entries.keys().next().map(|(deadline, _)| *deadline)
    }

    fn take_expired(&mut self, now: Instant) -> Vec<Waker> {
        let pending = self.entries.split_off(&(now, u64::MAX));
        std::mem::replace(&mut self.entries, pending)
            .into_values()
            .collect()
    }
}

thread_local! {
    static CURRENT_TIMERS: RefCell<Option<Rc<RefCell<Timers>>>> = const { RefCell::new(None) };
}

struct EnterGuard {
    previous: Option<Rc<RefCell<Timers>>>,
}

impl Drop for EnterGuard {
    fn drop(&mut self) {
        let previous = self.previous.take();
        CURRENT_TIMERS.with(|current| *current.borrow_mut() = previous);
    }
}

fn enter(timers: Rc<RefCell<Timers>>) -> EnterGuard {
    let previous = CURRENT_TIMERS.with(|current| current.replace(Some(timers)));
    EnterGuard { previous }
}

/// Run `f` against the timers of the loop running on this thread
pub(crate) fn with_timers<R>(f: impl FnOnce(&mut Timers) -> R) -> Option<R> {
    CURRENT_TIMERS.with(|current| {
        current
            .borrow()
            .as_ref()
            .map(|timers| f(&mut timers.borrow_mut()))
    })
}

/// Single-threaded cooperative event loop
///
/// Bound to the thread that created it. While running it holds the
/// interpreter's exclusivity token, releasing it only while idle.
pub struct EventLoop {
    handle: LoopHandle,
    receiver: Receiver<LoopMessage>,
    timers: Rc<RefCell<Timers>>,
}

impl EventLoop {
    /// Create a loop bound to the current thread
    pub fn new(interpreter: Arc<Interpreter>) -> Self {
        let (sender, receiver) = mpsc::channel();
        let shared = Arc::new(LoopShared {
            id: NEXT_LOOP_ID.fetch_add(1, Ordering::Relaxed),
            interpreter,
            thread: thread::current().id(),
            closed: AtomicBool::new(false),
            sender: Mutex::new(Some(sender)),
        });
        tracing::debug!(loop_id = shared.id, "event loop created");

        Self {
            handle: LoopHandle { shared },
            receiver,
            timers: Rc::new(RefCell::new(Timers::default())),
        }
    }

    /// Get a thread-safe handle to this loop
    pub fn handle(&self) -> LoopHandle {
        self.handle.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.handle.is_closed()
    }

    /// Drive `future` to completion on this thread
    ///
    /// Thread-safe callbacks and timers are serviced while the future is
    /// pending. Must not be called while the current thread already holds a
    /// token for this loop's interpreter, or idle waits cannot release it.
    pub fn run_until_complete<F: Future>(&mut self, future: F) -> Result<F::Output, LoopError> {
        if self.is_closed() {
            return Err(LoopError::Closed);
        }

        let interpreter = Arc::clone(self.handle.interpreter());
        let mut token = interpreter.acquire();
        let _enter = enter(self.timers.clone());

        let waker = self.handle.waker();
        let mut cx = Context::from_waker(&waker);
        let mut future = std::pin::pin!(future);
        let mut poll_main = true;

        loop {
            if poll_main {
                poll_main = false;
                if let Poll::Ready(output) = future.as_mut().poll(&mut cx) {
                    return Ok(output);
                }
            }

            while let Ok(message) = self.receiver.try_recv() {
                poll_main |= self.dispatch(message, &token);
            }

            let expired = self.timers.borrow_mut().take_expired(Instant::now());
            if !expired.is_empty() {
                expired.into_iter().for_each(Waker::wake);
                continue;
            }

            if poll_main {
                continue;
            }

            let wait = self
                .timers
                .borrow()
                .next_deadline()
                .map(|deadline| deadline.saturating_duration_since(Instant::now()))
                .map_or(MAX_IDLE_WAIT, |remaining| remaining.min(MAX_IDLE_WAIT));

            let receiver = &self.receiver;
            match token.unlocked(|| receiver.recv_timeout(wait)) {
                Ok(message) => poll_main |= self.dispatch(message, &token),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => return Err(LoopError::Closed),
            }
        }
    }

    /// Close the loop
    ///
    /// Queued callbacks are dropped without running and later hand-offs
    /// become no-ops. Idempotent.
    pub fn close(&mut self) {
        if self.handle.shared.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        self.handle.shared.sender.lock().take();

        let dropped = self
            .receiver
            .try_iter()
            .filter(|message| matches!(message, LoopMessage::Call(_)))
            .count();
        self.timers.borrow_mut().entries.clear();

        tracing::debug!(
            loop_id = self.handle.shared.id,
            dropped_callbacks = dropped,
            "event loop closed"
        );
    }

    /// Returns whether the main future should be polled again
    fn dispatch(&self, message: LoopMessage, token: &ExclusivityToken<'_>) -> bool {
        match message {
            LoopMessage::Wake => true,
            LoopMessage::Call(callback) => {
                callback(token);
                false
            }
        }
    }
}

impl Drop for EventLoop {
    fn drop(&mut self) {
        self.close();
    }
}
