//! Bridge from native tasks to host loop futures
//!
//! A bridge runs one [`NativeTask`] on the native runtime and delivers its
//! outcome to a [`LoopFuture`] on a host [`EventLoop`]:
//!
//! 1. [`Bridge::start`] registers with the [`ShutdownBarrier`], creates the
//!    future and spawns a driver task.
//! 2. The driver runs the native task as its own Tokio task, so a panic is
//!    captured as [`TaskError::Panicked`], and stores the outcome in a
//!    [`ResultSlot`].
//! 3. On a blocking worker it acquires the interpreter's
//!    [`ExclusivityToken`] and runs [`deliver`].
//! 4. The barrier guard is released.
//!
//! Any [`BridgeError`] raised while exclusivity is held terminates the
//! process: a host future left half-resolved cannot be recovered from.
//!
//! [`EventLoop`]: taskbridge_loop::EventLoop

use crate::{AsyncRuntime, BarrierGuard, ErrorTranslator, ResultSlot, RuntimeConfig, ShutdownBarrier};
use std::any::Any;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use taskbridge_core::{BridgeConfig, BridgeError, BridgeResult, TaskError, TaskResult};
use taskbridge_loop::{
    ExclusivityToken, Interpreter, IntoHostValue, LoopError, LoopFuture, LoopHandle,
};
use tokio::runtime::Handle;
use tracing::Instrument;

type BoxedTask<T> = Pin<Box<dyn Future<Output = TaskResult<T>> + Send + 'static>>;

/// Native unit of work producing a `TaskResult<T>`
///
/// Use `T = ()` for tasks without a value; the host sees `None`.
pub struct NativeTask<T> {
    future: BoxedTask<T>,
}

impl<T> NativeTask<T> {
    pub fn new<F>(future: F) -> Self
    where
        F: Future<Output = TaskResult<T>> + Send + 'static,
    {
        Self {
            future: Box::pin(future),
        }
    }
}

impl<T> std::fmt::Debug for NativeTask<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeTask")
            .field("output", &std::any::type_name::<T>())
            .finish_non_exhaustive()
    }
}

/// Outcome of the delivery step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Resolution handed to the loop
    Scheduled,
    /// Loop was closed; outcome discarded
    LoopClosed,
    /// Future was cancelled; outcome discarded
    Cancelled,
}

/// Starts native tasks and delivers their outcomes to host futures
pub struct Bridge {
    runtime: Arc<AsyncRuntime>,
    barrier: Arc<ShutdownBarrier>,
    translator: Arc<ErrorTranslator>,
    interpreter: Arc<Interpreter>,
    shutdown_timeout: Duration,
    bridge_counter: AtomicU64,
}

impl Bridge {
    /// Create a bridge from its parts
    pub fn new(
        runtime: Arc<AsyncRuntime>,
        barrier: Arc<ShutdownBarrier>,
        translator: Arc<ErrorTranslator>,
        interpreter: Arc<Interpreter>,
    ) -> Self {
        Self {
            runtime,
            barrier,
            translator,
            interpreter,
            shutdown_timeout: BridgeConfig::default().shutdown_timeout(),
            bridge_counter: AtomicU64::new(0),
        }
    }

    /// Build the runtime, barrier and translator from `config`
    pub fn from_config(config: &BridgeConfig, interpreter: Arc<Interpreter>) -> BridgeResult<Self> {
        config.validate()?;

        let runtime = Arc::new(AsyncRuntime::new(RuntimeConfig::from(config))?);
        let translator = Arc::new(ErrorTranslator::new(&interpreter));
        let mut bridge = Self::new(runtime, Arc::new(ShutdownBarrier::new()), translator, interpreter);
        bridge.shutdown_timeout = config.shutdown_timeout();
        Ok(bridge)
    }

    /// Get the next bridge ID
    pub fn next_bridge_id(&self) -> u64 {
        self.bridge_counter.fetch_add(1, Ordering::SeqCst)
    }

    pub fn runtime(&self) -> &Arc<AsyncRuntime> {
        &self.runtime
    }

    pub fn barrier(&self) -> &Arc<ShutdownBarrier> {
        &self.barrier
    }

    pub fn translator(&self) -> &Arc<ErrorTranslator> {
        &self.translator
    }

    pub fn interpreter(&self) -> &Arc<Interpreter> {
        &self.interpreter
    }

    /// Number of bridges started and not yet finished
    pub fn active_bridges(&self) -> usize {
        self.barrier.active()
    }

    /// Run `task` on the native runtime and return the future it resolves
    ///
    /// Callable from any thread. Fails without starting anything if the
    /// runtime is shutting down or `event_loop` belongs to another
    /// interpreter. Once a future is returned its delivery step runs exactly
    /// once, whatever the task's outcome and whether or not the loop is still
    /// open by then.
    pub fn start<T>(&self, event_loop: &LoopHandle, task: NativeTask<T>) -> BridgeResult<LoopFuture>
    where
        T: IntoHostValue + Send + 'static,
    {
        if event_loop.interpreter().id() != self.interpreter.id() {
            return Err(BridgeError::Config(format!(
                "loop {} belongs to interpreter {}, bridge to interpreter {}",
                event_loop.id(),
                event_loop.interpreter().id(),
                self.interpreter.id()
            )));
        }

        // Guard first: a concurrent shutdown either waits for this bridge or
        // this start fails.
        let guard = self.barrier.guard();
        if self.runtime.is_shutting_down() {
            drop(guard);
            return Err(BridgeError::Runtime("runtime is shutting down".to_string()));
        }

        let bridge_id = self.next_bridge_id();
        let future = event_loop.create_future();
        let span = tracing::debug_span!("bridge", id = bridge_id, future_id = future.id());

        tracing::debug!(
            bridge_id,
            future_id = future.id(),
            loop_id = event_loop.id(),
            "bridge started"
        );

        self.runtime.spawn(
            drive(
                bridge_id,
                self.runtime.handle(),
                future.clone(),
                Arc::clone(&self.translator),
                task,
                guard,
            )
            .instrument(span),
        );

        Ok(future)
    }

    /// Block until every started bridge has finished
    ///
    /// Exclusivity is released for the duration of the wait so pending
    /// deliveries can acquire it.
    pub fn wait_idle(&self, token: &mut ExclusivityToken<'_>) {
        tracing::info!(active = self.barrier.active(), "waiting for in-flight bridges");
        token.unlocked(|| self.barrier.wait_until_idle());
    }

    /// Like [`wait_idle`](Self::wait_idle), giving up after `timeout`
    ///
    /// Returns `true` if every bridge finished.
    pub fn wait_idle_timeout(&self, token: &mut ExclusivityToken<'_>, timeout: Duration) -> bool {
        token.unlocked(|| self.barrier.wait_until_idle_timeout(timeout))
    }

    /// Refuse new bridges and wait up to the configured shutdown timeout
    pub fn shutdown(&self, token: &mut ExclusivityToken<'_>) -> bool {
        self.runtime.begin_shutdown();
        let idle = self.wait_idle_timeout(token, self.shutdown_timeout);
        if !idle {
            tracing::warn!(
                active = self.barrier.active(),
                timeout_ms = self.shutdown_timeout.as_millis() as u64,
                "bridges still in flight at shutdown"
            );
        }
        idle
    }
}

impl std::fmt::Debug for Bridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bridge")
            .field("interpreter_id", &self.interpreter.id())
            .field("active", &self.barrier.active())
            .finish_non_exhaustive()
    }
}

async fn drive<T>(
    bridge_id: u64,
    runtime: Handle,
    future: LoopFuture,
    translator: Arc<ErrorTranslator>,
    task: NativeTask<T>,
    guard: BarrierGuard,
) where
    T: IntoHostValue + Send + 'static,
{
    let outcome = match runtime.spawn(task.future).await {
        Ok(outcome) => outcome,
        Err(e) if e.is_panic() => Err(TaskError::Panicked(panic_to_string(&*e.into_panic()))),
        Err(_) => Err(TaskError::Cancelled),
    };
    tracing::debug!(failed = outcome.is_err(), "native task finished");

    let mut slot = ResultSlot::new();
    if let Err(e) = slot.store(outcome) {
        fail_fast(bridge_id, &e);
    }

    let delivered = runtime.spawn_blocking(move || {
        let interpreter = Arc::clone(future.event_loop().interpreter());
        let token = interpreter.acquire();
        let attempt = panic::catch_unwind(AssertUnwindSafe(|| {
            deliver(&future, slot, &translator, &token)
        }));
        match attempt {
            Ok(Ok(delivery)) => delivery,
            Ok(Err(e)) => fail_fast(bridge_id, &e),
            Err(payload) => fail_fast(
                bridge_id,
                &format!("delivery panicked: {}", panic_to_string(&*payload)),
            ),
        }
    })
    .await;

    match delivered {
        Ok(delivery) => tracing::debug!(?delivery, "bridge finished"),
        Err(e) => tracing::error!(error = %e, "delivery step did not run"),
    }
    drop(guard);
}

/// Deliver a stored outcome to `future`
///
/// Must run under `token`, which has to belong to the future's interpreter.
/// A closed loop or cancelled future discards the outcome. Otherwise the
/// value is marshalled (or the failure translated) here and the resolution
/// is handed to the loop thread.
///
/// The future may still be cancelled, or the loop closed, between this check
/// and the resolution running; the loop then drops the resolution.
pub fn deliver<T: IntoHostValue>(
    future: &LoopFuture,
    mut slot: ResultSlot<T>,
    translator: &ErrorTranslator,
    token: &ExclusivityToken<'_>,
) -> BridgeResult<Delivery> {
    let event_loop = future.event_loop();
    if token.interpreter_id() != event_loop.interpreter().id() {
        return Err(BridgeError::Delivery(format!(
            "token of interpreter {} cannot resolve a future of interpreter {}",
            token.interpreter_id(),
            event_loop.interpreter().id()
        )));
    }

    let outcome = slot.take()?;

    if event_loop.is_closed() {
        tracing::debug!(future_id = future.id(), "loop closed, outcome discarded");
        return Ok(Delivery::LoopClosed);
    }
    if future.is_cancelled(token) {
        tracing::debug!(future_id = future.id(), "future cancelled, outcome discarded");
        return Ok(Delivery::Cancelled);
    }

    let resolution = match outcome {
        Ok(value) => Ok(value.into_host_value(token)?),
        Err(failure) => Err(translator.translate(&failure, token)?),
    };

    let target = future.clone();
    let scheduled = event_loop.call_soon_threadsafe(move |token| {
        match target.resolve(token, resolution) {
            Ok(()) => {}
            Err(LoopError::InvalidState) => {
                tracing::debug!(future_id = target.id(), "future already done, outcome dropped");
            }
            Err(e) => {
                tracing::error!(future_id = target.id(), error = %e, "failed to resolve future");
            }
        }
    });

    if scheduled {
        Ok(Delivery::Scheduled)
    } else if event_loop.is_closed() {
        tracing::debug!(future_id = future.id(), "loop closed during hand-off, outcome discarded");
        Ok(Delivery::LoopClosed)
    } else {
        Err(BridgeError::Delivery(format!(
            "loop {} rejected the hand-off while open",
            event_loop.id()
        )))
    }
}

/// Log and terminate the process
fn fail_fast(bridge_id: u64, error: &dyn std::fmt::Display) -> ! {
    tracing::error!(bridge_id, error = %error, "unrecoverable delivery failure, aborting");
    eprintln!("taskbridge: bridge {bridge_id}: {error}");
    std::process::abort()
}

fn panic_to_string(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

trait Awaitable: Send {
    fn start(self: Box<Self>, bridge: &Bridge, event_loop: &LoopHandle) -> BridgeResult<LoopFuture>;
}

impl<T> Awaitable for NativeTask<T>
where
    T: IntoHostValue + Send + 'static,
{
    fn start(self: Box<Self>, bridge: &Bridge, event_loop: &LoopHandle) -> BridgeResult<LoopFuture> {
        bridge.start(event_loop, *self)
    }
}

/// A [`NativeTask`] with its output type erased
///
/// Lets APIs hand out startable work without naming the value type; the
/// conversion to a host value is fixed when the task is created.
pub struct PendingTask {
    task: Box<dyn Awaitable>,
}

impl PendingTask {
    pub fn new<F, T>(future: F) -> Self
    where
        F: Future<Output = TaskResult<T>> + Send + 'static,
        T: IntoHostValue + Send + 'static,
    {
        Self::from(NativeTask::new(future))
    }

    /// Start the task on `bridge`, resolving a future on `event_loop`
    pub fn start(self, bridge: &Bridge, event_loop: &LoopHandle) -> BridgeResult<LoopFuture> {
        self.task.start(bridge, event_loop)
    }
}

impl<T> From<NativeTask<T>> for PendingTask
where
    T: IntoHostValue + Send + 'static,
{
    fn from(task: NativeTask<T>) -> Self {
        Self {
            task: Box::new(task),
        }
    }
}

impl std::fmt::Debug for PendingTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingTask").finish_non_exhaustive()
    }
}
