//! Bounded string queue feeding a background worker

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use taskbridge_core::{BridgeError, TaskError, TaskResult};
use taskbridge_loop::{ExclusivityToken, HostValue, IntoHostValue};
use taskbridge_runtime::PendingTask;
use tokio::sync::{mpsc, watch};

/// Simulated processing time per item in [`do_work`]
const WORK_DELAY: Duration = Duration::from_millis(100);

/// Result of pushing onto a [`StrQueue`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushStatus {
    Success,
    Closed,
}

impl PushStatus {
    /// Status code seen by the host
    pub fn code(self) -> i64 {
        match self {
            PushStatus::Success => 0,
            PushStatus::Closed => 1,
        }
    }
}

impl IntoHostValue for PushStatus {
    fn into_host_value(self, _token: &ExclusivityToken<'_>) -> Result<HostValue, BridgeError> {
        Ok(HostValue::Int(self.code()))
    }
}

struct QueueInner {
    max_size: usize,
    // None once closed
    sender: Mutex<Option<mpsc::Sender<String>>>,
    receiver: tokio::sync::Mutex<mpsc::Receiver<String>>,
    closed: watch::Sender<bool>,
}

/// Bounded multi-producer queue of strings
///
/// Clones share the same queue. After [`close`](Self::close) pushes fail,
/// while items already queued can still be popped.
#[derive(Clone)]
pub struct StrQueue {
    inner: Arc<QueueInner>,
}

impl StrQueue {
    /// Create a queue holding at most `max_size` items
    pub fn new(max_size: usize) -> TaskResult<Self> {
        if max_size == 0 {
            return Err(TaskError::InvalidArgument(
                "queue size must be at least 1".to_string(),
            ));
        }

        let (sender, receiver) = mpsc::channel(max_size);
        Ok(Self {
            inner: Arc::new(QueueInner {
                max_size,
                sender: Mutex::new(Some(sender)),
                receiver: tokio::sync::Mutex::new(receiver),
                closed: watch::Sender::new(false),
            }),
        })
    }

    pub fn max_size(&self) -> usize {
        self.inner.max_size
    }

    /// Push without waiting; `false` if the queue is full or closed
    pub fn try_push_back(&self, value: impl Into<String>) -> bool {
        match self.inner.sender.lock().as_ref() {
            Some(sender) => sender.try_send(value.into()).is_ok(),
            None => false,
        }
    }

    /// Push, waiting for space, as a task for the host loop
    ///
    /// The task resolves to the [`PushStatus`] code; a push still waiting
    /// when the queue is closed resolves to [`PushStatus::Closed`].
    pub fn push_back(&self, value: impl Into<String>) -> PendingTask {
        let queue = self.clone();
        let value = value.into();
        PendingTask::new(async move { Ok(queue.push(value).await) })
    }

    /// Push, waiting for space or for the queue to close
    pub async fn push(&self, value: String) -> PushStatus {
        let Some(sender) = self.inner.sender.lock().clone() else {
            return PushStatus::Closed;
        };
        let mut closed = self.inner.closed.subscribe();

        tokio::select! {
            biased;
            _ = closed.wait_for(|closed| *closed) => PushStatus::Closed,
            sent = sender.send(value) => match sent {
                Ok(()) => PushStatus::Success,
                Err(_) => PushStatus::Closed,
            },
        }
    }

    /// Next item, or `None` once the queue is closed and drained
    pub async fn pop(&self) -> Option<String> {
        self.inner.receiver.lock().await.recv().await
    }

    /// Refuse further pushes and wake pushes waiting for space
    pub fn close(&self) {
        if self.inner.sender.lock().take().is_some() {
            self.inner.closed.send_replace(true);
            tracing::debug!("queue closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.inner.sender.lock().is_none()
    }
}

impl std::fmt::Debug for StrQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrQueue")
            .field("max_size", &self.inner.max_size)
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// Consume `queue` until it is closed, as a task for the host loop
///
/// Each item takes a simulated 100 ms to process. The task resolves to the
/// number of items processed.
pub fn do_work(queue: StrQueue) -> PendingTask {
    PendingTask::new(async move { Ok(process_items(&queue, WORK_DELAY).await) })
}

/// Pop and process items until the queue is closed and drained
pub async fn process_items(queue: &StrQueue, delay: Duration) -> usize {
    let mut processed = 0;
    while let Some(item) = queue.pop().await {
        tokio::time::sleep(delay).await;
        processed += 1;
        tracing::info!(item = %item, "processed item");
    }
    tracing::info!(processed, "worker ended normally");
    processed
}
