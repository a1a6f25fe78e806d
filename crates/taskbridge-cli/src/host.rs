//! Event loop host for the demo commands

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use taskbridge_core::BridgeConfig;
use taskbridge_loop::{EventLoop, HostError, HostValue, Interpreter, LoopFuture};
use taskbridge_runtime::{Bridge, PendingTask};

/// Outcome of a task as seen by host code
pub type HostOutcome = std::result::Result<HostValue, HostError>;

/// Interpreter, event loop and bridge of one host process
pub struct Host {
    interpreter: Arc<Interpreter>,
    event_loop: EventLoop,
    bridge: Bridge,
}

impl Host {
    pub fn new(config: &BridgeConfig) -> Result<Self> {
        let interpreter = Interpreter::new();
        let bridge = Bridge::from_config(config, Arc::clone(&interpreter))?;
        taskbridge_workloads::register_errors(bridge.translator());
        let event_loop = EventLoop::new(Arc::clone(&interpreter));

        Ok(Self {
            interpreter,
            event_loop,
            bridge,
        })
    }

    pub fn bridge(&self) -> &Bridge {
        &self.bridge
    }

    /// Start `task` without awaiting it
    pub fn start(&self, task: PendingTask) -> Result<LoopFuture> {
        Ok(task.start(&self.bridge, &self.event_loop.handle())?)
    }

    /// Start `task` and run the loop until it completes
    pub fn run(&mut self, task: PendingTask) -> Result<HostOutcome> {
        let future = self.start(task)?;
        Ok(self.event_loop.run_until_complete(future.into_future())?)
    }

    /// Like [`run`](Self::run), cancelling the future after `limit`
    pub fn run_with_timeout(&mut self, task: PendingTask, limit: Duration) -> Result<HostOutcome> {
        let future = self.start(task)?;
        Ok(self
            .event_loop
            .run_until_complete(taskbridge_loop::timeout(limit, future))?)
    }

    /// Run an arbitrary future on the loop
    pub fn block_on<F: Future>(&mut self, future: F) -> Result<F::Output> {
        Ok(self.event_loop.run_until_complete(future)?)
    }

    /// Close the loop, refuse new bridges and wait for the running ones
    ///
    /// Waits at most the configured shutdown timeout. Returns `false` if
    /// bridges were still in flight when it expired.
    pub fn finish(&mut self) -> bool {
        self.event_loop.close();
        let mut token = self.interpreter.acquire();
        let drained = self.bridge.shutdown(&mut token);
        tracing::info!(drained, "host finished");
        drained
    }
}

#[cfg(test)]
#[path = "host/host_tests.rs"]
mod host_tests;
