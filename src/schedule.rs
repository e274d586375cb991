//! @acp:module "Debounce Scheduler"
//! @acp:summary "Cancellable delayed task that coalesces bursts of triggers"
//! @acp:domain scoring
//! @acp:layer service
//!
//! Each trigger aborts the pending task and restarts the window, so only
//! the last trigger of a burst runs. Dropped triggers are never queued.

use std::sync::Mutex;
use std::time::Duration;

use tokio::task::JoinHandle;

/// @acp:summary "Runs the most recent task once the window elapses quietly"
#[derive(Debug)]
pub struct Debouncer {
    window: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: Mutex::new(None),
        }
    }

    /// Schedule `task`, cancelling whatever was waiting
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule<F>(&self, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let window = self.window;
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = pending.take() {
            previous.abort();
        }
        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(window).await;
            task();
        }));
    }

    /// Cancel the waiting task; returns whether one was waiting
    pub fn cancel(&self) -> bool {
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        match pending.take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
