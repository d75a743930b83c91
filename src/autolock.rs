use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::gateway::PlatformClient;
use crate::lock::AppLock;
use crate::store::LockStore;

/// Idle auto-relock timer. Lives outside the state machine: it only calls
/// the ordinary `relock()` operation when it fires, and arming/cancelling
/// is driven by the presentation shell.
pub struct AutoRelock {
    duration: Duration,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl AutoRelock {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            task: Mutex::new(None),
        }
    }

    /// Start (or restart) the countdown. When it elapses the lock is
    /// re-locked; a failure is logged, not retried.
    pub fn arm<S, P>(&self, lock: Arc<AppLock<S, P>>)
    where
        S: LockStore + Send + 'static,
        P: PlatformClient + 'static,
    {
        self.disarm();
        let duration = self.duration;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            tracing::info!(secs = duration.as_secs(), "Auto-relock timer fired");
            if let Err(e) = lock.relock().await {
                tracing::warn!(error = %e, "Auto-relock failed");
            }
        });
        *self.task.lock().unwrap() = Some(handle);
    }

    /// Cancel a pending countdown, if any.
    pub fn disarm(&self) {
        if let Some(handle) = self.task.lock().unwrap().take() {
            handle.abort();
            tracing::debug!("Auto-relock timer cancelled");
        }
    }

    pub fn is_armed(&self) -> bool {
        self.task
            .lock()
            .unwrap()
            .as_ref()
            .is_some_and(|h| !h.is_finished())
    }
}

impl Drop for AutoRelock {
    fn drop(&mut self) {
        self.disarm();
    }
}
