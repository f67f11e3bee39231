//! Tokio-backed expiration scheduler.
//!
//! Each armed timer is a spawned task that sleeps for the delay and then
//! delivers `(key, request_id)` over a channel to whoever owns the engine.
//! The task captures nothing else — no engine reference, no request state —
//! so a stale delivery is harmless: the engine's expire() guard re-validates
//! against current state.
//!
//! Cancellation aborts the sleeping task. Aborting a task that has already
//! fired (or cancelling twice) is a no-op.

use crate::domain::{ExpirationHandle, RequestId, RequestKey};
use crate::ports::outbound::ExpirationScheduler;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;

/// A due expiration, ready to be applied via `TeleportApi::expire`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpirationDue {
    pub key: RequestKey,
    pub request_id: RequestId,
}

/// Scheduler adapter backed by `tokio::time::sleep` tasks.
///
/// Must be constructed inside a tokio runtime; `schedule` spawns onto the
/// current runtime.
pub struct TokioScheduler {
    tx: mpsc::UnboundedSender<ExpirationDue>,
    tasks: Arc<Mutex<HashMap<u64, AbortHandle>>>,
    next: AtomicU64,
}

impl TokioScheduler {
    /// Creates the scheduler and the receiving end for due expirations.
    ///
    /// The owner of the engine drains the receiver and applies each
    /// delivery on the same thread of execution as user intents.
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<ExpirationDue>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let scheduler = Arc::new(Self {
            tx,
            tasks: Arc::new(Mutex::new(HashMap::new())),
            next: AtomicU64::new(0),
        });
        (scheduler, rx)
    }

    /// Number of timers currently sleeping.
    pub fn active_timers(&self) -> usize {
        self.tasks.lock().map(|tasks| tasks.len()).unwrap_or(0)
    }
}

impl ExpirationScheduler for TokioScheduler {
    fn schedule(
        &self,
        delay: Duration,
        key: RequestKey,
        request_id: RequestId,
    ) -> ExpirationHandle {
        let id = self.next.fetch_add(1, Ordering::Relaxed);
        let tx = self.tx.clone();
        let tasks = Arc::clone(&self.tasks);

        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Ok(mut tasks) = tasks.lock() {
                tasks.remove(&id);
            }
            // The receiver may already be gone during shutdown; the due
            // timer is then simply dropped.
            let _ = tx.send(ExpirationDue { key, request_id });
        });

        if let Ok(mut tasks) = self.tasks.lock() {
            tasks.insert(id, task.abort_handle());
        }
        ExpirationHandle(id)
    }

    fn cancel(&self, handle: ExpirationHandle) {
        if let Ok(mut tasks) = self.tasks.lock() {
            if let Some(task) = tasks.remove(&handle.0) {
                task.abort();
            }
        }
    }
}
