//! Broadcast-bus notifier.
//!
//! Publishes every notification onto a tokio broadcast channel. The session
//! layer subscribes and fans messages out to connected participants;
//! publishing with no subscribers, or to a lagged subscriber, is swallowed —
//! notification delivery is fire-and-forget by contract.

use crate::domain::{PlayerId, TeleportEvent};
use crate::ports::outbound::Notifier;
use tokio::sync::broadcast;

/// A notification addressed to one participant.
#[derive(Debug, Clone)]
pub struct Notification {
    pub recipient: PlayerId,
    pub event: TeleportEvent,
}

/// Notifier publishing to a broadcast channel.
pub struct BroadcastNotifier {
    tx: broadcast::Sender<Notification>,
}

impl BroadcastNotifier {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribes a new consumer (e.g. the session layer's delivery task).
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.tx.subscribe()
    }
}

impl Notifier for BroadcastNotifier {
    fn notify(&self, recipient: PlayerId, event: TeleportEvent) {
        if self.tx.send(Notification { recipient, event }).is_err() {
            tracing::trace!(recipient = %recipient, "notification dropped: no subscribers");
        }
    }
}
