//! Outer-layer adapters: tokio-backed expiration scheduling and
//! broadcast-bus notification delivery.

pub mod notifier;
pub mod scheduler;

pub use notifier::{BroadcastNotifier, Notification};
pub use scheduler::{ExpirationDue, TokioScheduler};
