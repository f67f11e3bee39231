//! Service assembly.
//!
//! Builds the engine with its production adapters and hands the caller the
//! pieces a serving loop needs: the command service (which owns the
//! engine), the due-expiration receiver, and a notification subscription.

use crate::commands::CommandService;
use crate::roster::InMemoryRoster;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tpa_engine::adapters::notifier::{BroadcastNotifier, Notification};
use tpa_engine::adapters::scheduler::{ExpirationDue, TokioScheduler};
use tpa_engine::ports::outbound::SystemTimeSource;
use tpa_engine::{LifecycleEngine, TeleportConfig};

const NOTIFICATION_CAPACITY: usize = 256;

/// A fully wired service, ready to serve.
pub struct Runtime {
    pub commands: CommandService,
    pub expirations: mpsc::UnboundedReceiver<ExpirationDue>,
    pub notifications: broadcast::Receiver<Notification>,
    pub roster: Arc<InMemoryRoster>,
}

impl Runtime {
    /// Assembles the engine with tokio-backed adapters.
    ///
    /// Must be called inside a tokio runtime: the scheduler spawns its
    /// timer tasks onto the current one.
    pub fn build(config: TeleportConfig) -> Self {
        let roster = Arc::new(InMemoryRoster::new());
        let (scheduler, expirations) = TokioScheduler::new();
        let notifier = Arc::new(BroadcastNotifier::new(NOTIFICATION_CAPACITY));
        let notifications = notifier.subscribe();

        let engine = LifecycleEngine::new(
            config,
            roster.clone(),
            scheduler,
            roster.clone(),
            notifier,
            Arc::new(SystemTimeSource),
        );

        Self {
            commands: CommandService::new(engine, roster.clone()),
            expirations,
            notifications,
            roster,
        }
    }
}
