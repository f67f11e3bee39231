//! The Teleport Request Lifecycle state machine.
//!
//! States per key: ABSENT → PENDING → ABSENT. Send is the only
//! ABSENT→PENDING transition; accept, deny, cancel, and expire are each a
//! single PENDING→ABSENT transition. There is no intermediate state and no
//! in-place re-arm; a new send after resolution mints a fresh `RequestId`.
//!
//! The engine exclusively owns the request store and the cooldown tracker.
//! Every method runs to completion on the owning thread, so the collections
//! need no locks (see the crate-level concurrency notes).

use super::cooldown::CooldownTracker;
use super::entities::{PlayerId, RequestId, RequestKey, TeleportConfig};
use super::errors::TeleportError;
use super::store::RequestStore;
use super::value_objects::{AcceptReceipt, DenyReceipt, SendReceipt, TeleportEvent};
use crate::ports::inbound::TeleportApi;
use crate::ports::outbound::{
    ExpirationScheduler, IdentityDirectory, Notifier, Relocator, TimeSource,
};
use std::sync::Arc;

/// Orchestrates the request store, expiration registry, and cooldown
/// tracker in response to the four user intents plus scheduler expirations.
pub struct LifecycleEngine {
    config: TeleportConfig,
    store: RequestStore,
    cooldowns: CooldownTracker,
    directory: Arc<dyn IdentityDirectory>,
    scheduler: Arc<dyn ExpirationScheduler>,
    relocator: Arc<dyn Relocator>,
    notifier: Arc<dyn Notifier>,
    time: Arc<dyn TimeSource>,
}

impl LifecycleEngine {
    pub fn new(
        config: TeleportConfig,
        directory: Arc<dyn IdentityDirectory>,
        scheduler: Arc<dyn ExpirationScheduler>,
        relocator: Arc<dyn Relocator>,
        notifier: Arc<dyn Notifier>,
        time: Arc<dyn TimeSource>,
    ) -> Self {
        Self {
            config,
            store: RequestStore::new(),
            cooldowns: CooldownTracker::new(),
            directory,
            scheduler,
            relocator,
            notifier,
            time,
        }
    }

    pub fn config(&self) -> &TeleportConfig {
        &self.config
    }

    /// Number of live requests across all keys.
    pub fn pending_count(&self) -> usize {
        self.store.len()
    }

    /// Cancels every outstanding expiration timer and discards all state.
    ///
    /// Must run before the engine is dropped at process shutdown so no
    /// dangling timer fires into a torn-down system.
    pub fn shutdown(&mut self) {
        let handles = self.store.drain_timers();
        let cancelled = handles.len();
        for handle in handles {
            self.scheduler.cancel(handle);
        }
        self.cooldowns.clear();
        tracing::info!(cancelled_timers = cancelled, "lifecycle engine shut down");
    }

    /// Drops lapsed cooldown entries. Housekeeping for the runtime's
    /// maintenance tick; correctness never depends on it.
    pub fn purge_expired_cooldowns(&mut self) -> usize {
        self.cooldowns.purge_expired(self.time.now())
    }

    /// Whether `a` and `b` satisfy the cross-world eligibility policy.
    ///
    /// Unknown worlds (participant disconnected mid-flight) fail the check
    /// when cross-world teleports are disallowed.
    fn worlds_compatible(&self, a: PlayerId, b: PlayerId) -> bool {
        if self.config.allow_cross_world {
            return true;
        }
        match (self.directory.world_of(a), self.directory.world_of(b)) {
            (Some(world_a), Some(world_b)) => world_a == world_b,
            _ => false,
        }
    }

    /// Picks the incoming request to act on for `target`.
    fn select_incoming(
        &self,
        target: PlayerId,
        selector: Option<PlayerId>,
    ) -> Result<RequestKey, TeleportError> {
        match selector {
            Some(requester) => {
                let key = RequestKey::new(requester, target);
                if self.store.contains(key) {
                    Ok(key)
                } else {
                    Err(TeleportError::NoSuchRequest)
                }
            }
            None => {
                let mut incoming = self.store.incoming(target);
                match (incoming.next(), incoming.next()) {
                    (None, _) => Err(TeleportError::NoSuchRequest),
                    (Some(key), None) => Ok(key),
                    (Some(_), Some(_)) => Err(TeleportError::AmbiguousSelection),
                }
            }
        }
    }

    /// Picks the outgoing request to act on for `requester`.
    fn select_outgoing(
        &self,
        requester: PlayerId,
        selector: Option<PlayerId>,
    ) -> Result<RequestKey, TeleportError> {
        match selector {
            Some(target) => {
                let key = RequestKey::new(requester, target);
                if self.store.contains(key) {
                    Ok(key)
                } else {
                    Err(TeleportError::NoSuchRequest)
                }
            }
            None => {
                let mut outgoing = self.store.outgoing(requester);
                match (outgoing.next(), outgoing.next()) {
                    (None, _) => Err(TeleportError::NoSuchRequest),
                    (Some(key), None) => Ok(key),
                    (Some(_), Some(_)) => Err(TeleportError::AmbiguousSelection),
                }
            }
        }
    }

    /// Removes the request and cancels its timer as one logical step.
    fn resolve_and_cancel(&mut self, key: RequestKey) -> bool {
        match self.store.resolve(key) {
            Some((_, handle)) => {
                if let Some(handle) = handle {
                    self.scheduler.cancel(handle);
                }
                true
            }
            None => false,
        }
    }
}

impl TeleportApi for LifecycleEngine {
    fn send(
        &mut self,
        requester: PlayerId,
        target: PlayerId,
    ) -> Result<SendReceipt, TeleportError> {
        let now = self.time.now();

        // Precondition chain; first failure wins.
        if requester == target {
            return Err(TeleportError::SelfTarget);
        }
        if !self.directory.is_online(target) {
            return Err(TeleportError::TargetUnavailable);
        }
        if let Some(remaining) = self.cooldowns.is_limited(requester, now) {
            return Err(TeleportError::OnCooldown { remaining });
        }
        if !self.worlds_compatible(requester, target) {
            return Err(TeleportError::PolicyDenied);
        }

        let key = RequestKey::new(requester, target);
        let request_id = RequestId::fresh();
        self.store.try_create(key, request_id, now)?;

        // Arm expiration and cooldown in the same transition. The timer
        // carries only (key, request_id); the id guard in expire() covers
        // a fired timer racing a resolve-then-recreate.
        let handle = self
            .scheduler
            .schedule(self.config.request_timeout, key, request_id);
        self.store.register_timer(key, handle);
        self.cooldowns
            .arm(requester, now, self.config.request_cooldown);

        tracing::debug!(
            requester = %requester,
            target = %target,
            request_id = %request_id,
            timeout_ms = self.config.request_timeout.as_millis() as u64,
            "teleport request created"
        );

        let expires_in = self.config.request_timeout;
        self.notifier.notify(
            requester,
            TeleportEvent::RequestSent { target, expires_in },
        );
        self.notifier.notify(
            target,
            TeleportEvent::RequestReceived {
                requester,
                expires_in,
            },
        );

        Ok(SendReceipt {
            key,
            request_id,
            expires_in,
        })
    }

    fn accept(
        &mut self,
        target: PlayerId,
        selector: Option<PlayerId>,
    ) -> Result<AcceptReceipt, TeleportError> {
        let key = self.select_incoming(target, selector)?;
        if !self.resolve_and_cancel(key) {
            return Err(TeleportError::NoSuchRequest);
        }

        // Conditions may have changed since send. The request is already
        // resolved and is not restored on failure.
        if !self.worlds_compatible(key.requester, key.target) {
            tracing::debug!(
                requester = %key.requester,
                target = %key.target,
                "accept rejected by eligibility re-check; request consumed"
            );
            return Err(TeleportError::PolicyDenied);
        }

        match self.directory.current_position(target) {
            Some(destination) => self.relocator.relocate(key.requester, destination),
            None => {
                // Target vanished between selection and relocation; the
                // transition still completes.
                tracing::warn!(target = %target, "accept without a target position; relocation skipped");
            }
        }

        tracing::info!(
            requester = %key.requester,
            target = %key.target,
            "teleport request accepted"
        );
        self.notifier
            .notify(key.requester, TeleportEvent::Teleported { to: target });
        self.notifier.notify(
            target,
            TeleportEvent::RequesterArrived {
                requester: key.requester,
            },
        );

        Ok(AcceptReceipt { key })
    }

    fn deny(
        &mut self,
        target: PlayerId,
        selector: Option<PlayerId>,
    ) -> Result<DenyReceipt, TeleportError> {
        let key = self.select_incoming(target, selector)?;
        if !self.resolve_and_cancel(key) {
            return Err(TeleportError::NoSuchRequest);
        }

        tracing::debug!(
            requester = %key.requester,
            target = %key.target,
            "teleport request denied"
        );
        self.notifier
            .notify(key.requester, TeleportEvent::RequestDenied { by: target });
        self.notifier.notify(
            target,
            TeleportEvent::DenyConfirmed {
                requester: key.requester,
            },
        );

        Ok(DenyReceipt { key })
    }

    fn cancel(
        &mut self,
        requester: PlayerId,
        selector: Option<PlayerId>,
    ) -> Result<RequestKey, TeleportError> {
        let key = self.select_outgoing(requester, selector)?;
        if !self.resolve_and_cancel(key) {
            return Err(TeleportError::NoSuchRequest);
        }

        tracing::debug!(
            requester = %requester,
            target = %key.target,
            "teleport request cancelled"
        );
        self.notifier.notify(
            requester,
            TeleportEvent::CancelConfirmed { target: key.target },
        );
        self.notifier
            .notify(key.target, TeleportEvent::RequestCancelled { requester });

        Ok(key)
    }

    fn cancel_all(&mut self, requester: PlayerId) -> Vec<RequestKey> {
        let keys: Vec<RequestKey> = self.store.outgoing(requester).collect();
        let mut cancelled = Vec::with_capacity(keys.len());

        // Each resolution is independent and best-effort; an offline target
        // just misses its notification.
        for key in keys {
            if self.resolve_and_cancel(key) {
                self.notifier
                    .notify(key.target, TeleportEvent::RequestCancelled { requester });
                cancelled.push(key);
            }
        }

        if !cancelled.is_empty() {
            tracing::debug!(
                requester = %requester,
                count = cancelled.len(),
                "cancelled all outgoing teleport requests"
            );
        }
        cancelled
    }

    fn expire(&mut self, key: RequestKey, request_id: RequestId) -> bool {
        // Guard: only the exact request this timer was armed for may be
        // resolved. A mismatch means the request was resolved (and possibly
        // recreated) after the timer left the scheduler; both are silent
        // no-ops, not errors.
        match self.store.live_request_id(key) {
            Some(live) if live == request_id => {}
            _ => {
                tracing::trace!(
                    requester = %key.requester,
                    target = %key.target,
                    "stale expiration ignored"
                );
                return false;
            }
        }

        if !self.resolve_and_cancel(key) {
            return false;
        }

        tracing::debug!(
            requester = %key.requester,
            target = %key.target,
            "teleport request expired"
        );
        self.notifier.notify(
            key.requester,
            TeleportEvent::OutgoingExpired { target: key.target },
        );
        self.notifier.notify(
            key.target,
            TeleportEvent::IncomingExpired {
                requester: key.requester,
            },
        );
        true
    }

    fn find_incoming(&self, target: PlayerId) -> Vec<RequestKey> {
        self.store.incoming(target).collect()
    }

    fn find_outgoing(&self, requester: PlayerId) -> Vec<RequestKey> {
        self.store.outgoing(requester).collect()
    }
}
