//! Request store and expiration registry.
//!
//! The two collections must stay consistent, so they live in one struct and
//! every mutation that touches both happens in a single call:
//!
//! - `pending`: the authoritative set of live requests, keyed by ordered
//!   (requester, target) pair
//! - `timers`: the scheduled expiration handle for each live request
//!
//! INVARIANT-1: at most one live request per key (`try_create` rejects
//! duplicates, never overwrites).
//! INVARIANT-2: `resolve()` removes the request and its handle together;
//! a handle can never outlive its request. The only window where a live
//! request has no registered handle is between `try_create` and
//! `register_timer` inside one engine transition, which never yields.

use super::entities::{ExpirationHandle, PlayerId, RequestId, RequestKey, TeleportRequest, Timestamp};
use super::errors::TeleportError;
use std::collections::HashMap;

/// The authoritative set of pending requests plus their expiration handles.
#[derive(Debug, Default)]
pub struct RequestStore {
    pending: HashMap<RequestKey, TeleportRequest>,
    timers: HashMap<RequestKey, ExpirationHandle>,
}

impl RequestStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a new live request for `key`.
    ///
    /// # Errors
    /// `AlreadyPending` if a live request exists for `key`. The existing
    /// request is left untouched.
    pub fn try_create(
        &mut self,
        key: RequestKey,
        request_id: RequestId,
        now: Timestamp,
    ) -> Result<(), TeleportError> {
        if self.pending.contains_key(&key) {
            return Err(TeleportError::AlreadyPending);
        }
        self.pending.insert(
            key,
            TeleportRequest {
                key,
                request_id,
                created_at: now,
            },
        );
        Ok(())
    }

    /// Registers the expiration handle for a just-created request.
    ///
    /// The caller arms the scheduler immediately after a successful
    /// `try_create`, as one logical step.
    pub fn register_timer(&mut self, key: RequestKey, handle: ExpirationHandle) {
        debug_assert!(self.pending.contains_key(&key));
        self.timers.insert(key, handle);
    }

    /// Atomically removes and returns the request for `key` together with
    /// its expiration handle, if any.
    ///
    /// Returns `None` when no live request exists. Callers must treat that
    /// as "nothing to resolve": a user action racing a due timer is an
    /// expected, benign outcome.
    pub fn resolve(
        &mut self,
        key: RequestKey,
    ) -> Option<(TeleportRequest, Option<ExpirationHandle>)> {
        let request = self.pending.remove(&key)?;
        let handle = self.timers.remove(&key);
        Some((request, handle))
    }

    /// The id of the live request for `key`, if one exists.
    pub fn live_request_id(&self, key: RequestKey) -> Option<RequestId> {
        self.pending.get(&key).map(|request| request.request_id)
    }

    pub fn contains(&self, key: RequestKey) -> bool {
        self.pending.contains_key(&key)
    }

    /// Live requests aimed at `target`, in arbitrary order.
    ///
    /// Restartable: each call yields a fresh iteration over current state.
    pub fn incoming(&self, target: PlayerId) -> impl Iterator<Item = RequestKey> + '_ {
        self.pending
            .keys()
            .copied()
            .filter(move |key| key.target == target)
    }

    /// Live requests sent by `requester`, in arbitrary order.
    pub fn outgoing(&self, requester: PlayerId) -> impl Iterator<Item = RequestKey> + '_ {
        self.pending
            .keys()
            .copied()
            .filter(move |key| key.requester == requester)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Clears both collections, returning every registered handle so the
    /// caller can cancel the underlying timers (shutdown path).
    pub fn drain_timers(&mut self) -> Vec<ExpirationHandle> {
        self.pending.clear();
        self.timers.drain().map(|(_, handle)| handle).collect()
    }
}
