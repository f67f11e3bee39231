//! Outbound (driven) ports for the Teleport Request Lifecycle subsystem.
//!
//! These traits define the collaborators supplied by the host environment:
//! the session/identity layer, time and timers, the relocation effect, and
//! participant notification. The engine owns no implementation details of
//! any of them.

use crate::domain::{
    ExpirationHandle, PlayerId, Position, RequestId, RequestKey, TeleportEvent, Timestamp, WorldId,
};
use std::time::Duration;

/// Session/identity layer: resolves names and reports where participants are.
pub trait IdentityDirectory: Send + Sync {
    /// Resolves a display name to a currently connected participant.
    fn resolve_by_name(&self, name: &str) -> Option<PlayerId>;

    /// Whether the participant is currently connected.
    fn is_online(&self, id: PlayerId) -> bool;

    /// The participant's current position, if connected.
    fn current_position(&self, id: PlayerId) -> Option<Position>;

    /// The world the participant is currently in, if connected.
    ///
    /// Consulted by the cross-world eligibility policy.
    fn world_of(&self, id: PlayerId) -> Option<WorldId>;

    /// The participant's display name, if known.
    fn display_name(&self, id: PlayerId) -> Option<String>;
}

/// Time source for consistent timestamp handling.
///
/// Abstracted to allow testing with deterministic time.
pub trait TimeSource: Send + Sync {
    /// Returns the current timestamp in milliseconds.
    fn now(&self) -> Timestamp;
}

/// Default system time source.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Timestamp {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as Timestamp
    }
}

/// Schedules expiration callbacks with cancellation support.
///
/// A scheduled timer captures only `(key, request_id)` — never a reference
/// to the engine or to live request state. When due, the implementation
/// delivers the pair back to the engine's owning loop, which re-validates
/// against current state before acting.
pub trait ExpirationScheduler: Send + Sync {
    /// Arms a timer that fires after `delay`.
    fn schedule(&self, delay: Duration, key: RequestKey, request_id: RequestId)
        -> ExpirationHandle;

    /// Cancels a previously armed timer. Cancelling a handle whose timer
    /// has already fired or been cancelled is a no-op.
    fn cancel(&self, handle: ExpirationHandle);
}

/// The opaque "relocate participant to position" effect.
///
/// Assumed to succeed or to signal failure out of band; the engine does not
/// retry, and its own state is already final when this runs.
pub trait Relocator: Send + Sync {
    fn relocate(&self, id: PlayerId, destination: Position);
}

/// Fire-and-forget participant notification.
///
/// Delivery failure (recipient disconnected, no subscribers) is swallowed
/// by the implementation and never surfaces to the engine.
pub trait Notifier: Send + Sync {
    fn notify(&self, recipient: PlayerId, event: TeleportEvent);
}
