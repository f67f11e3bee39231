//! Core domain entities for the Teleport Request Lifecycle subsystem.

// Re-export from shared-types for convenience
pub use shared_types::{PlayerId, Position, Timestamp, WorldId};

use std::time::Duration;
use uuid::Uuid;

/// Ordered pair identifying a request: "requester wants to go to target".
///
/// Distinct from the reversed pair; a request flows in one direction only.
/// This is a structured key with value equality and hashing, never a
/// formatted string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestKey {
    /// The participant asking to be moved.
    pub requester: PlayerId,
    /// The participant whose position is the destination.
    pub target: PlayerId,
}

impl RequestKey {
    pub fn new(requester: PlayerId, target: PlayerId) -> Self {
        Self { requester, target }
    }

    /// The key for the opposite direction ("target wants to go to requester").
    pub fn reversed(&self) -> Self {
        Self {
            requester: self.target,
            target: self.requester,
        }
    }
}

/// Unique token minted for each created request.
///
/// INVARIANT-3: an expiration timer carries the `RequestId` it was armed
/// for and may only resolve that exact request. A resolve-then-recreate
/// sequence under the same key yields a different id, so a stale timer that
/// already left the scheduler can never kill the successor request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Mints a fresh id.
    pub fn fresh() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A live teleport request.
///
/// Created exactly once per successful send intent; destroyed by exactly
/// one of accept, deny, cancel, or expire.
#[derive(Debug, Clone)]
pub struct TeleportRequest {
    pub key: RequestKey,
    pub request_id: RequestId,
    /// When the request was created (ms).
    pub created_at: Timestamp,
}

/// Per-requester rate limit entry. Absence means "not limited".
#[derive(Debug, Clone, Copy)]
pub struct CooldownEntry {
    /// Earliest time a new request may be sent (ms).
    pub expires_at: Timestamp,
}

/// Opaque cancellable timer token issued by the expiration scheduler.
///
/// One per live request, owned by the request store's expiration registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExpirationHandle(pub u64);

/// Engine configuration, read once at startup and passed in as plain values.
#[derive(Debug, Clone)]
pub struct TeleportConfig {
    /// How long a request stays pending before it self-expires.
    pub request_timeout: Duration,
    /// Minimum interval between consecutive sends by the same requester.
    pub request_cooldown: Duration,
    /// Whether requests may cross world boundaries.
    pub allow_cross_world: bool,
}

impl Default for TeleportConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(120),
            request_cooldown: Duration::from_secs(10),
            allow_cross_world: false,
        }
    }
}
