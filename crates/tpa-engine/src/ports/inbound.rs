//! # Inbound Port - TeleportApi
//!
//! Primary driving port exposing the request lifecycle to the command glue.
//!
//! The four intents plus the two selection queries are the engine's entire
//! surface. Selection by display name happens in the glue; the API works in
//! resolved `PlayerId`s only.

use crate::domain::{
    AcceptReceipt, DenyReceipt, PlayerId, RequestId, RequestKey, SendReceipt, TeleportError,
};

/// Primary API for the Teleport Request Lifecycle subsystem.
///
/// All methods are single atomic transitions: they run to completion on the
/// owning thread and never yield mid-way.
pub trait TeleportApi {
    /// Asks for `requester` to be moved to `target`'s position.
    ///
    /// # Errors
    /// In check order: `SelfTarget`, `TargetUnavailable`,
    /// `OnCooldown(remaining)`, `PolicyDenied`, `AlreadyPending`.
    fn send(&mut self, requester: PlayerId, target: PlayerId)
        -> Result<SendReceipt, TeleportError>;

    /// Accepts an incoming request.
    ///
    /// With `selector` absent the requester is inferred when exactly one
    /// incoming request exists.
    ///
    /// # Errors
    /// - `NoSuchRequest`: nothing pending (or the named requester has none)
    /// - `AmbiguousSelection`: several pending and no selector
    /// - `PolicyDenied`: eligibility changed since send; the request is
    ///   consumed, not restored
    fn accept(
        &mut self,
        target: PlayerId,
        selector: Option<PlayerId>,
    ) -> Result<AcceptReceipt, TeleportError>;

    /// Denies an incoming request. Same selection rule as [`Self::accept`].
    fn deny(
        &mut self,
        target: PlayerId,
        selector: Option<PlayerId>,
    ) -> Result<DenyReceipt, TeleportError>;

    /// Cancels an outgoing request.
    ///
    /// With `selector` absent the target is inferred when exactly one
    /// outgoing request exists.
    fn cancel(
        &mut self,
        requester: PlayerId,
        selector: Option<PlayerId>,
    ) -> Result<RequestKey, TeleportError>;

    /// Cancels every outgoing request for `requester`, best-effort.
    ///
    /// Cannot fail; returns the cancelled keys (possibly empty). Targets
    /// that have gone offline simply miss their notification.
    fn cancel_all(&mut self, requester: PlayerId) -> Vec<RequestKey>;

    /// Applies a due expiration. Invoked only by the scheduler delivery
    /// path, never by a user intent.
    ///
    /// Returns `true` if the request was resolved; `false` is the benign
    /// no-op for an already-resolved or recreated request.
    fn expire(&mut self, key: RequestKey, request_id: RequestId) -> bool;

    /// Live requests aimed at `target`.
    fn find_incoming(&self, target: PlayerId) -> Vec<RequestKey>;

    /// Live requests sent by `requester`.
    fn find_outgoing(&self, requester: PlayerId) -> Vec<RequestKey>;
}
