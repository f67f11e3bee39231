//! Receipts returned by the lifecycle intents and the notification events
//! delivered to participants.

use super::entities::{PlayerId, RequestId, RequestKey};
use std::time::Duration;

/// Returned by a successful send intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendReceipt {
    pub key: RequestKey,
    pub request_id: RequestId,
    /// How long the request will stay pending.
    pub expires_in: Duration,
}

/// Returned by a successful accept intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcceptReceipt {
    /// The resolved request, including the inferred requester when no
    /// selector was given.
    pub key: RequestKey,
}

/// Returned by a successful deny intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DenyReceipt {
    pub key: RequestKey,
}

/// Fire-and-forget notification delivered to one participant.
///
/// Each lifecycle transition notifies both parties with role-specific
/// events; the command glue renders these into user-facing text. Delivery
/// failure (e.g. the recipient disconnected) is swallowed by the notifier
/// and never surfaces to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TeleportEvent {
    /// To the requester: the request went out.
    RequestSent {
        target: PlayerId,
        expires_in: Duration,
    },
    /// To the target: someone asked to teleport to you.
    RequestReceived {
        requester: PlayerId,
        expires_in: Duration,
    },
    /// To the requester: the target accepted and you were relocated.
    Teleported { to: PlayerId },
    /// To the target: the requester was relocated to you.
    RequesterArrived { requester: PlayerId },
    /// To the requester: the target denied the request.
    RequestDenied { by: PlayerId },
    /// To the target: you denied this requester.
    DenyConfirmed { requester: PlayerId },
    /// To the target: the requester withdrew the request.
    RequestCancelled { requester: PlayerId },
    /// To the requester: your cancellation went through.
    CancelConfirmed { target: PlayerId },
    /// To the requester: your outgoing request timed out.
    OutgoingExpired { target: PlayerId },
    /// To the target: an incoming request timed out.
    IncomingExpired { requester: PlayerId },
}
