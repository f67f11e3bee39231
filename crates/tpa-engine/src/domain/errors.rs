//! Teleport request error types.
//!
//! Every variant is an expected, recoverable outcome of a user intent. The
//! engine never treats any of these as fatal and never panics; each is
//! returned to the command glue for translation into a user-facing message.

use std::time::Duration;
use thiserror::Error;

/// Outcome taxonomy for the four user intents.
///
/// The benign "resolve found nothing" race on the expire path is *not* part
/// of this taxonomy: a due timer that loses to a concurrent user action is
/// a silent no-op, not a `NoSuchRequest`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TeleportError {
    /// A participant asked to teleport to themselves.
    #[error("cannot send a teleport request to yourself")]
    SelfTarget,

    /// The named target does not resolve to a connected participant.
    #[error("target is not online or does not exist")]
    TargetUnavailable,

    /// The requester must wait before sending another request.
    #[error("on cooldown for another {}ms", remaining.as_millis())]
    OnCooldown {
        /// Time left until the requester may send again.
        remaining: Duration,
    },

    /// Environment eligibility (e.g. same-world policy) rejected the pair.
    #[error("teleport between these participants is not permitted")]
    PolicyDenied,

    /// A live request already exists for this (requester, target) pair.
    #[error("a request to this participant is already pending")]
    AlreadyPending,

    /// No live request matched the selection.
    #[error("no matching pending request")]
    NoSuchRequest,

    /// More than one candidate matched and no selector was given.
    #[error("multiple pending requests; a selector is required")]
    AmbiguousSelection,
}
