//! # Teleport Request Lifecycle Subsystem
//!
//! Manages short-lived, consensual teleport requests between two
//! participants: a requester asks to be moved to a target's position, the
//! target accepts or denies within a bounded window, and unacknowledged
//! requests self-expire. A per-requester cooldown bounds request frequency.
//!
//! ## Request State Machine
//!
//! ```text
//! [ABSENT] ──send──→ [PENDING] ──accept/deny/cancel/expire──→ [ABSENT]
//! ```
//!
//! Every transition is a single atomic step on one logical thread. A request
//! is never re-armed in place; a new send after resolution always passes
//! through ABSENT and receives a fresh `RequestId`.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement Location |
//! |----|-----------|---------------------|
//! | INVARIANT-1 | At most one live request per (requester, target) | `domain/store.rs` - `try_create()` |
//! | INVARIANT-2 | Live request ⇔ registered expiration handle | `domain/store.rs` - `resolve()` removes both maps in one call |
//! | INVARIANT-3 | A timer only resolves the exact request it was armed for | `domain/engine.rs` - `expire()` request-id guard |
//! | INVARIANT-4 | Cooldown is overwritten, never accumulated | `domain/cooldown.rs` - `arm()` |
//!
//! ## Module Structure (Hexagonal Architecture)
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      OUTER LAYER                                │
//! │  adapters/ - tokio expiration scheduler, broadcast notifier     │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ implements ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      MIDDLE LAYER                               │
//! │  ports/inbound.rs  - TeleportApi trait                          │
//! │  ports/outbound.rs - IdentityDirectory, TimeSource,             │
//! │                      ExpirationScheduler, Relocator, Notifier   │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ uses ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      INNER LAYER                                │
//! │  domain/entities.rs      - RequestKey, TeleportRequest, config  │
//! │  domain/store.rs         - RequestStore + expiration registry   │
//! │  domain/cooldown.rs      - CooldownTracker                      │
//! │  domain/engine.rs        - LifecycleEngine state machine        │
//! │  domain/value_objects.rs - receipts, TeleportEvent              │
//! │  domain/errors.rs        - TeleportError enum                   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency Model
//!
//! Single-threaded cooperative. `LifecycleEngine` methods take `&mut self`
//! and run to completion without yielding; no locks guard the four core
//! collections. Due timers are delivered as messages by the scheduler
//! adapter and applied by the same owner that applies user intents, so a
//! user action racing a due timer is serialized and the loser observes an
//! already-absent record, which is a benign no-op.

pub mod adapters;
pub mod domain;
pub mod ports;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use adapters::*;
pub use domain::*;
pub use ports::*;
