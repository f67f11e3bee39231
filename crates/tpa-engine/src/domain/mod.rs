//! Inner domain layer: entities, the request store, the cooldown tracker,
//! and the lifecycle state machine.

pub mod cooldown;
pub mod engine;
pub mod entities;
pub mod errors;
pub mod store;
pub mod value_objects;

pub use cooldown::CooldownTracker;
pub use engine::LifecycleEngine;
pub use entities::{
    CooldownEntry, ExpirationHandle, PlayerId, Position, RequestId, RequestKey, TeleportConfig,
    TeleportRequest, Timestamp, WorldId,
};
pub use errors::TeleportError;
pub use store::RequestStore;
pub use value_objects::{AcceptReceipt, DenyReceipt, SendReceipt, TeleportEvent};
