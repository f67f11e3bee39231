//! Ports (middle layer): the inbound driving API and the outbound
//! collaborator traits the engine depends on.

pub mod inbound;
pub mod outbound;

pub use inbound::TeleportApi;
pub use outbound::{
    ExpirationScheduler, IdentityDirectory, Notifier, Relocator, SystemTimeSource, TimeSource,
};
