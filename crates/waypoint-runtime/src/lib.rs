//! # Waypoint Runtime
//!
//! Glue around the Teleport Request Lifecycle engine: configuration
//! loading, telemetry setup, an in-memory session roster standing in for
//! the host environment's identity layer, chat-style command handling, and
//! the wiring that assembles everything into a running service.
//!
//! The engine itself lives in `tpa-engine`; nothing in this crate mutates
//! its collections except through the `TeleportApi` port.

pub mod commands;
pub mod config;
pub mod roster;
pub mod telemetry;
pub mod wiring;

pub use commands::CommandService;
pub use config::RuntimeConfig;
pub use roster::InMemoryRoster;
pub use wiring::Runtime;
