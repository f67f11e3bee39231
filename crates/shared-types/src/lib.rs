//! # Shared Types Crate
//!
//! This crate contains the value types shared across Waypoint subsystems:
//! participant identity, timestamps, positions, and world identifiers.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-subsystem types are defined here.
//! - **Value semantics**: Every type here is cheap to copy or clone and has
//!   no ownership relationship with any subsystem's internal state.
//! - **Structured identity**: Participants are identified by `PlayerId`, an
//!   opaque stable token. Display names are a directory concern and are
//!   never used as keys.

pub mod entities;

pub use entities::*;
