//! # Core Value Types
//!
//! Defines the participant and world value types used across subsystems.
//!
//! ## Clusters
//!
//! - **Identity**: `PlayerId`
//! - **Time**: `Timestamp` (milliseconds since UNIX epoch)
//! - **Space**: `Position`, `WorldId`

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Timestamp in milliseconds since UNIX epoch.
pub type Timestamp = u64;

/// Opaque, stable, unique identifier for a connected participant.
///
/// Analogous to a session/account identifier. Never reused within the
/// process lifetime. Display names resolve to a `PlayerId` through the
/// identity directory; the id itself carries no human-readable meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub Uuid);

impl PlayerId {
    /// Generates a fresh random identity.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier for a world/dimension within the host environment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorldId(pub String);

impl WorldId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl std::fmt::Display for WorldId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A position within a world.
///
/// The engine treats positions as opaque destinations; only the relocation
/// collaborator interprets the coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub world: WorldId,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub fn new(world: WorldId, x: f64, y: f64, z: f64) -> Self {
        Self { world, x, y, z }
    }
}
