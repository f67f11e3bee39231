//! In-memory session roster.
//!
//! Stands in for the host environment's session/identity layer: tracks who
//! is connected, where they are, and what they are called. Implements both
//! the `IdentityDirectory` lookup port and the `Relocator` effect (a
//! relocation here is just a position update plus a log line; a real host
//! would move the participant's avatar).

use parking_lot::RwLock;
use shared_types::{PlayerId, Position, WorldId};
use std::collections::HashMap;
use tpa_engine::ports::outbound::{IdentityDirectory, Relocator};

#[derive(Debug, Clone)]
struct RosterEntry {
    name: String,
    position: Position,
    online: bool,
}

/// Thread-safe roster of connected participants.
#[derive(Debug, Default)]
pub struct InMemoryRoster {
    entries: RwLock<HashMap<PlayerId, RosterEntry>>,
}

impl InMemoryRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Connects a participant by name, returning their id.
    ///
    /// Rejoining with a known name reuses the stable id and marks the
    /// participant online again at the default spawn.
    pub fn join(&self, name: &str) -> PlayerId {
        let mut entries = self.entries.write();
        if let Some((id, entry)) = entries.iter_mut().find(|(_, entry)| entry.name == name) {
            entry.online = true;
            return *id;
        }
        let id = PlayerId::random();
        entries.insert(
            id,
            RosterEntry {
                name: name.to_string(),
                position: Position::new(WorldId::new("overworld"), 0.0, 64.0, 0.0),
                online: true,
            },
        );
        id
    }

    /// Marks a participant disconnected. Their id stays reserved.
    pub fn leave(&self, id: PlayerId) {
        if let Some(entry) = self.entries.write().get_mut(&id) {
            entry.online = false;
        }
    }

    /// Moves a participant (world changes included).
    pub fn move_to(&self, id: PlayerId, position: Position) {
        if let Some(entry) = self.entries.write().get_mut(&id) {
            entry.position = position;
        }
    }

    /// Names of all online participants, for completion prompts.
    pub fn online_names(&self) -> Vec<String> {
        self.entries
            .read()
            .values()
            .filter(|entry| entry.online)
            .map(|entry| entry.name.clone())
            .collect()
    }

    /// Display name or a fallback rendering of the raw id.
    pub fn name_of(&self, id: PlayerId) -> String {
        self.display_name(id).unwrap_or_else(|| id.to_string())
    }

    /// Resolves a name regardless of online state.
    ///
    /// Console-operator lookup; participant-facing resolution goes through
    /// `IdentityDirectory::resolve_by_name`, which only sees the online.
    pub fn lookup(&self, name: &str) -> Option<PlayerId> {
        self.entries
            .read()
            .iter()
            .find(|(_, entry)| entry.name == name)
            .map(|(id, _)| *id)
    }

    /// Whether `id` names a known (possibly offline) participant.
    pub fn knows(&self, id: PlayerId) -> bool {
        self.entries.read().contains_key(&id)
    }
}

impl IdentityDirectory for InMemoryRoster {
    fn resolve_by_name(&self, name: &str) -> Option<PlayerId> {
        self.entries
            .read()
            .iter()
            .find(|(_, entry)| entry.online && entry.name == name)
            .map(|(id, _)| *id)
    }

    fn is_online(&self, id: PlayerId) -> bool {
        self.entries
            .read()
            .get(&id)
            .map(|entry| entry.online)
            .unwrap_or(false)
    }

    fn current_position(&self, id: PlayerId) -> Option<Position> {
        let entries = self.entries.read();
        let entry = entries.get(&id)?;
        entry.online.then(|| entry.position.clone())
    }

    fn world_of(&self, id: PlayerId) -> Option<WorldId> {
        let entries = self.entries.read();
        let entry = entries.get(&id)?;
        entry.online.then(|| entry.position.world.clone())
    }

    fn display_name(&self, id: PlayerId) -> Option<String> {
        self.entries.read().get(&id).map(|entry| entry.name.clone())
    }
}

impl Relocator for InMemoryRoster {
    fn relocate(&self, id: PlayerId, destination: Position) {
        tracing::info!(
            player = %id,
            world = %destination.world,
            x = destination.x,
            y = destination.y,
            z = destination.z,
            "participant relocated"
        );
        self.move_to(id, destination);
    }
}
