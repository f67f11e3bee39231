//! Mock collaborators for tests.
//!
//! Available to downstream crates via the `test-utils` feature. The mocks
//! are deliberately simple: interior mutability so tests can mutate the
//! world while the engine holds `Arc<dyn _>` handles, and recording
//! variants for the fire-and-forget ports.

use crate::domain::{
    ExpirationHandle, LifecycleEngine, PlayerId, RequestId, RequestKey, TeleportConfig,
    TeleportEvent, Timestamp,
};
use crate::ports::outbound::{
    ExpirationScheduler, IdentityDirectory, Notifier, Relocator, TimeSource,
};
use shared_types::{Position, WorldId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Deterministic time source with `advance`/`set` controls.
#[derive(Debug, Default)]
pub struct MockTimeSource {
    time: AtomicU64,
}

impl MockTimeSource {
    pub fn new(initial: Timestamp) -> Self {
        Self {
            time: AtomicU64::new(initial),
        }
    }

    pub fn advance(&self, ms: u64) {
        self.time.fetch_add(ms, Ordering::SeqCst);
    }

    pub fn set(&self, time: Timestamp) {
        self.time.store(time, Ordering::SeqCst);
    }
}

impl TimeSource for MockTimeSource {
    fn now(&self) -> Timestamp {
        self.time.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone)]
struct MockPlayer {
    id: PlayerId,
    name: String,
    world: WorldId,
    position: Position,
    online: bool,
}

/// In-memory identity directory for tests.
///
/// Players join online, in the "overworld", at the origin; tests mutate
/// from there.
#[derive(Debug, Default)]
pub struct MockDirectory {
    players: Mutex<HashMap<PlayerId, MockPlayer>>,
}

impl MockDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a player by name, or returns the existing id for that name.
    pub fn join(&self, name: &str) -> PlayerId {
        let mut players = self.players.lock().unwrap();
        if let Some(player) = players.values().find(|player| player.name == name) {
            return player.id;
        }
        let id = PlayerId::random();
        let world = WorldId::new("overworld");
        players.insert(
            id,
            MockPlayer {
                id,
                name: name.to_string(),
                world: world.clone(),
                position: Position::new(world, 0.0, 64.0, 0.0),
                online: true,
            },
        );
        id
    }

    pub fn set_online(&self, id: PlayerId, online: bool) {
        if let Some(player) = self.players.lock().unwrap().get_mut(&id) {
            player.online = online;
        }
    }

    pub fn set_world(&self, id: PlayerId, world: WorldId) {
        if let Some(player) = self.players.lock().unwrap().get_mut(&id) {
            player.position.world = world.clone();
            player.world = world;
        }
    }

    pub fn set_position(&self, id: PlayerId, position: Position) {
        if let Some(player) = self.players.lock().unwrap().get_mut(&id) {
            player.world = position.world.clone();
            player.position = position;
        }
    }
}

impl IdentityDirectory for MockDirectory {
    fn resolve_by_name(&self, name: &str) -> Option<PlayerId> {
        self.players
            .lock()
            .unwrap()
            .values()
            .find(|player| player.online && player.name == name)
            .map(|player| player.id)
    }

    fn is_online(&self, id: PlayerId) -> bool {
        self.players
            .lock()
            .unwrap()
            .get(&id)
            .map(|player| player.online)
            .unwrap_or(false)
    }

    fn current_position(&self, id: PlayerId) -> Option<Position> {
        let players = self.players.lock().unwrap();
        let player = players.get(&id)?;
        player.online.then(|| player.position.clone())
    }

    fn world_of(&self, id: PlayerId) -> Option<WorldId> {
        let players = self.players.lock().unwrap();
        let player = players.get(&id)?;
        player.online.then(|| player.world.clone())
    }

    fn display_name(&self, id: PlayerId) -> Option<String> {
        self.players
            .lock()
            .unwrap()
            .get(&id)
            .map(|player| player.name.clone())
    }
}

/// A timer armed through the mock scheduler.
#[derive(Debug, Clone)]
pub struct ArmedTimer {
    pub handle: ExpirationHandle,
    pub delay: Duration,
    pub key: RequestKey,
    pub request_id: RequestId,
}

/// Manual scheduler: records armed timers, fires only when the test asks.
#[derive(Debug, Default)]
pub struct MockScheduler {
    next: AtomicU64,
    armed: Mutex<Vec<ArmedTimer>>,
    cancelled: Mutex<Vec<ExpirationHandle>>,
}

impl MockScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Timers armed and not yet cancelled.
    pub fn armed(&self) -> Vec<ArmedTimer> {
        let cancelled = self.cancelled.lock().unwrap();
        self.armed
            .lock()
            .unwrap()
            .iter()
            .filter(|timer| !cancelled.contains(&timer.handle))
            .cloned()
            .collect()
    }

    pub fn armed_count(&self) -> usize {
        self.armed().len()
    }

    pub fn cancelled_count(&self) -> usize {
        self.cancelled.lock().unwrap().len()
    }
}

impl ExpirationScheduler for MockScheduler {
    fn schedule(
        &self,
        delay: Duration,
        key: RequestKey,
        request_id: RequestId,
    ) -> ExpirationHandle {
        let handle = ExpirationHandle(self.next.fetch_add(1, Ordering::SeqCst));
        self.armed.lock().unwrap().push(ArmedTimer {
            handle,
            delay,
            key,
            request_id,
        });
        handle
    }

    fn cancel(&self, handle: ExpirationHandle) {
        self.cancelled.lock().unwrap().push(handle);
    }
}

/// Records every relocation effect.
#[derive(Debug, Default)]
pub struct RecordingRelocator {
    moves: Mutex<Vec<(PlayerId, Position)>>,
}

impl RecordingRelocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn moves(&self) -> Vec<(PlayerId, Position)> {
        self.moves.lock().unwrap().clone()
    }
}

impl Relocator for RecordingRelocator {
    fn relocate(&self, id: PlayerId, destination: Position) {
        self.moves.lock().unwrap().push((id, destination));
    }
}

/// Records every notification per recipient.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<(PlayerId, TeleportEvent)>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_for(&self, recipient: PlayerId) -> Option<TeleportEvent> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(id, _)| *id == recipient)
            .map(|(_, event)| event.clone())
    }

    pub fn all_for(&self, recipient: PlayerId) -> Vec<TeleportEvent> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, _)| *id == recipient)
            .map(|(_, event)| event.clone())
            .collect()
    }

    pub fn total(&self) -> usize {
        self.events.lock().unwrap().len()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, recipient: PlayerId, event: TeleportEvent) {
        self.events.lock().unwrap().push((recipient, event));
    }
}

/// An engine wired to mocks, with handles to every collaborator.
pub struct EngineFixture {
    pub engine: LifecycleEngine,
    pub directory: Arc<MockDirectory>,
    pub scheduler: Arc<MockScheduler>,
    pub relocator: Arc<RecordingRelocator>,
    pub notifier: Arc<RecordingNotifier>,
    pub time: Arc<MockTimeSource>,
}

impl EngineFixture {
    pub fn new(config: TeleportConfig) -> Self {
        let directory = Arc::new(MockDirectory::new());
        let scheduler = Arc::new(MockScheduler::new());
        let relocator = Arc::new(RecordingRelocator::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let time = Arc::new(MockTimeSource::new(0));
        let engine = LifecycleEngine::new(
            config,
            directory.clone(),
            scheduler.clone(),
            relocator.clone(),
            notifier.clone(),
            time.clone(),
        );
        Self {
            engine,
            directory,
            scheduler,
            relocator,
            notifier,
            time,
        }
    }

    /// Joins both names (idempotently) and returns their ids.
    pub fn join_pair(&mut self, a: &str, b: &str) -> (PlayerId, PlayerId) {
        (self.directory.join(a), self.directory.join(b))
    }
}
