//! Per-requester send rate limiting.

use super::entities::{CooldownEntry, PlayerId, Timestamp};
use std::collections::HashMap;
use std::time::Duration;

/// Map from requester to "earliest time a new request may be sent".
///
/// INVARIANT-4: `arm()` overwrites any prior entry; cooldowns never stack.
/// Entries are checked lazily, so an expired entry is equivalent to no
/// entry; `purge_expired()` exists only as housekeeping for long-running
/// processes.
#[derive(Debug, Default)]
pub struct CooldownTracker {
    entries: HashMap<PlayerId, CooldownEntry>,
}

impl CooldownTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the remaining cooldown for `id`, or `None` if not limited.
    pub fn is_limited(&self, id: PlayerId, now: Timestamp) -> Option<Duration> {
        let entry = self.entries.get(&id)?;
        if entry.expires_at > now {
            Some(Duration::from_millis(entry.expires_at - now))
        } else {
            None
        }
    }

    /// Sets or overwrites the cooldown for `id` to `now + cooldown`.
    pub fn arm(&mut self, id: PlayerId, now: Timestamp, cooldown: Duration) {
        self.entries.insert(
            id,
            CooldownEntry {
                expires_at: now + cooldown.as_millis() as Timestamp,
            },
        );
    }

    /// Drops entries that have already lapsed. Returns how many were removed.
    pub fn purge_expired(&mut self, now: Timestamp) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.expires_at > now);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Discards all entries (shutdown path).
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
