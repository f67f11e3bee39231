//! Chat-style command handling.
//!
//! Translates `tpa` / `tpaccept` / `tpdeny` / `tpacancel` lines into engine
//! intents and renders outcomes into user-facing text. The notifier stream
//! is the single delivery path for lifecycle messages (both parties of a
//! transition hear about it there, the command issuer included), so
//! `handle` returns only immediate feedback: usage hints, errors, and
//! candidate listings.

use crate::roster::InMemoryRoster;
use shared_types::PlayerId;
use std::sync::Arc;
use std::time::Duration;
use tpa_engine::adapters::scheduler::ExpirationDue;
use tpa_engine::adapters::notifier::Notification;
use tpa_engine::ports::inbound::TeleportApi;
use tpa_engine::ports::outbound::IdentityDirectory;
use tpa_engine::{LifecycleEngine, TeleportError, TeleportEvent};

/// Owns the engine and serves parsed participant commands.
///
/// Single owner: user intents and due expirations are both applied through
/// this service on one task, which is what makes the engine's lock-free
/// collections sound.
pub struct CommandService {
    engine: LifecycleEngine,
    roster: Arc<InMemoryRoster>,
}

impl CommandService {
    pub fn new(engine: LifecycleEngine, roster: Arc<InMemoryRoster>) -> Self {
        Self { engine, roster }
    }

    pub fn engine(&self) -> &LifecycleEngine {
        &self.engine
    }

    /// Handles one command line from `who`, returning reply lines.
    pub fn handle(&mut self, who: PlayerId, line: &str) -> Vec<String> {
        let mut parts = line.split_whitespace();
        match parts.next() {
            Some("tpa") => self.handle_tpa(who, parts.next()),
            Some("tpaccept") => self.handle_accept(who, parts.next()),
            Some("tpdeny") => self.handle_deny(who, parts.next()),
            Some("tpacancel") => self.handle_cancel(who, parts.next()),
            _ => vec!["Unknown command. Available: tpa, tpaccept, tpdeny, tpacancel.".to_string()],
        }
    }

    /// Completion candidates for a partially typed command line.
    pub fn suggest(&self, who: PlayerId, line: &str) -> Vec<String> {
        let mut parts = line.split_whitespace();
        let command = parts.next().unwrap_or("");
        let partial = parts.next().unwrap_or("").to_lowercase();

        let mut candidates: Vec<String> = match command {
            "tpa" => {
                let own_name = self.roster.display_name(who);
                self.roster
                    .online_names()
                    .into_iter()
                    .filter(|name| Some(name) != own_name.as_ref())
                    .collect()
            }
            "tpaccept" | "tpdeny" => self
                .engine
                .find_incoming(who)
                .into_iter()
                .filter(|key| self.roster.is_online(key.requester))
                .map(|key| self.roster.name_of(key.requester))
                .collect(),
            "tpacancel" => {
                let mut names = vec!["all".to_string()];
                names.extend(
                    self.engine
                        .find_outgoing(who)
                        .into_iter()
                        .filter(|key| self.roster.is_online(key.target))
                        .map(|key| self.roster.name_of(key.target)),
                );
                names
            }
            _ => Vec::new(),
        };

        candidates.retain(|name| name.to_lowercase().starts_with(&partial));
        candidates.sort();
        candidates
    }

    /// Applies a due expiration delivered by the scheduler.
    pub fn apply_expiration(&mut self, due: ExpirationDue) {
        self.engine.expire(due.key, due.request_id);
    }

    /// Housekeeping: drops lapsed cooldown entries.
    pub fn run_maintenance(&mut self) {
        let purged = self.engine.purge_expired_cooldowns();
        if purged > 0 {
            tracing::debug!(purged, "purged lapsed cooldown entries");
        }
    }

    pub fn shutdown(&mut self) {
        self.engine.shutdown();
    }

    fn handle_tpa(&mut self, who: PlayerId, name: Option<&str>) -> Vec<String> {
        let Some(name) = name else {
            return vec!["Usage: /tpa <player>".to_string()];
        };
        let Some(target) = self.roster.resolve_by_name(name) else {
            return vec!["Player not found or is offline.".to_string()];
        };

        match self.engine.send(who, target) {
            Ok(_) => Vec::new(),
            Err(TeleportError::SelfTarget) => {
                vec!["You cannot teleport to yourself.".to_string()]
            }
            Err(TeleportError::TargetUnavailable) => {
                vec!["Player not found or is offline.".to_string()]
            }
            Err(TeleportError::OnCooldown { remaining }) => vec![format!(
                "Please wait {} seconds before sending another request.",
                displayed_cooldown_seconds(remaining)
            )],
            Err(TeleportError::PolicyDenied) => {
                vec!["You cannot teleport to a player in a different dimension.".to_string()]
            }
            Err(TeleportError::AlreadyPending) => {
                vec!["You already have a pending request to this player.".to_string()]
            }
            Err(other) => vec![other.to_string()],
        }
    }

    fn handle_accept(&mut self, who: PlayerId, name: Option<&str>) -> Vec<String> {
        let selector = match self.resolve_incoming_selector(who, name) {
            Ok(selector) => selector,
            Err(reply) => return reply,
        };

        match self.engine.accept(who, selector) {
            Ok(_) => Vec::new(),
            Err(TeleportError::PolicyDenied) => vec![
                "You cannot accept a teleport request from a player in a different dimension."
                    .to_string(),
            ],
            Err(err) => self.incoming_failure_reply(who, name, err, "/tpaccept"),
        }
    }

    fn handle_deny(&mut self, who: PlayerId, name: Option<&str>) -> Vec<String> {
        let selector = match self.resolve_incoming_selector(who, name) {
            Ok(selector) => selector,
            Err(reply) => return reply,
        };

        match self.engine.deny(who, selector) {
            Ok(_) => Vec::new(),
            Err(err) => self.incoming_failure_reply(who, name, err, "/tpdeny"),
        }
    }

    fn handle_cancel(&mut self, who: PlayerId, arg: Option<&str>) -> Vec<String> {
        match arg {
            Some("all") => {
                if self.engine.cancel_all(who).is_empty() {
                    vec!["You don't have any pending teleport requests.".to_string()]
                } else {
                    vec!["You have cancelled all your teleport requests.".to_string()]
                }
            }
            Some(name) => {
                // Resolve against outgoing requests first so a request to a
                // participant who has since disconnected can still be
                // cancelled by name.
                let target = self
                    .engine
                    .find_outgoing(who)
                    .into_iter()
                    .find(|key| self.roster.display_name(key.target).as_deref() == Some(name))
                    .map(|key| key.target)
                    .or_else(|| self.roster.resolve_by_name(name));
                let Some(target) = target else {
                    return vec!["Player not found or is offline.".to_string()];
                };

                match self.engine.cancel(who, Some(target)) {
                    Ok(_) => Vec::new(),
                    Err(TeleportError::NoSuchRequest) => {
                        vec![format!("You don't have a pending request to {}.", name)]
                    }
                    Err(other) => vec![other.to_string()],
                }
            }
            None => match self.engine.cancel(who, None) {
                Ok(_) => Vec::new(),
                Err(TeleportError::NoSuchRequest) => {
                    vec!["You don't have any pending teleport requests.".to_string()]
                }
                Err(TeleportError::AmbiguousSelection) => {
                    let mut reply = vec![
                        "Usage: /tpacancel <player> or /tpacancel all".to_string(),
                        "You can cancel the following pending requests:".to_string(),
                    ];
                    for key in self.engine.find_outgoing(who) {
                        reply.push(format!(" - {}", self.roster.name_of(key.target)));
                    }
                    reply
                }
                Err(other) => vec![other.to_string()],
            },
        }
    }

    fn resolve_incoming_selector(
        &self,
        who: PlayerId,
        name: Option<&str>,
    ) -> Result<Option<PlayerId>, Vec<String>> {
        match name {
            None => Ok(None),
            Some(name) => {
                // Offline requesters still have live requests; match their
                // display names too.
                let requester = self
                    .engine
                    .find_incoming(who)
                    .into_iter()
                    .find(|key| self.roster.display_name(key.requester).as_deref() == Some(name))
                    .map(|key| key.requester)
                    .or_else(|| self.roster.resolve_by_name(name));
                match requester {
                    Some(id) => Ok(Some(id)),
                    None => Err(vec!["Player not found or is offline.".to_string()]),
                }
            }
        }
    }

    fn incoming_failure_reply(
        &self,
        who: PlayerId,
        name: Option<&str>,
        err: TeleportError,
        usage: &str,
    ) -> Vec<String> {
        match err {
            TeleportError::NoSuchRequest => match name {
                Some(name) => vec![format!("You don't have a pending request from {}.", name)],
                None => vec!["You don't have any pending teleport requests.".to_string()],
            },
            TeleportError::AmbiguousSelection => {
                let mut reply = vec![
                    format!("Usage: {} <player>", usage),
                    "Pending requests from:".to_string(),
                ];
                for key in self.engine.find_incoming(who) {
                    reply.push(format!(" - {}", self.roster.name_of(key.requester)));
                }
                reply
            }
            other => vec![other.to_string()],
        }
    }
}

/// Renders a lifecycle notification for console/session delivery.
pub fn render_notification(roster: &InMemoryRoster, notification: &Notification) -> String {
    match &notification.event {
        TeleportEvent::RequestSent { target, expires_in } => format!(
            "Teleport request sent to {}. This request will expire in {}.",
            roster.name_of(*target),
            format_timeout(*expires_in)
        ),
        TeleportEvent::RequestReceived {
            requester,
            expires_in,
        } => {
            let name = roster.name_of(*requester);
            format!(
                "{} has requested to teleport to you. Type /tpaccept {} to accept. This request will expire in {}.",
                name,
                name,
                format_timeout(*expires_in)
            )
        }
        TeleportEvent::Teleported { to } => {
            format!("Teleported to {}.", roster.name_of(*to))
        }
        TeleportEvent::RequesterArrived { requester } => {
            format!("{} has been teleported to you.", roster.name_of(*requester))
        }
        TeleportEvent::RequestDenied { by } => {
            format!("{} has denied your teleport request.", roster.name_of(*by))
        }
        TeleportEvent::DenyConfirmed { requester } => format!(
            "You have denied {}'s teleport request.",
            roster.name_of(*requester)
        ),
        TeleportEvent::RequestCancelled { requester } => format!(
            "{} has cancelled their teleport request.",
            roster.name_of(*requester)
        ),
        TeleportEvent::CancelConfirmed { target } => format!(
            "You have cancelled your teleport request to {}.",
            roster.name_of(*target)
        ),
        TeleportEvent::OutgoingExpired { target } => format!(
            "Your teleport request to {} has expired.",
            roster.name_of(*target)
        ),
        TeleportEvent::IncomingExpired { requester } => format!(
            "Teleport request from {} has expired.",
            roster.name_of(*requester)
        ),
    }
}

/// "2 minutes", "1 minute and 30 seconds", "45 seconds".
fn format_timeout(duration: Duration) -> String {
    let total = duration.as_secs();
    let minutes = total / 60;
    let seconds = total % 60;
    let mut rendered = String::new();
    if minutes > 0 {
        rendered = format!("{} minute{}", minutes, if minutes > 1 { "s" } else { "" });
    }
    if seconds > 0 || minutes == 0 {
        if !rendered.is_empty() {
            rendered.push_str(" and ");
        }
        rendered.push_str(&format!(
            "{} second{}",
            seconds,
            if seconds == 1 { "" } else { "s" }
        ));
    }
    rendered
}

/// Seconds shown to a rate-limited requester, rounded so a fresh limit of
/// exactly N seconds displays as N+1 at most, never 0.
fn displayed_cooldown_seconds(remaining: Duration) -> u64 {
    remaining.as_millis() as u64 / 1000 + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use tpa_engine::testing::{MockScheduler, MockTimeSource, RecordingNotifier};
    use tpa_engine::TeleportConfig;

    struct Harness {
        service: CommandService,
        roster: Arc<InMemoryRoster>,
        notifier: Arc<RecordingNotifier>,
        time: Arc<MockTimeSource>,
    }

    fn harness() -> Harness {
        let roster = Arc::new(InMemoryRoster::new());
        let scheduler = Arc::new(MockScheduler::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let time = Arc::new(MockTimeSource::new(0));
        let engine = LifecycleEngine::new(
            TeleportConfig::default(),
            roster.clone(),
            scheduler,
            roster.clone(),
            notifier.clone(),
            time.clone(),
        );
        Harness {
            service: CommandService::new(engine, roster.clone()),
            roster,
            notifier,
            time,
        }
    }

    #[test]
    fn test_tpa_without_argument_prints_usage() {
        let mut h = harness();
        let alice = h.roster.join("alice");
        assert_eq!(h.service.handle(alice, "tpa"), vec!["Usage: /tpa <player>"]);
    }

    #[test]
    fn test_tpa_unknown_name() {
        let mut h = harness();
        let alice = h.roster.join("alice");
        assert_eq!(
            h.service.handle(alice, "tpa nobody"),
            vec!["Player not found or is offline."]
        );
    }

    #[test]
    fn test_tpa_success_is_quiet_and_notifies() {
        let mut h = harness();
        let alice = h.roster.join("alice");
        let bob = h.roster.join("bob");

        assert!(h.service.handle(alice, "tpa bob").is_empty());
        assert_eq!(h.service.engine().find_incoming(bob).len(), 1);
        assert!(matches!(
            h.notifier.last_for(alice),
            Some(TeleportEvent::RequestSent { .. })
        ));
    }

    #[test]
    fn test_tpa_self_target_message() {
        let mut h = harness();
        let alice = h.roster.join("alice");
        assert_eq!(
            h.service.handle(alice, "tpa alice"),
            vec!["You cannot teleport to yourself."]
        );
    }

    #[test]
    fn test_cooldown_message_rounds_up() {
        let mut h = harness();
        let alice = h.roster.join("alice");
        h.roster.join("bob");
        h.roster.join("carol");

        h.service.handle(alice, "tpa bob");
        h.time.advance(5_000); // 5s remaining of the 10s cooldown
        assert_eq!(
            h.service.handle(alice, "tpa carol"),
            vec!["Please wait 6 seconds before sending another request."]
        );
    }

    #[test]
    fn test_accept_single_request_without_selector() {
        let mut h = harness();
        let alice = h.roster.join("alice");
        let bob = h.roster.join("bob");

        h.service.handle(alice, "tpa bob");
        assert!(h.service.handle(bob, "tpaccept").is_empty());
        assert!(h.service.engine().find_incoming(bob).is_empty());
        assert!(matches!(
            h.notifier.last_for(alice),
            Some(TeleportEvent::Teleported { .. })
        ));
    }

    #[test]
    fn test_accept_ambiguous_lists_requesters() {
        let mut h = harness();
        let alice = h.roster.join("alice");
        let bob = h.roster.join("bob");
        let carol = h.roster.join("carol");

        h.service.handle(alice, "tpa carol");
        h.service.handle(bob, "tpa carol");

        let reply = h.service.handle(carol, "tpaccept");
        assert_eq!(reply[0], "Usage: /tpaccept <player>");
        assert_eq!(reply[1], "Pending requests from:");
        assert!(reply[2..].contains(&" - alice".to_string()));
        assert!(reply[2..].contains(&" - bob".to_string()));
    }

    #[test]
    fn test_deny_with_no_requests() {
        let mut h = harness();
        let bob = h.roster.join("bob");
        assert_eq!(
            h.service.handle(bob, "tpdeny"),
            vec!["You don't have any pending teleport requests."]
        );
    }

    #[test]
    fn test_deny_named_requester_without_request() {
        let mut h = harness();
        let alice = h.roster.join("alice");
        let bob = h.roster.join("bob");
        let carol = h.roster.join("carol");

        h.service.handle(alice, "tpa bob");
        let _ = carol;
        assert_eq!(
            h.service.handle(bob, "tpdeny carol"),
            vec!["You don't have a pending request from carol."]
        );
    }

    #[test]
    fn test_cancel_all_summary() {
        let mut h = harness();
        let alice = h.roster.join("alice");
        h.roster.join("bob");

        h.service.handle(alice, "tpa bob");
        assert_eq!(
            h.service.handle(alice, "tpacancel all"),
            vec!["You have cancelled all your teleport requests."]
        );
        assert_eq!(
            h.service.handle(alice, "tpacancel all"),
            vec!["You don't have any pending teleport requests."]
        );
    }

    #[test]
    fn test_cancel_by_name_works_when_target_offline() {
        let mut h = harness();
        let alice = h.roster.join("alice");
        let bob = h.roster.join("bob");

        h.service.handle(alice, "tpa bob");
        h.roster.leave(bob);

        assert!(h.service.handle(alice, "tpacancel bob").is_empty());
        assert!(h.service.engine().find_outgoing(alice).is_empty());
    }

    #[test]
    fn test_suggest_tpa_excludes_self_and_filters_prefix() {
        let h = harness();
        let alice = h.roster.join("alice");
        h.roster.join("anna");
        h.roster.join("bob");

        assert_eq!(h.service.suggest(alice, "tpa a"), vec!["anna"]);
        assert_eq!(h.service.suggest(alice, "tpa "), vec!["anna", "bob"]);
    }

    #[test]
    fn test_suggest_tpacancel_includes_all_keyword() {
        let mut h = harness();
        let alice = h.roster.join("alice");
        h.roster.join("bob");

        h.service.handle(alice, "tpa bob");
        assert_eq!(h.service.suggest(alice, "tpacancel "), vec!["all", "bob"]);
        assert_eq!(h.service.suggest(alice, "tpacancel a"), vec!["all"]);
    }

    #[test]
    fn test_unknown_command_reply() {
        let mut h = harness();
        let alice = h.roster.join("alice");
        assert_eq!(
            h.service.handle(alice, "fly"),
            vec!["Unknown command. Available: tpa, tpaccept, tpdeny, tpacancel."]
        );
    }

    #[test]
    fn test_format_timeout_rendering() {
        assert_eq!(format_timeout(Duration::from_secs(120)), "2 minutes");
        assert_eq!(
            format_timeout(Duration::from_secs(90)),
            "1 minute and 30 seconds"
        );
        assert_eq!(format_timeout(Duration::from_secs(45)), "45 seconds");
        assert_eq!(format_timeout(Duration::from_secs(1)), "1 second");
        assert_eq!(format_timeout(Duration::ZERO), "0 seconds");
    }

    #[test]
    fn test_render_expiration_notifications() {
        let h = harness();
        let alice = h.roster.join("alice");
        let bob = h.roster.join("bob");

        let to_requester = Notification {
            recipient: alice,
            event: TeleportEvent::OutgoingExpired { target: bob },
        };
        assert_eq!(
            render_notification(&h.roster, &to_requester),
            "Your teleport request to bob has expired."
        );

        let to_target = Notification {
            recipient: bob,
            event: TeleportEvent::IncomingExpired { requester: alice },
        };
        assert_eq!(
            render_notification(&h.roster, &to_target),
            "Teleport request from alice has expired."
        );
    }
}
