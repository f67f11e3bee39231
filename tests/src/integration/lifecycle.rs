//! Request lifecycle flows against mock collaborators.
//!
//! Exercises the engine through its inbound port the way the runtime does,
//! with deterministic time and a manual scheduler, checking the effects on
//! every outbound port in one place.

#[cfg(test)]
mod tests {
    use shared_types::{Position, WorldId};
    use std::time::Duration;
    use tpa_engine::ports::inbound::TeleportApi;
    use tpa_engine::testing::EngineFixture;
    use tpa_engine::{TeleportConfig, TeleportError, TeleportEvent};

    fn fixture() -> EngineFixture {
        EngineFixture::new(TeleportConfig::default())
    }

    #[test]
    fn test_accept_moves_requester_to_targets_current_position() {
        let mut f = fixture();
        let (alice, bob) = f.join_pair("alice", "bob");

        f.engine.send(alice, bob).unwrap();

        // Target walks away before accepting; arrival uses the position at
        // accept time, not at send time.
        let late_position = Position::new(WorldId::new("overworld"), 300.0, 70.0, -42.0);
        f.directory.set_position(bob, late_position.clone());

        f.engine.accept(bob, None).unwrap();

        assert_eq!(f.relocator.moves(), vec![(alice, late_position)]);
        assert!(matches!(
            f.notifier.last_for(alice),
            Some(TeleportEvent::Teleported { to }) if to == bob
        ));
        assert!(matches!(
            f.notifier.last_for(bob),
            Some(TeleportEvent::RequesterArrived { requester }) if requester == alice
        ));
        assert_eq!(f.engine.pending_count(), 0);
    }

    #[test]
    fn test_deny_resolves_without_relocation() {
        let mut f = fixture();
        let (alice, bob) = f.join_pair("alice", "bob");

        f.engine.send(alice, bob).unwrap();
        f.engine.deny(bob, None).unwrap();

        assert!(f.relocator.moves().is_empty());
        assert!(matches!(
            f.notifier.last_for(alice),
            Some(TeleportEvent::RequestDenied { by }) if by == bob
        ));
        assert_eq!(f.engine.pending_count(), 0);
        // The request is gone for good.
        assert_eq!(f.engine.accept(bob, None), Err(TeleportError::NoSuchRequest));
    }

    #[test]
    fn test_cooldown_survives_cancel_and_clears_with_time() {
        let mut f = fixture();
        let (alice, bob) = f.join_pair("alice", "bob");

        f.engine.send(alice, bob).unwrap();
        f.engine.cancel(alice, None).unwrap();

        // Cancelling does not refund the rate limit.
        match f.engine.send(alice, bob) {
            Err(TeleportError::OnCooldown { remaining }) => {
                assert!(remaining <= Duration::from_secs(10));
                assert!(remaining > Duration::ZERO);
            }
            other => panic!("expected cooldown, got {:?}", other),
        }

        f.time.advance(10_000);
        f.engine.send(alice, bob).unwrap();
        assert_eq!(f.engine.pending_count(), 1);
    }

    #[test]
    fn test_opposite_direction_requests_are_independent() {
        let mut f = fixture();
        let (alice, bob) = f.join_pair("alice", "bob");

        f.engine.send(alice, bob).unwrap();
        f.engine.send(bob, alice).unwrap();
        assert_eq!(f.engine.pending_count(), 2);

        // Each side resolves its own incoming request.
        f.engine.accept(bob, None).unwrap();
        assert_eq!(f.engine.pending_count(), 1);
        f.engine.deny(alice, None).unwrap();
        assert_eq!(f.engine.pending_count(), 0);
    }

    #[test]
    fn test_cancel_all_resolves_every_outgoing_request() {
        // Zero cooldown so one requester can have two live requests.
        let mut f = EngineFixture::new(TeleportConfig {
            request_cooldown: Duration::ZERO,
            ..TeleportConfig::default()
        });
        let alice = f.directory.join("alice");
        let bob = f.directory.join("bob");
        let carol = f.directory.join("carol");

        f.engine.send(alice, bob).unwrap();
        f.engine.send(alice, carol).unwrap();
        assert_eq!(f.scheduler.armed_count(), 2);

        let cancelled = f.engine.cancel_all(alice);
        assert_eq!(cancelled.len(), 2);
        assert_eq!(f.engine.pending_count(), 0);
        assert_eq!(f.scheduler.armed_count(), 0);

        // Both targets heard about it.
        assert!(matches!(
            f.notifier.last_for(bob),
            Some(TeleportEvent::RequestCancelled { requester }) if requester == alice
        ));
        assert!(matches!(
            f.notifier.last_for(carol),
            Some(TeleportEvent::RequestCancelled { requester }) if requester == alice
        ));
    }

    #[test]
    fn test_target_going_offline_blocks_new_sends_but_not_accepts() {
        let mut f = fixture();
        let (alice, bob) = f.join_pair("alice", "bob");
        let carol = f.directory.join("carol");

        f.engine.send(alice, bob).unwrap();
        f.directory.set_online(alice, false);

        // A disconnected requester cannot be a send target.
        assert_eq!(
            f.engine.send(carol, alice),
            Err(TeleportError::TargetUnavailable)
        );

        // But bob accepting alice's request still resolves it; the policy
        // re-check rejects it because alice has no world while offline.
        assert_eq!(f.engine.accept(bob, None), Err(TeleportError::PolicyDenied));
        assert_eq!(f.engine.pending_count(), 0);
        assert!(f.relocator.moves().is_empty());
    }

    #[test]
    fn test_cross_world_send_allowed_when_configured() {
        let mut f = EngineFixture::new(TeleportConfig {
            allow_cross_world: true,
            ..TeleportConfig::default()
        });
        let (alice, bob) = f.join_pair("alice", "bob");
        f.directory.set_world(bob, WorldId::new("nether"));

        f.engine.send(alice, bob).unwrap();
        f.engine.accept(bob, None).unwrap();
        assert_eq!(f.relocator.moves().len(), 1);
    }
}
