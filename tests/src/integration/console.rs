//! Command service, roster, and engine end to end.
//!
//! Drives the assembled runtime the way the binary's serving loop does:
//! command lines in, notifications and due expirations out.

#[cfg(test)]
mod tests {
    use std::time::Duration;
    use tpa_engine::adapters::notifier::Notification;
    use tpa_engine::ports::outbound::IdentityDirectory;
    use tpa_engine::TeleportConfig;
    use waypoint_runtime::commands::render_notification;
    use waypoint_runtime::Runtime;

    fn drain(runtime: &mut Runtime) -> Vec<Notification> {
        std::iter::from_fn(|| runtime.notifications.try_recv().ok()).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_accept_round_trip_with_rendered_messages() {
        let mut runtime = Runtime::build(TeleportConfig::default());
        let alice = runtime.roster.join("alice");
        let bob = runtime.roster.join("bob");

        assert!(runtime.commands.handle(alice, "tpa bob").is_empty());
        let rendered: Vec<String> = drain(&mut runtime)
            .iter()
            .map(|n| render_notification(&runtime.roster, n))
            .collect();
        assert!(rendered
            .iter()
            .any(|m| m == "Teleport request sent to bob. This request will expire in 2 minutes."));
        assert!(rendered.iter().any(|m| m.starts_with("alice has requested to teleport to you.")));

        assert!(runtime.commands.handle(bob, "tpaccept").is_empty());
        let rendered: Vec<String> = drain(&mut runtime)
            .iter()
            .map(|n| render_notification(&runtime.roster, n))
            .collect();
        assert!(rendered.iter().any(|m| m == "Teleported to bob."));
        assert!(rendered.iter().any(|m| m == "alice has been teleported to you."));

        // The requester now stands where the target stands.
        assert_eq!(
            runtime.roster.current_position(alice),
            runtime.roster.current_position(bob)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_expiry_notifies_both_sides_through_the_loop() {
        let mut runtime = Runtime::build(TeleportConfig {
            request_timeout: Duration::from_secs(15),
            ..TeleportConfig::default()
        });
        let alice = runtime.roster.join("alice");
        runtime.roster.join("bob");

        runtime.commands.handle(alice, "tpa bob");
        drain(&mut runtime);

        tokio::time::advance(Duration::from_secs(16)).await;
        let due = runtime.expirations.recv().await.unwrap();
        runtime.commands.apply_expiration(due);

        let rendered: Vec<String> = drain(&mut runtime)
            .iter()
            .map(|n| render_notification(&runtime.roster, n))
            .collect();
        assert!(rendered
            .iter()
            .any(|m| m == "Your teleport request to bob has expired."));
        assert!(rendered
            .iter()
            .any(|m| m == "Teleport request from alice has expired."));
    }

    #[tokio::test(start_paused = true)]
    async fn test_deny_by_name_then_resend_after_cooldown() {
        let mut runtime = Runtime::build(TeleportConfig::default());
        let alice = runtime.roster.join("alice");
        let bob = runtime.roster.join("bob");

        runtime.commands.handle(alice, "tpa bob");
        assert!(runtime.commands.handle(bob, "tpdeny alice").is_empty());
        drain(&mut runtime);

        // Straight away the cooldown still bites; real time must pass
        // because the assembled runtime uses the system clock.
        let reply = runtime.commands.handle(alice, "tpa bob");
        assert_eq!(reply.len(), 1);
        assert!(reply[0].starts_with("Please wait"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_completion_follows_live_state() {
        let mut runtime = Runtime::build(TeleportConfig::default());
        let alice = runtime.roster.join("alice");
        let bob = runtime.roster.join("bob");

        assert_eq!(runtime.commands.suggest(bob, "tpaccept "), Vec::<String>::new());
        runtime.commands.handle(alice, "tpa bob");
        assert_eq!(runtime.commands.suggest(bob, "tpaccept "), vec!["alice"]);

        runtime.commands.handle(bob, "tpdeny");
        assert_eq!(runtime.commands.suggest(bob, "tpaccept "), Vec::<String>::new());
    }
}
