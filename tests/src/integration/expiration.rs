//! Timer behavior across the scheduler boundary.
//!
//! The mock-scheduler tests pin down the id-guard semantics; the
//! tokio-scheduler tests run the real adapter under paused time and drive
//! its deliveries back into the engine, the same loop shape the runtime
//! binary uses.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;
    use tpa_engine::adapters::scheduler::TokioScheduler;
    use tpa_engine::ports::inbound::TeleportApi;
    use tpa_engine::testing::{
        EngineFixture, MockDirectory, MockTimeSource, RecordingNotifier, RecordingRelocator,
    };
    use tpa_engine::{LifecycleEngine, TeleportConfig, TeleportEvent};

    #[test]
    fn test_armed_timer_carries_only_key_and_id() {
        let mut fx = EngineFixture::new(TeleportConfig::default());
        let (alice, bob) = fx.join_pair("alice", "bob");

        let receipt = fx.engine.send(alice, bob).unwrap();

        let armed = fx.scheduler.armed();
        assert_eq!(armed.len(), 1);
        assert_eq!(armed[0].key, receipt.key);
        assert_eq!(armed[0].request_id, receipt.request_id);
        assert_eq!(armed[0].delay, Duration::from_secs(120));
    }

    #[test]
    fn test_fired_timer_replayed_twice_expires_once() {
        let mut fx = EngineFixture::new(TeleportConfig::default());
        let (alice, bob) = fx.join_pair("alice", "bob");

        let receipt = fx.engine.send(alice, bob).unwrap();
        assert!(fx.engine.expire(receipt.key, receipt.request_id));
        let total = fx.notifier.total();

        // Duplicate delivery of the same due timer is absorbed.
        assert!(!fx.engine.expire(receipt.key, receipt.request_id));
        assert_eq!(fx.notifier.total(), total);
    }

    #[tokio::test(start_paused = true)]
    async fn test_real_scheduler_expires_pending_request() {
        let directory = Arc::new(MockDirectory::new());
        let (scheduler, mut expirations) = TokioScheduler::new();
        let notifier = Arc::new(RecordingNotifier::new());
        let mut engine = LifecycleEngine::new(
            TeleportConfig {
                request_timeout: Duration::from_secs(30),
                ..TeleportConfig::default()
            },
            directory.clone(),
            scheduler.clone(),
            Arc::new(RecordingRelocator::new()),
            notifier.clone(),
            Arc::new(MockTimeSource::new(0)),
        );
        let alice = directory.join("alice");
        let bob = directory.join("bob");

        engine.send(alice, bob).unwrap();
        assert_eq!(scheduler.active_timers(), 1);

        tokio::time::advance(Duration::from_secs(31)).await;
        let due = expirations.recv().await.unwrap();
        assert!(engine.expire(due.key, due.request_id));

        assert_eq!(engine.pending_count(), 0);
        assert!(matches!(
            notifier.last_for(bob),
            Some(TeleportEvent::IncomingExpired { requester }) if requester == alice
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_real_scheduler_delivery_after_deny_is_absorbed() {
        let directory = Arc::new(MockDirectory::new());
        let (scheduler, mut expirations) = TokioScheduler::new();
        let notifier = Arc::new(RecordingNotifier::new());
        let mut engine = LifecycleEngine::new(
            TeleportConfig {
                request_timeout: Duration::from_secs(30),
                ..TeleportConfig::default()
            },
            directory.clone(),
            scheduler,
            Arc::new(RecordingRelocator::new()),
            notifier.clone(),
            Arc::new(MockTimeSource::new(0)),
        );
        let alice = directory.join("alice");
        let bob = directory.join("bob");

        engine.send(alice, bob).unwrap();

        // Let the timer fire but deny before applying the delivery; this is
        // the fired-but-undelivered race the id guard exists for.
        tokio::time::advance(Duration::from_secs(31)).await;
        let due = expirations.recv().await.unwrap();
        engine.deny(bob, None).unwrap();
        let total = notifier.total();

        assert!(!engine.expire(due.key, due.request_id));
        assert_eq!(notifier.total(), total);
        assert_eq!(engine.pending_count(), 0);
    }
}
