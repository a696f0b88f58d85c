//! Notification orchestrator: the single fan-out entry point for
//! collaborative events.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info, warn};

use homehunt_core::config::{NotificationRealtimeConfig, RecipientPolicy};
use homehunt_core::types::{ApartmentId, UserId};
use homehunt_database::store::UserStore;
use homehunt_entity::notification::NotificationType;
use homehunt_service::notification::NotificationService;
use homehunt_service::push::{PushDelivery, PushPayload};

use crate::connection::ConnectionRegistry;
use crate::message::types::NotificationPayload;
use crate::metrics::EngineMetrics;

use super::dispatcher::NotificationDispatcher;

/// A collaborative event to notify others about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationEvent {
    /// Event type.
    pub notification_type: NotificationType,
    /// The user who acted.
    pub actor_id: UserId,
    /// The apartment acted on.
    pub apartment_id: ApartmentId,
    /// Notification title.
    pub title: String,
    /// Notification body.
    pub message: String,
    /// Whether the actor is left out of the recorded and live recipients.
    ///
    /// Only affects the record path. Browser push always skips the actor.
    pub exclude_actor: bool,
}

impl NotificationEvent {
    /// Build an event that excludes its actor.
    pub fn new(
        notification_type: NotificationType,
        actor_id: UserId,
        apartment_id: ApartmentId,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            notification_type,
            actor_id,
            apartment_id,
            title: title.into(),
            message: message.into(),
            exclude_actor: true,
        }
    }

    /// Override actor exclusion.
    pub fn with_exclude_actor(mut self, exclude: bool) -> Self {
        self.exclude_actor = exclude;
        self
    }

    /// The browser push form of this event.
    pub fn push_payload(&self) -> PushPayload {
        PushPayload::new(
            self.notification_type,
            self.apartment_id,
            self.title.clone(),
            self.message.clone(),
        )
    }
}

/// What one fan-out did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FanoutReport {
    /// Recipients resolved.
    pub recipients: usize,
    /// Notification records created.
    pub recorded: usize,
    /// Recipients whose record could not be created.
    pub failed: usize,
    /// Channels a frame was queued on.
    pub delivered: usize,
    /// Successful browser pushes.
    pub pushed: usize,
}

/// Records one notification per recipient, dispatches it to their live
/// channels, and pushes the event to other users' browsers.
///
/// Failures are logged per recipient and never returned: by the time an
/// event arrives here, the write that caused it has already committed.
pub struct NotificationOrchestrator {
    registry: Arc<ConnectionRegistry>,
    dispatcher: Arc<NotificationDispatcher>,
    notifications: NotificationService,
    users: Arc<dyn UserStore>,
    push: Arc<PushDelivery>,
    config: NotificationRealtimeConfig,
    metrics: Arc<EngineMetrics>,
    tracker: TaskTracker,
}

impl NotificationOrchestrator {
    /// Create a new orchestrator.
    pub fn new(
        registry: Arc<ConnectionRegistry>,
        dispatcher: Arc<NotificationDispatcher>,
        notifications: NotificationService,
        users: Arc<dyn UserStore>,
        push: Arc<PushDelivery>,
        config: NotificationRealtimeConfig,
        metrics: Arc<EngineMetrics>,
    ) -> Self {
        Self {
            registry,
            dispatcher,
            notifications,
            users,
            push,
            config,
            metrics,
            tracker: TaskTracker::new(),
        }
    }

    /// Fan `event` out and wait for it to finish.
    pub async fn notify_event(&self, event: &NotificationEvent) -> FanoutReport {
        let (mut report, pushed) = tokio::join!(
            self.fan_out_records(event),
            self.push_to_others(event)
        );
        report.pushed = pushed;

        self.metrics.event_processed(
            report.recorded as u64,
            report.failed as u64,
            report.pushed as u64,
        );
        info!(
            notification_type = %event.notification_type,
            actor_id = %event.actor_id,
            apartment_id = %event.apartment_id,
            recipients = report.recipients,
            recorded = report.recorded,
            failed = report.failed,
            delivered = report.delivered,
            pushed = report.pushed,
            "Notification fan-out complete"
        );
        report
    }

    /// Fan `event` out in the background. Never blocks and never fails.
    ///
    /// The task is tracked so [`shutdown`](Self::shutdown) can wait for it.
    pub fn spawn_event(self: &Arc<Self>, event: NotificationEvent) {
        let this = Arc::clone(self);
        self.tracker.spawn(async move {
            this.notify_event(&event).await;
        });
    }

    /// Fan-outs still running.
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    /// Close the tracker and wait for in-flight fan-outs.
    pub async fn shutdown(&self) {
        self.tracker.close();
        if !self.tracker.is_empty() {
            info!(in_flight = self.tracker.len(), "Waiting for notification fan-outs");
        }
        self.tracker.wait().await;
    }

    async fn resolve_recipients(&self, event: &NotificationEvent) -> Vec<UserId> {
        let candidates = match self.config.recipient_policy {
            RecipientPolicy::Connected => self.registry.connected_user_ids(),
            RecipientPolicy::AllUsers => match self.users.list_user_ids().await {
                Ok(ids) => ids,
                Err(e) => {
                    warn!(error = %e, "Failed to list users, falling back to connected users");
                    self.registry.connected_user_ids()
                }
            },
        };

        candidates
            .into_iter()
            .filter(|user_id| !(event.exclude_actor && *user_id == event.actor_id))
            .collect()
    }

    async fn fan_out_records(&self, event: &NotificationEvent) -> FanoutReport {
        let recipients = self.resolve_recipients(event).await;
        let mut report = FanoutReport {
            recipients: recipients.len(),
            ..FanoutReport::default()
        };
        if recipients.is_empty() {
            debug!(notification_type = %event.notification_type, "No recipients");
            return report;
        }

        let recorded = AtomicUsize::new(0);
        let failed = AtomicUsize::new(0);
        let delivered = AtomicUsize::new(0);

        futures::stream::iter(recipients)
            .for_each_concurrent(self.config.fanout_concurrency.max(1), |recipient| {
                let (recorded, failed, delivered) = (&recorded, &failed, &delivered);
                async move {
                    let created = self
                        .notifications
                        .create_notification(
                            recipient,
                            event.actor_id,
                            event.apartment_id,
                            event.notification_type,
                            &event.title,
                            &event.message,
                        )
                        .await;
                    match created {
                        Ok(notification) => {
                            recorded.fetch_add(1, Ordering::Relaxed);
                            let sent = self
                                .dispatcher
                                .send_to_user(recipient, &NotificationPayload::from(&notification));
                            delivered.fetch_add(sent, Ordering::Relaxed);
                        }
                        Err(e) => {
                            failed.fetch_add(1, Ordering::Relaxed);
                            error!(
                                recipient = %recipient,
                                notification_type = %event.notification_type,
                                error = %e,
                                "Failed to record notification"
                            );
                        }
                    }
                }
            })
            .await;

        report.recorded = recorded.into_inner();
        report.failed = failed.into_inner();
        report.delivered = delivered.into_inner();
        report
    }

    async fn push_to_others(&self, event: &NotificationEvent) -> usize {
        if !self.push.is_enabled() {
            return 0;
        }
        self.push
            .send_to_all_except(event.actor_id, &event.push_payload())
            .await
    }
}

impl std::fmt::Debug for NotificationOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationOrchestrator")
            .field("config", &self.config)
            .field("in_flight", &self.tracker.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    use async_trait::async_trait;
    use homehunt_core::AppError;
    use homehunt_core::config::RealtimeConfig;
    use homehunt_core::push::PushDeliveryError;
    use homehunt_core::result::AppResult;
    use homehunt_core::types::NotificationId;
    use homehunt_database::store::{NotificationStore, PushSubscriptionStore};
    use homehunt_database::InMemoryStore;
    use homehunt_entity::notification::{Notification, NotificationView};
    use homehunt_entity::push::PushSubscription;
    use homehunt_service::push::PushGateway;
    use tokio::sync::mpsc;

    use crate::connection::ChannelGuard;
    use crate::notification::formatter::NotificationFormatter;

    /// Delegates to the in-memory store but refuses writes for one recipient.
    struct FlakyStore {
        inner: Arc<InMemoryStore>,
        fail_for: UserId,
    }

    #[async_trait]
    impl NotificationStore for FlakyStore {
        async fn insert_notification(&self, n: &Notification) -> AppResult<Notification> {
            if n.user_id == self.fail_for {
                return Err(AppError::database("simulated write failure"));
            }
            self.inner.insert_notification(n).await
        }
        async fn notifications_for_user(&self, user_id: UserId) -> AppResult<Vec<NotificationView>> {
            self.inner.notifications_for_user(user_id).await
        }
        async fn mark_read(&self, id: NotificationId, user_id: UserId) -> AppResult<bool> {
            self.inner.mark_read(id, user_id).await
        }
        async fn mark_all_read(&self, user_id: UserId) -> AppResult<u64> {
            self.inner.mark_all_read(user_id).await
        }
        async fn count_unread(&self, user_id: UserId) -> AppResult<i64> {
            self.inner.count_unread(user_id).await
        }
    }

    #[derive(Default)]
    struct RecordingGateway {
        endpoints: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl PushGateway for RecordingGateway {
        async fn send(&self, sub: &PushSubscription, _: &str) -> Result<(), PushDeliveryError> {
            self.endpoints.lock().expect("lock").push(sub.endpoint.clone());
            Ok(())
        }
    }

    struct Harness {
        store: Arc<InMemoryStore>,
        registry: Arc<ConnectionRegistry>,
        orchestrator: Arc<NotificationOrchestrator>,
    }

    impl Harness {
        fn build(
            notifications: Arc<dyn NotificationStore>,
            store: Arc<InMemoryStore>,
            push: PushDelivery,
            policy: RecipientPolicy,
        ) -> Self {
            let metrics = Arc::new(EngineMetrics::new());
            let registry = Arc::new(ConnectionRegistry::new(
                RealtimeConfig::default(),
                metrics.clone(),
            ));
            let dispatcher = Arc::new(NotificationDispatcher::new(registry.clone(), metrics.clone()));
            let config = NotificationRealtimeConfig {
                recipient_policy: policy,
                ..NotificationRealtimeConfig::default()
            };
            let orchestrator = Arc::new(NotificationOrchestrator::new(
                registry.clone(),
                dispatcher,
                NotificationService::new(notifications),
                store.clone(),
                Arc::new(push),
                config,
                metrics,
            ));
            Self {
                store,
                registry,
                orchestrator,
            }
        }

        fn new() -> Self {
            let store = Arc::new(InMemoryStore::new());
            let push = PushDelivery::disabled(store.clone(), store.clone());
            Self::build(store.clone(), store, push, RecipientPolicy::Connected)
        }

        async fn user(&self) -> UserId {
            let id = UserId::new();
            self.store.upsert_user(id, None).await.expect("user");
            id
        }

        /// Open an authenticated channel, recording the user first as the socket handler does.
        async fn connect(&self, user: UserId) -> (ChannelGuard, mpsc::Receiver<String>) {
            self.store.upsert_user(user, None).await.expect("user");
            let (guard, rx) = self.registry.open_channel();
            guard.authenticate(user);
            (guard, rx)
        }
    }

    fn sunny_loft(actor: UserId) -> NotificationEvent {
        NotificationEvent::new(
            NotificationType::ApartmentCreated,
            actor,
            ApartmentId::new(),
            "New Apartment Added",
            "Ana added a new apartment: Sunny Loft",
        )
    }

    #[tokio::test]
    async fn test_live_recipients_get_record_and_frame_actor_gets_nothing() {
        let h = Harness::new();
        let (u1, u2) = (UserId::new(), UserId::new());
        let (_g1, mut rx1) = h.connect(u1).await;
        let (_g2, mut rx2) = h.connect(u2).await;

        let report = h.orchestrator.notify_event(&sunny_loft(u1)).await;

        assert_eq!(report.recipients, 1);
        assert_eq!(report.recorded, 1);
        assert_eq!(report.delivered, 1);
        assert!(h.store.notifications_for_user(u1).await.expect("list").is_empty());
        let u2_records = h.store.notifications_for_user(u2).await.expect("list");
        assert_eq!(u2_records.len(), 1);

        let frame: serde_json::Value =
            serde_json::from_str(&rx2.recv().await.expect("frame")).expect("json");
        assert_eq!(frame["data"]["title"], "New Apartment Added");
        assert_eq!(frame["data"]["id"], u2_records[0].id.to_string());
        assert!(rx1.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_no_live_recipients_creates_nothing() {
        let h = Harness::new();
        let (u1, u2) = (h.user().await, UserId::new());
        h.store.upsert_user(u2, Some("Bob")).await.expect("user");

        let report = h.orchestrator.notify_event(&sunny_loft(u1)).await;

        assert_eq!(report, FanoutReport::default());
        assert!(h.store.notifications_for_user(u2).await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn test_actor_is_never_a_recipient() {
        let h = Harness::new();
        let actor = UserId::new();
        let mut tabs = Vec::new();
        for _ in 0..3 {
            tabs.push(h.connect(actor).await);
        }
        let others: Vec<_> = (0..3).map(|_| UserId::new()).collect();
        for other in &others {
            tabs.push(h.connect(*other).await);
        }

        let report = h.orchestrator.notify_event(&sunny_loft(actor)).await;

        assert_eq!(report.recorded, 3);
        assert_eq!(h.store.count_unread(actor).await.expect("count"), 0);
        for other in others {
            assert_eq!(h.store.count_unread(other).await.expect("count"), 1);
        }
    }

    #[tokio::test]
    async fn test_actor_included_when_exclusion_disabled() {
        let h = Harness::new();
        let actor = UserId::new();
        let (_g, _rx) = h.connect(actor).await;

        let report = h
            .orchestrator
            .notify_event(&sunny_loft(actor).with_exclude_actor(false))
            .await;

        assert_eq!(report.recorded, 1);
        assert_eq!(h.store.count_unread(actor).await.expect("count"), 1);
    }

    #[tokio::test]
    async fn test_one_failing_recipient_does_not_block_others() {
        let store = Arc::new(InMemoryStore::new());
        let (actor, r1, r2) = (UserId::new(), UserId::new(), UserId::new());
        let flaky = Arc::new(FlakyStore {
            inner: store.clone(),
            fail_for: r1,
        });
        let push = PushDelivery::disabled(store.clone(), store.clone());
        let h = Harness::build(flaky, store, push, RecipientPolicy::Connected);
        h.store.upsert_user(actor, None).await.expect("user");
        let (_g1, mut rx1) = h.connect(r1).await;
        let (_g2, mut rx2) = h.connect(r2).await;

        let report = h.orchestrator.notify_event(&sunny_loft(actor)).await;

        assert_eq!(report.recipients, 2);
        assert_eq!(report.recorded, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(h.store.notifications_for_user(r2).await.expect("list").len(), 1);
        assert!(rx2.recv().await.is_some());
        assert!(rx1.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_unrecorded_recipient_fails_alone() {
        let h = Harness::new();
        let actor = h.user().await;
        let (_known, mut known_rx) = h.connect(UserId::new()).await;
        // Registered without a user row, as a socket would be if the upsert were skipped.
        let (ghost_guard, mut ghost_rx) = h.registry.open_channel();
        ghost_guard.authenticate(UserId::new());

        let report = h.orchestrator.notify_event(&sunny_loft(actor)).await;

        assert_eq!(report.recipients, 2);
        assert_eq!(report.recorded, 1);
        assert_eq!(report.failed, 1);
        assert!(known_rx.recv().await.is_some());
        assert!(ghost_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_comment_preview_is_persisted_truncated() {
        let h = Harness::new();
        let (actor, reader) = (h.user().await, UserId::new());
        let (_g, _rx) = h.connect(reader).await;
        let apartment = homehunt_entity::apartment::Apartment::new(actor, "Loft", None, 0.0, 0.0);
        let body = "c".repeat(80);

        let event = NotificationFormatter::default().comment_created(actor, &apartment, &body);
        h.orchestrator.notify_event(&event).await;

        let records = h.store.notifications_for_user(reader).await.expect("list");
        assert_eq!(records[0].message, format!("{}...", "c".repeat(50)));
    }

    #[tokio::test]
    async fn test_all_users_policy_records_for_offline_users() {
        let store = Arc::new(InMemoryStore::new());
        let push = PushDelivery::disabled(store.clone(), store.clone());
        let h = Harness::build(store.clone(), store, push, RecipientPolicy::AllUsers);
        let (actor, offline) = (UserId::new(), UserId::new());
        h.store.upsert_user(actor, None).await.expect("user");
        h.store.upsert_user(offline, None).await.expect("user");

        let report = h.orchestrator.notify_event(&sunny_loft(actor)).await;

        assert_eq!(report.recorded, 1);
        assert_eq!(report.delivered, 0);
        assert_eq!(h.store.count_unread(offline).await.expect("count"), 1);
    }

    #[tokio::test]
    async fn test_push_reaches_offline_users_but_not_actor() {
        let store = Arc::new(InMemoryStore::new());
        let gateway = Arc::new(RecordingGateway::default());
        let push = PushDelivery::new(gateway.clone(), store.clone(), store.clone());
        let h = Harness::build(store.clone(), store, push, RecipientPolicy::Connected);
        let (actor, offline) = (UserId::new(), UserId::new());
        for (user, endpoint) in [(actor, "https://push.example/actor"), (offline, "https://push.example/offline")] {
            h.store.upsert_user(user, None).await.expect("user");
            h.store
                .upsert_subscription(&PushSubscription::new(user, endpoint, "k", "a"))
                .await
                .expect("subscribe");
        }

        let report = h.orchestrator.notify_event(&sunny_loft(actor)).await;

        assert_eq!(report.recorded, 0);
        assert_eq!(report.pushed, 1);
        assert_eq!(
            *gateway.endpoints.lock().expect("lock"),
            vec!["https://push.example/offline".to_string()]
        );
    }

    #[tokio::test]
    async fn test_push_skips_actor_even_when_actor_is_recorded() {
        let store = Arc::new(InMemoryStore::new());
        let gateway = Arc::new(RecordingGateway::default());
        let push = PushDelivery::new(gateway.clone(), store.clone(), store.clone());
        let h = Harness::build(store.clone(), store, push, RecipientPolicy::Connected);
        let actor = UserId::new();
        let (_g, _rx) = h.connect(actor).await;
        h.store
            .upsert_subscription(&PushSubscription::new(actor, "https://push.example/actor", "k", "a"))
            .await
            .expect("subscribe");

        let report = h
            .orchestrator
            .notify_event(&sunny_loft(actor).with_exclude_actor(false))
            .await;

        assert_eq!(report.recorded, 1);
        assert_eq!(report.pushed, 0);
        assert!(gateway.endpoints.lock().expect("lock").is_empty());
    }

    #[tokio::test]
    async fn test_spawned_events_finish_before_shutdown_returns() {
        let h = Harness::new();
        let reader = UserId::new();
        let (_g, _rx) = h.connect(reader).await;

        for _ in 0..5 {
            let actor = h.user().await;
            h.orchestrator.spawn_event(sunny_loft(actor));
        }
        h.orchestrator.shutdown().await;

        assert_eq!(h.orchestrator.in_flight(), 0);
        assert_eq!(h.store.count_unread(reader).await.expect("count"), 5);
    }
}
