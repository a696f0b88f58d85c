//! Fan-out of push payloads to every subscription of a user.

use std::sync::Arc;

use futures::StreamExt;
use tracing::{debug, info, warn};

use homehunt_core::config::{PushConfig, VapidConfigStatus};
use homehunt_core::error::AppError;
use homehunt_core::push::PushDeliveryError;
use homehunt_core::result::AppResult;
use homehunt_core::types::UserId;
use homehunt_database::store::{PushSubscriptionStore, UserStore};
use homehunt_entity::push::PushSubscription;

use super::gateway::{PushGateway, WebPushGateway};
use super::payload::PushPayload;

/// Users pushed to concurrently by [`PushDelivery::send_to_all_except`].
const USER_FANOUT_CONCURRENCY: usize = 8;

/// Push side-channel: subscription management plus best-effort delivery.
///
/// Subscriptions that the provider reports as permanently gone are deleted
/// during delivery. Transient failures are logged and left alone.
#[derive(Clone)]
pub struct PushDelivery {
    gateway: Option<Arc<dyn PushGateway>>,
    subscriptions: Arc<dyn PushSubscriptionStore>,
    users: Arc<dyn UserStore>,
    public_key: Option<String>,
    icon: Option<String>,
    badge: Option<String>,
}

impl PushDelivery {
    /// Create a delivery channel sending through `gateway`.
    pub fn new(
        gateway: Arc<dyn PushGateway>,
        subscriptions: Arc<dyn PushSubscriptionStore>,
        users: Arc<dyn UserStore>,
    ) -> Self {
        Self {
            gateway: Some(gateway),
            subscriptions,
            users,
            public_key: None,
            icon: None,
            badge: None,
        }
    }

    /// A channel that stores subscriptions but never sends.
    pub fn disabled(
        subscriptions: Arc<dyn PushSubscriptionStore>,
        users: Arc<dyn UserStore>,
    ) -> Self {
        Self {
            gateway: None,
            subscriptions,
            users,
            public_key: None,
            icon: None,
            badge: None,
        }
    }

    /// Build from configuration.
    ///
    /// Disabled push, or push with no VAPID keys at all, yields a disabled
    /// channel. Partially configured keys are a configuration error.
    pub fn from_config(
        config: &PushConfig,
        subscriptions: Arc<dyn PushSubscriptionStore>,
        users: Arc<dyn UserStore>,
    ) -> AppResult<Self> {
        if !config.enabled {
            info!("Push delivery disabled");
            return Ok(Self::disabled(subscriptions, users));
        }

        match config.vapid() {
            VapidConfigStatus::Ready(vapid) => {
                let public_key = vapid.public_key.clone();
                let gateway = WebPushGateway::new(vapid, config.ttl_seconds)?;
                info!(ttl_seconds = config.ttl_seconds, "Push delivery enabled");
                Ok(Self::new(Arc::new(gateway), subscriptions, users)
                    .with_public_key(public_key)
                    .with_assets(config.icon.clone(), config.badge.clone()))
            }
            VapidConfigStatus::Incomplete => Err(AppError::configuration(
                "push.vapid_private_key, push.vapid_public_key and push.vapid_subject must all be set",
            )),
            VapidConfigStatus::Missing => {
                warn!("Push enabled but no VAPID keys configured; push delivery disabled");
                Ok(Self::disabled(subscriptions, users))
            }
        }
    }

    /// Set the VAPID public key handed to browsers.
    pub fn with_public_key(mut self, key: impl Into<String>) -> Self {
        self.public_key = Some(key.into());
        self
    }

    /// Set default icon and badge for payloads that carry none.
    pub fn with_assets(mut self, icon: impl Into<String>, badge: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self.badge = Some(badge.into());
        self
    }

    /// Whether deliveries are attempted.
    pub fn is_enabled(&self) -> bool {
        self.gateway.is_some()
    }

    /// VAPID public key for the browser subscription flow.
    pub fn public_key(&self) -> Option<&str> {
        self.public_key.as_deref()
    }

    /// Register (or re-register) a browser for `user_id`.
    pub async fn subscribe(
        &self,
        user_id: UserId,
        endpoint: &str,
        p256dh: &str,
        auth: &str,
    ) -> AppResult<PushSubscription> {
        let endpoint = endpoint.trim();
        if endpoint.is_empty() || p256dh.trim().is_empty() || auth.trim().is_empty() {
            return Err(AppError::validation(
                "endpoint, keys.p256dh and keys.auth are required",
            ));
        }
        let subscription = PushSubscription::new(user_id, endpoint, p256dh.trim(), auth.trim());
        let stored = self.subscriptions.upsert_subscription(&subscription).await?;
        info!(user_id = %user_id, endpoint = %stored.endpoint, "Push subscription saved");
        Ok(stored)
    }

    /// Remove `user_id`'s subscription for `endpoint`. Returns whether one existed.
    pub async fn unsubscribe(&self, user_id: UserId, endpoint: &str) -> AppResult<bool> {
        let removed = self.subscriptions.delete_for_user(user_id, endpoint).await?;
        info!(user_id = %user_id, endpoint = %endpoint, removed = removed, "Push unsubscribe");
        Ok(removed)
    }

    /// Push `payload` to every subscription of `user_id`.
    ///
    /// Returns the number of successful deliveries. Never fails.
    pub async fn send_to_user(&self, user_id: UserId, payload: &PushPayload) -> usize {
        let Some(gateway) = &self.gateway else {
            return 0;
        };

        let body = match serde_json::to_string(&self.decorate(payload)) {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, "Failed to serialize push payload");
                return 0;
            }
        };

        let subscriptions = match self.subscriptions.subscriptions_for_user(user_id).await {
            Ok(subs) => subs,
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "Failed to load push subscriptions");
                return 0;
            }
        };

        let mut delivered = 0;
        for subscription in &subscriptions {
            match gateway.send(subscription, &body).await {
                Ok(()) => delivered += 1,
                Err(PushDeliveryError::Permanent(reason)) => {
                    info!(
                        user_id = %user_id,
                        endpoint = %subscription.endpoint,
                        reason = %reason,
                        "Pruning expired push subscription"
                    );
                    if let Err(e) = self
                        .subscriptions
                        .delete_by_endpoint(&subscription.endpoint)
                        .await
                    {
                        warn!(endpoint = %subscription.endpoint, error = %e, "Failed to prune push subscription");
                    }
                }
                Err(PushDeliveryError::Transient(reason)) => {
                    warn!(
                        user_id = %user_id,
                        endpoint = %subscription.endpoint,
                        reason = %reason,
                        "Push delivery failed"
                    );
                }
            }
        }

        debug!(
            user_id = %user_id,
            subscriptions = subscriptions.len(),
            delivered = delivered,
            "Push fan-out to user complete"
        );
        delivered
    }

    /// Push `payload` to every known user except `excluded`.
    pub async fn send_to_all_except(&self, excluded: UserId, payload: &PushPayload) -> usize {
        if !self.is_enabled() {
            return 0;
        }

        let users = match self.users.list_user_ids().await {
            Ok(users) => users,
            Err(e) => {
                warn!(error = %e, "Failed to list users for push");
                return 0;
            }
        };

        futures::stream::iter(users.into_iter().filter(|u| *u != excluded))
            .map(|user_id| self.send_to_user(user_id, payload))
            .buffer_unordered(USER_FANOUT_CONCURRENCY)
            .fold(0, |total, sent| async move { total + sent })
            .await
    }

    fn decorate(&self, payload: &PushPayload) -> PushPayload {
        let mut payload = payload.clone();
        if payload.icon.is_none() {
            payload.icon = self.icon.clone();
        }
        if payload.badge.is_none() {
            payload.badge = self.badge.clone();
        }
        payload
    }
}

impl std::fmt::Debug for PushDelivery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PushDelivery")
            .field("enabled", &self.is_enabled())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use homehunt_core::types::ApartmentId;
    use homehunt_database::InMemoryStore;
    use homehunt_entity::notification::NotificationType;

    /// Scripted gateway: answers per endpoint, succeeds by default.
    #[derive(Default)]
    struct FakeGateway {
        outcomes: HashMap<String, PushDeliveryError>,
        sent: Mutex<Vec<(String, String)>>,
    }

    impl FakeGateway {
        fn failing(endpoint: &str, err: PushDeliveryError) -> Self {
            let mut outcomes = HashMap::new();
            outcomes.insert(endpoint.to_string(), err);
            Self {
                outcomes,
                sent: Mutex::new(Vec::new()),
            }
        }

        fn sent_endpoints(&self) -> Vec<String> {
            self.sent
                .lock()
                .expect("lock")
                .iter()
                .map(|(e, _)| e.clone())
                .collect()
        }
    }

    #[async_trait]
    impl PushGateway for FakeGateway {
        async fn send(
            &self,
            subscription: &PushSubscription,
            payload: &str,
        ) -> Result<(), PushDeliveryError> {
            self.sent
                .lock()
                .expect("lock")
                .push((subscription.endpoint.clone(), payload.to_string()));
            match self.outcomes.get(&subscription.endpoint) {
                Some(err) => Err(err.clone()),
                None => Ok(()),
            }
        }
    }

    fn payload() -> PushPayload {
        PushPayload::new(
            NotificationType::ApartmentCreated,
            ApartmentId::new(),
            "New Apartment Added",
            "Ana added Loft",
        )
    }

    fn delivery(gateway: Arc<FakeGateway>, store: Arc<InMemoryStore>) -> PushDelivery {
        PushDelivery::new(gateway, store.clone(), store).with_assets("/i.png", "/b.png")
    }

    #[tokio::test]
    async fn test_permanent_failure_prunes_only_that_subscription() {
        let store = Arc::new(InMemoryStore::new());
        let gateway = Arc::new(FakeGateway::failing(
            "https://push.example/s1",
            PushDeliveryError::Permanent("410 Gone".into()),
        ));
        let push = delivery(gateway.clone(), store.clone());
        let user = UserId::new();
        push.subscribe(user, "https://push.example/s1", "k1", "a1")
            .await
            .expect("s1");
        push.subscribe(user, "https://push.example/s2", "k2", "a2")
            .await
            .expect("s2");

        let delivered = push.send_to_user(user, &payload()).await;

        assert_eq!(delivered, 1);
        assert_eq!(gateway.sent_endpoints().len(), 2);
        let remaining = store.subscriptions_for_user(user).await.expect("list");
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].endpoint, "https://push.example/s2");
    }

    #[tokio::test]
    async fn test_transient_failure_keeps_subscription() {
        let store = Arc::new(InMemoryStore::new());
        let gateway = Arc::new(FakeGateway::failing(
            "https://push.example/s1",
            PushDeliveryError::Transient("503".into()),
        ));
        let push = delivery(gateway, store.clone());
        let user = UserId::new();
        push.subscribe(user, "https://push.example/s1", "k", "a")
            .await
            .expect("subscribe");

        assert_eq!(push.send_to_user(user, &payload()).await, 0);
        assert_eq!(store.subscriptions_for_user(user).await.expect("list").len(), 1);
    }

    #[tokio::test]
    async fn test_send_to_all_except_skips_excluded_user() {
        let store = Arc::new(InMemoryStore::new());
        let gateway = Arc::new(FakeGateway::default());
        let push = delivery(gateway.clone(), store.clone());
        let (alice, bob) = (UserId::new(), UserId::new());
        for (user, endpoint) in [(alice, "https://push.example/a"), (bob, "https://push.example/b")] {
            store.upsert_user(user, None).await.expect("user");
            push.subscribe(user, endpoint, "k", "a").await.expect("subscribe");
        }

        let delivered = push.send_to_all_except(alice, &payload()).await;

        assert_eq!(delivered, 1);
        assert_eq!(gateway.sent_endpoints(), vec!["https://push.example/b".to_string()]);
    }

    #[tokio::test]
    async fn test_payload_is_decorated_with_assets() {
        let store = Arc::new(InMemoryStore::new());
        let gateway = Arc::new(FakeGateway::default());
        let push = delivery(gateway.clone(), store);
        let user = UserId::new();
        push.subscribe(user, "https://push.example/a", "k", "a")
            .await
            .expect("subscribe");

        push.send_to_user(user, &payload()).await;

        let sent = gateway.sent.lock().expect("lock");
        let body: serde_json::Value = serde_json::from_str(&sent[0].1).expect("json");
        assert_eq!(body["icon"], "/i.png");
        assert_eq!(body["badge"], "/b.png");
        assert_eq!(body["title"], "New Apartment Added");
    }

    #[tokio::test]
    async fn test_disabled_channel_sends_nothing_but_stores_subscriptions() {
        let store = Arc::new(InMemoryStore::new());
        let push = PushDelivery::disabled(store.clone(), store.clone());
        let user = UserId::new();
        push.subscribe(user, "https://push.example/a", "k", "a")
            .await
            .expect("subscribe");

        assert!(!push.is_enabled());
        assert_eq!(push.send_to_user(user, &payload()).await, 0);
        assert!(push.unsubscribe(user, "https://push.example/a").await.expect("unsubscribe"));
    }

    #[test]
    fn test_incomplete_vapid_config_is_rejected() {
        let store = Arc::new(InMemoryStore::new());
        let config = PushConfig {
            enabled: true,
            vapid_public_key: Some("pub".into()),
            ..PushConfig::default()
        };
        let err = PushDelivery::from_config(&config, store.clone(), store).expect_err("incomplete");
        assert_eq!(err.kind, homehunt_core::error::ErrorKind::Configuration);
    }
}
