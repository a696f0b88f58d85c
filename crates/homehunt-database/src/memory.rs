//! In-memory implementation of every store trait.
//!
//! Used by tests and by the server when no database URL is configured.
//! All state lives behind one [`RwLock`] so enrichment joins see a
//! consistent snapshot. Notification writes check the same user
//! references the Postgres schema enforces.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use homehunt_core::AppError;
use homehunt_core::result::AppResult;
use homehunt_core::types::{ApartmentId, NotificationId, UserId};
use homehunt_entity::apartment::{Apartment, Comment};
use homehunt_entity::notification::{Notification, NotificationView};
use homehunt_entity::push::PushSubscription;
use homehunt_entity::user::User;

use crate::store::{ApartmentStore, NotificationStore, PushSubscriptionStore, UserStore};

#[derive(Debug, Default)]
struct State {
    users: HashMap<UserId, User>,
    apartments: HashMap<ApartmentId, Apartment>,
    comments: Vec<Comment>,
    favorites: HashSet<(UserId, ApartmentId)>,
    notifications: Vec<Notification>,
    subscriptions: HashMap<String, PushSubscription>,
}

/// Process-local store. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NotificationStore for InMemoryStore {
    async fn insert_notification(&self, notification: &Notification) -> AppResult<Notification> {
        let mut state = self.state.write().await;
        let references = [
            ("user_id", notification.user_id),
            ("actor_id", notification.actor_id),
        ];
        for (column, user_id) in references {
            if !state.users.contains_key(&user_id) {
                return Err(AppError::database(format!(
                    "notifications.{column} references unknown user {user_id}"
                )));
            }
        }
        state.notifications.push(notification.clone());
        Ok(notification.clone())
    }

    async fn notifications_for_user(&self, user_id: UserId) -> AppResult<Vec<NotificationView>> {
        let state = self.state.read().await;
        // Reverse first so equal timestamps keep newest-inserted first after the stable sort.
        let mut views: Vec<NotificationView> = state
            .notifications
            .iter()
            .rev()
            .filter(|n| n.user_id == user_id)
            .map(|n| {
                let actor_name = state
                    .users
                    .get(&n.actor_id)
                    .and_then(|u| u.display_name.clone());
                let apartment_label = state
                    .apartments
                    .get(&n.apartment_id)
                    .map(|a| a.label.clone());
                NotificationView::from_parts(n.clone(), actor_name, apartment_label)
            })
            .collect();
        views.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(views)
    }

    async fn mark_read(&self, id: NotificationId, user_id: UserId) -> AppResult<bool> {
        let mut state = self.state.write().await;
        match state
            .notifications
            .iter_mut()
            .find(|n| n.id == id && n.user_id == user_id)
        {
            Some(n) => {
                n.is_read = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn mark_all_read(&self, user_id: UserId) -> AppResult<u64> {
        let mut state = self.state.write().await;
        let mut changed = 0;
        for n in state
            .notifications
            .iter_mut()
            .filter(|n| n.user_id == user_id && !n.is_read)
        {
            n.is_read = true;
            changed += 1;
        }
        Ok(changed)
    }

    async fn count_unread(&self, user_id: UserId) -> AppResult<i64> {
        let state = self.state.read().await;
        Ok(state
            .notifications
            .iter()
            .filter(|n| n.user_id == user_id && !n.is_read)
            .count() as i64)
    }
}

#[async_trait]
impl PushSubscriptionStore for InMemoryStore {
    async fn upsert_subscription(
        &self,
        subscription: &PushSubscription,
    ) -> AppResult<PushSubscription> {
        let mut state = self.state.write().await;
        let stored = match state.subscriptions.get_mut(&subscription.endpoint) {
            Some(existing) => {
                existing.user_id = subscription.user_id;
                existing.p256dh = subscription.p256dh.clone();
                existing.auth = subscription.auth.clone();
                existing.clone()
            }
            None => {
                state
                    .subscriptions
                    .insert(subscription.endpoint.clone(), subscription.clone());
                subscription.clone()
            }
        };
        Ok(stored)
    }

    async fn subscriptions_for_user(&self, user_id: UserId) -> AppResult<Vec<PushSubscription>> {
        let state = self.state.read().await;
        let mut subs: Vec<PushSubscription> = state
            .subscriptions
            .values()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        subs.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(subs)
    }

    async fn delete_by_endpoint(&self, endpoint: &str) -> AppResult<bool> {
        let mut state = self.state.write().await;
        Ok(state.subscriptions.remove(endpoint).is_some())
    }

    async fn delete_for_user(&self, user_id: UserId, endpoint: &str) -> AppResult<bool> {
        let mut state = self.state.write().await;
        let owned = state
            .subscriptions
            .get(endpoint)
            .is_some_and(|s| s.user_id == user_id);
        if owned {
            state.subscriptions.remove(endpoint);
        }
        Ok(owned)
    }
}

#[async_trait]
impl ApartmentStore for InMemoryStore {
    async fn insert_apartment(&self, apartment: &Apartment) -> AppResult<Apartment> {
        let mut state = self.state.write().await;
        state.apartments.insert(apartment.id, apartment.clone());
        Ok(apartment.clone())
    }

    async fn find_apartment(&self, id: ApartmentId) -> AppResult<Option<Apartment>> {
        Ok(self.state.read().await.apartments.get(&id).cloned())
    }

    async fn list_apartments(&self) -> AppResult<Vec<Apartment>> {
        let state = self.state.read().await;
        let mut apartments: Vec<Apartment> = state.apartments.values().cloned().collect();
        apartments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(apartments)
    }

    async fn insert_comment(&self, comment: &Comment) -> AppResult<Comment> {
        let mut state = self.state.write().await;
        state.comments.push(comment.clone());
        Ok(comment.clone())
    }

    async fn toggle_favorite(&self, user_id: UserId, apartment_id: ApartmentId) -> AppResult<bool> {
        let mut state = self.state.write().await;
        let key = (user_id, apartment_id);
        if state.favorites.remove(&key) {
            Ok(false)
        } else {
            state.favorites.insert(key);
            Ok(true)
        }
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn upsert_user(&self, id: UserId, display_name: Option<&str>) -> AppResult<User> {
        let mut state = self.state.write().await;
        let user = state.users.entry(id).or_insert_with(|| User {
            id,
            display_name: None,
            created_at: Utc::now(),
        });
        if let Some(name) = display_name {
            user.display_name = Some(name.to_string());
        }
        Ok(user.clone())
    }

    async fn find_user(&self, id: UserId) -> AppResult<Option<User>> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn list_user_ids(&self) -> AppResult<Vec<UserId>> {
        Ok(self.state.read().await.users.keys().copied().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use homehunt_core::error::ErrorKind;
    use homehunt_entity::notification::NotificationType;

    async fn users(store: &InMemoryStore, n: usize) -> Vec<UserId> {
        let mut ids = Vec::with_capacity(n);
        for _ in 0..n {
            let id = UserId::new();
            store.upsert_user(id, None).await.expect("user");
            ids.push(id);
        }
        ids
    }

    fn notification(user: UserId, actor: UserId, apartment: ApartmentId) -> Notification {
        Notification::new(
            user,
            actor,
            apartment,
            NotificationType::ApartmentCreated,
            "New Apartment Added",
            "Ana added Loft",
        )
    }

    #[tokio::test]
    async fn test_list_is_newest_first_and_enriched() {
        let store = InMemoryStore::new();
        let ids = users(&store, 2).await;
        let (alice, bob) = (ids[0], ids[1]);
        store.upsert_user(bob, Some("Bob")).await.expect("user");
        let apt = Apartment::new(bob, "Loft", None, 48.85, 2.35);
        store.insert_apartment(&apt).await.expect("apartment");

        let first = notification(alice, bob, apt.id);
        let second = notification(alice, bob, apt.id);
        store.insert_notification(&first).await.expect("insert");
        store.insert_notification(&second).await.expect("insert");

        let views = store.notifications_for_user(alice).await.expect("list");
        assert_eq!(views.len(), 2);
        assert_eq!(views[0].id, second.id);
        assert_eq!(views[0].actor_name.as_deref(), Some("Bob"));
        assert_eq!(views[0].apartment_label.as_deref(), Some("Loft"));
    }

    #[tokio::test]
    async fn test_mark_read_is_scoped_to_owner() {
        let store = InMemoryStore::new();
        let ids = users(&store, 3).await;
        let (alice, mallory) = (ids[0], ids[1]);
        let n = notification(alice, ids[2], ApartmentId::new());
        store.insert_notification(&n).await.expect("insert");

        assert!(!store.mark_read(n.id, mallory).await.expect("mark"));
        assert_eq!(store.count_unread(alice).await.expect("count"), 1);

        assert!(store.mark_read(n.id, alice).await.expect("mark"));
        assert!(store.mark_read(n.id, alice).await.expect("mark again"));
        assert_eq!(store.count_unread(alice).await.expect("count"), 0);
    }

    #[tokio::test]
    async fn test_mark_all_read_counts_only_unread() {
        let store = InMemoryStore::new();
        let ids = users(&store, 2).await;
        let (alice, actor) = (ids[0], ids[1]);
        for _ in 0..3 {
            let n = notification(alice, actor, ApartmentId::new());
            store.insert_notification(&n).await.expect("insert");
        }
        assert_eq!(store.mark_all_read(alice).await.expect("all"), 3);
        assert_eq!(store.mark_all_read(alice).await.expect("all again"), 0);
    }

    #[tokio::test]
    async fn test_insert_notification_requires_known_users() {
        let store = InMemoryStore::new();
        let known = users(&store, 1).await[0];
        let stranger = UserId::new();

        let err = store
            .insert_notification(&notification(stranger, known, ApartmentId::new()))
            .await
            .expect_err("unknown recipient");
        assert_eq!(err.kind, ErrorKind::Database);
        let err = store
            .insert_notification(&notification(known, stranger, ApartmentId::new()))
            .await
            .expect_err("unknown actor");
        assert_eq!(err.kind, ErrorKind::Database);
        assert_eq!(store.count_unread(known).await.expect("count"), 0);

        store.upsert_user(stranger, None).await.expect("user");
        store
            .insert_notification(&notification(stranger, known, ApartmentId::new()))
            .await
            .expect("insert once the user exists");
    }

    #[tokio::test]
    async fn test_upsert_subscription_reassigns_endpoint() {
        let store = InMemoryStore::new();
        let (alice, bob) = (UserId::new(), UserId::new());
        let endpoint = "https://push.example/abc";
        store
            .upsert_subscription(&PushSubscription::new(alice, endpoint, "k1", "a1"))
            .await
            .expect("subscribe");
        store
            .upsert_subscription(&PushSubscription::new(bob, endpoint, "k2", "a2"))
            .await
            .expect("resubscribe");

        assert!(store.subscriptions_for_user(alice).await.expect("list").is_empty());
        let bobs = store.subscriptions_for_user(bob).await.expect("list");
        assert_eq!(bobs.len(), 1);
        assert_eq!(bobs[0].p256dh, "k2");
    }

    #[tokio::test]
    async fn test_delete_for_user_requires_ownership() {
        let store = InMemoryStore::new();
        let (alice, bob) = (UserId::new(), UserId::new());
        let endpoint = "https://push.example/xyz";
        store
            .upsert_subscription(&PushSubscription::new(alice, endpoint, "k", "a"))
            .await
            .expect("subscribe");

        assert!(!store.delete_for_user(bob, endpoint).await.expect("delete"));
        assert!(store.delete_for_user(alice, endpoint).await.expect("delete"));
        assert!(!store.delete_by_endpoint(endpoint).await.expect("delete"));
    }

    #[tokio::test]
    async fn test_toggle_favorite_alternates() {
        let store = InMemoryStore::new();
        let (user, apt) = (UserId::new(), ApartmentId::new());
        assert!(store.toggle_favorite(user, apt).await.expect("toggle"));
        assert!(!store.toggle_favorite(user, apt).await.expect("toggle"));
        assert!(store.toggle_favorite(user, apt).await.expect("toggle"));
    }

    #[tokio::test]
    async fn test_upsert_user_keeps_name_when_none_given() {
        let store = InMemoryStore::new();
        let id = UserId::new();
        store.upsert_user(id, Some("Ana")).await.expect("upsert");
        let user = store.upsert_user(id, None).await.expect("upsert");
        assert_eq!(user.display_name.as_deref(), Some("Ana"));
        assert_eq!(store.list_user_ids().await.expect("ids"), vec![id]);
    }
}
