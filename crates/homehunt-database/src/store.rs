//! Storage traits the notification core is written against.
//!
//! Each trait has a PostgreSQL implementation in [`crate::repositories`]
//! and a shared in-memory implementation in [`crate::memory`].

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;

use homehunt_core::result::AppResult;
use homehunt_core::types::{ApartmentId, NotificationId, UserId};
use homehunt_entity::apartment::{Apartment, Comment};
use homehunt_entity::notification::{Notification, NotificationView};
use homehunt_entity::push::PushSubscription;
use homehunt_entity::user::User;

use crate::memory::InMemoryStore;
use crate::repositories::{
    ApartmentRepository, NotificationRepository, PushSubscriptionRepository, UserRepository,
};

/// Persistence for notification records.
#[async_trait]
pub trait NotificationStore: Send + Sync + 'static {
    /// Persist a new notification and return the stored row.
    async fn insert_notification(&self, notification: &Notification) -> AppResult<Notification>;

    /// All notifications addressed to `user_id`, newest first, enriched
    /// with the actor's display name and the apartment's label.
    async fn notifications_for_user(&self, user_id: UserId) -> AppResult<Vec<NotificationView>>;

    /// Set the read flag on the notification matching both `id` and
    /// `user_id`. Returns whether a row matched.
    async fn mark_read(&self, id: NotificationId, user_id: UserId) -> AppResult<bool>;

    /// Set the read flag on every unread notification of `user_id`.
    /// Returns the number of rows changed.
    async fn mark_all_read(&self, user_id: UserId) -> AppResult<u64>;

    /// Number of unread notifications of `user_id`.
    async fn count_unread(&self, user_id: UserId) -> AppResult<i64>;
}

/// Persistence for browser push subscriptions.
#[async_trait]
pub trait PushSubscriptionStore: Send + Sync + 'static {
    /// Insert a subscription, or update owner and keys of the row that
    /// already holds the same endpoint.
    async fn upsert_subscription(&self, subscription: &PushSubscription)
    -> AppResult<PushSubscription>;

    /// Every subscription owned by `user_id`.
    async fn subscriptions_for_user(&self, user_id: UserId) -> AppResult<Vec<PushSubscription>>;

    /// Remove the subscription with `endpoint`, whoever owns it.
    async fn delete_by_endpoint(&self, endpoint: &str) -> AppResult<bool>;

    /// Remove the subscription with `endpoint` only if `user_id` owns it.
    async fn delete_for_user(&self, user_id: UserId, endpoint: &str) -> AppResult<bool>;
}

/// Persistence for the apartment write path.
#[async_trait]
pub trait ApartmentStore: Send + Sync + 'static {
    /// Persist a new apartment.
    async fn insert_apartment(&self, apartment: &Apartment) -> AppResult<Apartment>;

    /// Look up an apartment.
    async fn find_apartment(&self, id: ApartmentId) -> AppResult<Option<Apartment>>;

    /// Every apartment, newest first.
    async fn list_apartments(&self) -> AppResult<Vec<Apartment>>;

    /// Persist a new comment.
    async fn insert_comment(&self, comment: &Comment) -> AppResult<Comment>;

    /// Flip the favorite mark of `user_id` on `apartment_id`. Returns
    /// `true` when the favorite now exists.
    async fn toggle_favorite(&self, user_id: UserId, apartment_id: ApartmentId) -> AppResult<bool>;
}

/// Persistence for users known through the identity proxy.
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    /// Create the user if unknown; refresh the display name when one is given.
    async fn upsert_user(&self, id: UserId, display_name: Option<&str>) -> AppResult<User>;

    /// Look up a user.
    async fn find_user(&self, id: UserId) -> AppResult<Option<User>>;

    /// Ids of every known user.
    async fn list_user_ids(&self) -> AppResult<Vec<UserId>>;
}

/// The full set of stores, shared by services.
#[derive(Clone)]
pub struct Stores {
    /// Notification records.
    pub notifications: Arc<dyn NotificationStore>,
    /// Push subscriptions.
    pub push_subscriptions: Arc<dyn PushSubscriptionStore>,
    /// Apartments, comments and favorites.
    pub apartments: Arc<dyn ApartmentStore>,
    /// Users.
    pub users: Arc<dyn UserStore>,
}

impl Stores {
    /// Stores backed by PostgreSQL.
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            notifications: Arc::new(NotificationRepository::new(pool.clone())),
            push_subscriptions: Arc::new(PushSubscriptionRepository::new(pool.clone())),
            apartments: Arc::new(ApartmentRepository::new(pool.clone())),
            users: Arc::new(UserRepository::new(pool)),
        }
    }

    /// Stores backed by a single shared in-memory state.
    pub fn in_memory() -> Self {
        Self::from_memory(Arc::new(InMemoryStore::new()))
    }

    /// Stores backed by the given in-memory state, so tests can inspect it.
    pub fn from_memory(store: Arc<InMemoryStore>) -> Self {
        Self {
            notifications: store.clone(),
            push_subscriptions: store.clone(),
            apartments: store.clone(),
            users: store,
        }
    }
}

impl std::fmt::Debug for Stores {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stores").finish_non_exhaustive()
    }
}
