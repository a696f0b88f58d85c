//! Favorite entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use homehunt_core::types::{ApartmentId, UserId};

/// A user's favorite mark on an apartment. Keyed by `(user_id, apartment_id)`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    /// The user who favorited.
    pub user_id: UserId,
    /// The favorited apartment.
    pub apartment_id: ApartmentId,
    /// When the favorite was set.
    pub created_at: DateTime<Utc>,
}
