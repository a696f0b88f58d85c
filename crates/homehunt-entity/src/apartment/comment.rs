//! Comment entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use homehunt_core::types::{ApartmentId, CommentId, UserId};

/// A comment left on an apartment.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Unique comment identifier.
    pub id: CommentId,
    /// The apartment commented on.
    pub apartment_id: ApartmentId,
    /// The comment author.
    pub author_id: UserId,
    /// Comment text.
    pub body: String,
    /// When the comment was posted.
    pub created_at: DateTime<Utc>,
}

impl Comment {
    /// Build a new comment.
    pub fn new(apartment_id: ApartmentId, author_id: UserId, body: impl Into<String>) -> Self {
        Self {
            id: CommentId::new(),
            apartment_id,
            author_id,
            body: body.into(),
            created_at: Utc::now(),
        }
    }
}
