//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use homehunt_core::types::UserId;

/// A user known to HomeHunt.
///
/// Rows are created the first time the upstream identity proxy presents
/// the user, and refreshed whenever a new display name is seen.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Identity asserted by the upstream proxy.
    pub id: UserId,
    /// Human-readable display name.
    pub display_name: Option<String>,
    /// When the user was first seen.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// The name to show other collaborators.
    pub fn display_label(&self) -> String {
        self.display_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| "Someone".to_string())
    }
}
