//! Apartment entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use homehunt_core::types::{ApartmentId, UserId};

use super::status::ApartmentStatus;

/// An apartment listing pinned on the shared map.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Apartment {
    /// Unique apartment identifier.
    pub id: ApartmentId,
    /// The user who added the listing.
    pub owner_id: UserId,
    /// Short human label, used in notification text.
    pub label: String,
    /// Free-form street address.
    pub address: Option<String>,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Viewing status.
    pub status: ApartmentStatus,
    /// When the listing was added.
    pub created_at: DateTime<Utc>,
}

impl Apartment {
    /// Build a new listing with the default status.
    pub fn new(
        owner_id: UserId,
        label: impl Into<String>,
        address: Option<String>,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Self {
            id: ApartmentId::new(),
            owner_id,
            label: label.into(),
            address,
            latitude,
            longitude,
            status: ApartmentStatus::default(),
            created_at: Utc::now(),
        }
    }
}
