//! Apartment viewing status.

use serde::{Deserialize, Serialize};

/// Where an apartment stands in the hunt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "apartment_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ApartmentStatus {
    /// Spotted but not yet visited.
    #[default]
    Interested,
    /// A viewing is booked.
    Scheduled,
    /// Visited.
    Visited,
    /// Ruled out.
    Rejected,
}
