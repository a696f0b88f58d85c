//! Validated inputs for the apartment write path.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// A new apartment listing.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateApartment {
    /// Short human label.
    #[validate(length(min = 1, max = 200))]
    pub label: String,
    /// Optional street address.
    #[validate(length(max = 500))]
    #[serde(default)]
    pub address: Option<String>,
    /// Latitude in degrees.
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    /// Longitude in degrees.
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
}

/// A new comment on an apartment.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateComment {
    /// Comment text.
    #[validate(length(min = 1, max = 5000))]
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinates_out_of_range_are_rejected() {
        let input = CreateApartment {
            label: "Loft".into(),
            address: None,
            latitude: 91.0,
            longitude: 0.0,
        };
        assert!(input.validate().is_err());

        let input = CreateApartment {
            latitude: -90.0,
            longitude: 180.0,
            ..input
        };
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_empty_comment_is_rejected() {
        let input = CreateComment { body: String::new() };
        assert!(input.validate().is_err());
    }
}
