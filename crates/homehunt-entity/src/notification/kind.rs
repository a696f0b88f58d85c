//! Notification type enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The collaborative event a notification reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "notification_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    /// A collaborator added an apartment.
    ApartmentCreated,
    /// A collaborator commented on an apartment.
    CommentCreated,
    /// A collaborator favorited an apartment.
    FavoriteCreated,
}

impl NotificationType {
    /// Return the type as its wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ApartmentCreated => "apartment_created",
            Self::CommentCreated => "comment_created",
            Self::FavoriteCreated => "favorite_created",
        }
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for NotificationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "apartment_created" => Ok(Self::ApartmentCreated),
            "comment_created" => Ok(Self::CommentCreated),
            "favorite_created" => Ok(Self::FavoriteCreated),
            _ => Err(format!("Unknown notification type: '{s}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_matches_as_str() {
        for kind in [
            NotificationType::ApartmentCreated,
            NotificationType::CommentCreated,
            NotificationType::FavoriteCreated,
        ] {
            let json = serde_json::to_string(&kind).expect("serialize");
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
            assert_eq!(kind.as_str().parse::<NotificationType>(), Ok(kind));
        }
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        assert!("deleted".parse::<NotificationType>().is_err());
    }
}
