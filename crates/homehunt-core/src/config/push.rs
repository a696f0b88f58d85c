//! Web Push (VAPID) configuration.

use serde::{Deserialize, Serialize};

/// Browser push delivery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushConfig {
    /// Whether push delivery runs at all.
    #[serde(default)]
    pub enabled: bool,
    /// Base64url (no padding) VAPID private key.
    #[serde(default)]
    pub vapid_private_key: Option<String>,
    /// Base64url (no padding) VAPID public key, handed to browsers.
    #[serde(default)]
    pub vapid_public_key: Option<String>,
    /// Contact URI placed in the VAPID `sub` claim.
    #[serde(default)]
    pub vapid_subject: Option<String>,
    /// Icon shown by the service worker.
    #[serde(default = "default_icon")]
    pub icon: String,
    /// Badge shown by the service worker.
    #[serde(default = "default_badge")]
    pub badge: String,
    /// Time-to-live for queued pushes, in seconds.
    #[serde(default = "default_ttl")]
    pub ttl_seconds: u32,
}

/// Resolved VAPID credentials.
#[derive(Debug, Clone)]
pub struct VapidConfig {
    /// Private signing key.
    pub private_key: String,
    /// Public application server key.
    pub public_key: String,
    /// `sub` claim.
    pub subject: String,
}

/// Outcome of inspecting the VAPID settings.
#[derive(Debug, Clone)]
pub enum VapidConfigStatus {
    /// None of the keys were set.
    Missing,
    /// Some, but not all, keys were set.
    Incomplete,
    /// Everything needed to sign pushes is present.
    Ready(VapidConfig),
}

impl PushConfig {
    /// Resolves the VAPID credentials.
    pub fn vapid(&self) -> VapidConfigStatus {
        let private_key = non_empty(&self.vapid_private_key);
        let public_key = non_empty(&self.vapid_public_key);
        let subject = non_empty(&self.vapid_subject);
        let has_any = private_key.is_some() || public_key.is_some() || subject.is_some();

        match (private_key, public_key, subject) {
            (Some(private_key), Some(public_key), Some(subject)) => {
                VapidConfigStatus::Ready(VapidConfig {
                    private_key: private_key.to_string(),
                    public_key: public_key.to_string(),
                    subject: subject.to_string(),
                })
            }
            _ if has_any => VapidConfigStatus::Incomplete,
            _ => VapidConfigStatus::Missing,
        }
    }
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            vapid_private_key: None,
            vapid_public_key: None,
            vapid_subject: None,
            icon: default_icon(),
            badge: default_badge(),
            ttl_seconds: default_ttl(),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn default_icon() -> String {
    "/icons/icon-192.png".to_string()
}

fn default_badge() -> String {
    "/icons/badge-72.png".to_string()
}

fn default_ttl() -> u32 {
    86_400
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vapid_missing_when_nothing_set() {
        let config = PushConfig::default();
        assert!(matches!(config.vapid(), VapidConfigStatus::Missing));
    }

    #[test]
    fn test_vapid_incomplete_when_partially_set() {
        let config = PushConfig {
            vapid_private_key: Some("private".to_string()),
            vapid_subject: Some("   ".to_string()),
            ..PushConfig::default()
        };
        assert!(matches!(config.vapid(), VapidConfigStatus::Incomplete));
    }

    #[test]
    fn test_vapid_ready_when_all_set() {
        let config = PushConfig {
            vapid_private_key: Some("private".to_string()),
            vapid_public_key: Some("public".to_string()),
            vapid_subject: Some("mailto:ops@example.com".to_string()),
            ..PushConfig::default()
        };
        match config.vapid() {
            VapidConfigStatus::Ready(vapid) => {
                assert_eq!(vapid.public_key, "public");
                assert_eq!(vapid.subject, "mailto:ops@example.com");
            }
            other => panic!("expected ready, got {other:?}"),
        }
    }
}
