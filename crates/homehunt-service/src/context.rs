//! Request context carrying the identity presented by the upstream proxy.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use homehunt_core::types::UserId;

/// Context for the current authenticated request.
///
/// Built by the API extractor and passed into service methods so that
/// every operation knows *who* is acting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The acting user's ID.
    pub user_id: UserId,
    /// The acting user's display name, as shown to collaborators.
    pub display_name: String,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(user_id: UserId, display_name: impl Into<String>) -> Self {
        Self {
            user_id,
            display_name: display_name.into(),
            request_time: Utc::now(),
        }
    }
}
