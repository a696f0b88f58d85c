//! Delivery failure taxonomy for browser push.

use thiserror::Error;

/// Failure reported by a push provider for a single subscription.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PushDeliveryError {
    /// The provider hiccupped; the subscription may work next time.
    #[error("transient push failure: {0}")]
    Transient(String),
    /// The provider says the endpoint is gone and will never accept deliveries.
    #[error("permanent push failure: {0}")]
    Permanent(String),
}

impl PushDeliveryError {
    /// Whether the subscription should be pruned.
    pub fn is_permanent(&self) -> bool {
        matches!(self, Self::Permanent(_))
    }
}
