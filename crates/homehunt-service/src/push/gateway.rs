//! Push provider gateway.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use homehunt_core::config::VapidConfig;
use homehunt_core::error::{AppError, ErrorKind};
use homehunt_core::push::PushDeliveryError;
use homehunt_entity::push::PushSubscription;

/// Delivers one encrypted payload to one subscription.
#[async_trait]
pub trait PushGateway: Send + Sync + 'static {
    /// Send `payload` (JSON text) to `subscription`.
    async fn send(
        &self,
        subscription: &PushSubscription,
        payload: &str,
    ) -> Result<(), PushDeliveryError>;
}

/// [`PushGateway`] backed by the `web-push` crate: VAPID-signed,
/// `aes128gcm`-encrypted.
#[derive(Clone)]
pub struct WebPushGateway {
    vapid: VapidConfig,
    ttl_seconds: u32,
    client: Arc<web_push::WebPushClient>,
}

impl WebPushGateway {
    /// Create a gateway signing with `vapid`.
    pub fn new(vapid: VapidConfig, ttl_seconds: u32) -> Result<Self, AppError> {
        let client = web_push::WebPushClient::new().map_err(|e| {
            AppError::with_source(
                ErrorKind::ExternalService,
                "Failed to create web push client",
                e,
            )
        })?;
        Ok(Self {
            vapid,
            ttl_seconds,
            client: Arc::new(client),
        })
    }

    async fn deliver(
        &self,
        subscription: &PushSubscription,
        payload: &str,
    ) -> Result<(), web_push::WebPushError> {
        let subscription_info = web_push::SubscriptionInfo::new(
            subscription.endpoint.clone(),
            subscription.p256dh.clone(),
            subscription.auth.clone(),
        );
        let mut builder = web_push::WebPushMessageBuilder::new(&subscription_info)?;
        builder.set_payload(web_push::ContentEncoding::Aes128Gcm, payload.as_bytes());
        builder.set_ttl(self.ttl_seconds);
        let mut signature_builder = web_push::VapidSignatureBuilder::from_base64(
            &self.vapid.private_key,
            web_push::URL_SAFE_NO_PAD,
            &subscription_info,
        )?;
        signature_builder.add_claim("sub", self.vapid.subject.as_str());
        builder.set_vapid_signature(signature_builder.build()?);
        self.client.send(builder.build()?).await
    }
}

#[async_trait]
impl PushGateway for WebPushGateway {
    async fn send(
        &self,
        subscription: &PushSubscription,
        payload: &str,
    ) -> Result<(), PushDeliveryError> {
        self.deliver(subscription, payload).await.map_err(classify)?;
        debug!(endpoint = %subscription.endpoint, "Push delivered");
        Ok(())
    }
}

impl std::fmt::Debug for WebPushGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebPushGateway")
            .field("subject", &self.vapid.subject)
            .field("ttl_seconds", &self.ttl_seconds)
            .finish_non_exhaustive()
    }
}

/// 404 and 410 from the provider mean the endpoint is gone for good.
fn classify(err: web_push::WebPushError) -> PushDeliveryError {
    match err {
        web_push::WebPushError::EndpointNotValid { .. }
        | web_push::WebPushError::EndpointNotFound { .. } => {
            PushDeliveryError::Permanent(err.to_string())
        }
        other => PushDeliveryError::Transient(other.to_string()),
    }
}
