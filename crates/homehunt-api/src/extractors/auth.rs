//! `AuthUser` extractor: reads the identity set by the upstream OIDC proxy
//! and injects a request context.

use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::request::Parts;

use homehunt_core::error::AppError;
use homehunt_core::types::UserId;
use homehunt_service::context::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

/// Header carrying the authenticated user's UUID.
pub const USER_ID_HEADER: &str = "x-user-id";
/// Header carrying the user's display name.
pub const USER_NAME_HEADER: &str = "x-user-name";

/// Extracted authenticated user context available in handlers.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl AuthUser {
    /// Returns the inner `RequestContext`.
    pub fn context(&self) -> &RequestContext {
        &self.0
    }
}

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Parse the proxy identity headers.
pub fn identity_from_headers(headers: &HeaderMap) -> Result<(UserId, Option<String>), AppError> {
    let raw = headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::unauthorized("Missing x-user-id header"))?;

    let user_id = raw
        .trim()
        .parse::<UserId>()
        .map_err(|_| AppError::unauthorized("Invalid x-user-id header"))?;

    let name = headers
        .get(USER_NAME_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    Ok((user_id, name))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let (user_id, name) = identity_from_headers(&parts.headers)?;

        // Recorded on every request so names stay fresh for enrichment.
        let user = state
            .user_service
            .ensure_user(user_id, name.as_deref())
            .await?;

        Ok(AuthUser(RequestContext::new(user_id, user.display_label())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::http::HeaderValue;
    use homehunt_core::error::ErrorKind;

    #[test]
    fn test_missing_header_is_unauthorized() {
        let err = identity_from_headers(&HeaderMap::new()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthorized);
    }

    #[test]
    fn test_non_uuid_is_unauthorized() {
        let mut headers = HeaderMap::new();
        headers.insert(USER_ID_HEADER, HeaderValue::from_static("alice"));
        let err = identity_from_headers(&headers).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Unauthorized);
    }

    #[test]
    fn test_reads_id_and_name() {
        let user = UserId::new();
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_ID_HEADER,
            HeaderValue::from_str(&user.to_string()).expect("header"),
        );
        headers.insert(USER_NAME_HEADER, HeaderValue::from_static("Ana"));

        let (id, name) = identity_from_headers(&headers).expect("identity");
        assert_eq!(id, user);
        assert_eq!(name.as_deref(), Some("Ana"));
    }
}
