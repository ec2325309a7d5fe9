//! Bearer token identity extraction
//!
//! A missing header or an unknown token both mean "no identity". Only a
//! failing lookup is an error.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::{AUTHORIZATION, HeaderMap};
use axum::http::request::Parts;
use std::sync::Arc;
use storedesk_core::domain::identity::User;

use crate::error::ServerError;
use crate::state::AppState;

/// The caller, if the request carries a token owned by an active user
#[derive(Debug)]
pub struct MaybeIdentity(pub Option<User>);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for MaybeIdentity {
    type Rejection = ServerError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        resolve_identity(state, &parts.headers)
            .await
            .map(MaybeIdentity)
    }
}

/// Resolve the bearer token in `headers` to a user
pub async fn resolve_identity(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<Option<User>, ServerError> {
    let Some(token) = extract_bearer_token(headers) else {
        return Ok(None);
    };

    let user = state.identities.resolve(&token).await?;
    if user.is_none() {
        tracing::debug!("Bearer token did not resolve to a user");
    }
    Ok(user)
}

/// Extract bearer token with HTTP-standard tolerance:
/// - Case-insensitive scheme ("Bearer", "bearer", "BEARER")
/// - Trim leading/trailing whitespace from header and token
pub(crate) fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let auth = headers.get(AUTHORIZATION)?.to_str().ok()?.trim();
    let scheme = auth.get(..7)?;
    if !scheme.eq_ignore_ascii_case("bearer ") {
        return None;
    }
    let token = auth[7..].trim();
    (!token.is_empty()).then(|| token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token(&headers("Bearer abc")), Some("abc".into()));
        assert_eq!(extract_bearer_token(&headers("bearer  abc ")), Some("abc".into()));
        assert_eq!(extract_bearer_token(&headers("BEARER abc")), Some("abc".into()));
    }

    #[test]
    fn test_extract_bearer_token_rejects_other_forms() {
        assert_eq!(extract_bearer_token(&HeaderMap::new()), None);
        assert_eq!(extract_bearer_token(&headers("Basic dXNlcjpwYXNz")), None);
        assert_eq!(extract_bearer_token(&headers("Bearer")), None);
        assert_eq!(extract_bearer_token(&headers("Bearer    ")), None);
    }
}
