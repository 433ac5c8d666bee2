//! Bearer token extraction and authentication extractors

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::ApiError;

/// The raw bearer credential, if one was presented
///
/// Never rejects: handlers that validate input before authenticating take
/// this and pass it on to the prediction service.
#[derive(Debug, Clone, Default)]
pub struct BearerCredential(pub Option<String>);

impl BearerCredential {
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl<S: Send + Sync> FromRequestParts<S> for BearerCredential {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(BearerCredential(extract_bearer_token(&parts.headers)))
    }
}

/// Extractor that requires a valid access token and yields its subject
#[derive(Debug, Clone)]
pub struct RequireSubject(pub String);

impl FromRequestParts<AppState> for RequireSubject {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(&parts.headers);

        debug!(present = token.is_some(), "Validating access token");

        let subject = state.prediction_service.authenticate(token.as_deref())?;
        Ok(RequireSubject(subject))
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header
///
/// Other schemes, undecodable values and empty tokens count as absent.
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let auth_str = headers.get(header::AUTHORIZATION)?.to_str().ok()?;

    let (scheme, token) = auth_str.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    (!token.is_empty()).then(|| token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, value.parse().unwrap());
        headers
    }

    #[test]
    fn test_extract_bearer_token() {
        let headers = headers_with("Bearer eyJhbGciOiJIUzI1NiJ9.test");
        assert_eq!(
            extract_bearer_token(&headers).as_deref(),
            Some("eyJhbGciOiJIUzI1NiJ9.test")
        );
    }

    #[test]
    fn test_scheme_is_case_insensitive() {
        let headers = headers_with("bearer abc");
        assert_eq!(extract_bearer_token(&headers).as_deref(), Some("abc"));
    }

    #[test]
    fn test_missing_token() {
        assert!(extract_bearer_token(&HeaderMap::new()).is_none());
    }

    #[test]
    fn test_invalid_auth_scheme() {
        assert!(extract_bearer_token(&headers_with("Basic dXNlcjpwYXNz")).is_none());
    }

    #[test]
    fn test_empty_token() {
        assert!(extract_bearer_token(&headers_with("Bearer    ")).is_none());
    }

    #[test]
    fn test_trimmed_token() {
        let headers = headers_with("Bearer   tok-with-spaces   ");
        assert_eq!(
            extract_bearer_token(&headers).as_deref(),
            Some("tok-with-spaces")
        );
    }
}
