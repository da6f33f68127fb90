//! Authentication middleware for Axum
//!
//! Resolves the caller's token into an [`AuthenticatedAccount`] stored in
//! request extensions. The token is read from `Authorization: Bearer <t>`
//! or, failing that, from `x-auth-token`.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::infrastructure::crypto::jwt::{verify_token, JwtConfig, TokenClaims};
use crate::interfaces::http::common::ApiError;
use crate::support::errors::DomainError;

/// Alternate header carrying a bare token
pub const AUTH_TOKEN_HEADER: &str = "x-auth-token";

/// Authentication error types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
}

impl AuthError {
    pub fn message(self) -> &'static str {
        match self {
            AuthError::MissingToken => "No token, authorization denied",
            AuthError::InvalidToken => "Token is not valid",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        ApiError::from(DomainError::Unauthorized(self.message().to_string())).into_response()
    }
}

/// Authentication state containing the JWT config
#[derive(Clone)]
pub struct AuthState {
    pub jwt_config: JwtConfig,
}

/// Account resolved from a verified token
#[derive(Clone, Debug)]
pub struct AuthenticatedAccount {
    pub account_id: String,
}

impl AuthenticatedAccount {
    pub fn from_claims(claims: TokenClaims) -> Self {
        Self {
            account_id: claims.user.id,
        }
    }
}

/// Token from `Authorization: Bearer <t>` (scheme matched in any case),
/// falling back to the `x-auth-token` header.
fn extract_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.split_once(' '))
        .and_then(|(scheme, token)| scheme.eq_ignore_ascii_case("bearer").then_some(token));

    let raw = bearer.or_else(|| {
        headers
            .get(AUTH_TOKEN_HEADER)
            .and_then(|h| h.to_str().ok())
    })?;

    let token = raw.trim();
    (!token.is_empty()).then(|| token.to_string())
}

/// JWT authentication middleware
pub async fn auth_middleware(
    State(auth_state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let Some(token) = extract_token(request.headers()) else {
        return AuthError::MissingToken.into_response();
    };

    match verify_token(&token, &auth_state.jwt_config) {
        Ok(claims) => {
            let account = AuthenticatedAccount::from_claims(claims);
            request.extensions_mut().insert(account);
            next.run(request).await
        }
        Err(e) => {
            debug!("Rejected token: {}", e);
            AuthError::InvalidToken.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_header_wins() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        headers.insert(AUTH_TOKEN_HEADER, HeaderValue::from_static("xyz"));
        assert_eq!(extract_token(&headers).as_deref(), Some("abc"));
    }

    #[test]
    fn bearer_scheme_is_case_insensitive() {
        for value in ["bearer abc", "BEARER abc", "BeArEr abc"] {
            let mut headers = HeaderMap::new();
            headers.insert(header::AUTHORIZATION, HeaderValue::from_static(value));
            assert_eq!(extract_token(&headers).as_deref(), Some("abc"), "{value}");
        }
    }

    #[test]
    fn other_schemes_are_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert!(extract_token(&headers).is_none());
    }

    #[test]
    fn falls_back_to_auth_token_header() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTH_TOKEN_HEADER, HeaderValue::from_static("xyz"));
        assert_eq!(extract_token(&headers).as_deref(), Some("xyz"));
    }

    #[test]
    fn empty_or_absent_is_missing() {
        let mut headers = HeaderMap::new();
        assert!(extract_token(&headers).is_none());

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert!(extract_token(&headers).is_none());
    }
}
