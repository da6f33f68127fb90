//! JWT Token handling
//!
//! Tokens carry `{"user": {"id": ...}}` plus the standard `iat`/`exp`
//! claims and are signed with HS256 using a process-wide secret.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Default lifetime: 5 days
pub const DEFAULT_EXPIRATION_HOURS: i64 = 5 * 24;

/// JWT configuration
#[derive(Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens
    pub secret: String,
    /// Token expiration time in hours
    pub expiration_hours: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: std::env::var("JWT_SECRET")
                .unwrap_or_else(|_| "change-me-in-production".to_string()),
            expiration_hours: DEFAULT_EXPIRATION_HOURS,
        }
    }
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("expiration_hours", &self.expiration_hours)
            .finish()
    }
}

/// The `user` object embedded in every token
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TokenUser {
    pub id: String,
}

/// JWT claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TokenClaims {
    pub user: TokenUser,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
}

impl TokenClaims {
    pub fn new(account_id: &str, config: &JwtConfig) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(config.expiration_hours);

        Self {
            user: TokenUser {
                id: account_id.to_string(),
            },
            exp: exp.timestamp(),
            iat: now.timestamp(),
        }
    }

    pub fn account_id(&self) -> &str {
        &self.user.id
    }
}

/// Create a signed JWT for an account
pub fn create_token(
    account_id: &str,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = TokenClaims::new(account_id, config);

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Verify signature and expiry, then decode the claims
pub fn verify_token(
    token: &str,
    config: &JwtConfig,
) -> Result<TokenClaims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::default();
    validation.leeway = 0;

    let token_data = decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secret: &str) -> JwtConfig {
        JwtConfig {
            secret: secret.to_string(),
            expiration_hours: DEFAULT_EXPIRATION_HOURS,
        }
    }

    #[test]
    fn test_create_and_verify_token() {
        let config = config("test-secret");
        let token = create_token("account-123", &config).unwrap();

        let claims = verify_token(&token, &config).unwrap();
        assert_eq!(claims.account_id(), "account-123");
        assert_eq!(claims.exp - claims.iat, 5 * 24 * 3600);
    }

    #[test]
    fn test_payload_shape() {
        let claims = TokenClaims::new("abc", &config("s"));
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["user"]["id"], "abc");
    }

    #[test]
    fn test_invalid_token() {
        let result = verify_token("invalid-token", &config("test-secret"));
        assert!(result.is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = create_token("account-123", &config("one")).unwrap();
        assert!(verify_token(&token, &config("two")).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let expired = JwtConfig {
            secret: "test-secret".to_string(),
            expiration_hours: -1,
        };
        let token = create_token("account-123", &expired).unwrap();
        assert!(verify_token(&token, &expired).is_err());
    }
}
