//! Account service — application-layer orchestration
//!
//! HTTP handlers are thin wrappers that delegate to this service. Input
//! shape is validated before it gets here.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::{Account, AccountRepository, NewAccount};
use crate::infrastructure::crypto::jwt::{create_token, JwtConfig};
use crate::infrastructure::crypto::password::{hash_password, verify_password};
use crate::support::errors::{DomainError, DomainResult, InfraError};

/// Signed credential handed back after registration or login
#[derive(Debug, Clone)]
pub struct AuthToken {
    pub token: String,
}

/// Account service — orchestrates the identity use-cases.
pub struct AccountService {
    repo: Arc<dyn AccountRepository>,
    jwt_config: JwtConfig,
    bcrypt_cost: u32,
}

impl AccountService {
    pub fn new(repo: Arc<dyn AccountRepository>, jwt_config: JwtConfig, bcrypt_cost: u32) -> Self {
        Self {
            repo,
            jwt_config,
            bcrypt_cost,
        }
    }

    pub fn jwt_config(&self) -> &JwtConfig {
        &self.jwt_config
    }

    // ── Registration ────────────────────────────────────────────

    /// Create an account and return a token for it.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> DomainResult<AuthToken> {
        if self.repo.find_by_email(email).await?.is_some() {
            return Err(DomainError::account_exists());
        }

        let password_hash = self.hash(password).await?;

        // A concurrent registration can still win between the lookup and
        // here; the repository reports that as the same conflict.
        let account = self
            .repo
            .create_account(NewAccount {
                name: name.to_string(),
                email: email.to_string(),
                password_hash,
            })
            .await?;

        info!(account_id = %account.id, "New account registered");
        self.issue(&account)
    }

    // ── Authentication ──────────────────────────────────────────

    /// Authenticate by email + password and return a token.
    ///
    /// An unknown email and a wrong password produce the same error.
    pub async fn login(&self, email: &str, password: &str) -> DomainResult<AuthToken> {
        let Some(account) = self.repo.find_by_email(email).await? else {
            return Err(DomainError::InvalidCredentials);
        };

        if !self.verify(password, &account).await? {
            return Err(DomainError::InvalidCredentials);
        }

        info!(account_id = %account.id, "Account logged in");
        self.issue(&account)
    }

    // ── Queries ─────────────────────────────────────────────────

    pub async fn get_profile(&self, account_id: &str) -> DomainResult<Account> {
        self.repo
            .find_by_id(account_id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity: "User",
                field: "id",
                value: account_id.to_string(),
            })
    }

    // ── Helpers ─────────────────────────────────────────────────

    fn issue(&self, account: &Account) -> DomainResult<AuthToken> {
        let token = create_token(&account.id, &self.jwt_config).map_err(InfraError::from)?;
        Ok(AuthToken { token })
    }

    async fn hash(&self, password: &str) -> DomainResult<String> {
        let password = password.to_owned();
        let cost = self.bcrypt_cost;
        let hashed = tokio::task::spawn_blocking(move || hash_password(&password, cost))
            .await
            .map_err(DomainError::internal)?
            .map_err(InfraError::from)?;
        Ok(hashed)
    }

    async fn verify(&self, password: &str, account: &Account) -> DomainResult<bool> {
        let password = password.to_owned();
        let hash = account.password_hash.clone();
        let result = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
            .await
            .map_err(DomainError::internal)?;

        Ok(match result {
            Ok(valid) => valid,
            Err(e) => {
                warn!(account_id = %account.id, "Stored password hash unusable: {}", e);
                false
            }
        })
    }
}
