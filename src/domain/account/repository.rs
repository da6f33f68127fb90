use async_trait::async_trait;

use super::{Account, NewAccount};
use crate::support::errors::DomainResult;

#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Insert a new account. Implementations must reject a second account
    /// with the same normalized email with `DomainError::Conflict`.
    async fn create_account(&self, dto: NewAccount) -> DomainResult<Account>;

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<Account>>;
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Account>>;
}
