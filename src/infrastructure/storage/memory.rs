//! In-memory account repository

use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::domain::{normalize_email, Account, AccountRepository, NewAccount};
use crate::support::errors::{DomainError, DomainResult};

/// In-memory storage for development and testing.
///
/// Accounts are keyed by normalized email; a secondary map resolves ids.
#[derive(Default)]
pub struct InMemoryAccountRepository {
    by_email: DashMap<String, Account>,
    email_by_id: DashMap<String, String>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.by_email.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_email.is_empty()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn create_account(&self, dto: NewAccount) -> DomainResult<Account> {
        let email = normalize_email(&dto.email);

        // The entry guard holds the shard lock, so check-and-insert is atomic.
        let account = match self.by_email.entry(email.clone()) {
            Entry::Occupied(_) => return Err(DomainError::account_exists()),
            Entry::Vacant(slot) => {
                let account = Account {
                    id: uuid::Uuid::new_v4().to_string(),
                    name: dto.name,
                    email,
                    password_hash: dto.password_hash,
                    created_at: Utc::now(),
                };
                slot.insert(account.clone());
                account
            }
        };

        self.email_by_id
            .insert(account.id.clone(), account.email.clone());
        Ok(account)
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<Account>> {
        Ok(self
            .by_email
            .get(&normalize_email(email))
            .map(|a| a.value().clone()))
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Account>> {
        let Some(email) = self.email_by_id.get(id).map(|e| e.value().clone()) else {
            return Ok(None);
        };
        Ok(self.by_email.get(&email).map(|a| a.value().clone()))
    }
}
