//! Domain layer — entities and repository interfaces

pub mod account;

pub use account::{normalize_email, Account, AccountRepository, NewAccount};

// Re-export DomainError from support for convenience
pub use crate::support::errors::{DomainError, DomainResult};
