//! Account aggregate
//!
//! Contains the Account entity, the creation DTO, and the repository interface.

pub mod model;
pub mod repository;

mod dto_create;

pub use model::{normalize_email, Account};

pub use dto_create::NewAccount;

pub use repository::AccountRepository;
