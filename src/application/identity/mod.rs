//! Identity module — account registration, login and profile lookup
//!
//! Contains the `AccountService` which orchestrates the account use-cases.

pub mod service;

pub use service::{AccountService, AuthToken};
