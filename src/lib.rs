//! # Account Service
//!
//! Account registration, login and profile lookup over HTTP, with bcrypt
//! password hashing and JWT session tokens.
//!
//! ## Architecture
//!
//! - **domain**: the `Account` entity and the `AccountRepository` port
//! - **application**: `AccountService` use-cases
//! - **infrastructure**: crypto, SeaORM persistence, in-memory storage
//! - **interfaces**: axum REST API with Swagger documentation
//! - **support**: error taxonomy and shutdown coordination

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod support;

pub use config::{default_config_path, AppConfig};

pub use infrastructure::{init_database, DatabaseConfig};

pub use interfaces::http::{create_api_router, ApiState};
