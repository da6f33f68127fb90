use chrono::{DateTime, Utc};

/// Account model
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Account {
    pub id: String,
    pub name: String,
    /// Always stored normalized, see [`normalize_email`].
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Canonical form used for both storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
