//! User DTOs
//!
//! Request bodies default missing fields to empty strings so that an absent
//! field is reported by validation rather than as a JSON error. Scalars of
//! the wrong type are coerced to strings for the same reason.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::Account;

/// `null`, arrays and objects become `""`; numbers and booleans keep their
/// textual form.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    })
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct RegisterRequest {
    #[serde(deserialize_with = "lenient_string")]
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[serde(deserialize_with = "lenient_string")]
    #[validate(email(message = "Please include a valid email"))]
    pub email: String,
    #[serde(deserialize_with = "lenient_string")]
    #[validate(length(min = 6, message = "Please choose a password with at least 6 characters"))]
    pub password: String,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct LoginRequest {
    #[serde(deserialize_with = "lenient_string")]
    #[validate(email(message = "Please include a valid email"))]
    pub email: String,
    #[serde(deserialize_with = "lenient_string")]
    #[validate(length(min = 6, message = "Please choose a password with at least 6 characters"))]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
}

/// Account as returned to its owner; the password hash is never included.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AccountProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<Account> for AccountProfile {
    fn from(a: Account) -> Self {
        Self {
            id: a.id,
            name: a.name,
            email: a.email,
            created_at: a.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_password_fails_validation() {
        let req = RegisterRequest {
            name: "Kim".into(),
            email: "kim@example.com".into(),
            password: "12345".into(),
        };
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert_eq!(fields.len(), 1);
        assert!(fields.keys().any(|k| k.to_string() == "password"));
    }

    #[test]
    fn six_characters_is_enough() {
        let req = LoginRequest {
            email: "kim@example.com".into(),
            password: "123456".into(),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn null_name_becomes_empty_and_fails_validation() {
        let req: RegisterRequest = serde_json::from_value(serde_json::json!({
            "name": null,
            "email": "kim@example.com",
            "password": "123456"
        }))
        .unwrap();
        assert_eq!(req.name, "");

        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        let name_errors = fields["name"];
        assert_eq!(fields.len(), 1);
        assert_eq!(name_errors.len(), 1);
        assert_eq!(
            name_errors[0].message.as_deref(),
            Some("Name is required")
        );
    }

    #[test]
    fn numeric_password_is_coerced_to_string() {
        let req: LoginRequest = serde_json::from_value(serde_json::json!({
            "email": "kim@example.com",
            "password": 123456
        }))
        .unwrap();
        assert_eq!(req.password, "123456");
        assert!(req.validate().is_ok());
    }

    #[test]
    fn structured_values_count_as_empty() {
        let req: LoginRequest = serde_json::from_value(serde_json::json!({
            "email": ["kim@example.com"],
            "password": {"value": "123456"}
        }))
        .unwrap();
        assert_eq!(req.email, "");
        assert_eq!(req.password, "");
        assert!(req.validate().is_err());
    }

    #[test]
    fn profile_has_no_password_field() {
        let account = Account {
            id: "1".into(),
            name: "Kim".into(),
            email: "kim@example.com".into(),
            password_hash: "$2b$04$hash".into(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(AccountProfile::from(account)).unwrap();
        let obj = json.as_object().unwrap();
        assert!(obj.keys().all(|k| !k.contains("password")));
    }
}
