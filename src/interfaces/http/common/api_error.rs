//! Mapping of domain errors onto HTTP responses
//!
//! | error | status | body |
//! |---|---|---|
//! | validation, conflict, bad credentials | 400 | `{"errors":[{"msg":..}]}` |
//! | unauthorized | 401 | `{"msg":..}` |
//! | not found | 404 | `{"errors":[{"msg":..}]}` |
//! | internal | 500 | plain-text message |

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;

use crate::support::errors::{DomainError, FieldError};

/// One entry of an `errors` list
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorEntry {
    pub msg: String,
    /// Offending request field, present for validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl ErrorEntry {
    pub fn message(msg: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            param: None,
            location: None,
        }
    }
}

impl From<FieldError> for ErrorEntry {
    fn from(field: FieldError) -> Self {
        Self {
            msg: field.msg,
            param: Some(field.param),
            location: Some("body".to_string()),
        }
    }
}

/// `{"errors": [...]}`
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorsBody {
    pub errors: Vec<ErrorEntry>,
}

impl ErrorsBody {
    pub fn single(msg: impl Into<String>) -> Self {
        Self {
            errors: vec![ErrorEntry::message(msg)],
        }
    }
}

/// `{"msg": "..."}`, used by the auth middleware
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageBody {
    pub msg: String,
}

/// Error type returned by every handler
#[derive(Debug)]
pub enum ApiError {
    Domain(DomainError),
    /// Body could not be parsed as the expected JSON document
    MalformedBody(String),
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = match self {
            Self::MalformedBody(msg) => {
                return (StatusCode::BAD_REQUEST, Json(ErrorsBody::single(msg))).into_response();
            }
            Self::Domain(err) => err,
        };

        match err {
            DomainError::Validation(fields) => {
                let errors = fields.into_iter().map(ErrorEntry::from).collect();
                (StatusCode::BAD_REQUEST, Json(ErrorsBody { errors })).into_response()
            }
            DomainError::Conflict(msg) => {
                (StatusCode::BAD_REQUEST, Json(ErrorsBody::single(msg))).into_response()
            }
            err @ DomainError::InvalidCredentials => (
                StatusCode::BAD_REQUEST,
                Json(ErrorsBody::single(err.to_string())),
            )
                .into_response(),
            DomainError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, Json(MessageBody { msg })).into_response()
            }
            DomainError::NotFound { entity, .. } => (
                StatusCode::NOT_FOUND,
                Json(ErrorsBody::single(format!("{} not found", entity))),
            )
                .into_response(),
            DomainError::Internal(msg) => {
                error!("Request failed: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn render(err: ApiError) -> (StatusCode, String) {
        let resp = err.into_response();
        let status = resp.status();
        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn validation_lists_every_field() {
        let err = DomainError::Validation(vec![
            FieldError::new("email", "Please include a valid email"),
            FieldError::new("name", "Name is required"),
        ]);
        let (status, body) = render(err.into()).await;
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["errors"].as_array().unwrap().len(), 2);
        assert_eq!(json["errors"][1]["param"], "name");
        assert_eq!(json["errors"][1]["location"], "body");
    }

    #[tokio::test]
    async fn credentials_error_is_generic() {
        let (status, body) = render(DomainError::InvalidCredentials.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, r#"{"errors":[{"msg":"Invalid Credentials"}]}"#);
    }

    #[tokio::test]
    async fn internal_error_is_plain_text() {
        let (status, body) = render(DomainError::Internal("db offline".into()).into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "db offline");
    }

    #[tokio::test]
    async fn unauthorized_uses_msg_body() {
        let (status, body) =
            render(DomainError::Unauthorized("Token is not valid".into()).into()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, r#"{"msg":"Token is not valid"}"#);
    }
}
