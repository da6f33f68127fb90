//! Users API handlers

use std::sync::Arc;

use axum::{extract::State, Extension, Json};

use super::dto::{AccountProfile, LoginRequest, RegisterRequest, TokenResponse};
use crate::application::AccountService;
use crate::interfaces::http::common::{ApiError, ErrorsBody, MessageBody, ValidatedJson};
use crate::interfaces::http::middleware::AuthenticatedAccount;

/// Users handler state
#[derive(Clone)]
pub struct UserHandlerState {
    pub service: Arc<AccountService>,
}

#[utoipa::path(
    post,
    path = "/api/users/register",
    tag = "Users",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Account created", body = TokenResponse),
        (status = 400, description = "Validation error or user already exists", body = ErrorsBody),
        (status = 500, description = "Server error", body = String, content_type = "text/plain")
    )
)]
pub async fn register(
    State(state): State<UserHandlerState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let issued = state
        .service
        .register(&request.name, &request.email, &request.password)
        .await?;

    Ok(Json(TokenResponse {
        token: issued.token,
    }))
}

#[utoipa::path(
    post,
    path = "/api/users/login",
    tag = "Users",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Successful login", body = TokenResponse),
        (status = 400, description = "Validation error or invalid credentials", body = ErrorsBody),
        (status = 500, description = "Server error", body = String, content_type = "text/plain")
    )
)]
pub async fn login(
    State(state): State<UserHandlerState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let issued = state
        .service
        .login(&request.email, &request.password)
        .await?;

    Ok(Json(TokenResponse {
        token: issued.token,
    }))
}

#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    security(("bearer_auth" = []), ("auth_token" = [])),
    responses(
        (status = 200, description = "Current account", body = AccountProfile),
        (status = 401, description = "Missing or invalid token", body = MessageBody),
        (status = 404, description = "Account no longer exists", body = ErrorsBody),
        (status = 500, description = "Server error", body = String, content_type = "text/plain")
    )
)]
pub async fn get_profile(
    State(state): State<UserHandlerState>,
    Extension(caller): Extension<AuthenticatedAccount>,
) -> Result<Json<AccountProfile>, ApiError> {
    let account = state.service.get_profile(&caller.account_id).await?;
    Ok(Json(account.into()))
}
