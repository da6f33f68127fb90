//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::FromRef,
    middleware,
    routing::{get, post},
    Router,
};
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::application::AccountService;
use crate::interfaces::http::common::{ErrorEntry, ErrorsBody, MessageBody};
use crate::interfaces::http::middleware::{auth_middleware, AuthState, AUTH_TOKEN_HEADER};
use crate::interfaces::http::modules::health::{self, ComponentHealth, HealthResponse, HealthState};
use crate::interfaces::http::modules::request_id::request_id_middleware;
use crate::interfaces::http::modules::users::{
    self, AccountProfile, LoginRequest, RegisterRequest, TokenResponse, UserHandlerState,
};

/// Unified router state. Each handler extracts its own slice via `FromRef`.
#[derive(Clone)]
pub struct ApiState {
    pub accounts: Arc<AccountService>,
    pub auth: AuthState,
    pub health: HealthState,
}

impl ApiState {
    pub fn new(accounts: Arc<AccountService>, db: Option<DatabaseConnection>) -> Self {
        let auth = AuthState {
            jwt_config: accounts.jwt_config().clone(),
        };
        Self {
            accounts,
            auth,
            health: HealthState {
                db,
                started_at: Arc::new(Instant::now()),
            },
        }
    }
}

impl FromRef<ApiState> for UserHandlerState {
    fn from_ref(s: &ApiState) -> Self {
        UserHandlerState {
            service: Arc::clone(&s.accounts),
        }
    }
}

impl FromRef<ApiState> for AuthState {
    fn from_ref(s: &ApiState) -> Self {
        s.auth.clone()
    }
}

impl FromRef<ApiState> for HealthState {
    fn from_ref(s: &ApiState) -> Self {
        s.health.clone()
    }
}

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token"))
                        .build(),
                ),
            );
            components.add_security_scheme(
                "auth_token",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(AUTH_TOKEN_HEADER))),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        users::register,
        users::login,
        users::get_profile,
    ),
    components(schemas(
        RegisterRequest,
        LoginRequest,
        TokenResponse,
        AccountProfile,
        ErrorsBody,
        ErrorEntry,
        MessageBody,
        HealthResponse,
        ComponentHealth,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "Users", description = "Registration, login and profile"),
        (name = "Health", description = "Service health")
    )
)]
pub struct ApiDoc;

fn users_router(state: &ApiState) -> Router<ApiState> {
    let public = Router::new()
        .route("/register", post(users::register))
        .route("/login", post(users::login));

    let protected = Router::new()
        .route("/", get(users::get_profile))
        .route_layer(middleware::from_fn_with_state(
            state.auth.clone(),
            auth_middleware,
        ));

    public.merge(protected)
}

/// Build the complete API router
pub fn create_api_router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api/users", users_router(&state))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::infrastructure::crypto::jwt::JwtConfig;
    use crate::infrastructure::storage::InMemoryAccountRepository;

    fn app() -> Router {
        let service = AccountService::new(
            Arc::new(InMemoryAccountRepository::new()),
            JwtConfig::default(),
            4,
        );
        create_api_router(ApiState::new(Arc::new(service), None))
    }

    #[test]
    fn openapi_lists_user_routes() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        assert!(paths.iter().any(|p| *p == "/api/users/register"));
        assert!(paths.iter().any(|p| *p == "/api/users/login"));
        assert!(paths.iter().any(|p| *p == "/api/users"));
    }

    #[tokio::test]
    async fn health_route_is_mounted() {
        let resp = app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn openapi_json_is_served() {
        let resp = app()
            .oneshot(
                Request::builder()
                    .uri("/api-docs/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
