//! Route definitions

use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use utoipa::OpenApi;

use crate::{
    error::ApiResult,
    handlers::{auth, health, proxy},
    middleware::{logging_middleware, require_session, security_headers},
    pages,
    state::AppState,
};

/// JSON routes under `/api`, plus health and the OpenAPI document
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/api-docs/openapi.json", get(openapi))
        // Authentication
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/session", get(auth::session))
        // Backend proxy
        .route("/api/ai-diagnosis", post(proxy::ai_diagnosis))
        .route("/api/project-registration", post(proxy::project_registration))
        .route("/api/projects", get(proxy::projects))
        .route("/api/all-projects", get(proxy::all_projects))
        .route("/api/matching-results", get(proxy::matching_results))
        .route("/api/favorites", post(proxy::favorites))
}

/// Pages that need a signed-in user
pub fn protected_pages(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/mypage", get(pages::projects::mypage))
        .route("/projects/:id", get(pages::projects::project_detail))
        .route(
            "/projects/:id/favorites/:matching_id",
            post(pages::projects::toggle_favorite),
        )
        .route(
            "/register",
            get(pages::register::register_page).post(pages::register::register_step),
        )
        .route("/register/complete/:id", get(pages::register::register_complete))
        .route("/researcher/:id", get(pages::projects::researcher_redirect))
        .route_layer(middleware::from_fn_with_state(state, require_session))
}

/// Login, logout and the root redirect
pub fn public_pages() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::projects::root_redirect))
        .route(
            "/login",
            get(pages::auth::login_page).post(pages::auth::login_submit),
        )
        .route(
            "/logout",
            get(pages::auth::logout_page).post(pages::auth::logout_submit),
        )
}

/// Complete application router with middleware and state applied
pub fn app(state: AppState) -> ApiResult<Router> {
    let config = state.config.clone();
    let router = Router::new()
        .merge(api_routes())
        .merge(public_pages())
        .merge(protected_pages(state.clone()))
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state);
    security_headers(router, &config)
}

async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        auth::logout,
        auth::session,
        proxy::ai_diagnosis,
        proxy::project_registration,
        proxy::projects,
        proxy::all_projects,
        proxy::matching_results,
        proxy::favorites,
    ),
    components(schemas(
        crate::models::LoginCredentials,
        crate::models::LoginResponse,
        crate::models::UserInfo,
        crate::models::HealthResponse,
        crate::models::ErrorResponse,
        crate::models::ProjectDraftBody,
        crate::models::FavoriteRequest,
    )),
    info(
        title = "KenQ Portal API",
        version = "0.1.0",
        description = "Session-gated proxy routes in front of the KenQ backend"
    )
)]
pub struct ApiDoc;
