//! Authentication API handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use kenq_domain::messages;
use kenq_http::{BackendError, LoginRequest};
use tracing::{error, info, warn};

use crate::{
    error::{ApiError, ApiResult},
    models::{ErrorResponse, LoginCredentials, LoginResponse, UserInfo},
    session::AuthSession,
    state::AppState,
};

/// Authenticate user
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginCredentials,
    responses(
        (status = 200, description = "Authentication successful; session cookie set", body = LoginResponse),
        (status = 401, description = "Authentication failed", body = ErrorResponse),
        (status = 500, description = "Backend not configured", body = ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<LoginCredentials>, JsonRejection>,
) -> ApiResult<(CookieJar, Json<LoginResponse>)> {
    let Json(credentials) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let request = LoginRequest {
        company_user_name: credentials.company_user_name.trim().to_string(),
        password: credentials.password,
    };

    let user = state.backend.login(&request).await.map_err(|e| match e {
        BackendError::NotConfigured => {
            error!("Login attempted without a backend API URL");
            ApiError::NotConfigured(messages::API_URL_NOT_CONFIGURED.to_string())
        }
        other => {
            warn!("Login failed for {}: {}", request.company_user_name, other);
            ApiError::LoginFailed
        }
    })?;

    let (token, claims) = state.sessions.issue(&user, &request.company_user_name)?;
    info!("User {} signed in", claims.sub);

    let response = LoginResponse {
        user: UserInfo::from(&claims),
        expires_at: claims.exp,
    };
    Ok((jar.add(state.sessions.session_cookie(token)), Json(response)))
}

/// Current session
#[utoipa::path(
    get,
    path = "/api/auth/session",
    responses(
        (status = 200, description = "Signed-in user", body = UserInfo),
        (status = 401, description = "No valid session", body = ErrorResponse)
    )
)]
pub async fn session(AuthSession(claims): AuthSession) -> Json<UserInfo> {
    Json(UserInfo::from(&claims))
}

/// Logout user
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 204, description = "Logout successful; session cookie cleared")
    )
)]
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, StatusCode) {
    (jar.remove(state.sessions.removal_cookie()), StatusCode::NO_CONTENT)
}
