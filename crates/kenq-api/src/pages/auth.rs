//! Login and logout pages

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect},
    Form,
};
use axum_extra::extract::cookie::CookieJar;
use kenq_domain::messages;
use kenq_http::{BackendError, LoginRequest};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use super::{PageResult, UserView};
use crate::{session::safe_callback, state::AppState};

#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    #[serde(rename = "callbackUrl")]
    pub callback_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub company_user_name: String,
    pub password: String,
    #[serde(default)]
    pub callback_url: Option<String>,
}

#[derive(Serialize)]
struct LoginView<'a> {
    title: &'static str,
    callback_url: &'a str,
    company_user_name: &'a str,
    error: Option<&'a str>,
}

pub async fn login_page(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<LoginQuery>,
) -> PageResult {
    let callback = safe_callback(query.callback_url.as_deref());
    if state.sessions.from_jar(&jar).is_some() {
        return Ok(Redirect::to(callback).into_response());
    }
    let view = LoginView {
        title: "ログイン",
        callback_url: callback,
        company_user_name: "",
        error: None,
    };
    Ok(state.pages.render("login", &view)?.into_response())
}

pub async fn login_submit(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> PageResult {
    let callback = safe_callback(form.callback_url.as_deref()).to_string();
    let credentials = LoginRequest {
        company_user_name: form.company_user_name.trim().to_string(),
        password: form.password,
    };

    let (status, message) = match state.backend.login(&credentials).await {
        Ok(user) => {
            let (token, _) = state.sessions.issue(&user, &credentials.company_user_name)?;
            info!("User {} signed in", user.id);
            let jar = jar.add(state.sessions.session_cookie(token));
            return Ok((jar, Redirect::to(&callback)).into_response());
        }
        Err(BackendError::NotConfigured) => {
            error!("Login attempted without a backend API URL");
            (StatusCode::INTERNAL_SERVER_ERROR, messages::API_URL_NOT_CONFIGURED)
        }
        Err(err) => {
            warn!("Login failed for {}: {}", credentials.company_user_name, err);
            (StatusCode::UNAUTHORIZED, messages::LOGIN_FAILED)
        }
    };

    let view = LoginView {
        title: "ログイン",
        callback_url: &callback,
        company_user_name: &credentials.company_user_name,
        error: Some(message),
    };
    Ok((status, state.pages.render("login", &view)?).into_response())
}

#[derive(Serialize)]
struct LogoutView {
    title: &'static str,
    user: Option<UserView>,
}

/// Confirmation popup before signing out
pub async fn logout_page(State(state): State<AppState>, jar: CookieJar) -> PageResult {
    let user = state.sessions.from_jar(&jar).as_ref().map(UserView::from);
    let view = LogoutView {
        title: "ログアウト",
        user,
    };
    Ok(state.pages.render("logout", &view)?.into_response())
}

pub async fn logout_submit(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let jar = jar.remove(state.sessions.removal_cookie());
    (jar, Redirect::to("/login"))
}
