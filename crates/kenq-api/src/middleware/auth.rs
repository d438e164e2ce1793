//! Session gate for server-rendered pages

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::debug;

use crate::state::AppState;

/// Let signed-in users through with their claims attached; send everyone else to `/login`
pub async fn require_session(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let jar = CookieJar::from_headers(request.headers());
    match state.sessions.from_jar(&jar) {
        Some(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        None => {
            let target = request
                .uri()
                .path_and_query()
                .map(|pq| pq.as_str().to_string())
                .unwrap_or_else(|| "/mypage".to_string());
            debug!("No session for {}; redirecting to login", target);
            Redirect::to(&login_url(&target)).into_response()
        }
    }
}

pub fn login_url(callback: &str) -> String {
    format!("/login?callbackUrl={}", urlencoding::encode(callback))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_url_encodes_callback() {
        assert_eq!(login_url("/projects/3"), "/login?callbackUrl=%2Fprojects%2F3");
        assert_eq!(
            login_url("/register?x=1&y=2"),
            "/login?callbackUrl=%2Fregister%3Fx%3D1%26y%3D2"
        );
    }
}
