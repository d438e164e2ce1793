//! Signed session tokens and the extractors that check them
//!
//! A session is an HS256 JWT carried in an HttpOnly cookie. API callers may
//! also present it as a bearer token.

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use kenq_config::SessionConfig;
use kenq_http::BackendUser;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

/// Claims stored in the session token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Backend user id
    pub sub: String,
    /// Display name
    pub name: String,
    /// Login name the user signed in with
    pub company_user_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_id: Option<String>,
    pub iat: i64,
    pub exp: i64,
}

impl SessionClaims {
    /// Numeric user id as the backend expects it in `company_user_id`
    pub fn company_user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }

    /// Company whose projects this user sees; falls back to the user id
    pub fn company_key(&self) -> &str {
        self.company_id.as_deref().unwrap_or(&self.sub)
    }
}

/// Issues and verifies session tokens
pub struct SessionManager {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    max_age: Duration,
    cookie_name: String,
    secure: bool,
}

impl SessionManager {
    pub fn new(config: &SessionConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            max_age: Duration::hours(config.max_age_hours as i64),
            cookie_name: config.cookie_name.clone(),
            secure: config.secure,
        }
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// Issue a token for a freshly authenticated user
    pub fn issue(&self, user: &BackendUser, company_user_name: &str) -> ApiResult<(String, SessionClaims)> {
        self.issue_at(user, company_user_name, Utc::now())
    }

    pub fn issue_at(
        &self,
        user: &BackendUser,
        company_user_name: &str,
        now: DateTime<Utc>,
    ) -> ApiResult<(String, SessionClaims)> {
        let claims = SessionClaims {
            sub: user.id.clone(),
            name: user.name.clone(),
            company_user_name: company_user_name.to_string(),
            company_id: user.company_id.clone(),
            iat: now.timestamp(),
            exp: (now + self.max_age).timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| ApiError::Internal(format!("Failed to sign session: {e}")))?;
        Ok((token, claims))
    }

    /// Verify signature and expiry
    pub fn verify(&self, token: &str) -> ApiResult<SessionClaims> {
        decode::<SessionClaims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!("Rejected session token: {}", e);
                ApiError::Unauthorized
            })
    }

    /// Session from the cookie jar, if present and valid
    pub fn from_jar(&self, jar: &CookieJar) -> Option<SessionClaims> {
        let cookie = jar.get(&self.cookie_name)?;
        self.verify(cookie.value()).ok()
    }

    /// Session from the cookie or an `Authorization: Bearer` header
    pub fn from_parts(&self, parts: &Parts) -> Option<SessionClaims> {
        let jar = CookieJar::from_headers(&parts.headers);
        self.from_jar(&jar).or_else(|| {
            let header = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
            let token = header.strip_prefix("Bearer ")?;
            self.verify(token.trim()).ok()
        })
    }

    pub fn session_cookie(&self, token: String) -> Cookie<'static> {
        Cookie::build((self.cookie_name.clone(), token))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .build()
    }

    pub fn removal_cookie(&self) -> Cookie<'static> {
        Cookie::build((self.cookie_name.clone(), String::new()))
            .path("/")
            .build()
    }
}

/// Extractor for routes that require a session; rejects with `401`
#[derive(Debug, Clone)]
pub struct AuthSession(pub SessionClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthSession {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if let Some(claims) = parts.extensions.get::<SessionClaims>() {
            return Ok(AuthSession(claims.clone()));
        }
        state
            .sessions
            .from_parts(parts)
            .map(AuthSession)
            .ok_or(ApiError::Unauthorized)
    }
}

/// Only relative paths on this site are accepted as post-login targets
pub fn safe_callback(target: Option<&str>) -> &str {
    match target {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => path,
        _ => "/mypage",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> SessionManager {
        SessionManager::new(&SessionConfig {
            secret: "0123456789abcdef0123456789abcdef".into(),
            ..SessionConfig::default()
        })
    }

    fn user() -> BackendUser {
        BackendUser {
            id: "7".into(),
            name: "田中".into(),
            company_id: Some("2".into()),
        }
    }

    #[test]
    fn test_issue_and_verify() {
        let sessions = manager();
        let (token, claims) = sessions.issue(&user(), "tanaka").unwrap();
        assert_eq!(claims.exp - claims.iat, 12 * 60 * 60);
        let verified = sessions.verify(&token).unwrap();
        assert_eq!(verified, claims);
        assert_eq!(verified.company_user_id(), Some(7));
        assert_eq!(verified.company_key(), "2");
    }

    #[test]
    fn test_expired_token_rejected() {
        let sessions = manager();
        let (token, _) = sessions
            .issue_at(&user(), "tanaka", Utc::now() - Duration::hours(13))
            .unwrap();
        assert!(matches!(sessions.verify(&token), Err(ApiError::Unauthorized)));
    }

    #[test]
    fn test_tampered_token_rejected() {
        let sessions = manager();
        let (token, _) = sessions.issue(&user(), "tanaka").unwrap();
        let other = SessionManager::new(&SessionConfig {
            secret: "ffffffffffffffffffffffffffffffff".into(),
            ..SessionConfig::default()
        });
        assert!(other.verify(&token).is_err());
        assert!(sessions.verify(&format!("{token}x")).is_err());
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = manager().session_cookie("abc".into());
        assert_eq!(cookie.name(), "kenq_session");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
    }

    #[test]
    fn test_safe_callback() {
        assert_eq!(safe_callback(Some("/projects/3")), "/projects/3");
        assert_eq!(safe_callback(Some("//evil.example")), "/mypage");
        assert_eq!(safe_callback(Some("https://evil.example")), "/mypage");
        assert_eq!(safe_callback(None), "/mypage");
    }
}
