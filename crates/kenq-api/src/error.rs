//! API error types and handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use kenq_domain::messages;
use kenq_http::BackendError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{}", messages::LOGIN_REQUIRED)]
    Unauthorized,

    #[error("{}", messages::LOGIN_FAILED)]
    LoginFailed,

    #[error("{0}")]
    BadRequest(String),

    /// Backend call failed; `detail` is echoed to the client as `backendError`
    #[error("{message}")]
    Backend {
        message: String,
        detail: Option<String>,
    },

    #[error("{0}")]
    NotConfigured(String),

    #[error("{0}")]
    Internal(String),
}

/// How a failed backend call is reported to the client
#[derive(Debug, Clone, Copy)]
pub struct BackendFailure {
    /// Message for a non-2xx answer
    pub on_status: &'static str,
    /// Message for network and decoding failures
    pub on_error: &'static str,
    /// Message while no backend URL is configured
    pub on_unconfigured: &'static str,
    /// Echo the backend's error text as `backendError`
    pub echo_detail: bool,
}

impl BackendFailure {
    pub const fn new(message: &'static str) -> Self {
        Self {
            on_status: message,
            on_error: message,
            on_unconfigured: messages::API_URL_NOT_CONFIGURED,
            echo_detail: false,
        }
    }

    pub const fn on_error(mut self, message: &'static str) -> Self {
        self.on_error = message;
        self
    }

    pub const fn on_unconfigured(mut self, message: &'static str) -> Self {
        self.on_unconfigured = message;
        self
    }

    pub const fn echo_detail(mut self) -> Self {
        self.echo_detail = true;
        self
    }
}

impl ApiError {
    /// Log a backend failure and turn it into the generic client-facing error
    pub fn backend(err: BackendError, failure: BackendFailure) -> Self {
        match err {
            BackendError::NotConfigured => {
                error!("Backend API URL is not configured");
                ApiError::NotConfigured(failure.on_unconfigured.to_string())
            }
            BackendError::HttpStatus { status, body } => {
                error!("{}: backend answered {}: {}", failure.on_status, status, body);
                ApiError::Backend {
                    message: failure.on_status.to_string(),
                    detail: failure.echo_detail.then_some(body),
                }
            }
            other => {
                error!("{}: {}", failure.on_error, other);
                ApiError::Backend {
                    message: failure.on_error.to_string(),
                    detail: failure.echo_detail.then(|| other.to_string()),
                }
            }
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized | ApiError::LoginFailed => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Backend { .. } | ApiError::NotConfigured(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            ApiError::Backend {
                message,
                detail: Some(detail),
            } => json!({ "error": message, "backendError": detail }),
            other => json!({ "error": other.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_configured_uses_route_message() {
        let failure = BackendFailure::new(messages::MATCHING_FAILED)
            .on_unconfigured(messages::CONTACT_SUPPORT);
        let err = ApiError::backend(BackendError::NotConfigured, failure);
        assert_eq!(err.to_string(), messages::CONTACT_SUPPORT);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_status_failure_echoes_body_only_when_asked() {
        let status = || BackendError::HttpStatus {
            status: 502,
            body: "upstream down".into(),
        };

        let quiet = ApiError::backend(status(), BackendFailure::new(messages::REGISTRATION_FAILED));
        assert!(matches!(quiet, ApiError::Backend { detail: None, .. }));

        let loud = ApiError::backend(
            status(),
            BackendFailure::new(messages::MATCHING_FAILED).echo_detail(),
        );
        match loud {
            ApiError::Backend { message, detail } => {
                assert_eq!(message, messages::MATCHING_FAILED);
                assert_eq!(detail.as_deref(), Some("upstream down"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_network_failure_uses_error_message() {
        let failure = BackendFailure::new(messages::AI_DIAGNOSIS_BACKEND_FAILED)
            .on_error(messages::AI_DIAGNOSIS_FAILED);
        let err = ApiError::backend(BackendError::Decode("eof".into()), failure);
        assert_eq!(err.to_string(), messages::AI_DIAGNOSIS_FAILED);
    }

    #[test]
    fn test_unauthorized_status() {
        assert_eq!(ApiError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Unauthorized.to_string(), messages::LOGIN_REQUIRED);
    }
}
