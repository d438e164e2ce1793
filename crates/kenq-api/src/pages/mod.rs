//! Server-rendered pages
//!
//! Templates are compiled into the binary and registered once. Every page
//! except the login form sits behind the session gate and receives the
//! caller's [`SessionClaims`](crate::session::SessionClaims) as an extension.

pub mod auth;
pub mod projects;
pub mod register;

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use handlebars::{html_escape, Handlebars};
use serde::Serialize;
use tracing::error;

use crate::{
    error::{ApiError, ApiResult},
    session::SessionClaims,
};

const TEMPLATES: &[(&str, &str)] = &[
    ("login", include_str!("../../templates/login.hbs")),
    ("logout", include_str!("../../templates/logout.hbs")),
    ("mypage", include_str!("../../templates/mypage.hbs")),
    ("project", include_str!("../../templates/project.hbs")),
    ("register", include_str!("../../templates/register.hbs")),
    ("researching", include_str!("../../templates/researching.hbs")),
    ("complete", include_str!("../../templates/complete.hbs")),
];

/// Compiled page templates
pub struct Pages {
    registry: Handlebars<'static>,
}

impl Pages {
    pub fn new() -> ApiResult<Self> {
        let mut registry = Handlebars::new();
        registry
            .register_partial("layout", include_str!("../../templates/layout.hbs"))
            .map_err(|e| ApiError::Internal(format!("Invalid layout template: {e}")))?;
        for &(name, source) in TEMPLATES {
            registry
                .register_template_string(name, source)
                .map_err(|e| ApiError::Internal(format!("Invalid template {name}: {e}")))?;
        }
        Ok(Self { registry })
    }

    pub fn render<T: Serialize>(&self, name: &str, data: &T) -> Result<Html<String>, PageError> {
        self.registry.render(name, data).map(Html).map_err(|e| {
            error!("Failed to render {}: {}", name, e);
            PageError::internal("ページの表示に失敗しました")
        })
    }
}

/// Signed-in user as shown in the page header
#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    pub name: String,
    pub company_user_name: String,
}

impl From<&SessionClaims> for UserView {
    fn from(claims: &SessionClaims) -> Self {
        Self {
            name: claims.name.clone(),
            company_user_name: claims.company_user_name.clone(),
        }
    }
}

/// Error page shown instead of a JSON error body
#[derive(Debug)]
pub struct PageError {
    pub status: StatusCode,
    pub message: String,
}

impl PageError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl From<ApiError> for PageError {
    fn from(err: ApiError) -> Self {
        Self::new(err.status_code(), err.to_string())
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let body = format!(
            "<!DOCTYPE html>\n<html lang=\"ja\"><head><meta charset=\"utf-8\"><title>KenQ</title></head>\
             <body><main class=\"error\"><p>{}</p><p><a href=\"/mypage\">マイページへ戻る</a></p></main></body></html>",
            html_escape(&self.message)
        );
        (self.status, Html(body)).into_response()
    }
}

pub type PageResult = Result<Response, PageError>;
