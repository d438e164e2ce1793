//! Middleware for the portal server

pub mod auth;
pub mod logging;
pub mod security;

pub use auth::require_session;
pub use logging::logging_middleware;
pub use security::security_headers;
