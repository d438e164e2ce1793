//! KenQ customer portal
//!
//! An axum server in front of the KenQ backend: it signs company users in,
//! forwards their project registrations, AI-assist requests and favorite
//! toggles, and renders the project list, project detail and registration
//! pages.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod pages;
pub mod routes;
pub mod server;
pub mod session;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use server::ApiServer;
pub use session::{SessionClaims, SessionManager};
pub use state::AppState;
