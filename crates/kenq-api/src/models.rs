//! API request and response models

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::session::SessionClaims;

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginCredentials {
    /// Company user name
    pub company_user_name: String,
    /// Password
    pub password: String,
}

/// Login response; the session itself travels in the cookie
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    /// Signed-in user
    pub user: UserInfo,
    /// Session expiration timestamp
    pub expires_at: i64,
}

/// User information
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserInfo {
    /// Backend user id
    pub id: String,
    /// Display name
    pub name: String,
    /// Login name
    pub company_user_name: String,
    /// Company the user belongs to
    pub company_id: Option<String>,
}

impl From<&SessionClaims> for UserInfo {
    fn from(claims: &SessionClaims) -> Self {
        Self {
            id: claims.sub.clone(),
            name: claims.name.clone(),
            company_user_name: claims.company_user_name.clone(),
            company_id: claims.company_id.clone(),
        }
    }
}

/// Portal health response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Version
    pub version: String,
    /// Uptime in seconds
    pub uptime: u64,
    /// Whether a backend API URL is configured
    pub backend_configured: bool,
}

/// Error body returned by every `/api` route
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Localized message
    pub error: String,
    /// Backend error text, on routes that echo it
    #[serde(rename = "backendError", skip_serializing_if = "Option::is_none")]
    pub backend_error: Option<String>,
}

/// Project fields accepted by the AI-assist and registration routes
///
/// The portal forwards the body as-is and adds `company_user_id`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProjectDraftBody {
    pub project_title: String,
    pub project_content: String,
    pub industry_category: Option<String>,
    pub business_description: Option<String>,
    /// University names, or `["全大学"]`
    pub university: Vec<String>,
    pub preferred_researcher_level: Vec<String>,
    /// AI-assist only
    pub application_deadline: Option<String>,
}

/// Favorite toggle request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FavoriteRequest {
    /// Matching result to toggle
    pub matching_id: String,
    /// Desired status
    pub favorite_status: Option<bool>,
}

/// Project list query
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProjectsQuery {
    /// Company whose projects to list; defaults to the caller's company
    pub company_id: Option<String>,
}

/// Matching results query
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MatchingResultsQuery {
    /// Project to fetch matches for
    pub project_id: Option<String>,
}
