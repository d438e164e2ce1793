//! Backend proxy handlers
//!
//! Each handler checks the session, attaches the caller's identity and makes
//! exactly one backend call. Successful backend bodies are returned untouched.

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    Json,
};
use kenq_domain::messages;
use serde_json::Value;
use tracing::{info, warn};

use crate::{
    error::{ApiError, ApiResult, BackendFailure},
    models::{
        ErrorResponse, FavoriteRequest, MatchingResultsQuery, ProjectDraftBody, ProjectsQuery,
    },
    session::{AuthSession, SessionClaims},
    state::AppState,
};

const AI_DIAGNOSIS: BackendFailure = BackendFailure::new(messages::AI_DIAGNOSIS_BACKEND_FAILED)
    .on_error(messages::AI_DIAGNOSIS_FAILED)
    .echo_detail();
const REGISTRATION: BackendFailure = BackendFailure::new(messages::REGISTRATION_FAILED);
const PROJECT_LIST: BackendFailure =
    BackendFailure::new(messages::CONTACT_SUPPORT).on_unconfigured(messages::CONTACT_SUPPORT);
const MATCHING: BackendFailure = BackendFailure::new(messages::MATCHING_FAILED).echo_detail();
const FAVORITES: BackendFailure = BackendFailure::new(messages::FAVORITE_FAILED);

/// Add `company_user_id` to a JSON object body
///
/// Non-numeric user ids are sent as `null`.
pub fn with_company_user_id(body: Value, session: &SessionClaims) -> ApiResult<Value> {
    let Value::Object(mut fields) = body else {
        return Err(ApiError::BadRequest("request body must be a JSON object".to_string()));
    };
    let user_id = match session.company_user_id() {
        Some(id) => Value::from(id),
        None => {
            warn!("User id {} is not numeric; sending company_user_id as null", session.sub);
            Value::Null
        }
    };
    fields.insert("company_user_id".to_string(), user_id);
    Ok(Value::Object(fields))
}

fn json_body(payload: Result<Json<Value>, JsonRejection>) -> ApiResult<Value> {
    payload
        .map(|Json(body)| body)
        .map_err(|e| ApiError::BadRequest(e.body_text()))
}

fn id_value(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Request an AI-assisted project description
#[utoipa::path(
    post,
    path = "/api/ai-diagnosis",
    request_body = ProjectDraftBody,
    responses(
        (status = 200, description = "Backend diagnosis, passed through"),
        (status = 401, description = "No valid session", body = ErrorResponse),
        (status = 500, description = "Backend failure", body = ErrorResponse)
    )
)]
pub async fn ai_diagnosis(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let body = with_company_user_id(json_body(payload)?, &session)?;
    let response = state
        .backend
        .ai_diagnosis(&body)
        .await
        .map_err(|e| ApiError::backend(e, AI_DIAGNOSIS))?;
    Ok(Json(response))
}

/// Register a project
#[utoipa::path(
    post,
    path = "/api/project-registration",
    request_body = ProjectDraftBody,
    responses(
        (status = 200, description = "Registered project, passed through"),
        (status = 401, description = "No valid session", body = ErrorResponse),
        (status = 500, description = "Backend failure", body = ErrorResponse)
    )
)]
pub async fn project_registration(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let body = with_company_user_id(json_body(payload)?, &session)?;
    let response = state
        .backend
        .register_project(&body)
        .await
        .map_err(|e| ApiError::backend(e, REGISTRATION))?;
    info!("User {} registered a project", session.sub);
    Ok(Json(response))
}

/// List projects of a company
///
/// Without `company_id` the session's company is listed, or the user's own id
/// when the session carries no company.
#[utoipa::path(
    get,
    path = "/api/projects",
    params(ProjectsQuery),
    responses(
        (status = 200, description = "`{\"projects\": [...]}`, passed through"),
        (status = 401, description = "No valid session", body = ErrorResponse),
        (status = 500, description = "Backend failure", body = ErrorResponse)
    )
)]
pub async fn projects(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    Query(query): Query<ProjectsQuery>,
) -> ApiResult<Json<Value>> {
    let company_id = query
        .company_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| session.company_key().to_string());
    let response = state
        .backend
        .project_info(&company_id)
        .await
        .map_err(|e| ApiError::backend(e, PROJECT_LIST))?;
    Ok(Json(response))
}

/// List projects of the caller's company
#[utoipa::path(
    get,
    path = "/api/all-projects",
    responses(
        (status = 200, description = "`{\"projects\": [...]}`, passed through"),
        (status = 400, description = "Session has no company", body = ErrorResponse),
        (status = 401, description = "No valid session", body = ErrorResponse),
        (status = 500, description = "Backend failure", body = ErrorResponse)
    )
)]
pub async fn all_projects(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
) -> ApiResult<Json<Value>> {
    let company_id = session
        .company_id
        .as_deref()
        .ok_or_else(|| ApiError::BadRequest(messages::COMPANY_ID_MISSING.to_string()))?;
    let response = state
        .backend
        .project_info(company_id)
        .await
        .map_err(|e| ApiError::backend(e, PROJECT_LIST))?;
    Ok(Json(response))
}

/// Matching results of a project
#[utoipa::path(
    get,
    path = "/api/matching-results",
    params(MatchingResultsQuery),
    responses(
        (status = 200, description = "Matching results, passed through"),
        (status = 400, description = "Missing project_id", body = ErrorResponse),
        (status = 401, description = "No valid session", body = ErrorResponse),
        (status = 500, description = "Backend failure", body = ErrorResponse)
    )
)]
pub async fn matching_results(
    State(state): State<AppState>,
    AuthSession(_session): AuthSession,
    Query(query): Query<MatchingResultsQuery>,
) -> ApiResult<Json<Value>> {
    let project_id = query
        .project_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest(messages::PROJECT_ID_REQUIRED.to_string()))?;
    let response = state
        .backend
        .matching_result(&project_id)
        .await
        .map_err(|e| ApiError::backend(e, MATCHING))?;
    Ok(Json(response))
}

/// Toggle a favorite
#[utoipa::path(
    post,
    path = "/api/favorites",
    request_body = FavoriteRequest,
    responses(
        (status = 200, description = "Backend answer, passed through"),
        (status = 400, description = "Missing matching_id", body = ErrorResponse),
        (status = 401, description = "No valid session", body = ErrorResponse),
        (status = 500, description = "Backend failure", body = ErrorResponse)
    )
)]
pub async fn favorites(
    State(state): State<AppState>,
    AuthSession(_session): AuthSession,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let body = json_body(payload)?;
    let matching_id = id_value(body.get("matching_id"))
        .ok_or_else(|| ApiError::BadRequest(messages::MATCHING_ID_REQUIRED.to_string()))?;
    let response = state
        .backend
        .toggle_favorite(&matching_id, &body)
        .await
        .map_err(|e| ApiError::backend(e, FAVORITES))?;
    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn session(sub: &str) -> SessionClaims {
        SessionClaims {
            sub: sub.into(),
            name: "田中".into(),
            company_user_name: "tanaka".into(),
            company_id: Some("2".into()),
            iat: 0,
            exp: 0,
        }
    }

    #[test]
    fn test_company_user_id_injected() {
        let body = with_company_user_id(json!({"project_title": "x", "company_user_id": 99}), &session("7"))
            .unwrap();
        assert_eq!(body["company_user_id"], 7);
        assert_eq!(body["project_title"], "x");
    }

    #[test]
    fn test_non_numeric_user_id_sent_as_null() {
        let body = with_company_user_id(json!({}), &session("u-1")).unwrap();
        assert!(body["company_user_id"].is_null());
    }

    #[test]
    fn test_non_object_body_rejected() {
        assert!(matches!(
            with_company_user_id(json!([1, 2]), &session("7")),
            Err(ApiError::BadRequest(_))
        ));
    }

    #[test]
    fn test_id_value() {
        assert_eq!(id_value(Some(&json!(12))).as_deref(), Some("12"));
        assert_eq!(id_value(Some(&json!(" m-3 "))).as_deref(), Some("m-3"));
        assert_eq!(id_value(Some(&json!(""))), None);
        assert_eq!(id_value(Some(&json!(null))), None);
        assert_eq!(id_value(None), None);
    }
}
