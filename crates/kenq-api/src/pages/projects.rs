//! Project list, project detail and favorites

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect},
    Extension, Form,
};
use kenq_domain::{messages, MatchingResult, MatchingResults, Project, ProjectList, UniversityCatalog};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, warn};

use super::{PageError, PageResult, UserView};
use crate::{session::SessionClaims, state::AppState};

/// One row of the project list
#[derive(Debug, Serialize)]
pub struct ProjectRow {
    pub link_id: String,
    pub title: String,
    pub registered_on: Option<String>,
    pub registered_by: String,
    pub favorite_count: u32,
}

impl From<&Project> for ProjectRow {
    fn from(project: &Project) -> Self {
        Self {
            link_id: urlencoding::encode(&project.project_id).into_owned(),
            title: project.project_title.clone(),
            registered_on: project.registered_on(),
            registered_by: project
                .company_user_name
                .clone()
                .unwrap_or_else(|| messages::NOT_SPECIFIED.to_string()),
            favorite_count: project.favorite_count.unwrap_or(0),
        }
    }
}

/// Project fields formatted for display
#[derive(Debug, Serialize)]
pub struct ProjectView {
    pub link_id: String,
    pub title: String,
    pub content: String,
    pub industry: String,
    pub business_description: String,
    pub universities: String,
    pub researcher_levels: String,
    pub registered_on: Option<String>,
}

impl ProjectView {
    pub fn new(project: &Project, catalog: &UniversityCatalog) -> Self {
        Self {
            link_id: urlencoding::encode(&project.project_id).into_owned(),
            title: project.project_title.clone(),
            content: project.project_content.clone(),
            industry: project.industry_display().to_string(),
            business_description: project.business_description_display().to_string(),
            universities: project.university.summary(catalog),
            researcher_levels: project.researcher_level_display(),
            registered_on: project.registered_on(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ResearcherView {
    link_id: String,
    matching_id: String,
    name: String,
    university: String,
    affiliation: String,
    position: String,
    research_field: String,
    matching_reason: String,
    favorite: bool,
}

impl From<&MatchingResult> for ResearcherView {
    fn from(result: &MatchingResult) -> Self {
        Self {
            link_id: urlencoding::encode(&result.matching_id).into_owned(),
            matching_id: result.matching_id.clone(),
            name: result.researcher_name.clone(),
            university: result.university.clone(),
            affiliation: result.affiliation.clone(),
            position: result.position.clone(),
            research_field: result.research_field.clone(),
            matching_reason: result.matching_reason.clone(),
            favorite: result.favorite_status,
        }
    }
}

#[derive(Serialize)]
struct MyPageView {
    title: &'static str,
    user: UserView,
    projects: Vec<ProjectRow>,
}

#[derive(Serialize)]
struct ProjectDetailView {
    title: String,
    user: UserView,
    project: ProjectView,
    researchers: Vec<ResearcherView>,
    matching_error: Option<&'static str>,
}

/// Fetch the projects registered by the caller's company
pub async fn fetch_projects(state: &AppState, session: &SessionClaims) -> Result<ProjectList, PageError> {
    let body = state
        .backend
        .project_info(session.company_key())
        .await
        .map_err(|e| {
            error!("Failed to load projects for company {}: {}", session.company_key(), e);
            PageError::internal(messages::CONTACT_SUPPORT)
        })?;
    serde_json::from_value(body).map_err(|e| {
        error!("Unexpected project list payload: {}", e);
        PageError::internal(messages::CONTACT_SUPPORT)
    })
}

pub async fn root_redirect() -> Redirect {
    Redirect::to("/mypage")
}

pub async fn mypage(
    State(state): State<AppState>,
    Extension(session): Extension<SessionClaims>,
) -> PageResult {
    let projects = fetch_projects(&state, &session).await?;
    let view = MyPageView {
        title: "案件一覧",
        user: UserView::from(&session),
        projects: projects.projects.iter().map(ProjectRow::from).collect(),
    };
    Ok(state.pages.render("mypage", &view)?.into_response())
}

pub async fn project_detail(
    State(state): State<AppState>,
    Extension(session): Extension<SessionClaims>,
    Path(project_id): Path<String>,
) -> PageResult {
    let projects = fetch_projects(&state, &session).await?;
    let project = projects
        .find(&project_id)
        .ok_or_else(|| PageError::new(StatusCode::NOT_FOUND, messages::PROJECT_NOT_FOUND))?;

    let (researchers, matching_error) = match state.backend.matching_result(&project_id).await {
        Ok(body) => match serde_json::from_value::<MatchingResults>(body) {
            Ok(results) => (results.iter().map(ResearcherView::from).collect(), None),
            Err(e) => {
                error!("Unexpected matching payload for project {}: {}", project_id, e);
                (Vec::new(), Some(messages::MATCHING_FAILED))
            }
        },
        Err(e) => {
            error!("Failed to load matching results for project {}: {}", project_id, e);
            (Vec::new(), Some(messages::MATCHING_FAILED))
        }
    };

    let view = ProjectDetailView {
        title: project.project_title.clone(),
        user: UserView::from(&session),
        project: ProjectView::new(project, &state.universities),
        researchers,
        matching_error,
    };
    Ok(state.pages.render("project", &view)?.into_response())
}

#[derive(Debug, Deserialize)]
pub struct FavoriteForm {
    /// Current status; the toggle sends the opposite
    #[serde(default)]
    pub favorite_status: Option<String>,
}

pub async fn toggle_favorite(
    State(state): State<AppState>,
    Extension(session): Extension<SessionClaims>,
    Path((project_id, matching_id)): Path<(String, String)>,
    Form(form): Form<FavoriteForm>,
) -> PageResult {
    let current = matches!(form.favorite_status.as_deref(), Some("true") | Some("on") | Some("1"));
    let body = json!({
        "matching_id": matching_id,
        "favorite_status": !current,
    });

    state
        .backend
        .toggle_favorite(&matching_id, &body)
        .await
        .map_err(|e| {
            error!("Failed to toggle favorite {} for user {}: {}", matching_id, session.sub, e);
            PageError::internal(messages::FAVORITE_FAILED)
        })?;

    let target = format!("/projects/{}", urlencoding::encode(&project_id));
    Ok(Redirect::to(&target).into_response())
}

/// Researcher pages were never built; send users to the registration form
pub async fn researcher_redirect(Path(researcher_id): Path<String>) -> Redirect {
    warn!("Researcher page {} requested; redirecting to /register", researcher_id);
    Redirect::to("/register")
}
