//! Project registration form
//!
//! Each button on the form posts the whole draft together with a `step`.
//! The handler resumes the workflow in the state the form was showing, feeds
//! the matching event, carries out any backend effect and renders whatever
//! state the workflow ends up in.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect},
    Extension, Form,
};
use kenq_domain::{
    catalog::INDUSTRY_CATEGORIES,
    draft::{BACKGROUND_MAX_CHARS, BUSINESS_DESCRIPTION_MAX_CHARS, TITLE_MAX_CHARS},
    DomainError, FormDraft, IndustryCategory, RegistrationWorkflow, ResearcherLevel,
    UniversityCatalog, UniversitySelection, WorkflowEffect, WorkflowEvent, WorkflowState,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info, warn};

use super::{projects::fetch_projects, projects::ProjectView, PageError, PageResult, UserView};
use crate::{handlers::proxy::with_company_user_id, session::SessionClaims, state::AppState};

/// Button pressed on the registration form
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Edit,
    DismissError,
    ToggleAllUniversities,
    ToggleRegion(String),
    ToggleAllLevels,
    RequestAssist,
    CancelAssist,
    ConfirmAssist,
    ApplySuggestion,
    DiscardSuggestion,
    Submit,
    CancelResearch,
    ConfirmResearch,
}

impl Step {
    pub fn parse(value: &str) -> Result<Self, PageError> {
        if let Some(region) = value.strip_prefix("toggle_region:") {
            return Ok(Step::ToggleRegion(region.to_string()));
        }
        Ok(match value {
            "" | "edit" => Step::Edit,
            "dismiss_error" => Step::DismissError,
            "toggle_all_universities" => Step::ToggleAllUniversities,
            "toggle_all_levels" => Step::ToggleAllLevels,
            "assist" => Step::RequestAssist,
            "assist_cancel" => Step::CancelAssist,
            "assist_confirm" => Step::ConfirmAssist,
            "assist_apply" => Step::ApplySuggestion,
            "assist_discard" => Step::DiscardSuggestion,
            "submit" => Step::Submit,
            "research_cancel" => Step::CancelResearch,
            "research_confirm" => Step::ConfirmResearch,
            other => {
                return Err(PageError::new(
                    StatusCode::BAD_REQUEST,
                    format!("unknown step {other}"),
                ))
            }
        })
    }

    /// State the form was showing when this button was pressed
    fn origin(&self, suggestion: Option<String>) -> WorkflowState {
        match self {
            Step::CancelAssist | Step::ConfirmAssist => WorkflowState::ConfirmAssist,
            Step::ApplySuggestion | Step::DiscardSuggestion => WorkflowState::AssistResult {
                applicable: suggestion.is_some(),
                suggestion: suggestion.unwrap_or_default(),
            },
            Step::CancelResearch | Step::ConfirmResearch => WorkflowState::ConfirmResearch,
            _ => WorkflowState::Editing,
        }
    }

    fn event(&self) -> Option<WorkflowEvent> {
        Some(match self {
            Step::DismissError => WorkflowEvent::DismissError,
            Step::RequestAssist => WorkflowEvent::RequestAssist,
            Step::CancelAssist => WorkflowEvent::CancelAssist,
            Step::ConfirmAssist => WorkflowEvent::ConfirmAssist,
            Step::ApplySuggestion => WorkflowEvent::ApplySuggestion,
            Step::DiscardSuggestion => WorkflowEvent::DiscardSuggestion,
            Step::Submit => WorkflowEvent::Submit,
            Step::CancelResearch => WorkflowEvent::CancelResearch,
            Step::ConfirmResearch => WorkflowEvent::ConfirmResearch,
            Step::Edit | Step::ToggleAllUniversities | Step::ToggleRegion(_) | Step::ToggleAllLevels => {
                return None
            }
        })
    }
}

/// A decoded form post
#[derive(Debug)]
pub struct Submission {
    pub draft: FormDraft,
    pub step: Step,
    pub suggestion: Option<String>,
}

impl Submission {
    /// Rebuild the draft from form pairs; repeated keys carry multi-selects
    pub fn parse(pairs: Vec<(String, String)>, catalog: &UniversityCatalog) -> Result<Self, PageError> {
        let mut draft = FormDraft::new();
        let mut universities = Vec::new();
        let mut step = Step::Edit;
        let mut suggestion = None;

        for (key, value) in pairs {
            match key.as_str() {
                "title" => draft.set_title(&value),
                "background" => draft.set_background(&value),
                "business_description" => draft.set_business_description(&value),
                "industry" => draft.set_industry(IndustryCategory::parse(&value).map_err(bad_request)?),
                "deadline" => draft.set_deadline(&value),
                "university" => universities.push(value),
                "researcher_level" => {
                    let level: ResearcherLevel = value.parse().map_err(bad_request)?;
                    if !draft.researcher_levels.contains(&level) {
                        draft.toggle_researcher_level(level);
                    }
                }
                "suggestion" => suggestion = Some(value),
                "step" => step = Step::parse(&value)?,
                _ => {}
            }
        }
        draft.set_universities(UniversitySelection::from_values(universities, catalog));

        Ok(Self {
            draft,
            step,
            suggestion,
        })
    }
}

/// Serialize a workflow request and attach the caller's identity
fn backend_body<T: Serialize>(request: &T, session: &SessionClaims) -> Result<Value, String> {
    let body = serde_json::to_value(request).map_err(|e| e.to_string())?;
    with_company_user_id(body, session).map_err(|e| e.to_string())
}

fn bad_request(err: DomainError) -> PageError {
    PageError::new(StatusCode::BAD_REQUEST, err.to_string())
}

/// Feed an event; a rejected transition is logged and leaves the form as it was
fn apply(workflow: &mut RegistrationWorkflow, event: WorkflowEvent) -> Option<WorkflowEffect> {
    match workflow.handle(event) {
        Ok(effect) => effect,
        Err(e) => {
            warn!("Ignoring registration step: {}", e);
            None
        }
    }
}

pub async fn register_page(
    State(state): State<AppState>,
    Extension(session): Extension<SessionClaims>,
) -> PageResult {
    render_form(&state, &session, &RegistrationWorkflow::new())
}

pub async fn register_step(
    State(state): State<AppState>,
    Extension(session): Extension<SessionClaims>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> PageResult {
    let Submission {
        draft,
        step,
        suggestion,
    } = Submission::parse(pairs, &state.universities)?;
    let mut workflow = RegistrationWorkflow::resume(draft, step.origin(suggestion));
    let catalog = state.universities.as_ref();

    let mut effect = None;
    match &step {
        Step::ToggleAllUniversities => {
            let selection = workflow.draft().universities.toggle_all();
            workflow.draft_mut().set_universities(selection);
        }
        Step::ToggleRegion(region) => {
            let selection = workflow.draft().universities.toggle_region(region, catalog);
            workflow.draft_mut().set_universities(selection);
        }
        Step::ToggleAllLevels => {
            let selected = workflow.draft().all_researcher_levels_selected();
            workflow.draft_mut().set_all_researcher_levels(!selected);
        }
        other => {
            if let Some(event) = other.event() {
                effect = apply(&mut workflow, event);
            }
        }
    }

    while let Some(current) = effect.take() {
        match current {
            WorkflowEffect::RequestAiDiagnosis(request) => {
                let outcome = match backend_body(&request, &session) {
                    Ok(body) => state.backend.ai_diagnosis(&body).await.map_err(|e| e.to_string()),
                    Err(e) => Err(e),
                };
                let event = match outcome {
                    Ok(response) => WorkflowEvent::AssistSucceeded(response),
                    Err(e) => {
                        error!("AI assist failed: {}", e);
                        WorkflowEvent::AssistFailed
                    }
                };
                effect = apply(&mut workflow, event);
            }
            WorkflowEffect::RegisterProject(request) => {
                let outcome = match backend_body(&request, &session) {
                    Ok(body) => state
                        .backend
                        .register_project(&body)
                        .await
                        .map_err(|e| e.to_string()),
                    Err(e) => Err(e),
                };
                let event = match outcome {
                    Ok(response) => WorkflowEvent::RegistrationSucceeded(response),
                    Err(e) => {
                        error!("Project registration failed: {}", e);
                        WorkflowEvent::RegistrationFailed
                    }
                };
                effect = apply(&mut workflow, event);
            }
            WorkflowEffect::ScheduleSettle { project_id, after } => {
                info!("Project {} registered by user {}", project_id, session.sub);
                return render_researching(&state, &session, &project_id, after.as_secs());
            }
            WorkflowEffect::NavigateToProject(project_id) => {
                return Ok(Redirect::to(&project_url(&project_id)).into_response());
            }
        }
    }

    render_form(&state, &session, &workflow)
}

/// Completed view shown once the research delay has passed
pub async fn register_complete(
    State(state): State<AppState>,
    Extension(session): Extension<SessionClaims>,
    Path(project_id): Path<String>,
) -> PageResult {
    let mut workflow = RegistrationWorkflow::resume(
        FormDraft::default(),
        WorkflowState::Researching {
            project_id: Some(project_id.clone()),
        },
    );
    apply(&mut workflow, WorkflowEvent::ResearchSettled);
    let results_url = match apply(&mut workflow, WorkflowEvent::ProceedToResults) {
        Some(WorkflowEffect::NavigateToProject(id)) => project_url(&id),
        _ => project_url(&project_id),
    };

    let project = match fetch_projects(&state, &session).await {
        Ok(projects) => projects
            .find(&project_id)
            .map(|project| ProjectView::new(project, &state.universities)),
        Err(e) => {
            warn!("Completed view without project summary: {}", e.message);
            None
        }
    };

    let view = CompleteView {
        title: "登録完了",
        user: UserView::from(&session),
        project,
        results_url,
    };
    Ok(state.pages.render("complete", &view)?.into_response())
}

fn project_url(project_id: &str) -> String {
    format!("/projects/{}", urlencoding::encode(project_id))
}

fn render_researching(state: &AppState, session: &SessionClaims, project_id: &str, after_secs: u64) -> PageResult {
    let view = ResearchingView {
        title: "研究者を探しています",
        user: UserView::from(session),
        hide_chrome: true,
        refresh_url: format!("/register/complete/{}", urlencoding::encode(project_id)),
        refresh_after_secs: after_secs,
    };
    Ok(state.pages.render("researching", &view)?.into_response())
}

fn render_form(state: &AppState, session: &SessionClaims, workflow: &RegistrationWorkflow) -> PageResult {
    let view = RegisterView::new(workflow, &state.universities, UserView::from(session));
    Ok(state.pages.render("register", &view)?.into_response())
}

#[derive(Serialize)]
struct ResearchingView {
    title: &'static str,
    user: UserView,
    hide_chrome: bool,
    refresh_url: String,
    refresh_after_secs: u64,
}

#[derive(Serialize)]
struct CompleteView {
    title: &'static str,
    user: UserView,
    project: Option<ProjectView>,
    results_url: String,
}

#[derive(Debug, Serialize)]
struct Choice {
    value: String,
    selected: bool,
}

#[derive(Debug, Serialize)]
struct RegionView {
    name: String,
    all_selected: bool,
    universities: Vec<Choice>,
}

#[derive(Debug, Serialize)]
struct Counts {
    title: usize,
    background: usize,
    business_description: usize,
}

#[derive(Debug, Serialize)]
struct Limits {
    title: usize,
    background: usize,
    business_description: usize,
}

#[derive(Debug, Serialize)]
struct Summary {
    industry: String,
    business_description: String,
}

/// Everything the registration template needs
#[derive(Debug, Serialize)]
pub struct RegisterView {
    title: &'static str,
    draft_title: String,
    user: UserView,
    hide_chrome: bool,
    background: String,
    business_description: String,
    deadline: Option<String>,
    counts: Counts,
    limits: Limits,
    industries: Vec<Choice>,
    regions: Vec<RegionView>,
    all_universities: bool,
    sentinel_hidden: bool,
    university_summary: String,
    levels: Vec<Choice>,
    all_levels_selected: bool,
    level_summary: String,
    summary: Summary,
    error: Option<String>,
    confirm_assist: bool,
    assist_result: bool,
    confirm_research: bool,
    suggestion: Option<String>,
    suggestion_applicable: bool,
}

impl RegisterView {
    fn new(workflow: &RegistrationWorkflow, catalog: &UniversityCatalog, user: UserView) -> Self {
        let draft = workflow.draft();
        let state = workflow.state();
        let (suggestion, suggestion_applicable) = match state {
            WorkflowState::AssistResult {
                suggestion,
                applicable,
            } => (Some(suggestion.clone()), *applicable),
            _ => (None, false),
        };

        let regions = catalog
            .regions()
            .map(|(name, members)| RegionView {
                name: name.to_string(),
                all_selected: !members.is_empty()
                    && members.iter().all(|u| draft.universities.is_selected(u, catalog)),
                universities: members
                    .iter()
                    .map(|u| Choice {
                        value: u.clone(),
                        selected: draft.universities.is_selected(u, catalog),
                    })
                    .collect(),
            })
            .collect();

        Self {
            title: "案件登録",
            draft_title: draft.title.clone(),
            user,
            hide_chrome: state.is_processing(),
            background: draft.background.clone(),
            business_description: draft.business_description.clone(),
            deadline: draft.deadline.clone(),
            counts: Counts {
                title: draft.title.chars().count(),
                background: draft.background.chars().count(),
                business_description: draft.business_description.chars().count(),
            },
            limits: Limits {
                title: TITLE_MAX_CHARS,
                background: BACKGROUND_MAX_CHARS,
                business_description: BUSINESS_DESCRIPTION_MAX_CHARS,
            },
            industries: INDUSTRY_CATEGORIES
                .iter()
                .map(|industry| Choice {
                    value: industry.to_string(),
                    selected: draft.industry.as_str() == *industry,
                })
                .collect(),
            regions,
            all_universities: draft.universities.is_all(),
            sentinel_hidden: draft.universities.is_all() && catalog.is_empty(),
            university_summary: draft.universities.summary(catalog),
            levels: ResearcherLevel::ALL
                .iter()
                .map(|level| Choice {
                    value: level.label().to_string(),
                    selected: draft.researcher_levels.contains(level),
                })
                .collect(),
            all_levels_selected: draft.all_researcher_levels_selected(),
            level_summary: draft.researcher_level_summary(),
            summary: Summary {
                industry: display_or_unspecified(draft.industry.as_str()),
                business_description: display_or_unspecified(&draft.business_description),
            },
            error: workflow.error().map(str::to_string),
            confirm_assist: matches!(state, WorkflowState::ConfirmAssist),
            assist_result: matches!(state, WorkflowState::AssistResult { .. }),
            confirm_research: matches!(state, WorkflowState::ConfirmResearch),
            suggestion,
            suggestion_applicable,
        }
    }
}

fn display_or_unspecified(value: &str) -> String {
    if value.trim().is_empty() {
        kenq_domain::messages::NOT_SPECIFIED.to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn catalog() -> UniversityCatalog {
        let mut regions = BTreeMap::new();
        regions.insert("関東".to_string(), vec!["東京大学".to_string(), "筑波大学".to_string()]);
        regions.insert("近畿".to_string(), vec!["京都大学".to_string()]);
        UniversityCatalog::new(regions)
    }

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_rebuilds_draft() {
        let submission = Submission::parse(
            pairs(&[
                ("title", "冷却技術の共同研究"),
                ("background", "背景"),
                ("industry", "電気機器"),
                ("university", "東京大学"),
                ("researcher_level", "教授"),
                ("researcher_level", "准教授"),
                ("researcher_level", "教授"),
                ("step", "submit"),
            ]),
            &catalog(),
        )
        .unwrap();

        assert_eq!(submission.step, Step::Submit);
        assert_eq!(submission.draft.title, "冷却技術の共同研究");
        assert_eq!(submission.draft.industry.as_str(), "電気機器");
        assert_eq!(
            submission.draft.researcher_levels,
            vec![ResearcherLevel::Professor, ResearcherLevel::AssociateProfessor]
        );
        assert_eq!(
            submission.draft.universities,
            UniversitySelection::Listed(vec!["東京大学".to_string()])
        );
    }

    #[test]
    fn test_parse_compresses_full_catalog() {
        let submission = Submission::parse(
            pairs(&[
                ("university", "東京大学"),
                ("university", "筑波大学"),
                ("university", "京都大学"),
            ]),
            &catalog(),
        )
        .unwrap();
        assert!(submission.draft.universities.is_all());
        assert_eq!(submission.step, Step::Edit);
    }

    #[test]
    fn test_parse_rejects_unknown_values() {
        assert!(Submission::parse(pairs(&[("industry", "宇宙開発")]), &catalog()).is_err());
        assert!(Submission::parse(pairs(&[("researcher_level", "学生")]), &catalog()).is_err());
        assert!(Submission::parse(pairs(&[("step", "explode")]), &catalog()).is_err());
    }

    #[test]
    fn test_step_origin() {
        assert_eq!(Step::ConfirmAssist.origin(None), WorkflowState::ConfirmAssist);
        assert_eq!(
            Step::ApplySuggestion.origin(Some("提案".into())),
            WorkflowState::AssistResult {
                suggestion: "提案".into(),
                applicable: true
            }
        );
        assert_eq!(
            Step::DiscardSuggestion.origin(None),
            WorkflowState::AssistResult {
                suggestion: String::new(),
                applicable: false
            }
        );
        assert_eq!(Step::ToggleRegion("関東".into()).origin(None), WorkflowState::Editing);
        assert_eq!(Step::parse("toggle_region:関東").unwrap(), Step::ToggleRegion("関東".into()));
    }

    #[test]
    fn test_view_marks_region_selection() {
        let mut workflow = RegistrationWorkflow::new();
        let selection = workflow.draft().universities.toggle_region("関東", &catalog());
        workflow.draft_mut().set_universities(selection);
        let view = RegisterView::new(
            &workflow,
            &catalog(),
            UserView {
                name: "田中".into(),
                company_user_name: "tanaka".into(),
            },
        );
        let kanto = view.regions.iter().find(|r| r.name == "関東").unwrap();
        assert!(kanto.all_selected);
        assert!(!view.all_universities);
        assert_eq!(view.university_summary, "東京大学/筑波大学（2校）");
    }
}
