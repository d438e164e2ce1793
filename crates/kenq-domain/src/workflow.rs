//! Registration workflow state machine
//!
//! ```text
//! Editing -> ConfirmAssist -> AssistLoading -> AssistResult -> Editing
//! Editing -> ConfirmResearch -> Researching -> Completed -> (project page)
//! ```
//!
//! The machine is pure: transitions that need the backend return a
//! [`WorkflowEffect`], and the caller reports the outcome back as another
//! event. Rejected transitions leave the workflow untouched.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::{
    draft::{AiDiagnosisRequest, FormDraft, ProjectRegistrationRequest},
    errors::{DomainError, DomainResult},
    messages,
};

/// Fixed pause between a successful registration and the completed view
pub const RESEARCH_SETTLE_DELAY: Duration = Duration::from_secs(3);

/// View state of the registration form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum WorkflowState {
    #[default]
    Editing,
    ConfirmAssist,
    AssistLoading,
    /// `applicable` is false when the suggestion is an error notice
    AssistResult { suggestion: String, applicable: bool },
    ConfirmResearch,
    /// `project_id` is known once the backend accepted the registration
    Researching { project_id: Option<String> },
    Completed { project_id: String },
}

impl WorkflowState {
    pub fn name(&self) -> &'static str {
        match self {
            WorkflowState::Editing => "editing",
            WorkflowState::ConfirmAssist => "confirm_assist",
            WorkflowState::AssistLoading => "assist_loading",
            WorkflowState::AssistResult { .. } => "assist_result",
            WorkflowState::ConfirmResearch => "confirm_research",
            WorkflowState::Researching { .. } => "researching",
            WorkflowState::Completed { .. } => "completed",
        }
    }

    /// Whether the page should hide its chrome while this state is shown
    pub fn is_processing(&self) -> bool {
        !matches!(self, WorkflowState::Editing)
    }
}

/// User actions and backend outcomes fed into the workflow
#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowEvent {
    RequestAssist,
    CancelAssist,
    ConfirmAssist,
    AssistSucceeded(Value),
    AssistFailed,
    ApplySuggestion,
    DiscardSuggestion,
    Submit,
    CancelResearch,
    ConfirmResearch,
    RegistrationSucceeded(Value),
    RegistrationFailed,
    ResearchSettled,
    ProceedToResults,
    DismissError,
}

impl WorkflowEvent {
    pub fn name(&self) -> &'static str {
        match self {
            WorkflowEvent::RequestAssist => "request_assist",
            WorkflowEvent::CancelAssist => "cancel_assist",
            WorkflowEvent::ConfirmAssist => "confirm_assist",
            WorkflowEvent::AssistSucceeded(_) => "assist_succeeded",
            WorkflowEvent::AssistFailed => "assist_failed",
            WorkflowEvent::ApplySuggestion => "apply_suggestion",
            WorkflowEvent::DiscardSuggestion => "discard_suggestion",
            WorkflowEvent::Submit => "submit",
            WorkflowEvent::CancelResearch => "cancel_research",
            WorkflowEvent::ConfirmResearch => "confirm_research",
            WorkflowEvent::RegistrationSucceeded(_) => "registration_succeeded",
            WorkflowEvent::RegistrationFailed => "registration_failed",
            WorkflowEvent::ResearchSettled => "research_settled",
            WorkflowEvent::ProceedToResults => "proceed_to_results",
            WorkflowEvent::DismissError => "dismiss_error",
        }
    }
}

/// Side effects the caller must perform after a transition
#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowEffect {
    RequestAiDiagnosis(AiDiagnosisRequest),
    RegisterProject(ProjectRegistrationRequest),
    /// Report [`WorkflowEvent::ResearchSettled`] after the delay
    ScheduleSettle { project_id: String, after: Duration },
    NavigateToProject(String),
}

/// Extract the suggestion text from an AI-assist response
///
/// Uses `message` when present, the body itself when it is a bare string, and
/// strips the corner brackets the model tends to wrap its answer in.
pub fn clean_diagnosis(response: &Value) -> String {
    let raw = match response {
        Value::Object(map) => map.get("message").and_then(Value::as_str),
        Value::String(s) => Some(s.as_str()),
        _ => None,
    };
    match raw {
        Some(text) if !text.is_empty() => {
            let text = text.strip_prefix('「').unwrap_or(text);
            let text = text.strip_suffix('」').unwrap_or(text);
            text.trim().to_string()
        }
        _ => messages::DIAGNOSIS_UNAVAILABLE.to_string(),
    }
}

/// Project id from a registration response: `project_id`, then `id`
pub fn registered_project_id(response: &Value) -> Option<String> {
    ["project_id", "id"]
        .iter()
        .filter_map(|key| response.get(key))
        .find_map(|value| match value {
            Value::Number(n) => Some(n.to_string()),
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            _ => None,
        })
}

/// The registration form and its current view state
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RegistrationWorkflow {
    draft: FormDraft,
    state: WorkflowState,
    error: Option<String>,
}

impl RegistrationWorkflow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Continue a workflow whose draft and state were carried by the client
    pub fn resume(draft: FormDraft, state: WorkflowState) -> Self {
        Self {
            draft,
            state,
            error: None,
        }
    }

    pub fn draft(&self) -> &FormDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut FormDraft {
        &mut self.draft
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    /// Validation or registration message to show in the error popup
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Apply an event, returning the effect the caller has to carry out
    pub fn handle(&mut self, event: WorkflowEvent) -> DomainResult<Option<WorkflowEffect>> {
        let from = self.state.name();
        let event_name = event.name();
        let effect = self.transition(event)?;
        debug!(from, to = self.state.name(), event = event_name, "registration workflow transition");
        Ok(effect)
    }

    fn transition(&mut self, event: WorkflowEvent) -> DomainResult<Option<WorkflowEffect>> {
        use WorkflowEvent as E;
        use WorkflowState as S;

        let state = std::mem::replace(&mut self.state, S::Editing);
        let (next, effect) = match (state, event) {
            (state, E::DismissError) => {
                self.error = None;
                (state, None)
            }

            (S::Editing, E::RequestAssist) => match self.draft.assist_error() {
                Some(message) => {
                    self.error = Some(message);
                    (S::Editing, None)
                }
                None => (S::ConfirmAssist, None),
            },
            (S::ConfirmAssist, E::CancelAssist) => (S::Editing, None),
            // Confirmation may be resumed with a different draft, so it is validated again
            (S::ConfirmAssist, E::ConfirmAssist) => match self.draft.assist_error() {
                Some(message) => {
                    self.error = Some(message);
                    (S::Editing, None)
                }
                None => (
                    S::AssistLoading,
                    Some(WorkflowEffect::RequestAiDiagnosis(self.draft.ai_diagnosis_request())),
                ),
            },
            (S::AssistLoading, E::AssistSucceeded(response)) => (
                S::AssistResult {
                    suggestion: clean_diagnosis(&response),
                    applicable: true,
                },
                None,
            ),
            (S::AssistLoading, E::AssistFailed) => (
                S::AssistResult {
                    suggestion: messages::DIAGNOSIS_ERROR.to_string(),
                    applicable: false,
                },
                None,
            ),
            (S::AssistResult { suggestion, applicable: true }, E::ApplySuggestion) => {
                self.draft.set_background(&suggestion);
                (S::Editing, None)
            }
            (S::AssistResult { .. }, E::DiscardSuggestion) => (S::Editing, None),

            (S::Editing, E::Submit) => match self.draft.submission_error() {
                Some(message) => {
                    self.error = Some(message);
                    (S::Editing, None)
                }
                None => (S::ConfirmResearch, None),
            },
            (S::ConfirmResearch, E::CancelResearch) => (S::Editing, None),
            (S::ConfirmResearch, E::ConfirmResearch) => match self.draft.submission_error() {
                Some(message) => {
                    self.error = Some(message);
                    (S::Editing, None)
                }
                None => (
                    S::Researching { project_id: None },
                    Some(WorkflowEffect::RegisterProject(self.draft.registration_request())),
                ),
            },
            (S::Researching { project_id: None }, E::RegistrationSucceeded(response)) => {
                match registered_project_id(&response) {
                    Some(project_id) => (
                        S::Researching {
                            project_id: Some(project_id.clone()),
                        },
                        Some(WorkflowEffect::ScheduleSettle {
                            project_id,
                            after: RESEARCH_SETTLE_DELAY,
                        }),
                    ),
                    None => {
                        self.error = Some(messages::REGISTRATION_ERROR.to_string());
                        (S::Editing, None)
                    }
                }
            }
            (S::Researching { project_id: None }, E::RegistrationFailed) => {
                self.error = Some(messages::REGISTRATION_ERROR.to_string());
                (S::Editing, None)
            }
            (S::Researching { project_id: Some(project_id) }, E::ResearchSettled) => {
                (S::Completed { project_id }, None)
            }
            (S::Completed { project_id }, E::ProceedToResults) => {
                let effect = WorkflowEffect::NavigateToProject(project_id.clone());
                (S::Completed { project_id }, Some(effect))
            }

            (state, event) => {
                let error = DomainError::InvalidTransition {
                    state: state.name().to_string(),
                    event: event.name().to_string(),
                };
                self.state = state;
                return Err(error);
            }
        };
        self.state = next;
        Ok(effect)
    }
}
