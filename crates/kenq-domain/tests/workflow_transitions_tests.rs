//! Registration workflow transition tests

use kenq_domain::{
    messages,
    workflow::RESEARCH_SETTLE_DELAY,
    DomainError, FormDraft, RegistrationWorkflow, ResearcherLevel, UniversitySelection,
    WorkflowEffect, WorkflowEvent, WorkflowState,
};
use serde_json::json;

fn complete_draft() -> FormDraft {
    let mut draft = FormDraft::new();
    draft.set_title("廃熱回収の高効率化");
    draft.set_background("工場の廃熱を再利用する技術を探しています");
    draft.set_universities(UniversitySelection::Listed(vec!["東北大学".into()]));
    draft.toggle_researcher_level(ResearcherLevel::AssociateProfessor);
    draft
}

#[test]
fn test_assist_round_trip_merges_suggestion() {
    let mut workflow = RegistrationWorkflow::resume(complete_draft(), WorkflowState::Editing);

    assert_eq!(workflow.handle(WorkflowEvent::RequestAssist).unwrap(), None);
    assert_eq!(workflow.state(), &WorkflowState::ConfirmAssist);

    let effect = workflow.handle(WorkflowEvent::ConfirmAssist).unwrap();
    match effect {
        Some(WorkflowEffect::RequestAiDiagnosis(request)) => {
            assert_eq!(request.project_title, "廃熱回収の高効率化");
            assert_eq!(request.application_deadline, "2099-12-31");
        }
        other => panic!("unexpected effect: {other:?}"),
    }
    assert_eq!(workflow.state(), &WorkflowState::AssistLoading);

    workflow
        .handle(WorkflowEvent::AssistSucceeded(json!({"message": "「詳しい案件内容」"})))
        .unwrap();
    assert_eq!(
        workflow.state(),
        &WorkflowState::AssistResult {
            suggestion: "詳しい案件内容".into(),
            applicable: true
        }
    );

    workflow.handle(WorkflowEvent::ApplySuggestion).unwrap();
    assert_eq!(workflow.state(), &WorkflowState::Editing);
    assert_eq!(workflow.draft().background, "詳しい案件内容");
}

#[test]
fn test_discarding_suggestion_keeps_background() {
    let mut workflow = RegistrationWorkflow::resume(
        complete_draft(),
        WorkflowState::AssistResult {
            suggestion: "別案".into(),
            applicable: true,
        },
    );
    workflow.handle(WorkflowEvent::DiscardSuggestion).unwrap();
    assert_eq!(workflow.state(), &WorkflowState::Editing);
    assert_eq!(workflow.draft().background, complete_draft().background);
}

#[test]
fn test_assist_without_title_stays_editing() {
    let mut workflow = RegistrationWorkflow::new();
    workflow.handle(WorkflowEvent::RequestAssist).unwrap();
    assert_eq!(workflow.state(), &WorkflowState::Editing);
    assert_eq!(workflow.error(), Some(messages::ASSIST_REQUIRES_TITLE_AND_CONTENT));

    workflow.handle(WorkflowEvent::DismissError).unwrap();
    assert_eq!(workflow.error(), None);
}

#[test]
fn test_failed_assist_cannot_be_applied() {
    let mut workflow = RegistrationWorkflow::resume(complete_draft(), WorkflowState::AssistLoading);
    workflow.handle(WorkflowEvent::AssistFailed).unwrap();
    assert_eq!(
        workflow.state(),
        &WorkflowState::AssistResult {
            suggestion: messages::DIAGNOSIS_ERROR.into(),
            applicable: false
        }
    );

    let err = workflow.handle(WorkflowEvent::ApplySuggestion).unwrap_err();
    assert!(matches!(err, DomainError::InvalidTransition { .. }));
    assert_eq!(workflow.draft().background, complete_draft().background);
}

#[test]
fn test_cancel_assist_returns_to_editing() {
    let mut workflow = RegistrationWorkflow::resume(complete_draft(), WorkflowState::ConfirmAssist);
    workflow.handle(WorkflowEvent::CancelAssist).unwrap();
    assert_eq!(workflow.state(), &WorkflowState::Editing);
}

#[test]
fn test_full_registration_path() {
    let mut workflow = RegistrationWorkflow::resume(complete_draft(), WorkflowState::Editing);

    workflow.handle(WorkflowEvent::Submit).unwrap();
    assert_eq!(workflow.state(), &WorkflowState::ConfirmResearch);

    let effect = workflow.handle(WorkflowEvent::ConfirmResearch).unwrap();
    assert!(matches!(effect, Some(WorkflowEffect::RegisterProject(_))));
    assert_eq!(workflow.state(), &WorkflowState::Researching { project_id: None });

    let effect = workflow
        .handle(WorkflowEvent::RegistrationSucceeded(json!({"project_id": 31})))
        .unwrap();
    assert_eq!(
        effect,
        Some(WorkflowEffect::ScheduleSettle {
            project_id: "31".into(),
            after: RESEARCH_SETTLE_DELAY
        })
    );

    workflow.handle(WorkflowEvent::ResearchSettled).unwrap();
    assert_eq!(
        workflow.state(),
        &WorkflowState::Completed {
            project_id: "31".into()
        }
    );

    let effect = workflow.handle(WorkflowEvent::ProceedToResults).unwrap();
    assert_eq!(effect, Some(WorkflowEffect::NavigateToProject("31".into())));
}

#[test]
fn test_submit_with_missing_fields_reports_them() {
    let mut draft = FormDraft::new();
    draft.set_title("タイトルのみ");
    let mut workflow = RegistrationWorkflow::resume(draft, WorkflowState::Editing);
    workflow.handle(WorkflowEvent::Submit).unwrap();
    assert_eq!(workflow.state(), &WorkflowState::Editing);
    assert_eq!(
        workflow.error(),
        Some("必須項目を入力してください：案件内容、大学、研究者階層")
    );
}

#[test]
fn test_cancel_research_returns_to_editing() {
    let mut workflow = RegistrationWorkflow::resume(complete_draft(), WorkflowState::ConfirmResearch);
    workflow.handle(WorkflowEvent::CancelResearch).unwrap();
    assert_eq!(workflow.state(), &WorkflowState::Editing);
}

#[test]
fn test_registration_failure_returns_to_editing_with_error() {
    let mut workflow = RegistrationWorkflow::resume(
        complete_draft(),
        WorkflowState::Researching { project_id: None },
    );
    workflow.handle(WorkflowEvent::RegistrationFailed).unwrap();
    assert_eq!(workflow.state(), &WorkflowState::Editing);
    assert_eq!(workflow.error(), Some(messages::REGISTRATION_ERROR));
}

#[test]
fn test_registration_without_id_is_a_failure() {
    let mut workflow = RegistrationWorkflow::resume(
        complete_draft(),
        WorkflowState::Researching { project_id: None },
    );
    let effect = workflow
        .handle(WorkflowEvent::RegistrationSucceeded(json!({"status": "ok"})))
        .unwrap();
    assert_eq!(effect, None);
    assert_eq!(workflow.state(), &WorkflowState::Editing);
    assert_eq!(workflow.error(), Some(messages::REGISTRATION_ERROR));
}

#[test]
fn test_invalid_transitions_leave_state_untouched() {
    let cases = vec![
        (WorkflowState::Editing, WorkflowEvent::ConfirmResearch),
        (WorkflowState::Editing, WorkflowEvent::ApplySuggestion),
        (WorkflowState::ConfirmAssist, WorkflowEvent::Submit),
        (WorkflowState::AssistLoading, WorkflowEvent::CancelAssist),
        (
            WorkflowState::Researching { project_id: None },
            WorkflowEvent::ResearchSettled,
        ),
        (
            WorkflowState::Completed {
                project_id: "1".into(),
            },
            WorkflowEvent::Submit,
        ),
    ];

    for (state, event) in cases {
        let mut workflow = RegistrationWorkflow::resume(complete_draft(), state.clone());
        let result = workflow.handle(event.clone());
        assert!(
            matches!(result, Err(DomainError::InvalidTransition { .. })),
            "{event:?} in {state:?} should be rejected"
        );
        assert_eq!(workflow.state(), &state);
        assert_eq!(workflow.draft(), &complete_draft());
    }
}

#[test]
fn test_confirming_assist_rechecks_the_draft() {
    let mut workflow = RegistrationWorkflow::resume(FormDraft::new(), WorkflowState::ConfirmAssist);
    assert_eq!(workflow.handle(WorkflowEvent::ConfirmAssist).unwrap(), None);
    assert_eq!(workflow.state(), &WorkflowState::Editing);
    assert_eq!(workflow.error(), Some(messages::ASSIST_REQUIRES_TITLE_AND_CONTENT));
}

#[test]
fn test_confirming_research_rechecks_the_draft() {
    let mut draft = complete_draft();
    draft.set_universities(UniversitySelection::default());
    let mut workflow = RegistrationWorkflow::resume(draft, WorkflowState::ConfirmResearch);
    assert_eq!(workflow.handle(WorkflowEvent::ConfirmResearch).unwrap(), None);
    assert_eq!(workflow.state(), &WorkflowState::Editing);
    assert_eq!(
        workflow.error(),
        Some(format!("{}{}", messages::REQUIRED_FIELDS_PREFIX, messages::FIELD_UNIVERSITY).as_str())
    );
}
