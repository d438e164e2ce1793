//! KenQ portal domain model
//!
//! Presentational shapes for projects and matching results, the registration
//! form draft with its field rules, university selection, and the
//! registration workflow state machine. Nothing in this crate performs I/O;
//! callers feed backend outcomes into the workflow as events.

pub mod catalog;
pub mod draft;
pub mod errors;
pub mod messages;
pub mod project;
pub mod universities;
pub mod workflow;

pub use catalog::{IndustryCategory, ResearcherLevel};
pub use draft::{AiDiagnosisRequest, FormDraft, ProjectRegistrationRequest};
pub use errors::{DomainError, DomainResult};
pub use project::{MatchingResult, MatchingResults, Project, ProjectList};
pub use universities::{UniversityCatalog, UniversitySelection, ALL_UNIVERSITIES};
pub use workflow::{RegistrationWorkflow, WorkflowEffect, WorkflowEvent, WorkflowState};
