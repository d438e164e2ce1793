//! Registration form draft
//!
//! The draft lives only as long as the user is filling the form. Text fields
//! are clipped to their limits on every write, so a draft never holds an
//! over-long value.

use serde::{Deserialize, Serialize};

use crate::{
    catalog::{IndustryCategory, ResearcherLevel},
    messages,
    universities::UniversitySelection,
};

pub const TITLE_MAX_CHARS: usize = 40;
pub const BACKGROUND_MAX_CHARS: usize = 2000;
pub const BUSINESS_DESCRIPTION_MAX_CHARS: usize = 100;

/// Deadline sent with AI-assist requests when the user left it blank
pub const DEFAULT_APPLICATION_DEADLINE: &str = "2099-12-31";

/// Clip `value` to at most `max` characters
pub fn truncate_chars(value: &str, max: usize) -> String {
    match value.char_indices().nth(max) {
        Some((index, _)) => value[..index].to_string(),
        None => value.to_string(),
    }
}

/// In-memory state of the registration form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormDraft {
    pub title: String,
    pub background: String,
    pub industry: IndustryCategory,
    pub business_description: String,
    pub universities: UniversitySelection,
    pub researcher_levels: Vec<ResearcherLevel>,
    pub deadline: Option<String>,
}

impl FormDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_title(&mut self, value: &str) {
        self.title = truncate_chars(value, TITLE_MAX_CHARS);
    }

    pub fn set_background(&mut self, value: &str) {
        self.background = truncate_chars(value, BACKGROUND_MAX_CHARS);
    }

    pub fn set_business_description(&mut self, value: &str) {
        self.business_description = truncate_chars(value, BUSINESS_DESCRIPTION_MAX_CHARS);
    }

    pub fn set_industry(&mut self, industry: IndustryCategory) {
        self.industry = industry;
    }

    pub fn set_universities(&mut self, universities: UniversitySelection) {
        self.universities = universities;
    }

    pub fn set_deadline(&mut self, value: &str) {
        let value = value.trim();
        self.deadline = (!value.is_empty()).then(|| value.to_string());
    }

    pub fn toggle_researcher_level(&mut self, level: ResearcherLevel) {
        if let Some(index) = self.researcher_levels.iter().position(|l| *l == level) {
            self.researcher_levels.remove(index);
        } else {
            self.researcher_levels.push(level);
        }
    }

    /// "Select all" checkbox for researcher levels
    pub fn set_all_researcher_levels(&mut self, selected: bool) {
        self.researcher_levels = if selected {
            ResearcherLevel::ALL.to_vec()
        } else {
            Vec::new()
        };
    }

    pub fn all_researcher_levels_selected(&self) -> bool {
        ResearcherLevel::ALL
            .iter()
            .all(|level| self.researcher_levels.contains(level))
    }

    /// Reason the AI-assist button cannot be used yet
    pub fn assist_error(&self) -> Option<String> {
        if self.title.trim().is_empty() || self.background.trim().is_empty() {
            Some(messages::ASSIST_REQUIRES_TITLE_AND_CONTENT.to_string())
        } else {
            None
        }
    }

    /// Labels of required fields that are still empty, in form order
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.title.trim().is_empty() {
            missing.push(messages::FIELD_TITLE);
        }
        if self.background.trim().is_empty() {
            missing.push(messages::FIELD_BACKGROUND);
        }
        if self.universities.is_empty() {
            missing.push(messages::FIELD_UNIVERSITY);
        }
        if self.researcher_levels.is_empty() {
            missing.push(messages::FIELD_RESEARCHER_LEVEL);
        }
        missing
    }

    /// Reason the draft cannot be submitted yet
    pub fn submission_error(&self) -> Option<String> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            None
        } else {
            Some(format!(
                "{}{}",
                messages::REQUIRED_FIELDS_PREFIX,
                missing.join("、")
            ))
        }
    }

    pub fn researcher_level_summary(&self) -> String {
        if self.researcher_levels.is_empty() {
            messages::NOT_SPECIFIED.to_string()
        } else {
            format!("{}項目", self.researcher_levels.len())
        }
    }

    pub fn ai_diagnosis_request(&self) -> AiDiagnosisRequest {
        AiDiagnosisRequest {
            project_title: self.title.clone(),
            project_content: self.background.clone(),
            industry_category: self.industry.as_str().to_string(),
            business_description: self.business_description.clone(),
            university: self.universities.clone(),
            preferred_researcher_level: self.researcher_levels.clone(),
            application_deadline: self
                .deadline
                .clone()
                .unwrap_or_else(|| DEFAULT_APPLICATION_DEADLINE.to_string()),
        }
    }

    pub fn registration_request(&self) -> ProjectRegistrationRequest {
        ProjectRegistrationRequest {
            project_title: self.title.clone(),
            project_content: self.background.clone(),
            industry_category: self.industry.as_str().to_string(),
            business_description: self.business_description.clone(),
            university: self.universities.clone(),
            preferred_researcher_level: self.researcher_levels.clone(),
        }
    }
}

/// Body of the AI-assist call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiDiagnosisRequest {
    pub project_title: String,
    pub project_content: String,
    pub industry_category: String,
    pub business_description: String,
    pub university: UniversitySelection,
    pub preferred_researcher_level: Vec<ResearcherLevel>,
    pub application_deadline: String,
}

/// Body of the project registration call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRegistrationRequest {
    pub project_title: String,
    pub project_content: String,
    pub industry_category: String,
    pub business_description: String,
    pub university: UniversitySelection,
    pub preferred_researcher_level: Vec<ResearcherLevel>,
}
