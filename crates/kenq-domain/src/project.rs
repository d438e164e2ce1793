//! Projects and matching results as returned by the backend
//!
//! The backend owns these records; the portal only reads them. Every optional
//! field tolerates `null`, and fields the portal does not know about are kept
//! so proxy routes and pages never drop data.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::{messages::NOT_SPECIFIED, universities::UniversitySelection};

fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Backend ids arrive as numbers or strings depending on the endpoint
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}

/// A registered research-outsourcing project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(deserialize_with = "string_or_number")]
    pub project_id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub project_title: String,
    #[serde(default, deserialize_with = "nullable")]
    pub project_content: String,
    #[serde(default, deserialize_with = "nullable")]
    pub industry_category: String,
    #[serde(default, deserialize_with = "nullable")]
    pub business_description: String,
    #[serde(default)]
    pub university: UniversitySelection,
    #[serde(default, deserialize_with = "nullable")]
    pub preferred_researcher_level: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_user_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favorite_count: Option<u32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Project {
    /// Registration date formatted for display, or the raw value when it cannot be parsed
    pub fn registered_on(&self) -> Option<String> {
        let raw = self.created_at.as_deref()?;
        let parsed = DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc).date_naive())
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|dt| dt.date()))
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").map(|dt| dt.date()))
            .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"));
        Some(match parsed {
            Ok(date) => date.format("%Y/%m/%d").to_string(),
            Err(_) => raw.to_string(),
        })
    }

    pub fn industry_display(&self) -> &str {
        display_or_unspecified(&self.industry_category)
    }

    pub fn business_description_display(&self) -> &str {
        display_or_unspecified(&self.business_description)
    }

    pub fn researcher_level_display(&self) -> String {
        if self.preferred_researcher_level.is_empty() {
            NOT_SPECIFIED.to_string()
        } else {
            self.preferred_researcher_level.join("/")
        }
    }
}

fn display_or_unspecified(value: &str) -> &str {
    if value.trim().is_empty() {
        NOT_SPECIFIED
    } else {
        value
    }
}

/// Response of `GET /project-info/:companyId`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectList {
    #[serde(default, deserialize_with = "nullable")]
    pub projects: Vec<Project>,
}

impl ProjectList {
    pub fn find(&self, project_id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.project_id == project_id)
    }
}

/// A researcher the backend matched to a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchingResult {
    #[serde(default, deserialize_with = "string_or_number")]
    pub matching_id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub researcher_name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub university: String,
    #[serde(default, deserialize_with = "nullable")]
    pub affiliation: String,
    #[serde(default, deserialize_with = "nullable")]
    pub position: String,
    #[serde(default, deserialize_with = "nullable")]
    pub research_field: String,
    #[serde(default, deserialize_with = "nullable")]
    pub matching_reason: String,
    #[serde(default, deserialize_with = "nullable")]
    pub favorite_status: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Matching results for one project
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MatchingResults(pub Vec<MatchingResult>);

#[derive(Deserialize)]
#[serde(untagged)]
enum MatchingResultsShape {
    Bare(Vec<MatchingResult>),
    Wrapped {
        #[serde(alias = "results", default, deserialize_with = "nullable")]
        matching_results: Vec<MatchingResult>,
    },
}

impl<'de> Deserialize<'de> for MatchingResults {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match MatchingResultsShape::deserialize(deserializer)? {
            MatchingResultsShape::Bare(results) => MatchingResults(results),
            MatchingResultsShape::Wrapped { matching_results } => MatchingResults(matching_results),
        })
    }
}

impl MatchingResults {
    pub fn iter(&self) -> impl Iterator<Item = &MatchingResult> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_project_tolerates_nulls_and_numeric_ids() {
        let project: Project = serde_json::from_value(json!({
            "project_id": 42,
            "project_title": "省電力化",
            "project_content": null,
            "university": ["全大学"],
            "preferred_researcher_level": null,
            "favorite_count": 3,
            "status": "matched"
        }))
        .unwrap();
        assert_eq!(project.project_id, "42");
        assert_eq!(project.project_content, "");
        assert!(project.university.is_all());
        assert_eq!(project.researcher_level_display(), "未指定");
        assert_eq!(project.industry_display(), "未指定");
        assert_eq!(project.extra["status"], "matched");
    }

    #[test]
    fn test_registered_on_formats() {
        let mut project: Project = serde_json::from_value(json!({"project_id": "1"})).unwrap();
        assert_eq!(project.registered_on(), None);
        project.created_at = Some("2026-04-01T09:30:00Z".into());
        assert_eq!(project.registered_on().as_deref(), Some("2026/04/01"));
        project.created_at = Some("2026-04-01 09:30:00".into());
        assert_eq!(project.registered_on().as_deref(), Some("2026/04/01"));
        project.created_at = Some("先週".into());
        assert_eq!(project.registered_on().as_deref(), Some("先週"));
    }

    #[test]
    fn test_project_list_find() {
        let list: ProjectList = serde_json::from_value(json!({
            "projects": [{"project_id": 1}, {"project_id": "2"}]
        }))
        .unwrap();
        assert!(list.find("2").is_some());
        assert!(list.find("3").is_none());
    }

    #[test]
    fn test_project_list_survives_odd_university_shapes() {
        let list: ProjectList = serde_json::from_value(json!({
            "projects": [
                {"project_id": 1},
                {"project_id": 2, "university": "全大学"},
                {"project_id": 3, "university": 7}
            ]
        }))
        .unwrap();
        assert!(list.find("2").unwrap().university.is_all());
        assert!(list.find("3").unwrap().university.is_empty());
    }

    #[test]
    fn test_matching_results_shapes() {
        let bare: MatchingResults =
            serde_json::from_value(json!([{"matching_id": 7, "researcher_name": "山田"}])).unwrap();
        assert_eq!(bare.len(), 1);
        assert_eq!(bare.0[0].matching_id, "7");

        let wrapped: MatchingResults = serde_json::from_value(json!({
            "matching_results": [{"matching_id": "8", "favorite_status": true}]
        }))
        .unwrap();
        assert!(wrapped.0[0].favorite_status);

        let aliased: MatchingResults =
            serde_json::from_value(json!({"results": [{"matching_id": 9}]})).unwrap();
        assert_eq!(aliased.0[0].matching_id, "9");
    }
}
