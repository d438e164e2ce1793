//! Target-university selection
//!
//! The backend understands either an explicit list of university names or the
//! single sentinel [`ALL_UNIVERSITIES`]. The form works on the expanded list;
//! a selection covering the whole catalog is always compressed back to the
//! sentinel before it leaves the portal.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::{
    errors::{DomainError, DomainResult},
    messages::NOT_SPECIFIED,
};

/// Sentinel meaning "every university in the catalog"
pub const ALL_UNIVERSITIES: &str = "全大学";

/// Universities grouped by region, as shipped in `universities_by_subregion.json`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UniversityCatalog {
    regions: BTreeMap<String, Vec<String>>,
}

impl UniversityCatalog {
    pub fn new(regions: BTreeMap<String, Vec<String>>) -> Self {
        Self { regions }
    }

    /// Parse the region → universities JSON document
    pub fn from_json(json: &str) -> DomainResult<Self> {
        serde_json::from_str(json).map_err(|e| DomainError::Catalog(e.to_string()))
    }

    pub fn regions(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.regions
            .iter()
            .map(|(region, universities)| (region.as_str(), universities.as_slice()))
    }

    pub fn region(&self, name: &str) -> Option<&[String]> {
        self.regions.get(name).map(Vec::as_slice)
    }

    /// Every university, region by region
    pub fn all(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.regions
            .values()
            .flatten()
            .filter(|name| seen.insert(name.as_str()))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.all().len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.values().all(Vec::is_empty)
    }

    pub fn contains(&self, university: &str) -> bool {
        self.regions.values().flatten().any(|name| name == university)
    }

    fn covers(&self, selected: &[String]) -> bool {
        if self.is_empty() {
            return false;
        }
        let selected: HashSet<&str> = selected.iter().map(String::as_str).collect();
        self.regions
            .values()
            .flatten()
            .all(|name| selected.contains(name.as_str()))
    }
}

/// Universities a project targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UniversitySelection {
    All,
    Listed(Vec<String>),
}

impl Default for UniversitySelection {
    fn default() -> Self {
        UniversitySelection::Listed(Vec::new())
    }
}

impl UniversitySelection {
    /// Build a selection from submitted values, compressing to [`UniversitySelection::All`]
    /// when the sentinel is present or every catalog entry is selected.
    pub fn from_values<I, S>(values: I, catalog: &UniversityCatalog) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut listed = Vec::new();
        for value in values {
            let value: String = value.into();
            let value = value.trim().to_string();
            if value.is_empty() {
                continue;
            }
            if value == ALL_UNIVERSITIES {
                return UniversitySelection::All;
            }
            if seen.insert(value.clone()) {
                listed.push(value);
            }
        }
        Self::compressed(listed, catalog)
    }

    fn compressed(listed: Vec<String>, catalog: &UniversityCatalog) -> Self {
        if catalog.covers(&listed) {
            UniversitySelection::All
        } else {
            UniversitySelection::Listed(listed)
        }
    }

    /// Values as sent to the backend
    pub fn to_values(&self) -> Vec<String> {
        match self {
            UniversitySelection::All => vec![ALL_UNIVERSITIES.to_string()],
            UniversitySelection::Listed(listed) => listed.clone(),
        }
    }

    /// Concrete universities, with the sentinel expanded through the catalog
    pub fn expand(&self, catalog: &UniversityCatalog) -> Vec<String> {
        match self {
            UniversitySelection::All => catalog.all(),
            UniversitySelection::Listed(listed) => listed.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, UniversitySelection::Listed(listed) if listed.is_empty())
    }

    pub fn is_all(&self) -> bool {
        matches!(self, UniversitySelection::All)
    }

    pub fn is_selected(&self, university: &str, catalog: &UniversityCatalog) -> bool {
        match self {
            UniversitySelection::All => catalog.contains(university),
            UniversitySelection::Listed(listed) => listed.iter().any(|name| name == university),
        }
    }

    /// Number of universities covered by the selection
    pub fn count(&self, catalog: &UniversityCatalog) -> usize {
        match self {
            UniversitySelection::All => catalog.len(),
            UniversitySelection::Listed(listed) => listed.len(),
        }
    }

    /// Select or deselect a single university
    pub fn toggle_university(&self, university: &str, catalog: &UniversityCatalog) -> Self {
        let mut selected = self.expand(catalog);
        if let Some(index) = selected.iter().position(|name| name == university) {
            selected.remove(index);
        } else {
            selected.push(university.to_string());
        }
        Self::compressed(selected, catalog)
    }

    /// Select a whole region, or deselect it when it is already fully selected
    pub fn toggle_region(&self, region: &str, catalog: &UniversityCatalog) -> Self {
        let Some(members) = catalog.region(region) else {
            return self.clone();
        };
        let mut selected = self.expand(catalog);
        let region_selected = members.iter().all(|name| selected.contains(name));
        if region_selected {
            selected.retain(|name| !members.contains(name));
        } else {
            for name in members {
                if !selected.contains(name) {
                    selected.push(name.clone());
                }
            }
        }
        Self::compressed(selected, catalog)
    }

    /// "Select all" checkbox: clears the selection when everything is already selected
    pub fn toggle_all(&self) -> Self {
        if self.is_all() {
            UniversitySelection::default()
        } else {
            UniversitySelection::All
        }
    }

    /// Display line used in summaries and the project detail page
    pub fn summary(&self, catalog: &UniversityCatalog) -> String {
        match self {
            UniversitySelection::All => format!("{ALL_UNIVERSITIES}（{}校）", catalog.len()),
            UniversitySelection::Listed(listed) if listed.is_empty() => NOT_SPECIFIED.to_string(),
            UniversitySelection::Listed(listed) => {
                format!("{}（{}校）", listed.join("/"), listed.len())
            }
        }
    }
}

impl Serialize for UniversitySelection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_values().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for UniversitySelection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // A bare string is one university or the sentinel; other shapes read as unspecified
        let values: Vec<String> = match Value::deserialize(deserializer)? {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(name) => Some(name),
                    _ => None,
                })
                .collect(),
            Value::String(name) if !name.trim().is_empty() => vec![name],
            _ => Vec::new(),
        };
        if values.iter().any(|value| value == ALL_UNIVERSITIES) {
            Ok(UniversitySelection::All)
        } else {
            Ok(UniversitySelection::Listed(values))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> UniversityCatalog {
        UniversityCatalog::from_json(
            r#"{"北海道": ["北海道大学", "小樽商科大学"], "関東": ["東京大学", "筑波大学", "千葉大学"]}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_catalog_len_and_contains() {
        let catalog = catalog();
        assert_eq!(catalog.len(), 5);
        assert!(catalog.contains("筑波大学"));
        assert!(!catalog.contains("京都大学"));
    }

    #[test]
    fn test_sentinel_wins() {
        let selection = UniversitySelection::from_values(["東京大学", ALL_UNIVERSITIES], &catalog());
        assert!(selection.is_all());
    }

    #[test]
    fn test_full_selection_compresses() {
        let catalog = catalog();
        let selection = UniversitySelection::from_values(catalog.all(), &catalog);
        assert_eq!(selection.to_values(), vec![ALL_UNIVERSITIES.to_string()]);
    }

    #[test]
    fn test_toggle_university_from_all() {
        let catalog = catalog();
        let selection = UniversitySelection::All.toggle_university("千葉大学", &catalog);
        assert_eq!(selection.count(&catalog), 4);
        assert!(!selection.is_selected("千葉大学", &catalog));
        assert!(selection.toggle_university("千葉大学", &catalog).is_all());
    }

    #[test]
    fn test_toggle_region() {
        let catalog = catalog();
        let selection = UniversitySelection::default().toggle_region("北海道", &catalog);
        assert_eq!(
            selection,
            UniversitySelection::Listed(vec!["北海道大学".into(), "小樽商科大学".into()])
        );
        assert!(selection.toggle_region("北海道", &catalog).is_empty());
        assert!(selection.toggle_region("関東", &catalog).is_all());
    }

    #[test]
    fn test_toggle_all() {
        assert!(UniversitySelection::default().toggle_all().is_all());
        assert!(UniversitySelection::All.toggle_all().is_empty());
    }

    #[test]
    fn test_summary() {
        let catalog = catalog();
        assert_eq!(UniversitySelection::All.summary(&catalog), "全大学（5校）");
        assert_eq!(UniversitySelection::default().summary(&catalog), "未指定");
        let listed = UniversitySelection::Listed(vec!["東京大学".into(), "筑波大学".into()]);
        assert_eq!(listed.summary(&catalog), "東京大学/筑波大学（2校）");
    }

    #[test]
    fn test_deserialize_accepts_null() {
        let selection: UniversitySelection = serde_json::from_str("null").unwrap();
        assert!(selection.is_empty());
        let selection: UniversitySelection = serde_json::from_str(r#"["全大学"]"#).unwrap();
        assert!(selection.is_all());
    }

    #[test]
    fn test_deserialize_tolerates_non_array_shapes() {
        let selection: UniversitySelection = serde_json::from_str(r#""全大学""#).unwrap();
        assert!(selection.is_all());
        let selection: UniversitySelection = serde_json::from_str(r#""東京大学""#).unwrap();
        assert_eq!(selection, UniversitySelection::Listed(vec!["東京大学".into()]));
        let selection: UniversitySelection = serde_json::from_str(r#"{"name": 1}"#).unwrap();
        assert!(selection.is_empty());
        let selection: UniversitySelection = serde_json::from_str(r#"["京都大学", 3]"#).unwrap();
        assert_eq!(selection, UniversitySelection::Listed(vec!["京都大学".into()]));
    }
}
