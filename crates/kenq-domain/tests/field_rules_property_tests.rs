//! Property-based tests for draft field limits and university selection

use kenq_domain::{
    draft::{truncate_chars, BACKGROUND_MAX_CHARS, BUSINESS_DESCRIPTION_MAX_CHARS, TITLE_MAX_CHARS},
    FormDraft, UniversityCatalog, UniversitySelection, ALL_UNIVERSITIES,
};
use proptest::prelude::*;
use std::collections::BTreeMap;

fn catalog() -> UniversityCatalog {
    let mut regions = BTreeMap::new();
    regions.insert(
        "東北".to_string(),
        vec!["東北大学".to_string(), "岩手大学".to_string(), "山形大学".to_string()],
    );
    regions.insert(
        "近畿".to_string(),
        vec!["京都大学".to_string(), "大阪大学".to_string(), "神戸大学".to_string()],
    );
    UniversityCatalog::new(regions)
}

proptest! {
    /// Truncation never exceeds the limit and is idempotent
    #[test]
    fn prop_truncate_bounded_and_idempotent(value in "\\PC{0,120}", max in 0usize..80) {
        let once = truncate_chars(&value, max);
        prop_assert!(once.chars().count() <= max);
        prop_assert!(value.starts_with(&once));
        prop_assert_eq!(truncate_chars(&once, max), once.clone());
    }

    /// Draft setters always respect the form limits
    #[test]
    fn prop_draft_setters_respect_limits(
        title in "\\PC{0,80}",
        background in "\\PC{0,2100}",
        business in "\\PC{0,200}",
    ) {
        let mut draft = FormDraft::new();
        draft.set_title(&title);
        draft.set_background(&background);
        draft.set_business_description(&business);
        prop_assert!(draft.title.chars().count() <= TITLE_MAX_CHARS);
        prop_assert!(draft.background.chars().count() <= BACKGROUND_MAX_CHARS);
        prop_assert!(draft.business_description.chars().count() <= BUSINESS_DESCRIPTION_MAX_CHARS);
    }

    /// Compressing and expanding a strict subset of the catalog is the identity
    #[test]
    fn prop_subset_round_trips(mask in proptest::collection::vec(any::<bool>(), 6)) {
        let catalog = catalog();
        let all = catalog.all();
        let subset: Vec<String> = all
            .iter()
            .zip(mask.iter())
            .filter(|(_, keep)| **keep)
            .map(|(name, _)| name.clone())
            .collect();

        let selection = UniversitySelection::from_values(subset.clone(), &catalog);
        if subset.len() == all.len() {
            prop_assert!(selection.is_all());
            prop_assert_eq!(selection.to_values(), vec![ALL_UNIVERSITIES.to_string()]);
        } else {
            prop_assert_eq!(selection.expand(&catalog), subset);
        }
    }

    /// Toggling a university twice restores the selection's coverage
    #[test]
    fn prop_toggle_university_twice(mask in proptest::collection::vec(any::<bool>(), 6), pick in 0usize..6) {
        let catalog = catalog();
        let all = catalog.all();
        let subset: Vec<String> = all
            .iter()
            .zip(mask.iter())
            .filter(|(_, keep)| **keep)
            .map(|(name, _)| name.clone())
            .collect();
        let selection = UniversitySelection::from_values(subset, &catalog);
        let target = &all[pick];

        let twice = selection
            .toggle_university(target, &catalog)
            .toggle_university(target, &catalog);
        prop_assert_eq!(twice.count(&catalog), selection.count(&catalog));
        for name in &all {
            prop_assert_eq!(twice.is_selected(name, &catalog), selection.is_selected(name, &catalog));
        }
    }
}
