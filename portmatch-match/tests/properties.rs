use std::collections::HashSet;

use portmatch_core::{CatalogEntry, LibraryEntry};
use portmatch_match::{MatchKind, match_titles, match_titles_par, normalize};
use proptest::prelude::*;

fn library_from(names: &[String]) -> Vec<LibraryEntry> {
    names.iter().map(LibraryEntry::new).collect()
}

fn catalog_from(names: &[String]) -> Vec<CatalogEntry> {
    names
        .iter()
        .enumerate()
        .map(|(i, n)| CatalogEntry::new(n.clone(), format!("port-{i}")))
        .collect()
}

#[test]
fn witcher_scenario() {
    let library = vec![
        LibraryEntry::new("The Witcher 3: Wild Hunt").with_source_id("292030"),
        LibraryEntry::new("Celeste").with_source_id("504230"),
        LibraryEntry::new("A Short Hike").with_source_id("1055540"),
        LibraryEntry::new("Portal 2").with_source_id("620"),
    ];
    let catalog = vec![
        CatalogEntry::new("Witcher 3 Wild Hunt", "witcher3"),
        CatalogEntry::new("celeste", "celeste"),
        CatalogEntry::new("AShortHike", "ashorthike"),
    ];

    let records = match_titles(&library, &catalog);
    let summary: Vec<(&str, MatchKind)> = records
        .iter()
        .map(|r| (r.library_name.as_str(), r.kind))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("A Short Hike", MatchKind::SpaceInsensitive),
            ("Celeste", MatchKind::Exact),
            ("The Witcher 3: Wild Hunt", MatchKind::Normalized),
        ]
    );
}

proptest! {
    #[test]
    fn normalize_is_idempotent(s in "\\PC{0,40}") {
        let once = normalize(&s);
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn normalize_output_is_clean(s in "\\PC{0,40}") {
        let out = normalize(&s);
        prop_assert!(!out.chars().any(|c| c.is_uppercase()));
        prop_assert!(out.chars().all(|c| c.is_alphanumeric() || c == ' '));
        prop_assert!(!out.starts_with(' ') && !out.ends_with(' '));
        prop_assert!(!out.contains("  "));
    }

    #[test]
    fn empty_side_yields_nothing(names in prop::collection::vec("[a-zA-Z ]{0,20}", 0..10)) {
        prop_assert!(match_titles(&library_from(&names), &[]).is_empty());
        prop_assert!(match_titles(&[], &catalog_from(&names)).is_empty());
    }

    #[test]
    fn results_are_unique_and_sorted(
        lib in prop::collection::vec("[a-cA-C ]{1,9}", 0..12),
        cat in prop::collection::vec("[a-cA-C ]{1,9}", 0..12),
    ) {
        let records = match_titles(&library_from(&lib), &catalog_from(&cat));

        let mut seen = HashSet::new();
        for r in &records {
            prop_assert!(seen.insert((r.library_name.clone(), r.catalog_name.clone())));
            prop_assert_eq!(r.similarity.is_some(), r.kind == MatchKind::Fuzzy);
        }

        for pair in records.windows(2) {
            let a = (pair[0].library_name.to_lowercase(), pair[0].catalog_name.to_lowercase());
            let b = (pair[1].library_name.to_lowercase(), pair[1].catalog_name.to_lowercase());
            prop_assert!(a <= b, "{:?} sorted after {:?}", a, b);
        }
    }

    #[test]
    fn identical_titles_always_match_exactly(title in "[a-zA-Z][a-zA-Z ]{0,29}") {
        let records = match_titles(&[LibraryEntry::new(title.clone())], &[CatalogEntry::new(title.to_uppercase(), "k")]);
        prop_assert_eq!(records.len(), 1);
        prop_assert_eq!(records[0].kind, MatchKind::Exact);
    }

    #[test]
    fn parallel_agrees_with_sequential(
        lib in prop::collection::vec("[a-dA-D ]{1,12}", 0..20),
        cat in prop::collection::vec("[a-dA-D ]{1,12}", 0..20),
    ) {
        let library = library_from(&lib);
        let catalog = catalog_from(&cat);
        prop_assert_eq!(match_titles(&library, &catalog), match_titles_par(&library, &catalog));
    }
}
