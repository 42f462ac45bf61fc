use super::*;

#[test]
fn parser_lookup_matches_storefront() {
    for storefront in Storefront::all() {
        assert_eq!(parser_for(*storefront).storefront(), *storefront);
    }
}

#[test]
fn dedup_is_case_insensitive_and_keeps_first() {
    let entries = vec![
        LibraryEntry::new("Celeste").with_source_id("first"),
        LibraryEntry::new("Doom"),
        LibraryEntry::new("CELESTE").with_source_id("second"),
        LibraryEntry::new("celeste"),
    ];
    let deduped = dedup_by_name(entries);
    assert_eq!(deduped.len(), 2);
    assert_eq!(deduped[0].name, "Celeste");
    assert_eq!(deduped[0].source_id.as_deref(), Some("first"));
    assert_eq!(deduped[1].name, "Doom");
}

#[test]
fn empty_input_is_empty_library_for_every_storefront() {
    for storefront in Storefront::all() {
        let err = parser_for(*storefront).parse("").unwrap_err();
        match storefront {
            // an empty string is not a GetOwnedGames body
            Storefront::Steam => assert!(matches!(err, SourceError::Json(_))),
            other => assert!(matches!(err, SourceError::EmptyLibrary(s) if s == *other)),
        }
    }
}

#[test]
fn default_descriptions() {
    let epic = parser_for(Storefront::Epic);
    assert!(
        epic.describe_error(&SourceError::EmptyLibrary(Storefront::Epic))
            .starts_with("No games found")
    );
    assert!(
        epic.describe_error(&SourceError::RateLimited { service: "GitHub" })
            .starts_with("GitHub rate limit exceeded")
    );
    assert!(
        epic.describe_error(&SourceError::catalog_unavailable("boom"))
            .contains("PortMaster games list")
    );
    assert_eq!(
        epic.describe_error(&SourceError::config("bad")),
        "Configuration error: bad"
    );
}
