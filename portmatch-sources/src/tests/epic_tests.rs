use super::*;

fn names(entries: &[LibraryEntry]) -> Vec<&str> {
    entries.iter().map(|e| e.name.as_str()).collect()
}

#[test]
fn native_format() {
    let raw = "\
* Celeste (App name: Salt | Version: 1.4.0.0)
* Hades (App name: Min | Version: 1.38290)
";
    let entries = EpicLibrary.parse(raw).unwrap();
    assert_eq!(names(&entries), vec!["Celeste", "Hades"]);
    assert_eq!(entries[0].source_id.as_deref(), Some("Salt"));
    assert_eq!(entries[1].source_id.as_deref(), Some("Min"));
}

#[test]
fn simple_lines_with_and_without_bullets() {
    let raw = "Celeste\n*Hades\n* Inside\n\n   \n  Limbo  \n";
    let entries = EpicLibrary.parse(raw).unwrap();
    assert_eq!(names(&entries), vec!["Celeste", "Hades", "Inside", "Limbo"]);
    assert!(entries.iter().all(|e| e.source_id.is_none()));
}

#[test]
fn title_containing_parentheses_stops_at_first_paren() {
    let entries = EpicLibrary
        .parse("* Shadow Tactics (Blades of the Shogun) (App name: x | Version: 1)")
        .unwrap();
    assert_eq!(names(&entries), vec!["Shadow Tactics"]);
}

#[test]
fn duplicates_removed_case_insensitively() {
    let raw = "* Celeste (App name: a | Version: 1)\nCELESTE\ncéleste\n";
    let entries = EpicLibrary.parse(raw).unwrap();
    assert_eq!(names(&entries), vec!["Celeste", "céleste"]);
}

#[test]
fn lone_bullets_are_skipped() {
    assert!(matches!(
        EpicLibrary.parse("*\n * \n"),
        Err(SourceError::EmptyLibrary(Storefront::Epic))
    ));
}

#[test]
fn windows_line_endings() {
    let entries = EpicLibrary.parse("Celeste\r\nHades\r\n").unwrap();
    assert_eq!(names(&entries), vec!["Celeste", "Hades"]);
}

#[test]
fn native_title_is_trimmed_before_paren() {
    let entries = EpicLibrary
        .parse("*   Celeste   (App name: Salt | Version: 1)")
        .unwrap();
    assert_eq!(names(&entries), vec!["Celeste"]);
    assert_eq!(entries[0].source_id.as_deref(), Some("Salt"));
}
