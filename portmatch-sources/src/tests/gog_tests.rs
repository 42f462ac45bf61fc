use super::*;

fn names(entries: &[LibraryEntry]) -> Vec<&str> {
    entries.iter().map(|e| e.name.as_str()).collect()
}

#[test]
fn json_products() {
    let raw = r#"{
        "products": [
            {"id": 1207658924, "title": " Unreal Tournament 2004 "},
            {"id": "1423049311", "title": "Stardew Valley"},
            {"title": "unreal tournament 2004"},
            {"id": 5}
        ]
    }"#;
    let entries = GogLibrary.parse(raw).unwrap();
    assert_eq!(names(&entries), vec!["Unreal Tournament 2004", "Stardew Valley"]);
    assert_eq!(entries[0].source_id.as_deref(), Some("1207658924"));
    assert_eq!(entries[1].source_id.as_deref(), Some("1423049311"));
}

#[test]
fn plain_lines() {
    let raw = "Stardew Valley\n\n  Heroes of Might and Magic 3  \nstardew valley\n";
    let entries = GogLibrary.parse(raw).unwrap();
    assert_eq!(names(&entries), vec!["Stardew Valley", "Heroes of Might and Magic 3"]);
}

#[test]
fn json_without_titles_is_empty() {
    for raw in [r#"{"products": []}"#, r#"{"products": [{"id": 1}]}"#, r#"{"owned": [1, 2]}"#] {
        assert!(matches!(
            GogLibrary.parse(raw),
            Err(SourceError::EmptyLibrary(Storefront::Gog))
        ));
    }
}

#[test]
fn numeric_title_is_read_as_a_line() {
    let entries = GogLibrary.parse("1979").unwrap();
    assert_eq!(names(&entries), vec!["1979"]);
}

#[test]
fn broken_json_falls_back_to_lines() {
    let entries = GogLibrary.parse("{\"products\": [\nFTL\n").unwrap();
    assert_eq!(names(&entries), vec!["{\"products\": [", "FTL"]);
}

#[test]
fn non_string_title_drops_only_that_product() {
    let raw = r#"{"products": [{"id": 1, "title": 1979}, {"id": 2, "title": "FTL"}, {"title": null}]}"#;
    let entries = GogLibrary.parse(raw).unwrap();
    assert_eq!(names(&entries), vec!["FTL"]);
    assert_eq!(entries[0].source_id.as_deref(), Some("2"));
}
