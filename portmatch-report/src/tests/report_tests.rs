use super::*;

use portmatch_core::ImageRef;

fn library() -> Vec<LibraryEntry> {
    vec![
        LibraryEntry::new("Celeste")
            .with_source_id("504230")
            .with_extra("playtime_hours", "12"),
        LibraryEntry::new("Stardew Valley Extra").with_source_id("413150"),
        LibraryEntry::new("Portal 2").with_source_id("620"),
    ]
}

fn catalog() -> Vec<CatalogEntry> {
    vec![
        CatalogEntry::new("Celeste", "celeste")
            .with_description("Climb the mountain.")
            .with_image(ImageRef {
                port_name: "celeste.zip".into(),
                screenshot: Some("screenshot.png".into()),
                repo: "main".into(),
            }),
        CatalogEntry::new("Stardew Valley Extro", "stardew valley"),
    ]
}

fn record(library: &str, catalog: &str, key: &str, kind: MatchKind) -> MatchRecord {
    MatchRecord {
        library_name: library.into(),
        catalog_name: catalog.into(),
        catalog_key: key.into(),
        kind,
        similarity: (kind == MatchKind::Fuzzy).then_some(95),
    }
}

#[test]
fn build_enriches_matches() {
    let records = vec![
        record("Celeste", "Celeste", "celeste", MatchKind::Exact),
        record(
            "Stardew Valley Extra",
            "Stardew Valley Extro",
            "stardew valley",
            MatchKind::Fuzzy,
        ),
    ];
    let report = Report::build(Storefront::Steam, &library(), &catalog(), records);

    assert_eq!(report.library_count, 3);
    assert_eq!(report.catalog_count, 2);
    assert_eq!(report.summary.total, 2);
    assert_eq!(report.summary.count(MatchKind::Fuzzy), 1);

    let celeste = &report.matches[0];
    assert_eq!(celeste.source_id.as_deref(), Some("504230"));
    assert_eq!(celeste.playtime_hours, Some(12));
    assert_eq!(celeste.description.as_deref(), Some("Climb the mountain."));
    assert!(celeste.image_url.ends_with("/ports/celeste/screenshot.png"));
    assert_eq!(
        celeste.detail_url,
        "https://portmaster.games/detail.html?name=celeste"
    );

    let stardew = &report.matches[1];
    assert_eq!(stardew.playtime_hours, None);
    assert_eq!(stardew.similarity, Some(95));
    assert!(stardew.image_url.ends_with("no.image.png"));
    assert_eq!(
        stardew.detail_url,
        "https://portmaster.games/detail.html?name=stardew%20valley"
    );
}

#[test]
fn unknown_catalog_key_still_reported() {
    let records = vec![record("Portal 2", "Portal 2", "missing", MatchKind::Exact)];
    let report = Report::build(Storefront::Steam, &library(), &catalog(), records);
    assert_eq!(report.matches.len(), 1);
    assert_eq!(report.matches[0].description, None);
    assert!(report.matches[0].image_url.ends_with("no.image.png"));
}

#[test]
fn empty_report() {
    let report = Report::build(Storefront::Gog, &library(), &catalog(), Vec::new());
    assert!(report.is_empty());
    assert_eq!(report.summary.total, 0);
}

#[test]
fn json_writer_round_trips() {
    let records = vec![record("Celeste", "Celeste", "celeste", MatchKind::Exact)];
    let report = Report::build(Storefront::Epic, &library(), &catalog(), records);

    let mut buf = Vec::new();
    JsonWriter.write(&report, &mut buf).unwrap();
    let text = String::from_utf8(buf).unwrap();
    assert!(text.contains("\"storefront\": \"epic\""));
    assert!(text.contains("\"kind\": \"exact\""));

    let parsed: Report = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed, report);
}

#[test]
fn html_lists_matches() {
    let records = vec![
        record("Celeste", "Celeste", "celeste", MatchKind::Exact),
        record(
            "Stardew Valley Extra",
            "Stardew Valley Extro",
            "stardew valley",
            MatchKind::Fuzzy,
        ),
    ];
    let report = Report::build(Storefront::Steam, &library(), &catalog(), records);
    let html = HtmlWriter::new().render(&report);

    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<title>Steam vs PortMaster Report</title>"));
    assert!(html.contains("<h4>Celeste</h4>"));
    assert!(html.contains("Playtime: 12 hours"));
    assert!(html.contains("Match type: fuzzy (95% similarity)"));
    assert!(!html.contains("No Direct Matches Found"));
}

#[test]
fn html_escapes_titles() {
    let library = vec![LibraryEntry::new("<b>Tom & Jerry</b>")];
    let catalog = vec![CatalogEntry::new("<b>Tom & Jerry</b>", "tom")];
    let records = vec![record("<b>Tom & Jerry</b>", "<b>Tom & Jerry</b>", "tom", MatchKind::Exact)];
    let report = Report::build(Storefront::Gog, &library, &catalog, records);
    let html = HtmlWriter::new().render(&report);
    assert!(html.contains("&lt;b&gt;Tom &amp; Jerry&lt;/b&gt;"));
    assert!(!html.contains("<b>Tom"));
}

#[test]
fn html_no_matches_guidance() {
    let report = Report::build(Storefront::Epic, &library(), &catalog(), Vec::new());
    let html = HtmlWriter::new().render(&report);
    assert!(html.contains("No Direct Matches Found"));
    assert!(html.contains("Epic Games Store library"));
    assert!(html.contains(CATALOG_PAGE_URL));
}

#[test]
fn write_to_file_creates_parents() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out/nested/report.html");
    let report = Report::build(Storefront::Steam, &library(), &catalog(), Vec::new());

    HtmlWriter::new().write_to_file(&report, &path).unwrap();
    let html = std::fs::read_to_string(&path).unwrap();
    assert!(html.contains("No Direct Matches Found"));
    assert_eq!(HtmlWriter::new().extension(), "html");
    assert_eq!(JsonWriter.extension(), "json");
}
