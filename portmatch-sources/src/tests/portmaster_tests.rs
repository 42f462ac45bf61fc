use super::*;

const PORTS_JSON: &str = r#"{
    "ports": {
        "celeste.zip": {
            "name": "celeste.zip",
            "attr": {
                "title": "Celeste",
                "desc": "Help Madeline survive her inner demons.",
                "genres": ["platformer"],
                "image": {"screenshot": "screenshot.png"}
            },
            "source": {"repo": "main"}
        },
        "stardewValley.zip": {
            "name": "stardewValley.zip",
            "attr": {"title": "", "desc": "", "image": {"screenshot": null}},
            "source": {"repo": "multiverse"}
        },
        "a_short-hike.zip": {
            "attr": {"title": "a_short-hike.zip"}
        },
        "ut2004.zip": {
            "attr": {"desc": "Unreal Tournament 2004", "image": {"screenshot": "shot 1.jpg"}},
            "source": {"repo": "multiverse"}
        }
    }
}"#;

fn by_key<'a>(entries: &'a [CatalogEntry], key: &str) -> &'a CatalogEntry {
    entries
        .iter()
        .find(|e| e.key == key)
        .unwrap_or_else(|| panic!("no entry with key {key}"))
}

#[test]
fn cleans_archive_names() {
    assert_eq!(clean_port_name("stardewValley.zip"), "Stardew Valley");
    assert_eq!(clean_port_name("a_short-hike"), "A Short Hike");
    assert_eq!(clean_port_name("2048.ZIP"), "2048");
    assert_eq!(clean_port_name("--doom__ii--"), "Doom Ii");
    assert_eq!(clean_port_name("openTTD"), "Open TTD");
    assert_eq!(clean_port_name("rock'n'roll"), "Rock'N'Roll");
    assert_eq!(clean_port_name("3dmaze"), "3dmaze");
    assert_eq!(clean_port_name(""), "");
}

#[test]
fn ports_json_display_names() {
    let entries = parse_ports_json(PORTS_JSON).unwrap();
    assert_eq!(entries.len(), 4);

    // keys are sorted and lose their .zip suffix
    let keys: Vec<&str> = entries.iter().map(|e| e.key.as_str()).collect();
    assert_eq!(keys, vec!["a_short-hike", "celeste", "stardewValley", "ut2004"]);

    assert_eq!(by_key(&entries, "celeste").name, "Celeste");
    // empty title falls through to `name`, which is the archive name
    assert_eq!(by_key(&entries, "stardewValley").name, "Stardew Valley");
    // a title ending in .zip is not a real name
    assert_eq!(by_key(&entries, "a_short-hike").name, "A Short Hike");
    // description used as the last resort
    assert_eq!(by_key(&entries, "ut2004").name, "Unreal Tournament 2004");
}

#[test]
fn ports_json_metadata() {
    let entries = parse_ports_json(PORTS_JSON).unwrap();

    let celeste = by_key(&entries, "celeste");
    assert_eq!(
        celeste.description.as_deref(),
        Some("Help Madeline survive her inner demons.")
    );
    assert_eq!(celeste.genres, vec!["platformer".to_string()]);
    assert_eq!(
        celeste.image_url(),
        "https://raw.githubusercontent.com/PortsMaster/PortMaster-New/main/ports/celeste/screenshot.png"
    );

    let stardew = by_key(&entries, "stardewValley");
    assert_eq!(stardew.description, None);
    assert!(stardew.image_url().ends_with("/no.image.png"));

    // missing source defaults to the main repo
    let hike = by_key(&entries, "a_short-hike");
    assert_eq!(hike.image.as_ref().map(|i| i.repo.as_str()), Some("main"));

    assert_eq!(
        by_key(&entries, "ut2004").image_url(),
        "https://raw.githubusercontent.com/PortsMaster-MV/PortMaster-MV-New/main/ports/ut2004/shot%201.jpg"
    );
}

#[test]
fn ports_json_without_ports_is_empty() {
    assert!(parse_ports_json("{}").unwrap().is_empty());
    assert!(matches!(
        parse_ports_json("<html>"),
        Err(SourceError::Json(_))
    ));
}

#[test]
fn contents_listing_keeps_zips_and_dirs() {
    let body = r#"[
        {"name": "Celeste.zip", "type": "file"},
        {"name": "README.md", "type": "file"},
        {"name": "stardew-valley", "type": "dir"},
        {"name": ".github", "type": "dir"}
    ]"#;
    let entries = parse_contents_listing(body).unwrap();
    let pairs: Vec<(&str, &str)> = entries
        .iter()
        .map(|e| (e.name.as_str(), e.key.as_str()))
        .collect();
    assert_eq!(
        pairs,
        vec![("Celeste", "Celeste"), ("Stardew Valley", "stardew-valley")]
    );
    assert_eq!(
        entries[0].image_url(),
        "https://raw.githubusercontent.com/PortsMaster/PortMaster-New/main/ports/Celeste/screenshot.jpg"
    );
}

#[test]
fn catalog_served_from_cache() {
    use crate::cache::{DEFAULT_TTL, ManualClock, MemoryCache};

    let clock = Arc::new(ManualClock::new(chrono::Utc::now()));
    let cache: Arc<dyn Cache> = Arc::new(MemoryCache::new(DEFAULT_TTL, clock));
    let cached = vec![CatalogEntry::new("Celeste", "celeste")];
    cache::store(cache.as_ref(), CATALOG_CACHE_KEY, &cached);

    // unroutable URLs: any network access would fail the test
    let client = PortmasterClient::new("http://127.0.0.1:9/ports.json", cache)
        .unwrap()
        .with_legacy_url("http://127.0.0.1:9/contents");
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    let entries = runtime.block_on(client.fetch_catalog()).unwrap();
    assert_eq!(entries, cached);
}

#[test]
fn unreachable_sources_are_unavailable() {
    let client = PortmasterClient::new("http://127.0.0.1:9/ports.json", Arc::new(crate::NullCache))
        .unwrap()
        .with_legacy_url("http://127.0.0.1:9/contents");
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    let err = runtime.block_on(client.fetch_catalog()).unwrap_err();
    assert!(matches!(err, SourceError::CatalogUnavailable(_)));
}

#[test]
fn github_status_mapping() {
    assert!(matches!(
        check_status(StatusCode::FORBIDDEN),
        Err(SourceError::RateLimited { service: "GitHub" })
    ));
    assert!(matches!(
        check_status(StatusCode::TOO_MANY_REQUESTS),
        Err(SourceError::RateLimited { service: "GitHub" })
    ));
    assert!(check_status(StatusCode::OK).is_ok());
    assert!(check_status(StatusCode::NOT_FOUND).is_ok());
}

#[test]
fn rate_limited_primary_skips_fallback() {
    let err = use_primary(Err(SourceError::RateLimited { service: "GitHub" })).unwrap_err();
    assert!(matches!(err, SourceError::RateLimited { service: "GitHub" }));
}

#[test]
fn empty_or_failed_primary_uses_fallback() {
    assert!(use_primary(Ok(Vec::new())).unwrap().is_none());
    let failed = use_primary(Err(SourceError::catalog_unavailable("timeout"))).unwrap();
    assert!(failed.is_none());

    let entries = vec![CatalogEntry::new("Celeste", "celeste")];
    assert_eq!(use_primary(Ok(entries.clone())).unwrap(), Some(entries));
}

#[test]
fn empty_cached_catalog_is_not_served() {
    use crate::cache::{DEFAULT_TTL, ManualClock, MemoryCache};

    let clock = Arc::new(ManualClock::new(chrono::Utc::now()));
    let cache: Arc<dyn Cache> = Arc::new(MemoryCache::new(DEFAULT_TTL, clock));
    cache::store(cache.as_ref(), CATALOG_CACHE_KEY, &Vec::<CatalogEntry>::new());

    let client = PortmasterClient::new("http://127.0.0.1:9/ports.json", cache)
        .unwrap()
        .with_legacy_url("http://127.0.0.1:9/contents");
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    let err = runtime.block_on(client.fetch_catalog()).unwrap_err();
    assert!(matches!(err, SourceError::CatalogUnavailable(_)));
}
