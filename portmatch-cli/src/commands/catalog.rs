use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use portmatch_core::{CatalogEntry, LibraryEntry};
use portmatch_match::{CatalogIndex, normalize};
use portmatch_sources::{PortmasterClient, describe_error};

use super::{load_settings, open_cache, runtime};
use crate::error::CliError;
use crate::spinner;

fn fetch_catalog(no_cache: bool, quiet: bool) -> Result<Vec<CatalogEntry>, CliError> {
    let settings = load_settings()?;
    let cache = open_cache(&settings, no_cache);
    let client = PortmasterClient::new(settings.ports_url.clone(), cache)
        .map_err(|e| CliError::load(describe_error(&e)))?;
    let rt = runtime()?;

    let pb = spinner::start("Fetching PortMaster catalog...", quiet);
    let result = rt.block_on(client.fetch_catalog());
    pb.finish_and_clear();
    result.map_err(|e| CliError::load(describe_error(&e)))
}

/// Ports whose name or key contains `search` (case-insensitive), sorted by name.
pub(crate) fn filter_catalog<'a>(
    catalog: &'a [CatalogEntry],
    search: Option<&str>,
) -> Vec<&'a CatalogEntry> {
    let needle = search.map(str::to_lowercase);
    let mut ports: Vec<&CatalogEntry> = catalog
        .iter()
        .filter(|entry| match &needle {
            Some(n) => {
                entry.name.to_lowercase().contains(n) || entry.key.to_lowercase().contains(n)
            }
            None => true,
        })
        .collect();
    ports.sort_by_cached_key(|entry| entry.name.to_lowercase());
    ports
}

/// List ports in the catalog.
pub(crate) fn run_catalog_list(
    search: Option<&str>,
    no_cache: bool,
    quiet: bool,
) -> Result<(), CliError> {
    let catalog = fetch_catalog(no_cache, quiet)?;
    let ports = filter_catalog(&catalog, search);

    if ports.is_empty() {
        log::info!(
            "{}",
            "No matching ports.".if_supports_color(Stdout, |t| t.dimmed()),
        );
        return Ok(());
    }

    for entry in &ports {
        log::info!(
            "  {} [{}]",
            entry.name.if_supports_color(Stdout, |t| t.bold()),
            entry.key.if_supports_color(Stdout, |t| t.cyan()),
        );
        if let Some(desc) = &entry.description {
            log::debug!("    {}", desc);
        }
    }
    log::info!("");
    log::info!("Total: {} of {} ports", ports.len(), catalog.len());
    Ok(())
}

/// Explain how a single title fares against the catalog.
pub(crate) fn run_catalog_lookup(
    title: &str,
    limit: usize,
    no_cache: bool,
    quiet: bool,
) -> Result<(), CliError> {
    let catalog = fetch_catalog(no_cache, quiet)?;
    let index = CatalogIndex::new(&catalog);

    let normalized = normalize(title);
    log::info!(
        "{} {}",
        "Title:".if_supports_color(Stdout, |t| t.bold()),
        title,
    );
    if normalized.is_empty() {
        log::info!(
            "  Normalized: {}",
            "(empty, title cannot match)".if_supports_color(Stdout, |t| t.yellow()),
        );
    } else {
        log::info!("  Normalized: {}", normalized);
    }
    log::info!("");

    let records = index.match_entry(&LibraryEntry::new(title));
    if records.is_empty() {
        log::info!(
            "{} No matching port",
            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
        );
    } else {
        for record in &records {
            let kind = match record.similarity {
                Some(pct) => format!("{} {}%", record.kind, pct),
                None => record.kind.to_string(),
            };
            log::info!(
                "{} {} [{}] ({})",
                "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                record.catalog_name.if_supports_color(Stdout, |t| t.bold()),
                record.catalog_key.if_supports_color(Stdout, |t| t.cyan()),
                kind,
            );
        }
    }

    let nearest = index.nearest(title, limit);
    if !nearest.is_empty() {
        log::info!("");
        log::info!(
            "{}",
            "Nearest ports:".if_supports_color(Stdout, |t| t.bold()),
        );
        for (entry, distance) in nearest {
            log::info!(
                "  {} [{}] {}",
                entry.name,
                entry.key.if_supports_color(Stdout, |t| t.cyan()),
                format!("distance {}", distance).if_supports_color(Stdout, |t| t.dimmed()),
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<CatalogEntry> {
        vec![
            CatalogEntry::new("Stardew Valley", "stardewvalley"),
            CatalogEntry::new("Celeste", "celeste"),
            CatalogEntry::new("A Short Hike", "ashorthike"),
        ]
    }

    #[test]
    fn test_filter_catalog_sorts_by_name() {
        let catalog = catalog();
        let names: Vec<&str> = filter_catalog(&catalog, None)
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(names, vec!["A Short Hike", "Celeste", "Stardew Valley"]);
    }

    #[test]
    fn test_filter_catalog_matches_name_or_key() {
        let catalog = catalog();
        let by_name = filter_catalog(&catalog, Some("VALLEY"));
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].key, "stardewvalley");

        let by_key = filter_catalog(&catalog, Some("shorthike"));
        assert_eq!(by_key.len(), 1);
        assert_eq!(by_key[0].name, "A Short Hike");

        assert!(filter_catalog(&catalog, Some("zelda")).is_empty());
    }
}
