//! Match reports.
//!
//! A [`Report`] joins matcher output back to the library and catalog it came
//! from (descriptions, screenshots, playtime). [`ReportWriter`]
//! implementations render it as JSON or a standalone HTML page.

pub mod error;
pub mod html;
pub mod json;

pub use error::ReportError;
pub use html::HtmlWriter;
pub use json::JsonWriter;

use std::collections::HashMap;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use portmatch_core::{CatalogEntry, LibraryEntry, Storefront};
use portmatch_match::{MatchKind, MatchRecord, MatchSummary};

/// Full list of PortMaster ports.
pub const CATALOG_PAGE_URL: &str = "https://portmaster.games/games.html";
const DETAIL_PAGE_URL: &str = "https://portmaster.games/detail.html?name=";

/// Link to a port's page on portmaster.games.
pub fn detail_url(catalog_key: &str) -> String {
    format!("{}{}", DETAIL_PAGE_URL, urlencoding::encode(catalog_key))
}

/// One match with the details needed to present it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportMatch {
    pub library_name: String,
    pub catalog_name: String,
    pub catalog_key: String,
    pub kind: MatchKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similarity: Option<u8>,
    /// Storefront id of the library title (e.g. Steam app id).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playtime_hours: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub image_url: String,
    pub detail_url: String,
}

/// A comparison of one storefront library against the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub storefront: Storefront,
    pub library_count: usize,
    pub catalog_count: usize,
    pub summary: MatchSummary,
    pub matches: Vec<ReportMatch>,
}

impl Report {
    /// Enrich matcher output with library and catalog details.
    ///
    /// Records keep the order they arrive in. A record whose catalog key is
    /// unknown still appears, with the placeholder image and no description.
    pub fn build(
        storefront: Storefront,
        library: &[LibraryEntry],
        catalog: &[CatalogEntry],
        records: Vec<MatchRecord>,
    ) -> Self {
        let mut by_key: HashMap<&str, &CatalogEntry> = HashMap::with_capacity(catalog.len());
        for entry in catalog {
            by_key.entry(entry.key.as_str()).or_insert(entry);
        }
        let mut by_name: HashMap<&str, &LibraryEntry> = HashMap::with_capacity(library.len());
        for entry in library {
            by_name.entry(entry.name.as_str()).or_insert(entry);
        }

        let summary = MatchSummary::from_records(&records);
        let matches = records
            .into_iter()
            .map(|record| {
                let port = by_key.get(record.catalog_key.as_str()).copied();
                let owned = by_name.get(record.library_name.as_str()).copied();
                if port.is_none() {
                    log::debug!("No catalog entry for key '{}'", record.catalog_key);
                }
                ReportMatch {
                    source_id: owned.and_then(|e| e.source_id.clone()),
                    playtime_hours: owned
                        .and_then(|e| e.extra.get("playtime_hours"))
                        .and_then(|h| h.parse().ok()),
                    description: port.and_then(|p| p.description.clone()),
                    image_url: port.map(CatalogEntry::image_url).unwrap_or_else(|| {
                        CatalogEntry::new(&record.catalog_name, &record.catalog_key).image_url()
                    }),
                    detail_url: detail_url(&record.catalog_key),
                    library_name: record.library_name,
                    catalog_name: record.catalog_name,
                    catalog_key: record.catalog_key,
                    kind: record.kind,
                    similarity: record.similarity,
                }
            })
            .collect();

        Self {
            storefront,
            library_count: library.len(),
            catalog_count: catalog.len(),
            summary,
            matches,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

/// Renders a [`Report`] in one output format.
pub trait ReportWriter {
    fn name(&self) -> &'static str;

    /// File extension for reports in this format (without the dot).
    fn extension(&self) -> &'static str;

    fn write(&self, report: &Report, out: &mut dyn Write) -> Result<(), ReportError>;

    /// Write the report to `path`, creating parent directories as needed.
    fn write_to_file(&self, report: &Report, path: &Path) -> Result<(), ReportError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let mut out = BufWriter::new(fs::File::create(path)?);
        self.write(report, &mut out)?;
        out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/report_tests.rs"]
mod tests;
