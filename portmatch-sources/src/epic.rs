use std::sync::LazyLock;

use regex::Regex;

use portmatch_core::{LibraryEntry, Storefront};

use crate::error::SourceError;
use crate::library::{LibraryParser, dedup_by_name, non_empty};

/// `* Game Name (App name: id | Version: x)` as printed by the Epic launcher
/// tooling (legendary).
static NATIVE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\*\s+(.+?)\s*\(").expect("static pattern"));

static APP_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"App name:\s*([^|)\s]+)").expect("static pattern"));

/// Pasted Epic Games Store library listing.
///
/// Accepts either the launcher's native listing or plain titles, one per
/// line, optionally prefixed with `*`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EpicLibrary;

/// Extract the title (and app name, if present) from one line.
fn parse_line(line: &str) -> Option<LibraryEntry> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let name = match NATIVE_LINE.captures(line) {
        Some(caps) => caps.get(1).map_or("", |m| m.as_str()).trim(),
        None => line.strip_prefix('*').unwrap_or(line).trim(),
    };
    if name.is_empty() {
        return None;
    }

    let entry = LibraryEntry::new(name);
    Some(match APP_NAME.captures(line) {
        Some(caps) => entry.with_source_id(&caps[1]),
        None => entry,
    })
}

impl LibraryParser for EpicLibrary {
    fn storefront(&self) -> Storefront {
        Storefront::Epic
    }

    fn parse(&self, raw: &str) -> Result<Vec<LibraryEntry>, SourceError> {
        let entries = raw.lines().filter_map(parse_line).collect();
        non_empty(Storefront::Epic, dedup_by_name(entries))
    }
}

#[cfg(test)]
#[path = "tests/epic_tests.rs"]
mod tests;
