//! Storefront library parsers.
//!
//! Each storefront turns its raw export (a Steam API body, pasted Epic
//! launcher output, a GOG JSON dump) into [`LibraryEntry`] values. The
//! matcher never sees anything storefront-specific.

use std::collections::HashSet;

use portmatch_core::{LibraryEntry, Storefront};

use crate::epic::EpicLibrary;
use crate::error::SourceError;
use crate::gog::GogLibrary;
use crate::steam::SteamLibrary;

/// Converts one storefront's raw library export into entries.
pub trait LibraryParser: Send + Sync {
    /// The storefront this parser handles.
    fn storefront(&self) -> Storefront;

    /// Parse raw input. Returns [`SourceError::EmptyLibrary`] when no titles
    /// could be extracted.
    fn parse(&self, raw: &str) -> Result<Vec<LibraryEntry>, SourceError>;

    /// User-facing explanation for an error raised while loading this
    /// storefront's library.
    fn describe_error(&self, err: &SourceError) -> String {
        describe_error(err)
    }
}

static STEAM: SteamLibrary = SteamLibrary;
static EPIC: EpicLibrary = EpicLibrary;
static GOG: GogLibrary = GogLibrary;

/// Get the parser for a storefront.
pub fn parser_for(storefront: Storefront) -> &'static dyn LibraryParser {
    match storefront {
        Storefront::Steam => &STEAM,
        Storefront::Epic => &EPIC,
        Storefront::Gog => &GOG,
    }
}

/// User-facing explanation for an error that is not tied to a storefront,
/// such as a catalog failure.
pub fn describe_error(err: &SourceError) -> String {
    describe_common(err).unwrap_or_else(|| err.to_string())
}

/// Messages shared by every storefront (catalog and transport failures).
pub(crate) fn describe_common(err: &SourceError) -> Option<String> {
    let msg = match err {
        SourceError::RateLimited { service } => format!(
            "{service} rate limit exceeded. Please wait about an hour before trying again."
        ),
        SourceError::CatalogUnavailable(_) => "Unable to fetch the PortMaster games list. \
             GitHub might be temporarily unavailable. Please try again later."
            .to_string(),
        SourceError::EmptyLibrary(_) => {
            "No games found in the provided list. Please check the format and try again."
                .to_string()
        }
        _ => return None,
    };
    Some(msg)
}

/// Drop entries whose name repeats an earlier one, ignoring case.
pub fn dedup_by_name(entries: Vec<LibraryEntry>) -> Vec<LibraryEntry> {
    let mut seen = HashSet::new();
    entries
        .into_iter()
        .filter(|e| seen.insert(e.name.to_lowercase()))
        .collect()
}

/// Fail with [`SourceError::EmptyLibrary`] when nothing was parsed.
pub(crate) fn non_empty(
    storefront: Storefront,
    entries: Vec<LibraryEntry>,
) -> Result<Vec<LibraryEntry>, SourceError> {
    if entries.is_empty() {
        Err(SourceError::EmptyLibrary(storefront))
    } else {
        log::debug!("Parsed {} {} titles", entries.len(), storefront);
        Ok(entries)
    }
}

#[cfg(test)]
#[path = "tests/library_tests.rs"]
mod tests;
