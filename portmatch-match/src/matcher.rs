use std::cmp::Ordering;
use std::collections::HashMap;
use std::collections::hash_map::Entry;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use portmatch_core::{CatalogEntry, LibraryEntry};

use crate::distance::levenshtein;
use crate::normalizer::{normalize, strip_whitespace};

/// Fuzzy matching only considers normalized names longer than this (in chars).
const FUZZY_MIN_LEN: usize = 6;
/// Maximum difference in normalized length for a fuzzy comparison.
const FUZZY_MAX_LEN_DIFF: usize = 3;
/// Maximum edit distance for a fuzzy match.
const FUZZY_MAX_DISTANCE: usize = 2;

/// How a library title was judged equivalent to a catalog title.
///
/// Variants are declared strictest first; the derived `Ord` is the priority
/// order used both when classifying a pair and when collapsing duplicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchKind {
    /// Case-folded names are identical.
    Exact,
    /// Case-folded names are identical once all whitespace is removed.
    SpaceInsensitive,
    /// Normalized names are identical.
    Normalized,
    /// Normalized library name equals the normalized catalog storage key.
    #[serde(rename = "catalog-original-key")]
    OriginalKey,
    /// Normalized names are within a small edit distance.
    Fuzzy,
}

const ALL_KINDS: &[MatchKind] = &[
    MatchKind::Exact,
    MatchKind::SpaceInsensitive,
    MatchKind::Normalized,
    MatchKind::OriginalKey,
    MatchKind::Fuzzy,
];

impl MatchKind {
    /// Position in the priority order (0 = strictest).
    pub fn rank(&self) -> u8 {
        match self {
            Self::Exact => 0,
            Self::SpaceInsensitive => 1,
            Self::Normalized => 2,
            Self::OriginalKey => 3,
            Self::Fuzzy => 4,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::SpaceInsensitive => "space-insensitive",
            Self::Normalized => "normalized",
            Self::OriginalKey => "catalog-original-key",
            Self::Fuzzy => "fuzzy",
        }
    }

    /// All kinds, strictest first.
    pub fn all() -> &'static [MatchKind] {
        ALL_KINDS
    }
}

impl std::fmt::Display for MatchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A library title paired with the catalog entry it matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub library_name: String,
    pub catalog_name: String,
    /// Key of the matched catalog entry, for looking up description/image.
    pub catalog_key: String,
    pub kind: MatchKind,
    /// Rounded similarity percentage; only set for [`MatchKind::Fuzzy`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similarity: Option<u8>,
}

/// Precomputed comparison keys for one title.
struct TitleKeys {
    /// Lowercased name.
    folded: String,
    /// Lowercased name with whitespace removed.
    compact: String,
    normalized: String,
    /// Length of `normalized` in chars.
    normalized_len: usize,
}

impl TitleKeys {
    /// Returns `None` for titles that are empty or whitespace-only; those
    /// never match anything.
    fn new(name: &str) -> Option<Self> {
        if name.trim().is_empty() {
            return None;
        }
        let normalized = normalize(name);
        Some(Self {
            folded: name.to_lowercase(),
            compact: strip_whitespace(name),
            normalized_len: normalized.chars().count(),
            normalized,
        })
    }
}

struct IndexedEntry<'a> {
    entry: &'a CatalogEntry,
    keys: TitleKeys,
    normalized_key: String,
}

/// An indexed view of the catalog with comparison keys computed once.
///
/// Building the index is O(C); matching one library title is O(C) plus the
/// edit-distance cost of fuzzy candidates.
pub struct CatalogIndex<'a> {
    entries: Vec<IndexedEntry<'a>>,
}

impl<'a> CatalogIndex<'a> {
    /// Build an index from catalog entries. Entries with blank names are
    /// skipped.
    pub fn new(catalog: &'a [CatalogEntry]) -> Self {
        let entries = catalog
            .iter()
            .filter_map(|entry| {
                TitleKeys::new(&entry.name).map(|keys| IndexedEntry {
                    entry,
                    keys,
                    normalized_key: normalize(&entry.key),
                })
            })
            .collect();
        Self { entries }
    }

    /// Number of matchable catalog entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Classify one library entry against every catalog entry.
    ///
    /// Produces at most one record per catalog entry, using the first kind
    /// that fires in priority order. Results are not sorted or deduplicated.
    pub fn match_entry(&self, library: &LibraryEntry) -> Vec<MatchRecord> {
        let Some(lib) = TitleKeys::new(&library.name) else {
            return Vec::new();
        };

        self.entries
            .iter()
            .filter_map(|indexed| {
                classify(&lib, indexed).map(|(kind, similarity)| MatchRecord {
                    library_name: library.name.clone(),
                    catalog_name: indexed.entry.name.clone(),
                    catalog_key: indexed.entry.key.clone(),
                    kind,
                    similarity,
                })
            })
            .collect()
    }

    /// Match a whole library: classify, deduplicate and sort.
    pub fn match_library(&self, library: &[LibraryEntry]) -> Vec<MatchRecord> {
        let records: Vec<MatchRecord> = library
            .iter()
            .flat_map(|entry| self.match_entry(entry))
            .collect();
        dedup_records(records)
    }

    /// Same result as [`match_library`](Self::match_library), with library
    /// entries spread across the rayon thread pool.
    pub fn match_library_par(&self, library: &[LibraryEntry]) -> Vec<MatchRecord> {
        let records: Vec<MatchRecord> = library
            .par_iter()
            .flat_map_iter(|entry| self.match_entry(entry))
            .collect();
        dedup_records(records)
    }

    /// Catalog entries closest to `title` by edit distance between
    /// normalized names, nearest first. Used to explain near misses.
    pub fn nearest(&self, title: &str, limit: usize) -> Vec<(&'a CatalogEntry, usize)> {
        let target = normalize(title);
        if target.is_empty() {
            return Vec::new();
        }
        let mut scored: Vec<(&'a CatalogEntry, usize)> = self
            .entries
            .iter()
            .filter(|indexed| !indexed.keys.normalized.is_empty())
            .map(|indexed| (indexed.entry, levenshtein(&target, &indexed.keys.normalized)))
            .collect();
        scored.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| cmp_folded(&a.0.name, &b.0.name)));
        scored.truncate(limit);
        scored
    }
}

/// Run the priority pipeline for one (library, catalog) pair.
fn classify(lib: &TitleKeys, cat: &IndexedEntry<'_>) -> Option<(MatchKind, Option<u8>)> {
    if lib.folded == cat.keys.folded {
        return Some((MatchKind::Exact, None));
    }
    if lib.compact == cat.keys.compact {
        return Some((MatchKind::SpaceInsensitive, None));
    }
    if lib.normalized.is_empty() {
        return None;
    }
    if lib.normalized == cat.keys.normalized {
        return Some((MatchKind::Normalized, None));
    }
    if lib.normalized == cat.normalized_key {
        return Some((MatchKind::OriginalKey, None));
    }
    fuzzy_similarity(lib, &cat.keys).map(|similarity| (MatchKind::Fuzzy, Some(similarity)))
}

/// Returns the rounded similarity percentage if the pair passes the fuzzy
/// gate: both lengths > 6, length difference <= 3, distance <= 2 and
/// similarity >= 95%.
fn fuzzy_similarity(a: &TitleKeys, b: &TitleKeys) -> Option<u8> {
    let (la, lb) = (a.normalized_len, b.normalized_len);
    if la <= FUZZY_MIN_LEN || lb <= FUZZY_MIN_LEN || la.abs_diff(lb) > FUZZY_MAX_LEN_DIFF {
        return None;
    }

    let distance = levenshtein(&a.normalized, &b.normalized);
    let longest = la.max(lb);

    // 1 - d/m >= 0.95  <=>  20 * d <= m. Both checks are required.
    if distance > FUZZY_MAX_DISTANCE || distance * 20 > longest {
        return None;
    }

    // round(100 * (m - d) / m), half up
    let percent = (200 * (longest - distance) + longest) / (2 * longest);
    Some(percent as u8)
}

/// Case-insensitive comparison, falling back to the raw strings so the
/// order is total.
fn cmp_folded(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Sort records by library name, then catalog name, both case-insensitive.
///
/// Remaining ties are broken by the raw names, kind and catalog key so the
/// order never depends on input order.
pub fn sort_records(records: &mut [MatchRecord]) {
    records.sort_by(|a, b| {
        a.library_name
            .to_lowercase()
            .cmp(&b.library_name.to_lowercase())
            .then_with(|| a.catalog_name.to_lowercase().cmp(&b.catalog_name.to_lowercase()))
            .then_with(|| a.library_name.cmp(&b.library_name))
            .then_with(|| a.catalog_name.cmp(&b.catalog_name))
            .then_with(|| a.kind.cmp(&b.kind))
            .then_with(|| a.catalog_key.cmp(&b.catalog_key))
    });
}

/// Collapse records sharing a `(library_name, catalog_name)` pair, keeping
/// the one with the strictest kind, and return them sorted.
///
/// Safe to call on the concatenation of several matcher passes.
pub fn dedup_records(records: Vec<MatchRecord>) -> Vec<MatchRecord> {
    let mut best: HashMap<(String, String), MatchRecord> = HashMap::with_capacity(records.len());

    for record in records {
        let pair = (record.library_name.clone(), record.catalog_name.clone());
        match best.entry(pair) {
            Entry::Occupied(mut slot) => {
                let current = slot.get();
                let better = record.kind < current.kind
                    || (record.kind == current.kind && record.catalog_key < current.catalog_key);
                if better {
                    slot.insert(record);
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(record);
            }
        }
    }

    let mut out: Vec<MatchRecord> = best.into_values().collect();
    sort_records(&mut out);
    out
}

/// Match every library entry against every catalog entry.
///
/// Returns an empty list when either side is empty. Never fails.
pub fn match_titles(library: &[LibraryEntry], catalog: &[CatalogEntry]) -> Vec<MatchRecord> {
    if library.is_empty() || catalog.is_empty() {
        return Vec::new();
    }
    let records = CatalogIndex::new(catalog).match_library(library);
    log::debug!(
        "Matched {} library titles against {} catalog entries: {} matches",
        library.len(),
        catalog.len(),
        records.len()
    );
    records
}

/// Parallel variant of [`match_titles`]; produces the same output.
pub fn match_titles_par(library: &[LibraryEntry], catalog: &[CatalogEntry]) -> Vec<MatchRecord> {
    if library.is_empty() || catalog.is_empty() {
        return Vec::new();
    }
    CatalogIndex::new(catalog).match_library_par(library)
}

#[cfg(test)]
#[path = "tests/matcher_tests.rs"]
mod tests;
