use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::matcher::{MatchKind, MatchRecord};

/// Aggregate counts over a match result, for report headers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSummary {
    /// Total number of records.
    pub total: usize,
    /// Distinct library titles with at least one match.
    pub matched_titles: usize,
    /// Records per kind; kinds with no records are absent.
    pub by_kind: BTreeMap<MatchKind, usize>,
}

impl MatchSummary {
    pub fn from_records(records: &[MatchRecord]) -> Self {
        let mut by_kind = BTreeMap::new();
        let mut titles = HashSet::new();
        for record in records {
            *by_kind.entry(record.kind).or_insert(0) += 1;
            titles.insert(record.library_name.as_str());
        }
        Self {
            total: records.len(),
            matched_titles: titles.len(),
            by_kind,
        }
    }

    /// Count for one kind (zero if absent).
    pub fn count(&self, kind: MatchKind) -> usize {
        self.by_kind.get(&kind).copied().unwrap_or(0)
    }
}
