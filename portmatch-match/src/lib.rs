//! Title reconciliation between a storefront library and the PortMaster
//! catalog.
//!
//! Everything in this crate is pure and total: no I/O, no errors, no shared
//! state. Adapters hand over already-parsed entries and get back an ordered,
//! deduplicated list of classified matches.

pub mod distance;
pub mod matcher;
pub mod normalizer;
pub mod summary;

pub use distance::levenshtein;
pub use matcher::{
    CatalogIndex, MatchKind, MatchRecord, dedup_records, match_titles, match_titles_par,
    sort_records,
};
pub use normalizer::{STOPWORDS, normalize, strip_whitespace};
pub use summary::MatchSummary;
