use serde::Deserialize;

use portmatch_core::{LibraryEntry, Storefront};

use crate::error::SourceError;
use crate::library::{LibraryParser, dedup_by_name, non_empty};

/// GOG library, either the account JSON (`{"products": [{"title": ...}]}`)
/// or plain titles one per line.
#[derive(Debug, Clone, Copy, Default)]
pub struct GogLibrary;

#[derive(Debug, Deserialize)]
struct ProductList {
    #[serde(default)]
    products: Vec<Product>,
}

#[derive(Debug, Deserialize)]
struct Product {
    #[serde(default)]
    id: Option<serde_json::Value>,
    #[serde(default)]
    title: Option<serde_json::Value>,
}

fn from_products(list: ProductList) -> Vec<LibraryEntry> {
    list.products
        .into_iter()
        .filter_map(|p| {
            let title = p.title?.as_str()?.trim().to_string();
            if title.is_empty() {
                return None;
            }
            let entry = LibraryEntry::new(title);
            Some(match p.id {
                Some(serde_json::Value::Number(n)) => entry.with_source_id(n.to_string()),
                Some(serde_json::Value::String(s)) => entry.with_source_id(s),
                _ => entry,
            })
        })
        .collect()
}

fn from_lines(raw: &str) -> Vec<LibraryEntry> {
    raw.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(LibraryEntry::new)
        .collect()
}

impl LibraryParser for GogLibrary {
    fn storefront(&self) -> Storefront {
        Storefront::Gog
    }

    fn parse(&self, raw: &str) -> Result<Vec<LibraryEntry>, SourceError> {
        // A JSON object is treated as an export; its lines are never read
        // as titles.
        let entries = match serde_json::from_str::<serde_json::Value>(raw) {
            Ok(value) if value.is_object() => serde_json::from_value::<ProductList>(value)
                .map(from_products)
                .unwrap_or_default(),
            _ => from_lines(raw),
        };
        non_empty(Storefront::Gog, dedup_by_name(entries))
    }
}

#[cfg(test)]
#[path = "tests/gog_tests.rs"]
mod tests;
