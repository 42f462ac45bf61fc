//! PortMaster catalog: `ports.json` with a fallback to the legacy
//! repository's GitHub contents listing.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;

use portmatch_core::{CatalogEntry, ImageRef};

use crate::cache::{self, Cache};
use crate::config::{DEFAULT_PORTS_URL, LEGACY_CONTENTS_URL};
use crate::error::SourceError;

/// Cache key for the parsed catalog.
pub const CATALOG_CACHE_KEY: &str = "portmaster_games";

const PRIMARY_TIMEOUT: Duration = Duration::from_secs(30);
const FALLBACK_TIMEOUT: Duration = Duration::from_secs(10);
const GITHUB: &str = "GitHub";

#[derive(Debug, Deserialize)]
struct PortsFile {
    #[serde(default)]
    ports: BTreeMap<String, PortRecord>,
}

#[derive(Debug, Default, Deserialize)]
struct PortRecord {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    attr: Option<PortAttr>,
    #[serde(default)]
    source: Option<PortSource>,
}

#[derive(Debug, Default, Deserialize)]
struct PortAttr {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    desc: Option<String>,
    #[serde(default)]
    genres: Vec<String>,
    #[serde(default)]
    image: Option<PortImage>,
}

#[derive(Debug, Default, Deserialize)]
struct PortImage {
    #[serde(default)]
    screenshot: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct PortSource {
    #[serde(default)]
    repo: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContentsItem {
    name: String,
    #[serde(rename = "type", default)]
    kind: Option<String>,
}

/// Strip a trailing `.zip`, ignoring case.
fn strip_zip(name: &str) -> &str {
    let len = name.len();
    if len >= 4 && name.is_char_boundary(len - 4) && name[len - 4..].eq_ignore_ascii_case(".zip") {
        &name[..len - 4]
    } else {
        name
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Turn a port archive name into a readable title.
///
/// ```
/// use portmatch_sources::portmaster::clean_port_name;
/// assert_eq!(clean_port_name("stardewValley.zip"), "Stardew Valley");
/// assert_eq!(clean_port_name("a_short-hike"), "A Short Hike");
/// ```
pub fn clean_port_name(key: &str) -> String {
    // dashes/underscores to spaces, and split camelCase boundaries
    let mut spaced = String::with_capacity(key.len() + 8);
    let mut prev: Option<char> = None;
    for c in strip_zip(key).chars() {
        let c = if c == '-' || c == '_' { ' ' } else { c };
        if let Some(p) = prev
            && p.is_ascii_lowercase()
            && c.is_ascii_uppercase()
        {
            spaced.push(' ');
        }
        spaced.push(c);
        prev = Some(c);
    }

    // collapse whitespace and capitalize the first letter of each word
    let collapsed = spaced.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut out = String::with_capacity(collapsed.len());
    let mut prev_word = false;
    for c in collapsed.chars() {
        if !prev_word && c.is_ascii_lowercase() {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
        prev_word = is_word_char(c);
    }
    out
}

fn first_non_empty<'a>(candidates: &[Option<&'a str>]) -> Option<&'a str> {
    candidates.iter().flatten().copied().find(|s| !s.is_empty())
}

/// Pick the display name for a port: the declared title when it is a real
/// name, otherwise the cleaned archive name.
fn display_name(key: &str, record: &PortRecord) -> String {
    let attr = record.attr.as_ref();
    let declared = first_non_empty(&[
        attr.and_then(|a| a.title.as_deref()),
        record.name.as_deref(),
        attr.and_then(|a| a.desc.as_deref()),
        record.description.as_deref(),
    ]);
    match declared {
        Some(name) if name != key && !name.ends_with(".zip") && !name.trim().is_empty() => {
            name.trim().to_string()
        }
        _ => clean_port_name(key),
    }
}

/// Parse a `ports.json` document into catalog entries, ordered by key.
pub fn parse_ports_json(body: &str) -> Result<Vec<CatalogEntry>, SourceError> {
    let file: PortsFile = serde_json::from_str(body)?;
    let entries = file
        .ports
        .into_iter()
        .map(|(key, record)| {
            let name = display_name(&key, &record);
            let attr = record.attr.unwrap_or_default();
            let image = ImageRef {
                port_name: key.clone(),
                screenshot: attr.image.and_then(|i| i.screenshot),
                repo: record
                    .source
                    .and_then(|s| s.repo)
                    .unwrap_or_else(|| "main".to_string()),
            };
            let mut entry = CatalogEntry::new(name, strip_zip(&key)).with_image(image);
            entry.description = attr.desc.filter(|d| !d.trim().is_empty());
            entry.genres = attr.genres;
            entry
        })
        .collect();
    Ok(entries)
}

/// Parse a GitHub contents listing: `.zip` files from the legacy repository,
/// or port directories from the newer layout.
pub fn parse_contents_listing(body: &str) -> Result<Vec<CatalogEntry>, SourceError> {
    let items: Vec<ContentsItem> = serde_json::from_str(body)?;
    let entries = items
        .into_iter()
        .filter_map(|item| {
            let is_zip = strip_zip(&item.name).len() < item.name.len();
            let is_dir = item.kind.as_deref() == Some("dir") && !item.name.starts_with('.');
            if !is_zip && !is_dir {
                return None;
            }
            let key = strip_zip(&item.name).to_string();
            let image = ImageRef {
                port_name: item.name.clone(),
                screenshot: Some("screenshot.jpg".to_string()),
                repo: "main".to_string(),
            };
            Some(CatalogEntry::new(clean_port_name(&item.name), key).with_image(image))
        })
        .collect();
    Ok(entries)
}

/// GitHub answers 403 as well as 429 once the anonymous quota is spent.
fn check_status(status: StatusCode) -> Result<(), SourceError> {
    if status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS {
        return Err(SourceError::RateLimited { service: GITHUB });
    }
    Ok(())
}

/// Decide what to do with the `ports.json` result: `Some` to use it, `None`
/// to try the legacy listing. Rate limits propagate, since the legacy
/// listing is served from the same GitHub quota.
fn use_primary(
    result: Result<Vec<CatalogEntry>, SourceError>,
) -> Result<Option<Vec<CatalogEntry>>, SourceError> {
    match result {
        Ok(entries) if !entries.is_empty() => Ok(Some(entries)),
        Ok(_) => {
            log::warn!("ports.json listed no ports, trying legacy repository");
            Ok(None)
        }
        Err(e @ SourceError::RateLimited { .. }) => Err(e),
        Err(e) => {
            log::warn!("Failed to fetch ports.json ({e}), trying legacy repository");
            Ok(None)
        }
    }
}

/// Fetches the PortMaster catalog, caching the parsed result.
pub struct PortmasterClient {
    http: reqwest::Client,
    ports_url: String,
    legacy_url: String,
    cache: Arc<dyn Cache>,
}

impl PortmasterClient {
    pub fn new(ports_url: impl Into<String>, cache: Arc<dyn Cache>) -> Result<Self, SourceError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("portmatch/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            ports_url: ports_url.into(),
            legacy_url: LEGACY_CONTENTS_URL.to_string(),
            cache,
        })
    }

    /// Client for the official `ports.json`.
    pub fn with_defaults(cache: Arc<dyn Cache>) -> Result<Self, SourceError> {
        Self::new(DEFAULT_PORTS_URL, cache)
    }

    /// Override the fallback contents listing URL.
    pub fn with_legacy_url(mut self, url: impl Into<String>) -> Self {
        self.legacy_url = url.into();
        self
    }

    /// The catalog, from cache if fresh, else from `ports.json`, else from
    /// the legacy listing.
    pub async fn fetch_catalog(&self) -> Result<Vec<CatalogEntry>, SourceError> {
        if let Some(cached) = cache::load::<Vec<CatalogEntry>>(self.cache.as_ref(), CATALOG_CACHE_KEY)
            && !cached.is_empty()
        {
            log::info!("Using cached PortMaster catalog ({} ports)", cached.len());
            return Ok(cached);
        }

        let entries = match use_primary(self.fetch_primary().await)? {
            Some(entries) => entries,
            None => self.fetch_fallback().await?,
        };

        log::info!("Loaded {} PortMaster ports", entries.len());
        cache::store(self.cache.as_ref(), CATALOG_CACHE_KEY, &entries);
        Ok(entries)
    }

    async fn get(&self, url: &str, timeout: Duration) -> Result<String, SourceError> {
        let resp = self
            .http
            .get(url)
            .timeout(timeout)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;
        check_status(resp.status())?;
        Ok(resp.error_for_status()?.text().await?)
    }

    async fn fetch_primary(&self) -> Result<Vec<CatalogEntry>, SourceError> {
        log::debug!("Fetching {}", self.ports_url);
        let body = self.get(&self.ports_url, PRIMARY_TIMEOUT).await?;
        parse_ports_json(&body)
    }

    async fn fetch_fallback(&self) -> Result<Vec<CatalogEntry>, SourceError> {
        log::debug!("Fetching {}", self.legacy_url);
        let entries = match self.get(&self.legacy_url, FALLBACK_TIMEOUT).await {
            Ok(body) => parse_contents_listing(&body)
                .map_err(|e| SourceError::catalog_unavailable(e.to_string()))?,
            Err(e @ SourceError::RateLimited { .. }) => return Err(e),
            Err(e) => return Err(SourceError::catalog_unavailable(e.to_string())),
        };
        if entries.is_empty() {
            return Err(SourceError::catalog_unavailable(
                "no ports found in any source",
            ));
        }
        Ok(entries)
    }
}

#[cfg(test)]
#[path = "tests/portmaster_tests.rs"]
mod tests;
