//! Time-bounded caches for upstream responses.
//!
//! Adapters receive a [`Cache`] at construction instead of sharing global
//! state. Entry age is measured with an injected [`Clock`], so tests can
//! move time forward deterministically with [`ManualClock`].

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::SourceError;

/// Default time-to-live for cached upstream data.
pub const DEFAULT_TTL: Duration = Duration::hours(1);

/// Source of the current time for cache expiry.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        if let Ok(mut now) = self.now.lock() {
            *now += by;
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.lock().map(|now| *now).unwrap_or_else(|e| *e.into_inner())
    }
}

/// Key/value store for JSON values with a time-to-live.
///
/// `set` never fails from the caller's point of view: a cache that cannot
/// store a value simply misses next time.
pub trait Cache: Send + Sync {
    fn get(&self, key: &str) -> Option<serde_json::Value>;
    fn set(&self, key: &str, value: serde_json::Value);
}

/// Fetch and deserialize a cached value. Undecodable entries count as misses.
pub fn load<T: DeserializeOwned>(cache: &dyn Cache, key: &str) -> Option<T> {
    let value = cache.get(key)?;
    match serde_json::from_value(value) {
        Ok(v) => Some(v),
        Err(e) => {
            log::debug!("Ignoring undecodable cache entry '{key}': {e}");
            None
        }
    }
}

/// Serialize and store a value.
pub fn store<T: Serialize>(cache: &dyn Cache, key: &str, value: &T) {
    match serde_json::to_value(value) {
        Ok(v) => cache.set(key, v),
        Err(e) => log::warn!("Could not serialize cache entry '{key}': {e}"),
    }
}

/// A cached value together with the moment it was stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CachedValue {
    stored_at: DateTime<Utc>,
    value: serde_json::Value,
}

impl CachedValue {
    fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.stored_at > ttl
    }
}

/// A cache that never stores anything (used for `--no-cache`).
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCache;

impl Cache for NullCache {
    fn get(&self, _key: &str) -> Option<serde_json::Value> {
        None
    }

    fn set(&self, _key: &str, _value: serde_json::Value) {}
}

/// In-process cache.
pub struct MemoryCache {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    entries: Mutex<HashMap<String, CachedValue>>,
}

impl MemoryCache {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Cache for MemoryCache {
    fn get(&self, key: &str) -> Option<serde_json::Value> {
        let mut entries = self.entries.lock().ok()?;
        let expired = entries.get(key)?.is_expired(self.clock.now(), self.ttl);
        if expired {
            entries.remove(key);
            return None;
        }
        entries.get(key).map(|cached| cached.value.clone())
    }

    fn set(&self, key: &str, value: serde_json::Value) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(
                key.to_string(),
                CachedValue {
                    stored_at: self.clock.now(),
                    value,
                },
            );
        }
    }
}

/// Information about an on-disk cache entry, for display.
#[derive(Debug, Clone)]
pub struct DiskEntryInfo {
    pub key: String,
    pub stored_at: DateTime<Utc>,
    pub file_size: u64,
    pub expired: bool,
}

/// Cache persisted as one JSON file per key, so repeated CLI runs within the
/// TTL reuse upstream responses.
pub struct DiskCache {
    dir: PathBuf,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

/// Default cache directory: `<cache_dir>/portmatch`.
pub fn cache_dir() -> Result<PathBuf, SourceError> {
    let base =
        dirs::cache_dir().ok_or_else(|| SourceError::cache("Could not determine cache directory"))?;
    Ok(base.join("portmatch"))
}

/// Map a cache key to a safe file stem.
fn file_stem(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

impl DiskCache {
    pub fn new(dir: impl Into<PathBuf>, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            dir: dir.into(),
            ttl,
            clock,
        }
    }

    /// Cache in the user's cache directory using wall-clock time.
    pub fn open_default(ttl: Duration) -> Result<Self, SourceError> {
        Ok(Self::new(cache_dir()?, ttl, Arc::new(SystemClock)))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", file_stem(key)))
    }

    fn read_entry(path: &Path) -> Result<CachedValue, SourceError> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    fn write_entry(&self, key: &str, cached: &CachedValue) -> Result<(), SourceError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.entry_path(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec(cached)?)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    /// List every entry in the cache directory, oldest first.
    pub fn list(&self) -> Result<Vec<DiskEntryInfo>, SourceError> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let now = self.clock.now();
        let mut entries = Vec::new();
        for item in fs::read_dir(&self.dir)? {
            let path = item?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Ok(cached) = Self::read_entry(&path) else {
                log::debug!("Skipping unreadable cache file {}", path.display());
                continue;
            };
            let key = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            entries.push(DiskEntryInfo {
                key,
                stored_at: cached.stored_at,
                file_size: fs::metadata(&path)?.len(),
                expired: cached.is_expired(now, self.ttl),
            });
        }
        entries.sort_by(|a, b| a.stored_at.cmp(&b.stored_at).then_with(|| a.key.cmp(&b.key)));
        Ok(entries)
    }

    /// Delete all cache files. Returns the number of bytes freed.
    pub fn clear(&self) -> Result<u64, SourceError> {
        if !self.dir.exists() {
            return Ok(0);
        }
        let mut freed = 0u64;
        for item in fs::read_dir(&self.dir)? {
            let path = item?.path();
            if path.is_file() {
                freed += fs::metadata(&path)?.len();
                fs::remove_file(&path)?;
            }
        }
        Ok(freed)
    }
}

impl Cache for DiskCache {
    fn get(&self, key: &str) -> Option<serde_json::Value> {
        let path = self.entry_path(key);
        if !path.exists() {
            return None;
        }
        let cached = match Self::read_entry(&path) {
            Ok(c) => c,
            Err(e) => {
                log::debug!("Discarding corrupt cache file {}: {e}", path.display());
                let _ = fs::remove_file(&path);
                return None;
            }
        };
        if cached.is_expired(self.clock.now(), self.ttl) {
            let _ = fs::remove_file(&path);
            return None;
        }
        Some(cached.value)
    }

    fn set(&self, key: &str, value: serde_json::Value) {
        let cached = CachedValue {
            stored_at: self.clock.now(),
            value,
        };
        if let Err(e) = self.write_entry(key, &cached) {
            log::warn!("Could not write cache entry '{key}': {e}");
        }
    }
}

#[cfg(test)]
#[path = "tests/cache_tests.rs"]
mod tests;
