pub(crate) mod cache;
pub(crate) mod catalog;
pub(crate) mod compare;
pub(crate) mod config;

use std::sync::Arc;

use portmatch_sources::{Cache, DiskCache, NullCache, Settings};

use crate::error::CliError;

/// Load settings, turning config errors into CLI errors.
pub(crate) fn load_settings() -> Result<Settings, CliError> {
    Settings::load().map_err(|e| CliError::config(e.to_string()))
}

/// The on-disk cache, or a cache that stores nothing when `no_cache` is set.
///
/// If the cache directory cannot be determined, runs continue uncached.
pub(crate) fn open_cache(settings: &Settings, no_cache: bool) -> Arc<dyn Cache> {
    if no_cache {
        return Arc::new(NullCache);
    }
    match DiskCache::open_default(settings.cache_ttl()) {
        Ok(cache) => Arc::new(cache),
        Err(e) => {
            log::warn!("Caching disabled: {}", e);
            Arc::new(NullCache)
        }
    }
}

pub(crate) fn runtime() -> Result<tokio::runtime::Runtime, CliError> {
    tokio::runtime::Runtime::new().map_err(|e| CliError::runtime(e.to_string()))
}

/// Format a byte count with fractional KB/MB (e.g., "1.5 KB", "2.3 MB").
pub(crate) fn format_bytes(bytes: u64) -> String {
    if bytes >= 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else if bytes >= 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{} B", bytes)
    }
}
