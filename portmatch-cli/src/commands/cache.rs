use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use portmatch_sources::DiskCache;

use super::{format_bytes, load_settings};
use crate::error::CliError;

fn open() -> Result<DiskCache, CliError> {
    let settings = load_settings()?;
    DiskCache::open_default(settings.cache_ttl()).map_err(|e| CliError::config(e.to_string()))
}

/// List cached upstream responses.
pub(crate) fn run_cache_list() -> Result<(), CliError> {
    let cache = open()?;
    match cache.list() {
        Ok(entries) => {
            if entries.is_empty() {
                log::info!(
                    "{}",
                    "No cached data.".if_supports_color(Stdout, |t| t.dimmed()),
                );
                return Ok(());
            }

            log::info!(
                "{} {}",
                "Cached data in".if_supports_color(Stdout, |t| t.bold()),
                cache.dir().display().if_supports_color(Stdout, |t| t.cyan()),
            );
            log::info!("");

            let mut total_size = 0u64;
            for entry in &entries {
                total_size += entry.file_size;
                let status = if entry.expired {
                    format!("{}", "expired".if_supports_color(Stdout, |t| t.yellow()))
                } else {
                    format!("{}", "fresh".if_supports_color(Stdout, |t| t.green()))
                };
                log::info!(
                    "  {} [{}]",
                    entry.key.if_supports_color(Stdout, |t| t.bold()),
                    status,
                );
                log::info!(
                    "    Size: {}, Stored: {}",
                    format_bytes(entry.file_size),
                    entry.stored_at.format("%Y-%m-%d %H:%M:%S UTC"),
                );
            }
            log::info!("");
            log::info!(
                "Total: {} entries, {}",
                entries.len(),
                format_bytes(total_size)
            );
        }
        Err(e) => {
            log::warn!(
                "{} Error listing cache: {}",
                "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                e,
            );
        }
    }
    Ok(())
}

/// Remove every cached response.
pub(crate) fn run_cache_clear() -> Result<(), CliError> {
    let cache = open()?;
    match cache.clear() {
        Ok(freed) => {
            log::info!(
                "{} Cache cleared ({} freed)",
                "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                format_bytes(freed),
            );
        }
        Err(e) => {
            log::warn!(
                "{} Error clearing cache: {}",
                "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                e,
            );
        }
    }
    Ok(())
}
