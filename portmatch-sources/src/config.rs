//! User configuration (`~/.config/portmatch/config.toml`).
//!
//! The Steam Web API key is resolved from the environment first, then the
//! config file. Cache TTL and the catalog URL fall back to built-in defaults.

use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::SourceError;

/// Environment variable holding the Steam Web API key.
pub const STEAM_API_KEY_VAR: &str = "STEAM_API_KEY";

/// Primary PortMaster catalog: the consolidated `ports.json`.
pub const DEFAULT_PORTS_URL: &str =
    "https://raw.githubusercontent.com/PortsMaster/PortMaster-Info/main/ports.json";

/// GitHub contents listing of the legacy PortMaster repository, used when
/// `ports.json` yields nothing.
pub const LEGACY_CONTENTS_URL: &str =
    "https://api.github.com/repos/christianhaitian/PortMaster/contents";

pub const DEFAULT_CACHE_TTL_SECS: u64 = 3600;

/// Resolved settings used by the adapters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub steam_api_key: Option<String>,
    pub cache_ttl_secs: u64,
    pub ports_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            steam_api_key: None,
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            ports_url: DEFAULT_PORTS_URL.to_string(),
        }
    }
}

/// Where a setting's value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    EnvVar(&'static str),
    ConfigFile,
    Default,
    Missing,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EnvVar(var) => write!(f, "env ${}", var),
            Self::ConfigFile => write!(f, "config file"),
            Self::Default => write!(f, "default"),
            Self::Missing => write!(f, "not set"),
        }
    }
}

/// Provenance of each setting.
#[derive(Debug)]
pub struct ConfigSources {
    pub steam_api_key: ConfigSource,
    pub cache_ttl: ConfigSource,
    pub ports_url: ConfigSource,
}

/// TOML config file format.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    steam: Option<SteamSection>,
    cache: Option<CacheSection>,
    catalog: Option<CatalogSection>,
}

#[derive(Debug, Default, Deserialize)]
struct SteamSection {
    api_key: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct CacheSection {
    ttl_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct CatalogSection {
    ports_url: Option<String>,
}

impl ConfigFile {
    fn api_key(&self) -> Option<&str> {
        self.steam
            .as_ref()
            .and_then(|s| s.api_key.as_deref())
            .filter(|k| !k.trim().is_empty())
    }

    fn ttl_secs(&self) -> Option<u64> {
        self.cache.as_ref().and_then(|c| c.ttl_secs)
    }

    fn ports_url(&self) -> Option<&str> {
        self.catalog.as_ref().and_then(|c| c.ports_url.as_deref())
    }
}

fn env_api_key() -> Option<String> {
    std::env::var(STEAM_API_KEY_VAR)
        .ok()
        .filter(|k| !k.trim().is_empty())
}

impl Settings {
    /// Load settings from the environment and the config file.
    ///
    /// A missing config file is not an error; a malformed one is.
    pub fn load() -> Result<Self, SourceError> {
        let contents = match config_path() {
            Some(path) if path.exists() => Some(std::fs::read_to_string(&path)?),
            _ => None,
        };
        Self::resolve(env_api_key(), contents.as_deref())
    }

    /// Parse settings from TOML text alone (no environment lookup).
    pub fn from_toml_str(contents: &str) -> Result<Self, SourceError> {
        Self::resolve(None, Some(contents))
    }

    /// Combine an environment-provided key with optional config file text.
    /// The environment key wins over the file.
    pub fn resolve(env_key: Option<String>, contents: Option<&str>) -> Result<Self, SourceError> {
        let file: ConfigFile = match contents {
            Some(text) => toml::from_str(text)
                .map_err(|e| SourceError::config(format!("Invalid config file: {}", e)))?,
            None => ConfigFile::default(),
        };

        Ok(Self {
            steam_api_key: env_key.or_else(|| file.api_key().map(str::to_string)),
            cache_ttl_secs: file.ttl_secs().unwrap_or(DEFAULT_CACHE_TTL_SECS),
            ports_url: file
                .ports_url()
                .map(str::to_string)
                .unwrap_or_else(|| DEFAULT_PORTS_URL.to_string()),
        })
    }

    /// Cache TTL as a chrono duration.
    pub fn cache_ttl(&self) -> chrono::Duration {
        let max = (i64::MAX / 1000) as u64;
        chrono::Duration::seconds(self.cache_ttl_secs.min(max) as i64)
    }

    /// The Steam API key, or [`SourceError::MissingApiKey`].
    pub fn require_api_key(&self) -> Result<&str, SourceError> {
        self.steam_api_key
            .as_deref()
            .ok_or(SourceError::MissingApiKey)
    }
}

/// Return the path to the config file.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("portmatch").join("config.toml"))
}

/// Determine where each setting is coming from.
pub fn config_sources() -> ConfigSources {
    let file: ConfigFile = config_path()
        .and_then(|p| std::fs::read_to_string(p).ok())
        .and_then(|c| toml::from_str(&c).ok())
        .unwrap_or_default();

    let steam_api_key = if env_api_key().is_some() {
        ConfigSource::EnvVar(STEAM_API_KEY_VAR)
    } else if file.api_key().is_some() {
        ConfigSource::ConfigFile
    } else {
        ConfigSource::Missing
    };

    let cache_ttl = if file.ttl_secs().is_some() {
        ConfigSource::ConfigFile
    } else {
        ConfigSource::Default
    };

    let ports_url = if file.ports_url().is_some() {
        ConfigSource::ConfigFile
    } else {
        ConfigSource::Default
    };

    ConfigSources {
        steam_api_key,
        cache_ttl,
        ports_url,
    }
}

/// Save the Steam API key to the config file. Returns the path written.
pub fn save_api_key(key: &str) -> Result<PathBuf, SourceError> {
    let path = config_path()
        .ok_or_else(|| SourceError::config("Could not determine config directory"))?;
    write_api_key(&path, key)?;
    Ok(path)
}

/// Set `steam.api_key` in the file at `path`, keeping every other table.
///
/// A file that is not valid TOML is left untouched and reported as
/// `InvalidData`.
pub fn write_api_key(path: &Path, key: &str) -> io::Result<()> {
    let mut doc: toml::Value = match std::fs::read_to_string(path) {
        Ok(contents) => contents.parse().map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("{} is not valid TOML: {}", path.display(), e),
            )
        })?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => toml::Value::Table(Default::default()),
        Err(e) => return Err(e),
    };

    let table = doc
        .as_table_mut()
        .ok_or_else(|| io::Error::other("config.toml root is not a table"))?;
    let steam = table
        .entry("steam")
        .or_insert_with(|| toml::Value::Table(Default::default()));
    let steam_table = steam
        .as_table_mut()
        .ok_or_else(|| io::Error::other("[steam] is not a table"))?;
    steam_table.insert(
        "api_key".to_string(),
        toml::Value::String(key.trim().to_string()),
    );

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let serialized = toml::to_string_pretty(&doc).map_err(io::Error::other)?;
    let tmp = path.with_extension("toml.tmp");
    std::fs::write(&tmp, &serialized)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

/// Load the config file as a pretty-printed TOML string for display.
pub fn load_config_string() -> Option<String> {
    let contents = std::fs::read_to_string(config_path()?).ok()?;
    let doc: toml::Value = contents.parse().ok()?;
    toml::to_string_pretty(&doc).ok()
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
