//! Steam Web API: profile resolution and owned games.

use std::sync::{Arc, LazyLock};
use std::time::Duration;

use regex::Regex;
use reqwest::StatusCode;
use serde::Deserialize;

use portmatch_core::{LibraryEntry, Storefront};

use crate::cache::Cache;
use crate::error::SourceError;
use crate::library::{LibraryParser, describe_common, non_empty};

const API_BASE: &str = "https://api.steampowered.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

static STEAM_ID64: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(765611\d{11})\b").expect("static pattern"));

static VANITY_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)steamcommunity\.com/id/([^/?]+)").expect("static pattern")
});

/// What the user typed to identify a Steam profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SteamIdInput {
    /// A 64-bit Steam id, usable directly.
    Id64(String),
    /// A custom profile name that must be resolved through the API.
    Vanity(String),
}

/// Classify profile input: a Steam ID64 anywhere in the text, a
/// `steamcommunity.com/id/<name>` URL, or a bare custom name.
pub fn parse_steam_input(input: &str) -> Result<SteamIdInput, SourceError> {
    let input = input.trim();

    if let Some(caps) = STEAM_ID64.captures(input) {
        return Ok(SteamIdInput::Id64(caps[1].to_string()));
    }
    if let Some(caps) = VANITY_URL.captures(input) {
        return Ok(SteamIdInput::Vanity(caps[1].to_string()));
    }
    if !input.contains('/') && !input.contains('.') && input.chars().count() > 2 {
        return Ok(SteamIdInput::Vanity(input.to_string()));
    }
    Err(SourceError::unresolved(input))
}

#[derive(Debug, Deserialize)]
struct VanityEnvelope {
    response: VanityResponse,
}

#[derive(Debug, Deserialize)]
struct VanityResponse {
    success: i64,
    steamid: Option<String>,
}

/// Extract the Steam id from a `ResolveVanityURL` body.
pub fn parse_vanity_response(body: &str, vanity: &str) -> Result<String, SourceError> {
    let envelope: VanityEnvelope = serde_json::from_str(body)?;
    match envelope.response {
        VanityResponse {
            success: 1,
            steamid: Some(id),
        } => Ok(id),
        _ => Err(SourceError::unresolved(vanity)),
    }
}

#[derive(Debug, Deserialize)]
struct OwnedGamesEnvelope {
    #[serde(default)]
    response: Option<OwnedGamesResponse>,
}

#[derive(Debug, Deserialize)]
struct OwnedGamesResponse {
    #[serde(default)]
    games: Option<Vec<OwnedGame>>,
}

#[derive(Debug, Deserialize)]
struct OwnedGame {
    appid: u64,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    playtime_forever: Option<u64>,
}

/// Parses a `GetOwnedGames` response body.
#[derive(Debug, Clone, Copy, Default)]
pub struct SteamLibrary;

impl SteamLibrary {
    fn from_value(&self, value: serde_json::Value) -> Result<Vec<LibraryEntry>, SourceError> {
        let envelope: OwnedGamesEnvelope = serde_json::from_value(value)?;
        let games = envelope
            .response
            .and_then(|r| r.games)
            .ok_or(SourceError::PrivateProfile)?;

        let entries = games
            .into_iter()
            .filter_map(|game| {
                let name = game.name?.trim().to_string();
                if name.is_empty() {
                    return None;
                }
                let entry = LibraryEntry::new(name).with_source_id(game.appid.to_string());
                Some(match game.playtime_forever {
                    // minutes → hours, rounded half up
                    Some(minutes) => {
                        entry.with_extra("playtime_hours", ((minutes + 30) / 60).to_string())
                    }
                    None => entry,
                })
            })
            .collect();
        non_empty(Storefront::Steam, entries)
    }
}

impl LibraryParser for SteamLibrary {
    fn storefront(&self) -> Storefront {
        Storefront::Steam
    }

    fn parse(&self, raw: &str) -> Result<Vec<LibraryEntry>, SourceError> {
        self.from_value(serde_json::from_str(raw)?)
    }

    fn describe_error(&self, err: &SourceError) -> String {
        match err {
            SourceError::MissingApiKey => "Steam API key not configured. Set STEAM_API_KEY or run \
                 `portmatch config set-key <KEY>`."
                .to_string(),
            SourceError::InvalidApiKey => {
                "The Steam API key was rejected. Please check the configured key.".to_string()
            }
            SourceError::UnresolvedProfile(_) => "Invalid Steam ID format or unable to resolve \
                 Steam profile. Please check your Steam ID or profile URL."
                .to_string(),
            SourceError::PrivateProfile | SourceError::EmptyLibrary(_) => {
                "Steam profile is private or does not exist. Please make your Steam profile \
                 public and try again."
                    .to_string()
            }
            SourceError::Http(_) | SourceError::Json(_) => {
                "Failed to fetch Steam games. Please check your Steam ID and try again.".to_string()
            }
            other => describe_common(other).unwrap_or_else(|| other.to_string()),
        }
    }
}

/// HTTP client for the Steam Web API.
pub struct SteamClient {
    http: reqwest::Client,
    api_key: String,
    cache: Arc<dyn Cache>,
}

fn check_status(status: StatusCode) -> Result<(), SourceError> {
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(SourceError::InvalidApiKey);
    }
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(SourceError::RateLimited { service: "Steam" });
    }
    Ok(())
}

impl SteamClient {
    pub fn new(api_key: impl Into<String>, cache: Arc<dyn Cache>) -> Result<Self, SourceError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("portmatch/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            api_key: api_key.into(),
            cache,
        })
    }

    /// Resolve user input to a Steam ID64, calling `ResolveVanityURL` for
    /// custom profile names.
    pub async fn resolve_steam_id(&self, input: &str) -> Result<String, SourceError> {
        let vanity = match parse_steam_input(input)? {
            SteamIdInput::Id64(id) => return Ok(id),
            SteamIdInput::Vanity(name) => name,
        };

        log::debug!("Resolving Steam vanity name '{}'", vanity);
        let resp = self
            .http
            .get(format!("{}/ISteamUser/ResolveVanityURL/v0001/", API_BASE))
            .query(&[
                ("key", self.api_key.as_str()),
                ("vanityurl", vanity.as_str()),
                ("format", "json"),
            ])
            .send()
            .await?;
        check_status(resp.status())?;
        let text = resp.error_for_status()?.text().await?;
        parse_vanity_response(&text, &vanity)
    }

    /// Raw `GetOwnedGames` response for a Steam id. Cached per id.
    pub async fn owned_games(&self, steam_id: &str) -> Result<serde_json::Value, SourceError> {
        let key = format!("steam_games_{}", steam_id);
        if let Some(cached) = self.cache.get(&key) {
            log::info!("Using cached Steam library for {}", steam_id);
            return Ok(cached);
        }

        log::info!("Fetching owned games for Steam id {}", steam_id);
        let resp = self
            .http
            .get(format!("{}/IPlayerService/GetOwnedGames/v0001/", API_BASE))
            .query(&[
                ("key", self.api_key.as_str()),
                ("steamid", steam_id),
                ("include_appinfo", "1"),
                ("format", "json"),
            ])
            .send()
            .await?;
        check_status(resp.status())?;
        let body: serde_json::Value = resp.error_for_status()?.json().await?;

        let has_games = body
            .get("response")
            .and_then(|r| r.get("games"))
            .is_some_and(|g| g.is_array());
        if !has_games {
            return Err(SourceError::PrivateProfile);
        }
        self.cache.set(&key, body.clone());
        Ok(body)
    }

    /// Resolve the profile and return its library entries.
    pub async fn fetch_library(&self, input: &str) -> Result<Vec<LibraryEntry>, SourceError> {
        let steam_id = self.resolve_steam_id(input).await?;
        let body = self.owned_games(&steam_id).await?;
        SteamLibrary.from_value(body)
    }
}

#[cfg(test)]
#[path = "tests/steam_tests.rs"]
mod tests;
