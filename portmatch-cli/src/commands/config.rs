use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use portmatch_sources::config::{self, STEAM_API_KEY_VAR};
use portmatch_sources::{ConfigSource, Settings};

use crate::error::CliError;

/// Mask a secret value for display, showing only the first 2 characters.
fn mask_value(s: &str) -> String {
    match s.char_indices().nth(2) {
        Some((idx, _)) => format!("{}****", &s[..idx]),
        None => "****".to_string(),
    }
}

/// Show current settings and their sources.
pub(crate) fn run_config_show() {
    let path = config::config_path();
    let sources = config::config_sources();

    log::info!(
        "{}",
        "portmatch Configuration".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("");

    match &path {
        Some(p) if p.exists() => {
            log::info!(
                "  Config file: {} {}",
                p.display().if_supports_color(Stdout, |t| t.cyan()),
                "(exists)".if_supports_color(Stdout, |t| t.green()),
            );
        }
        Some(p) => {
            log::info!(
                "  Config file: {} {}",
                p.display().if_supports_color(Stdout, |t| t.cyan()),
                "(not found)".if_supports_color(Stdout, |t| t.dimmed()),
            );
        }
        None => {
            log::info!(
                "  Config file: {}",
                "could not determine path".if_supports_color(Stdout, |t| t.red()),
            );
        }
    }
    log::info!("");

    let settings = match Settings::load() {
        Ok(s) => Some(s),
        Err(e) => {
            log::warn!("Could not load settings: {}", e);
            None
        }
    };

    let api_key = match sources.steam_api_key {
        ConfigSource::Missing => None,
        _ => settings
            .as_ref()
            .and_then(|s| s.steam_api_key.as_deref())
            .map(mask_value),
    };
    let ttl = settings.as_ref().map(|s| format!("{}s", s.cache_ttl_secs));
    let ports_url = settings.as_ref().map(|s| s.ports_url.clone());

    let fields: [(&str, &ConfigSource, Option<String>); 3] = [
        ("steam_api_key", &sources.steam_api_key, api_key),
        ("cache_ttl", &sources.cache_ttl, ttl),
        ("ports_url", &sources.ports_url, ports_url),
    ];

    for (name, source, value) in &fields {
        let source_str = format!("({})", source);
        match value {
            Some(v) => {
                log::info!(
                    "  {} {} {}",
                    format!("{}:", name).if_supports_color(Stdout, |t| t.cyan()),
                    v,
                    source_str.if_supports_color(Stdout, |t| t.dimmed()),
                );
            }
            None => {
                log::info!(
                    "  {} {} {}",
                    format!("{}:", name).if_supports_color(Stdout, |t| t.cyan()),
                    "not set".if_supports_color(Stdout, |t| t.yellow()),
                    source_str.if_supports_color(Stdout, |t| t.dimmed()),
                );
            }
        }
    }

    if matches!(sources.steam_api_key, ConfigSource::Missing) {
        log::info!("");
        log::info!(
            "Steam comparisons need an API key. Set ${} or run 'portmatch config set-key <KEY>'.",
            STEAM_API_KEY_VAR
        );
    }
}

/// Print the config file path.
pub(crate) fn run_config_path() {
    match config::config_path() {
        Some(p) => log::info!("{}", p.display()),
        None => log::warn!("Could not determine config directory"),
    }
}

/// Save a Steam Web API key.
pub(crate) fn run_config_set_key(key: &str) -> Result<(), CliError> {
    if key.trim().is_empty() {
        return Err(CliError::config("API key must not be empty"));
    }
    let path = config::save_api_key(key).map_err(|e| CliError::config(e.to_string()))?;
    log::info!(
        "{} Steam API key saved to {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        path.display().if_supports_color(Stdout, |t| t.cyan()),
    );
    if std::env::var(STEAM_API_KEY_VAR).is_ok_and(|v| !v.trim().is_empty()) {
        log::warn!(
            "${} is set and takes precedence over the saved key",
            STEAM_API_KEY_VAR
        );
    }
    Ok(())
}
