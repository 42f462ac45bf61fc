use portmatch_core::Storefront;

/// Errors raised while fetching or parsing libraries and the catalog.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Rate limited by {service}")]
    RateLimited { service: &'static str },

    #[error("Steam API key not configured")]
    MissingApiKey,

    #[error("Steam API key was rejected")]
    InvalidApiKey,

    #[error("Could not resolve Steam profile: {0}")]
    UnresolvedProfile(String),

    #[error("Steam profile is private or does not exist")]
    PrivateProfile,

    #[error("No games found in {0} library")]
    EmptyLibrary(Storefront),

    #[error("Catalog unavailable: {0}")]
    CatalogUnavailable(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Cache error: {0}")]
    Cache(String),
}

impl SourceError {
    pub fn unresolved(input: impl Into<String>) -> Self {
        Self::UnresolvedProfile(input.into())
    }

    pub fn catalog_unavailable(msg: impl Into<String>) -> Self {
        Self::CatalogUnavailable(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn cache(msg: impl Into<String>) -> Self {
        Self::Cache(msg.into())
    }
}
