use serde::{Deserialize, Serialize};

/// Storefronts a user library can be imported from.
///
/// Centralizes storefront identity (short names, display names, aliases)
/// so the CLI, the adapters and the reports agree on spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Storefront {
    Steam,
    Epic,
    Gog,
}

const ALL_STOREFRONTS: &[Storefront] = &[Storefront::Steam, Storefront::Epic, Storefront::Gog];

impl Storefront {
    /// Canonical short name used for CLI arguments and cache keys.
    pub fn short_name(&self) -> &'static str {
        match self {
            Self::Steam => "steam",
            Self::Epic => "epic",
            Self::Gog => "gog",
        }
    }

    /// Human-readable storefront name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Steam => "Steam",
            Self::Epic => "Epic Games Store",
            Self::Gog => "GOG",
        }
    }

    /// All accepted names for this storefront (case-insensitive matching).
    ///
    /// The first alias is always the short name.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::Steam => &["steam", "valve"],
            Self::Epic => &["epic", "egs", "epic games", "epicgames", "epic games store"],
            Self::Gog => &["gog", "gog.com", "gog galaxy", "galaxy"],
        }
    }

    pub fn all() -> &'static [Storefront] {
        ALL_STOREFRONTS
    }
}

impl std::fmt::Display for Storefront {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Error returned when a string cannot be parsed into a `Storefront`.
#[derive(Debug, Clone)]
pub struct StorefrontParseError(pub String);

impl std::fmt::Display for StorefrontParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown storefront: '{}'", self.0)
    }
}

impl std::error::Error for StorefrontParseError {}

impl std::str::FromStr for Storefront {
    type Err = StorefrontParseError;

    /// Parse a storefront from any recognized name (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        ALL_STOREFRONTS
            .iter()
            .copied()
            .find(|sf| sf.aliases().iter().any(|alias| *alias == lower))
            .ok_or_else(|| StorefrontParseError(s.to_string()))
    }
}

#[cfg(test)]
#[path = "tests/storefront_tests.rs"]
mod tests;
