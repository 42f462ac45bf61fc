use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

const MAIN_REPO_BASE: &str = "https://raw.githubusercontent.com/PortsMaster/PortMaster-New/main/ports";
const MULTIVERSE_REPO_BASE: &str =
    "https://raw.githubusercontent.com/PortsMaster-MV/PortMaster-MV-New/main/ports";
const NO_IMAGE_URL: &str =
    "https://raw.githubusercontent.com/PortsMaster/PortMaster-Website/main/no.image.png";

/// One title a user owns on a storefront.
///
/// `source_id` (e.g. a Steam app id) is carried through untouched and is
/// never used for matching.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LibraryEntry {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    /// Storefront-specific metadata (e.g. `playtime_hours` for Steam).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

impl LibraryEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_source_id(mut self, id: impl Into<String>) -> Self {
        self.source_id = Some(id.into());
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// Reference to a port's screenshot in one of the PortMaster repositories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    /// Port archive name as listed in the catalog (e.g. `celeste.zip`).
    pub port_name: String,
    /// Screenshot filename inside the port directory, if the port has one.
    pub screenshot: Option<String>,
    /// Source repository: `main` or `multiverse`.
    pub repo: String,
}

impl ImageRef {
    /// Resolve the screenshot to a raw GitHub URL.
    ///
    /// Falls back to the PortMaster placeholder image when there is no
    /// screenshot or the repository is not one we know how to address.
    pub fn url(&self) -> String {
        let Some(screenshot) = self.screenshot.as_deref() else {
            return NO_IMAGE_URL.to_string();
        };
        let base = match self.repo.as_str() {
            "main" => MAIN_REPO_BASE,
            "multiverse" => MULTIVERSE_REPO_BASE,
            _ => return NO_IMAGE_URL.to_string(),
        };
        let port_dir = self
            .port_name
            .strip_suffix(".zip")
            .unwrap_or(&self.port_name);
        format!(
            "{base}/{}/{}",
            urlencoding::encode(port_dir),
            urlencoding::encode(screenshot)
        )
    }
}

/// One entry in the ported-games catalog.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Display name, used for matching and presentation.
    pub name: String,
    /// Stable storage key (port directory name without `.zip`).
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub genres: Vec<String>,
}

impl CatalogEntry {
    pub fn new(name: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key: key.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_image(mut self, image: ImageRef) -> Self {
        self.image = Some(image);
        self
    }

    /// Screenshot URL for this entry, or the placeholder image.
    pub fn image_url(&self) -> String {
        self.image
            .as_ref()
            .map(ImageRef::url)
            .unwrap_or_else(|| NO_IMAGE_URL.to_string())
    }
}

#[cfg(test)]
#[path = "tests/entry_tests.rs"]
mod tests;
