//! Manifests that index the JSON files making up a help center.

use serde::{Deserialize, Serialize};

/// A guide split into one JSON file per section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuideManifest {
    pub title: String,
    pub version: u32,
    pub sections: Vec<ManifestSection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestSection {
    pub id: String,
    pub title: String,
    /// Location of the section's block file, relative to the content root or absolute.
    pub file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}

impl GuideManifest {
    /// Sections sorted by `order`; unordered entries follow, in file order.
    pub fn ordered_sections(&self) -> Vec<&ManifestSection> {
        let mut sections: Vec<&ManifestSection> = self.sections.iter().collect();
        // stable sort keeps file order among equal keys
        sections.sort_by_key(|s| (s.order.is_none(), s.order.unwrap_or_default()));
        sections
    }

    pub fn section(&self, id: &str) -> Option<&ManifestSection> {
        self.sections.iter().find(|s| s.id == id)
    }
}

/// Dossier pages: one file per category, with a default entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DossierManifest {
    pub default: String,
    pub items: Vec<DossierManifestItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DossierManifestItem {
    pub slug: String,
    pub title: String,
    pub file: String,
}

impl DossierManifest {
    /// The item named `slug`, else the default item.
    pub fn resolve(&self, slug: &str) -> Option<&DossierManifestItem> {
        self.item(slug).or_else(|| self.item(&self.default))
    }

    pub fn item(&self, slug: &str) -> Option<&DossierManifestItem> {
        self.items.iter().find(|item| item.slug == slug)
    }
}
