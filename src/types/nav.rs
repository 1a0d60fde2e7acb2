use serde::{Deserialize, Serialize};

use super::search::Category;

/// A single bookmark card.
///
/// `icon` is either an emoji literal or an absolute image URL; the render
/// layer decides which by checking for an `http` prefix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkItem {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    pub url: String,
}

/// A titled, ordered group of bookmark cards.
///
/// Render order equals navigation order, so `items` position is meaningful.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub items: Vec<LinkItem>,
}

/// The canonical serialized form of the whole dataset.
///
/// Used for the remote sync file, the export operation, and the shipped
/// defaults asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavDocument {
    pub sections: Vec<Section>,
    pub categories: Vec<Category>,
}

impl NavDocument {
    /// Serializes the document to its canonical pretty-printed JSON form.
    pub fn to_canonical_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
