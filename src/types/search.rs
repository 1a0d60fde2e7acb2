use serde::{Deserialize, Serialize};

/// Which suggestion endpoint an engine uses while typing.
///
/// `Bing` shares the 360 endpoint — the Bing suggestion API has no
/// JSONP-friendly surface, so both sources dispatch to the same provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SuggestionSource {
    #[serde(rename = "baidu")]
    Baidu,
    #[serde(rename = "google")]
    Google,
    #[serde(rename = "bing")]
    Bing,
    #[serde(rename = "360")]
    So360,
    #[serde(rename = "none")]
    #[default]
    None,
}

/// A search engine entry: display name, color token, and a URL template
/// containing the `{q}` query placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchEngine {
    pub name: String,
    #[serde(default)]
    pub color: String,
    pub url: String,
    #[serde(default)]
    pub suggestion_source: SuggestionSource,
}

/// A titled, ordered group of search engines selectable together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub engines: Vec<SearchEngine>,
}

/// Persisted category data as found on disk.
///
/// Categories were historically persisted as a name-keyed record; the
/// current shape is an ordered array with stable ids. Both shapes are
/// accepted at load time and normalized exactly once — nothing downstream
/// of the reconciler ever sees the legacy shape.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StoredCategories {
    /// Current shape: ordered array of categories with ids.
    Modern(Vec<Category>),
    /// Legacy shape: name-keyed record of engine lists. Key order is
    /// meaningful and preserved by the `preserve_order` JSON map.
    Legacy(serde_json::Map<String, serde_json::Value>),
}
