use serde::{Deserialize, Serialize};

/// Best-effort metadata for a target URL.
///
/// `icons` is an ordered candidate list — earlier entries are preferred by
/// the render layer, which walks the list on image load failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub icons: Vec<String>,
}

impl SiteMetadata {
    /// Metadata with only icon candidates, no scraped text.
    pub fn icons_only(icons: Vec<String>) -> Self {
        Self {
            title: None,
            description: None,
            icons,
        }
    }

    /// True when neither title nor description was found.
    pub fn is_text_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none()
    }
}
