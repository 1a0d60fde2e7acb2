//! Favicon fallback chain for NavHub.
//!
//! Builds the ordered list of domain-keyed favicon provider URLs and models
//! the render-side retry ladder: the shell renders the current candidate,
//! reports image load failures back, and the chain advances until the
//! providers are exhausted and a placeholder glyph takes over.
//!
//! No network probing happens here — the image element's own error event
//! drives the chain.

use url::Url;

/// What the shell should render for a card icon right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconView {
    /// The icon value is an emoji (or any non-URL literal) — render as text.
    Emoji(String),
    /// Render this image URL; report load failure via [`FaviconChain::advance`].
    Image(String),
    /// Every provider failed — render the generic placeholder glyph.
    Placeholder,
}

/// Returns the ordered favicon provider URLs for a target URL's domain.
///
/// Multiple providers because the first choice may be blocked in some
/// regions; the shell walks the list on load failure. Returns an empty list
/// when the target URL has no parseable host.
pub fn favicon_candidates(target_url: &str) -> Vec<String> {
    let domain = match Url::parse(target_url).ok().and_then(|u| u.host_str().map(String::from)) {
        Some(d) => d,
        None => return Vec::new(),
    };

    vec![
        format!("https://www.google.com/s2/favicons?domain={}&sz=64", domain),
        format!("https://api.faviconkit.com/{}/64", domain),
        format!(
            "https://unavatar.io/{}?fallback=https://www.google.com/s2/favicons?domain={}%26sz=64",
            domain, domain
        ),
        format!("https://icons.duckduckgo.com/ip3/{}.ico", domain),
    ]
}

/// Stateful retry ladder for one card's icon.
pub struct FaviconChain {
    icon: String,
    target_url: String,
    candidates: Vec<String>,
    /// 0 = the icon value itself; 1..=N = provider candidates; >N = placeholder.
    attempt: usize,
}

impl FaviconChain {
    pub fn new(icon: &str, target_url: &str) -> Self {
        Self {
            icon: icon.to_string(),
            target_url: target_url.to_string(),
            candidates: favicon_candidates(target_url),
            attempt: 0,
        }
    }

    /// The icon the shell should render now.
    pub fn current(&self) -> IconView {
        if !self.icon.starts_with("http") {
            return IconView::Emoji(self.icon.clone());
        }
        if self.attempt == 0 {
            return IconView::Image(self.icon.clone());
        }
        match self.candidates.get(self.attempt - 1) {
            Some(candidate) => IconView::Image(candidate.clone()),
            None => IconView::Placeholder,
        }
    }

    /// Advances to the next candidate after an image load failure.
    ///
    /// Returns the new view so callers can re-render immediately.
    pub fn advance(&mut self) -> IconView {
        if matches!(self.current(), IconView::Image(_)) {
            self.attempt += 1;
        }
        self.current()
    }

    /// Resets the ladder when the bound icon or target URL changes.
    ///
    /// A reset with unchanged props is a no-op, so the shell can call this
    /// unconditionally on every render.
    pub fn reset_if_changed(&mut self, icon: &str, target_url: &str) {
        if self.icon != icon || self.target_url != target_url {
            *self = Self::new(icon, target_url);
        }
    }
}
