//! External metadata resolver for NavHub.
//!
//! Given a target URL, tries an ordered list of strategies under a global
//! deadline: a hosted extraction API first, then raw-HTML fetches through
//! two CORS proxies, and finally a never-failing tier that returns
//! domain-keyed favicon service URLs with no scraped text at all.
//!
//! Per-tier failures (network errors, non-2xx, timeouts, unusable payloads)
//! are swallowed and advance the runner to the next tier. Only cooperative
//! cancellation surfaces as an error.
//!
//! Results are cached in memory keyed by the exact URL string so repeated
//! preview renders within a session do not refetch.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use scraper::{Html, Selector};
use tokio::sync::Notify;
use tracing::debug;
use url::Url;

use crate::services::favicon::favicon_candidates;
use crate::types::errors::ResolveError;
use crate::types::metadata::SiteMetadata;

/// Total budget across all fallback attempts.
const GLOBAL_DEADLINE: Duration = Duration::from_secs(4);
/// Budget for a single tier's network exchange.
const TIER_TIMEOUT: Duration = Duration::from_secs(2);
/// How long a resolved result stays reusable.
const CACHE_TTL: Duration = Duration::from_secs(300);

const MICROLINK_ENDPOINT: &str = "https://api.microlink.io";
const CORSPROXY_ENDPOINT: &str = "https://corsproxy.io/?url=";
const ALLORIGINS_ENDPOINT: &str = "https://api.allorigins.win/get?url=";

// === CancelToken ===

/// Cooperative cancellation signal for an in-flight resolution.
///
/// Cloning shares the signal; `cancel` wakes every waiter and every clone
/// observes the flag.
#[derive(Clone, Default)]
pub struct CancelToken {
    inner: Arc<CancelInner>,
}

#[derive(Default)]
struct CancelInner {
    cancelled: AtomicBool,
    notify: Notify,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Resolves once the token is cancelled.
    pub async fn cancelled(&self) {
        let mut notified = std::pin::pin!(self.inner.notify.notified());
        // Register as a waiter before re-checking the flag, so a cancel
        // landing in between cannot be missed
        notified.as_mut().enable();
        if self.is_cancelled() {
            return;
        }
        notified.await;
    }
}

// === MetadataCache ===

/// Owned in-memory cache keyed by the exact URL string.
///
/// The expiry window is injected at construction; the `_at` variants take
/// an explicit instant so expiry is testable without sleeping.
pub struct MetadataCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, (Instant, SiteMetadata)>>,
}

impl MetadataCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn get(&self, url: &str) -> Option<SiteMetadata> {
        self.get_at(url, Instant::now())
    }

    pub fn get_at(&self, url: &str, now: Instant) -> Option<SiteMetadata> {
        let entries = self.entries.lock().ok()?;
        let (stored_at, metadata) = entries.get(url)?;
        if now.duration_since(*stored_at) < self.ttl {
            Some(metadata.clone())
        } else {
            None
        }
    }

    pub fn insert(&self, url: &str, metadata: SiteMetadata) {
        self.insert_at(url, metadata, Instant::now());
    }

    pub fn insert_at(&self, url: &str, metadata: SiteMetadata, now: Instant) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(url.to_string(), (now, metadata));
        }
    }
}

// === Tiers ===

/// A network tier of the resolution ladder, in attempt order.
///
/// The domain-icons fallback is not listed here — it is the unconditional
/// last step of the runner and involves no network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataSource {
    /// Hosted extraction API (Microlink).
    Microlink,
    /// Raw HTML through corsproxy.io.
    CorsProxy,
    /// JSON-wrapped HTML through api.allorigins.win.
    AllOrigins,
}

/// Metadata resolver with an ordered tier list and an owned cache.
pub struct MetadataResolver {
    client: reqwest::Client,
    cache: MetadataCache,
    sources: Vec<MetadataSource>,
}

impl MetadataResolver {
    pub fn new() -> Self {
        Self::with_sources(vec![
            MetadataSource::Microlink,
            MetadataSource::CorsProxy,
            MetadataSource::AllOrigins,
        ])
    }

    /// Builds a resolver with a custom tier list (tests pass an empty list
    /// to exercise the final fallback without network access).
    pub fn with_sources(sources: Vec<MetadataSource>) -> Self {
        Self {
            client: reqwest::Client::new(),
            cache: MetadataCache::new(CACHE_TTL),
            sources,
        }
    }

    /// Overrides the cache expiry window.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache = MetadataCache::new(ttl);
        self
    }

    /// Resolves best-effort metadata for `url`.
    ///
    /// Returns `Ok(None)` only for URLs without a parseable host; any
    /// reachable-or-not target yields `Ok(Some(_))` with a non-empty icon
    /// candidate list thanks to the final fallback tier. Cancellation is
    /// the only error.
    pub async fn resolve(
        &self,
        url: &str,
        cancel: &CancelToken,
    ) -> Result<Option<SiteMetadata>, ResolveError> {
        if let Some(hit) = self.cache.get(url) {
            return Ok(Some(hit));
        }
        if cancel.is_cancelled() {
            return Err(ResolveError::Cancelled);
        }
        if Url::parse(url).is_err() {
            return Ok(None);
        }

        let network_result = tokio::select! {
            _ = cancel.cancelled() => return Err(ResolveError::Cancelled),
            outcome = tokio::time::timeout(GLOBAL_DEADLINE, self.run_tiers(url, cancel)) => {
                match outcome {
                    Ok(inner) => inner?,
                    // Global deadline elapsed mid-tier: fall through to the
                    // no-network final tier below.
                    Err(_) => None,
                }
            }
        };

        let metadata =
            network_result.unwrap_or_else(|| SiteMetadata::icons_only(favicon_candidates(url)));
        self.cache.insert(url, metadata.clone());
        Ok(Some(metadata))
    }

    async fn run_tiers(
        &self,
        url: &str,
        cancel: &CancelToken,
    ) -> Result<Option<SiteMetadata>, ResolveError> {
        for source in &self.sources {
            if cancel.is_cancelled() {
                return Err(ResolveError::Cancelled);
            }
            let attempt = match source {
                MetadataSource::Microlink => self.attempt_microlink(url).await,
                MetadataSource::CorsProxy => self.attempt_proxy(url, MetadataSource::CorsProxy).await,
                MetadataSource::AllOrigins => {
                    self.attempt_proxy(url, MetadataSource::AllOrigins).await
                }
            };
            match attempt {
                Some(metadata) => return Ok(Some(metadata)),
                None => debug!(?source, "metadata tier missed, advancing"),
            }
        }
        Ok(None)
    }

    /// Tier 1: hosted extraction API. Succeeds only with non-empty text.
    async fn attempt_microlink(&self, url: &str) -> Option<SiteMetadata> {
        let response = tokio::time::timeout(
            TIER_TIMEOUT,
            self.client
                .get(MICROLINK_ENDPOINT)
                .query(&[("url", url)])
                .send(),
        )
        .await
        .ok()?
        .ok()?;

        if !response.status().is_success() {
            return None;
        }
        let body: serde_json::Value = response.json().await.ok()?;
        if body.get("status").and_then(|v| v.as_str()) != Some("success") {
            return None;
        }
        let data = body.get("data")?;

        let title = data
            .get("title")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .map(String::from);
        let description = data
            .get("description")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .map(String::from);
        if title.is_none() && description.is_none() {
            return None;
        }

        let mut icons = Vec::new();
        for key in ["logo", "image"] {
            if let Some(icon_url) = data.get(key).and_then(|v| v.get("url")).and_then(|v| v.as_str())
            {
                if !icons.iter().any(|existing| existing == icon_url) {
                    icons.push(icon_url.to_string());
                }
            }
        }

        Some(SiteMetadata {
            title,
            description,
            icons,
        })
    }

    /// Tiers 2–3: fetch the page through a CORS proxy and scrape its head.
    ///
    /// Icons are deliberately the domain favicon-service URLs, not scraped
    /// `<link rel>` entries — reliability over fidelity.
    async fn attempt_proxy(&self, url: &str, provider: MetadataSource) -> Option<SiteMetadata> {
        let proxy_url = match provider {
            MetadataSource::CorsProxy => format!("{}{}", CORSPROXY_ENDPOINT, encode_query(url)),
            MetadataSource::AllOrigins => format!("{}{}", ALLORIGINS_ENDPOINT, encode_query(url)),
            MetadataSource::Microlink => return None,
        };

        let response = tokio::time::timeout(TIER_TIMEOUT, self.client.get(&proxy_url).send())
            .await
            .ok()?
            .ok()?;
        if !response.status().is_success() {
            return None;
        }

        let html = match provider {
            // allorigins wraps the page in a JSON envelope
            MetadataSource::AllOrigins => {
                let body: serde_json::Value = response.json().await.ok()?;
                body.get("contents")?.as_str()?.to_string()
            }
            _ => response.text().await.ok()?,
        };

        let (title, description) = extract_head_text(&html);
        if title.is_none() && description.is_none() {
            return None;
        }

        Some(SiteMetadata {
            title,
            description,
            icons: favicon_candidates(url),
        })
    }
}

impl Default for MetadataResolver {
    fn default() -> Self {
        Self::new()
    }
}

fn encode_query(url: &str) -> String {
    url::form_urlencoded::byte_serialize(url.as_bytes()).collect()
}

/// Pulls title and description out of a page head.
///
/// Precedence mirrors what the card preview wants: social tags first, then
/// the document's own `<title>`/description meta.
pub fn extract_head_text(html: &str) -> (Option<String>, Option<String>) {
    let document = Html::parse_document(html);

    let title = select_meta(&document, "meta[property=\"og:title\"]")
        .or_else(|| select_meta(&document, "meta[name=\"twitter:title\"]"))
        .or_else(|| select_text(&document, "title"));

    let description = select_meta(&document, "meta[property=\"og:description\"]")
        .or_else(|| select_meta(&document, "meta[name=\"twitter:description\"]"))
        .or_else(|| select_meta(&document, "meta[name=\"description\"]"));

    (title, description)
}

fn select_meta(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .next()?
        .value()
        .attr("content")
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

fn select_text(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    let text: String = document.select(&selector).next()?.text().collect();
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}
