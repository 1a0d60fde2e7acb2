//! Autocomplete client for NavHub.
//!
//! The suggestion endpoints are JSONP-only: they wrap their payload in a
//! caller-named callback. The browser original injected script tags; here
//! the client owns the whole exchange — it generates a one-off callback
//! name per request, asks the endpoint to echo it, verifies the echo, and
//! strips the wrapper before parsing. No ambient registry, nothing to leak
//! between keystrokes.
//!
//! Every failure mode (network, parse, timeout, bad envelope) degrades to
//! an empty suggestion list; nothing here is ever surfaced as an error.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::types::errors::SuggestError;
use crate::types::search::SuggestionSource;

/// Hard cap on suggestions returned to the shell.
pub const MAX_SUGGESTIONS: usize = 8;
/// Per-request timeout.
const SUGGEST_TIMEOUT: Duration = Duration::from_secs(5);
/// Keystroke debounce window.
const DEBOUNCE: Duration = Duration::from_millis(200);

const BAIDU_ENDPOINT: &str = "https://sp0.baidu.com/5a1Fazu8AA54nxGko9WTAnF6hhy/su";
const GOOGLE_ENDPOINT: &str = "https://suggestqueries.google.com/complete/search";
const SO360_ENDPOINT: &str = "https://sug.so.360.cn/suggest";

/// Generates a one-off callback name for a single JSONP exchange.
fn callback_name() -> String {
    format!("nav_cb_{}", Uuid::new_v4().simple())
}

/// Strips the `name(payload)` JSONP wrapper, verifying the echoed name.
pub fn strip_jsonp(body: &str, callback: &str) -> Result<Value, SuggestError> {
    let body = body.trim().trim_end_matches(';').trim();
    let open = body
        .find('(')
        .ok_or_else(|| SuggestError::BadEnvelope("no callback invocation".to_string()))?;
    let close = body
        .rfind(')')
        .ok_or_else(|| SuggestError::BadEnvelope("unterminated invocation".to_string()))?;
    if close <= open {
        return Err(SuggestError::BadEnvelope("malformed invocation".to_string()));
    }

    let echoed = body[..open].trim();
    if echoed != callback {
        return Err(SuggestError::BadEnvelope(format!(
            "expected callback {}, got {}",
            callback, echoed
        )));
    }

    serde_json::from_str(&body[open + 1..close]).map_err(|e| SuggestError::ParseError(e.to_string()))
}

/// Normalizes a provider payload into a plain list of suggestion strings.
///
/// Baidu and the 360 endpoint put a flat string array under `s`; the Google
/// endpoint nests the list at index 1 with entries that may themselves be
/// `[text, meta]` pairs. Truncation to [`MAX_SUGGESTIONS`] happens here.
pub fn parse_payload(source: SuggestionSource, payload: &Value) -> Vec<String> {
    let raw: Vec<String> = match source {
        SuggestionSource::Baidu | SuggestionSource::Bing | SuggestionSource::So360 => payload
            .get("s")
            .and_then(|v| v.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default(),
        SuggestionSource::Google => payload
            .get(1)
            .and_then(|v| v.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|entry| match entry {
                        Value::String(s) => Some(s.clone()),
                        Value::Array(pair) => pair.first().and_then(|v| v.as_str()).map(String::from),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default(),
        SuggestionSource::None => Vec::new(),
    };

    raw.into_iter().take(MAX_SUGGESTIONS).collect()
}

/// Suggestion fetch client.
pub struct SuggestClient {
    client: reqwest::Client,
}

impl SuggestClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Fetches suggestions for `query` from the engine's provider.
    ///
    /// Returns at most [`MAX_SUGGESTIONS`] entries; any failure yields an
    /// empty list. `SuggestionSource::None` issues no request at all.
    pub async fn fetch_suggestions(&self, query: &str, source: SuggestionSource) -> Vec<String> {
        if query.trim().is_empty() || source == SuggestionSource::None {
            return Vec::new();
        }
        match self.fetch_inner(query, source).await {
            Ok(suggestions) => suggestions,
            Err(e) => {
                debug!(error = %e, "suggestion fetch degraded to empty");
                Vec::new()
            }
        }
    }

    async fn fetch_inner(
        &self,
        query: &str,
        source: SuggestionSource,
    ) -> Result<Vec<String>, SuggestError> {
        let callback = callback_name();

        let request = match source {
            SuggestionSource::Baidu => self
                .client
                .get(BAIDU_ENDPOINT)
                .query(&[("wd", query), ("cb", callback.as_str())]),
            SuggestionSource::Google => self
                .client
                .get(GOOGLE_ENDPOINT)
                .query(&[("client", "youtube"), ("q", query), ("jsonp", callback.as_str())]),
            SuggestionSource::Bing | SuggestionSource::So360 => self
                .client
                .get(SO360_ENDPOINT)
                .query(&[
                    ("word", query),
                    ("encodein", "utf-8"),
                    ("encodeout", "utf-8"),
                    ("callback", callback.as_str()),
                ]),
            SuggestionSource::None => return Ok(Vec::new()),
        };

        let response = request
            .timeout(SUGGEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SuggestError::Timeout
                } else {
                    SuggestError::NetworkError(e.to_string())
                }
            })?;

        let body = response
            .text()
            .await
            .map_err(|e| SuggestError::NetworkError(e.to_string()))?;

        let payload = strip_jsonp(&body, &callback)?;
        Ok(parse_payload(source, &payload))
    }
}

impl Default for SuggestClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Debounced suggestion session for one search input.
///
/// Each keystroke bumps a generation counter and waits out the debounce
/// window; if a newer keystroke arrived meanwhile, the older call gives up
/// before issuing any request. The superseded in-flight request, if one
/// exists, is abandoned rather than aborted.
pub struct SuggestSession {
    client: Arc<SuggestClient>,
    generation: AtomicU64,
}

impl SuggestSession {
    pub fn new(client: Arc<SuggestClient>) -> Self {
        Self {
            client,
            generation: AtomicU64::new(0),
        }
    }

    /// Handles one keystroke; resolves to the suggestions for `query`, or
    /// an empty list if the keystroke was superseded during the debounce.
    pub async fn input(&self, query: &str, source: SuggestionSource) -> Vec<String> {
        let my_generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(DEBOUNCE).await;
        if self.generation.load(Ordering::SeqCst) != my_generation {
            return Vec::new();
        }
        self.client.fetch_suggestions(query, source).await
    }
}
