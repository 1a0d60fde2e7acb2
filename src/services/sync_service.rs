//! Cloud sync client for NavHub.
//!
//! Serializes the in-memory dataset to its canonical JSON form and performs
//! an optimistic-concurrency read-modify-write against a single file in a
//! user-designated GitHub repository, via the Contents API. The file's SHA
//! is the version fingerprint: a write carries the SHA observed just before
//! it, and the store rejects the write if the file changed in between.
//!
//! A rejected write is logged and abandoned — no retry, no re-fetch-and-
//! reapply. The last writer whose fingerprint was still current wins;
//! concurrent edits from two clients can silently lose one side's changes.
//!
//! Sync is production-only: pushes are skipped entirely when the shell
//! reports a local origin, so local testing can never clobber shared
//! remote state.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde_json::json;
use tracing::{debug, info, warn};
use url::Url;

use crate::types::errors::SyncError;
use crate::types::nav::NavDocument;
use crate::types::settings::SyncSettings;

/// Fixed path of the remote document within the configured repository.
pub const REMOTE_DOC_PATH: &str = "navhub.json";

const COMMIT_MESSAGE: &str = "Update navigation data";

/// A remote file snapshot: its content fingerprint and decoded bytes.
#[derive(Debug, Clone)]
pub struct RemoteFile {
    pub sha: String,
    pub content: Vec<u8>,
}

/// Outcome of a successful push.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushOutcome {
    /// Fingerprint of the newly written file version.
    pub sha: String,
    /// True when the remote file did not exist before this push.
    pub created: bool,
}

/// Trait defining the remote single-file content store.
///
/// The store enforces compare-and-swap on write: `expected_sha` must match
/// the current file version, or `None` when the file is expected to be
/// absent (create).
pub trait ContentStore {
    /// Reads the file at `path`. `Ok(None)` means the file does not exist —
    /// a 404 is not an error, it means "create on next write".
    fn fetch(
        &self,
        path: &str,
    ) -> impl std::future::Future<Output = Result<Option<RemoteFile>, SyncError>> + Send;

    /// Writes `content` to `path`, conditioned on `expected_sha`. Returns
    /// the new file version's fingerprint.
    fn write(
        &self,
        path: &str,
        content: &[u8],
        message: &str,
        expected_sha: Option<&str>,
    ) -> impl std::future::Future<Output = Result<String, SyncError>> + Send;
}

/// True when the given origin refers to a local development context.
///
/// Accepts either a bare hostname or a full origin URL.
pub fn is_local_origin(origin: &str) -> bool {
    let host = Url::parse(origin)
        .ok()
        .and_then(|u| u.host_str().map(String::from))
        .unwrap_or_else(|| origin.trim().to_string());
    matches!(host.as_str(), "localhost" | "127.0.0.1" | "::1" | "[::1]")
}

/// Pushes the full document to the remote store.
///
/// Protocol: skip in local context, skip when not configured, fetch the
/// current fingerprint (absent file ⇒ create), then write conditioned on
/// that fingerprint. A stale fingerprint is a [`SyncError::Conflict`].
pub async fn push<S: ContentStore>(
    store: &S,
    document: &NavDocument,
    settings: &SyncSettings,
    origin: &str,
) -> Result<PushOutcome, SyncError> {
    if is_local_origin(origin) {
        return Err(SyncError::LocalContext);
    }
    if !settings.is_configured() {
        return Err(SyncError::NotConfigured);
    }

    let content = document
        .to_canonical_json()
        .map_err(|e| SyncError::DecodeError(e.to_string()))?;

    let current = store.fetch(REMOTE_DOC_PATH).await?;
    let expected_sha = current.as_ref().map(|f| f.sha.as_str());
    let created = expected_sha.is_none();

    let sha = store
        .write(REMOTE_DOC_PATH, content.as_bytes(), COMMIT_MESSAGE, expected_sha)
        .await?;

    info!(sha = %sha, created, "pushed navigation data");
    Ok(PushOutcome { sha, created })
}

/// Fire-and-forget variant: failures are logged, never returned.
pub async fn push_and_log<S: ContentStore>(
    store: &S,
    document: &NavDocument,
    settings: &SyncSettings,
    origin: &str,
) {
    match push(store, document, settings, origin).await {
        Ok(_) => {}
        // Expected skips, not failures
        Err(SyncError::LocalContext) | Err(SyncError::NotConfigured) => {
            debug!("push skipped");
        }
        Err(e) => warn!(error = %e, "push abandoned"),
    }
}

/// Reads and decodes the remote document.
///
/// Returns `None` on a missing file ("not yet created") or any error — the
/// caller keeps local data in every degraded case.
pub async fn pull<S: ContentStore>(store: &S, settings: &SyncSettings) -> Option<NavDocument> {
    if !settings.is_configured() {
        return None;
    }
    let file = match store.fetch(REMOTE_DOC_PATH).await {
        Ok(Some(file)) => file,
        Ok(None) => return None,
        Err(e) => {
            warn!(error = %e, "pull failed, keeping local data");
            return None;
        }
    };
    match serde_json::from_slice(&file.content) {
        Ok(document) => Some(document),
        Err(e) => {
            warn!(error = %e, "remote document unreadable, keeping local data");
            None
        }
    }
}

// === GitHubContentStore ===

/// GitHub Contents API implementation of [`ContentStore`].
pub struct GitHubContentStore {
    client: reqwest::Client,
    token: String,
    owner: String,
    repo: String,
}

impl GitHubContentStore {
    pub fn from_settings(settings: &SyncSettings) -> Self {
        Self {
            client: reqwest::Client::new(),
            token: settings.token.clone(),
            owner: settings.owner.clone(),
            repo: settings.repo.clone(),
        }
    }

    fn contents_url(&self, path: &str) -> String {
        format!(
            "https://api.github.com/repos/{}/{}/contents/{}",
            self.owner, self.repo, path
        )
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", concat!("navhub/", env!("CARGO_PKG_VERSION")))
    }
}

impl ContentStore for GitHubContentStore {
    async fn fetch(&self, path: &str) -> Result<Option<RemoteFile>, SyncError> {
        let response = self
            .request(self.client.get(self.contents_url(path)))
            .send()
            .await
            .map_err(|e| SyncError::NetworkError(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(SyncError::ApiError(format!(
                "fetch {}: HTTP {}",
                path,
                response.status()
            )));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| SyncError::ApiError(e.to_string()))?;
        let sha = body
            .get("sha")
            .and_then(|v| v.as_str())
            .ok_or_else(|| SyncError::ApiError("missing sha in contents response".to_string()))?
            .to_string();
        // The Contents API returns base64 with embedded newlines
        let encoded: String = body
            .get("content")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        let content = BASE64
            .decode(encoded)
            .map_err(|e| SyncError::DecodeError(e.to_string()))?;

        Ok(Some(RemoteFile { sha, content }))
    }

    async fn write(
        &self,
        path: &str,
        content: &[u8],
        message: &str,
        expected_sha: Option<&str>,
    ) -> Result<String, SyncError> {
        let mut body = json!({
            "message": message,
            "content": BASE64.encode(content),
        });
        if let Some(sha) = expected_sha {
            body["sha"] = json!(sha);
        }

        let response = self
            .request(self.client.put(self.contents_url(path)))
            .json(&body)
            .send()
            .await
            .map_err(|e| SyncError::NetworkError(e.to_string()))?;

        let status = response.status();
        // 409 is the documented conflict status; 422 is returned when the
        // supplied sha no longer matches the file.
        if status == reqwest::StatusCode::CONFLICT
            || status == reqwest::StatusCode::UNPROCESSABLE_ENTITY
        {
            return Err(SyncError::Conflict(format!("write {}: HTTP {}", path, status)));
        }
        if !status.is_success() {
            return Err(SyncError::ApiError(format!("write {}: HTTP {}", path, status)));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| SyncError::ApiError(e.to_string()))?;
        body.get("content")
            .and_then(|v| v.get("sha"))
            .and_then(|v| v.as_str())
            .map(String::from)
            .ok_or_else(|| SyncError::ApiError("missing sha in write response".to_string()))
    }
}
