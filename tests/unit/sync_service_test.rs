//! Unit tests for the cloud sync client, against a mock content store that
//! enforces real compare-and-swap semantics.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use navhub::services::sync_service::{
    self, is_local_origin, ContentStore, PushOutcome, RemoteFile, REMOTE_DOC_PATH,
};
use navhub::types::errors::SyncError;
use navhub::types::nav::{NavDocument, Section};
use navhub::types::settings::SyncSettings;

/// In-memory single-file store with compare-and-swap on write.
#[derive(Default)]
struct MockStore {
    file: Mutex<Option<(String, Vec<u8>)>>,
    sha_counter: AtomicUsize,
    fetch_calls: AtomicUsize,
    write_calls: AtomicUsize,
    /// When set, `fetch` reports this fingerprint instead of the real one —
    /// simulates another client having raced a write in between.
    stale_fetch_sha: Mutex<Option<String>>,
}

impl MockStore {
    fn next_sha(&self) -> String {
        format!("sha-{}", self.sha_counter.fetch_add(1, Ordering::SeqCst) + 1)
    }

    fn current_sha(&self) -> Option<String> {
        self.file.lock().unwrap().as_ref().map(|(sha, _)| sha.clone())
    }
}

impl ContentStore for MockStore {
    async fn fetch(&self, _path: &str) -> Result<Option<RemoteFile>, SyncError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(stale) = self.stale_fetch_sha.lock().unwrap().clone() {
            let content = self
                .file
                .lock()
                .unwrap()
                .as_ref()
                .map(|(_, c)| c.clone())
                .unwrap_or_default();
            return Ok(Some(RemoteFile { sha: stale, content }));
        }
        Ok(self
            .file
            .lock()
            .unwrap()
            .as_ref()
            .map(|(sha, content)| RemoteFile {
                sha: sha.clone(),
                content: content.clone(),
            }))
    }

    async fn write(
        &self,
        _path: &str,
        content: &[u8],
        _message: &str,
        expected_sha: Option<&str>,
    ) -> Result<String, SyncError> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        let mut file = self.file.lock().unwrap();
        let current = file.as_ref().map(|(sha, _)| sha.as_str());
        if current != expected_sha {
            return Err(SyncError::Conflict(format!(
                "expected {:?}, current {:?}",
                expected_sha, current
            )));
        }
        let sha = self.next_sha();
        *file = Some((sha.clone(), content.to_vec()));
        Ok(sha)
    }
}

fn configured_settings() -> SyncSettings {
    SyncSettings {
        token: "ghp_test".to_string(),
        owner: "octocat".to_string(),
        repo: "MyNav".to_string(),
        enabled: true,
    }
}

fn sample_document() -> NavDocument {
    NavDocument {
        sections: vec![Section {
            id: "news".to_string(),
            title: "News".to_string(),
            icon: "📰".to_string(),
            items: Vec::new(),
        }],
        categories: Vec::new(),
    }
}

const PROD_ORIGIN: &str = "https://nav.example.com";

// === Context gating ===

#[tokio::test]
async fn test_push_skipped_on_localhost() {
    let store = MockStore::default();
    let result = sync_service::push(&store, &sample_document(), &configured_settings(), "localhost").await;

    assert!(matches!(result, Err(SyncError::LocalContext)));
    assert_eq!(store.fetch_calls.load(Ordering::SeqCst), 0);
    assert_eq!(store.write_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_push_skipped_when_disabled_or_incomplete() {
    let store = MockStore::default();

    let disabled = SyncSettings { enabled: false, ..configured_settings() };
    let result = sync_service::push(&store, &sample_document(), &disabled, PROD_ORIGIN).await;
    assert!(matches!(result, Err(SyncError::NotConfigured)));

    let tokenless = SyncSettings { token: String::new(), ..configured_settings() };
    let result = sync_service::push(&store, &sample_document(), &tokenless, PROD_ORIGIN).await;
    assert!(matches!(result, Err(SyncError::NotConfigured)));

    assert_eq!(store.write_calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_is_local_origin_cases() {
    assert!(is_local_origin("localhost"));
    assert!(is_local_origin("127.0.0.1"));
    assert!(is_local_origin("http://localhost:5173"));
    assert!(is_local_origin("http://127.0.0.1:5173/app"));
    assert!(!is_local_origin("https://nav.example.com"));
    assert!(!is_local_origin("https://localhost.example.com"));
}

// === Create / update ===

#[tokio::test]
async fn test_first_push_creates_the_file() {
    let store = MockStore::default();
    let outcome = sync_service::push(&store, &sample_document(), &configured_settings(), PROD_ORIGIN)
        .await
        .unwrap();

    assert_eq!(outcome, PushOutcome { sha: "sha-1".to_string(), created: true });

    // The stored content is the canonical document
    let stored = store.fetch(REMOTE_DOC_PATH).await.unwrap().unwrap();
    let decoded: NavDocument = serde_json::from_slice(&stored.content).unwrap();
    assert_eq!(decoded, sample_document());
}

#[tokio::test]
async fn test_second_push_updates_with_fresh_fingerprint() {
    let store = MockStore::default();
    let settings = configured_settings();
    let document = sample_document();

    let first = sync_service::push(&store, &document, &settings, PROD_ORIGIN).await.unwrap();
    let second = sync_service::push(&store, &document, &settings, PROD_ORIGIN).await.unwrap();

    assert!(first.created);
    assert!(!second.created);
    assert_ne!(first.sha, second.sha);
    assert_eq!(store.current_sha(), Some(second.sha));
}

// === Compare-and-swap conflict ===

#[tokio::test]
async fn test_stale_fingerprint_push_is_rejected() {
    let store = MockStore::default();
    let settings = configured_settings();
    let document = sample_document();

    // Establish the file and record its fingerprint
    let initial = sync_service::push(&store, &document, &settings, PROD_ORIGIN).await.unwrap();

    // Another client writes, moving the fingerprint forward
    let current = store.current_sha().unwrap();
    store
        .write(REMOTE_DOC_PATH, b"{\"sections\":[],\"categories\":[]}", "race", Some(&current))
        .await
        .unwrap();

    // This client still observes the initial fingerprint — its push loses
    *store.stale_fetch_sha.lock().unwrap() = Some(initial.sha.clone());
    let result = sync_service::push(&store, &document, &settings, PROD_ORIGIN).await;
    assert!(matches!(result, Err(SyncError::Conflict(_))));

    // No retry happened: exactly one conflicted write for this push
    // (1 create + 1 racing write + 1 rejected write)
    assert_eq!(store.write_calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_push_and_log_swallows_conflicts() {
    let store = MockStore::default();
    let settings = configured_settings();
    let document = sample_document();

    sync_service::push(&store, &document, &settings, PROD_ORIGIN).await.unwrap();
    *store.stale_fetch_sha.lock().unwrap() = Some("sha-gone".to_string());

    // Must not panic or retry; the conflict is logged and abandoned
    sync_service::push_and_log(&store, &document, &settings, PROD_ORIGIN).await;
    assert_eq!(store.write_calls.load(Ordering::SeqCst), 2);
}

// === Pull ===

#[tokio::test]
async fn test_pull_of_absent_file_returns_none() {
    let store = MockStore::default();
    let pulled = sync_service::pull(&store, &configured_settings()).await;
    assert!(pulled.is_none());
}

#[tokio::test]
async fn test_pull_roundtrips_the_pushed_document() {
    let store = MockStore::default();
    let settings = configured_settings();
    let document = sample_document();

    sync_service::push(&store, &document, &settings, PROD_ORIGIN).await.unwrap();
    let pulled = sync_service::pull(&store, &settings).await.unwrap();
    assert_eq!(pulled, document);
}

#[tokio::test]
async fn test_pull_of_unreadable_document_returns_none() {
    let store = MockStore::default();
    *store.file.lock().unwrap() = Some(("sha-x".to_string(), b"not json".to_vec()));

    let pulled = sync_service::pull(&store, &configured_settings()).await;
    assert!(pulled.is_none());
}

#[tokio::test]
async fn test_pull_when_not_configured_returns_none() {
    let store = MockStore::default();
    *store.file.lock().unwrap() = Some((
        "sha-x".to_string(),
        serde_json::to_vec(&sample_document()).unwrap(),
    ));

    let disabled = SyncSettings { enabled: false, ..configured_settings() };
    let pulled = sync_service::pull(&store, &disabled).await;
    assert!(pulled.is_none());
    assert_eq!(store.fetch_calls.load(Ordering::SeqCst), 0);
}
