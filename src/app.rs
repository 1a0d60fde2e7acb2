//! App Core for NavHub.
//!
//! Central struct wiring the local store, the managers, and the sync
//! settings. Startup order: read persisted snapshots (missing keys fall
//! back to the shipped defaults), normalize the category shape, optionally
//! replace with the remote document, then run the reconciler — once, at
//! load time only. After that, every mutation flushes synchronously to the
//! local store; pushing to the remote store is the caller's (detached)
//! side-effect.

use std::sync::Arc;

use tracing::{info, warn};

use crate::database::Database;
use crate::managers::engine_manager::{EngineManager, EngineManagerTrait};
use crate::managers::section_manager::{SectionManager, SectionManagerTrait};
use crate::services::defaults::default_dataset;
use crate::services::local_store::{
    LocalStore, LocalStoreTrait, KEY_CATEGORIES, KEY_SECTIONS, KEY_SYNC_SETTINGS,
};
use crate::services::metadata_resolver::MetadataResolver;
use crate::services::reconciler::{normalize_categories, reconcile};
use crate::services::suggest::SuggestClient;
use crate::services::sync_service::{self, GitHubContentStore};
use crate::types::errors::StoreError;
use crate::types::nav::{NavDocument, Section};
use crate::types::search::StoredCategories;
use crate::types::settings::SyncSettings;

/// Environment variable through which the shell reports its origin.
///
/// Unset means `localhost`, which keeps sync off during development.
pub const ORIGIN_ENV: &str = "NAVHUB_ORIGIN";

/// Central application struct.
pub struct App {
    pub db: Arc<Database>,
    pub store: LocalStore,
    pub section_manager: SectionManager,
    pub engine_manager: EngineManager,
    pub sync_settings: SyncSettings,
    pub origin: String,
    /// Kept on the App so its in-memory result cache spans RPC calls.
    pub resolver: MetadataResolver,
    pub suggest: SuggestClient,
}

impl App {
    /// Creates the App: opens the database, loads persisted snapshots, and
    /// reconciles them against the shipped defaults.
    pub fn new(db_path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let db = Arc::new(if db_path == ":memory:" {
            Database::open_in_memory()?
        } else {
            Database::open(db_path)?
        });
        let store = LocalStore::new(db.clone());

        let defaults = default_dataset()?;
        let local = load_local_document(&store, &defaults);
        let document = reconcile(local, &defaults);

        let sync_settings = store
            .get::<SyncSettings>(KEY_SYNC_SETTINGS)
            .unwrap_or_else(|e| {
                warn!(error = %e, "sync settings unreadable, using defaults");
                None
            })
            .unwrap_or_default();

        let origin = std::env::var(ORIGIN_ENV).unwrap_or_else(|_| "localhost".to_string());

        let app = Self {
            db,
            store,
            section_manager: SectionManager::new(document.sections),
            engine_manager: EngineManager::new(document.categories),
            sync_settings,
            origin,
            resolver: MetadataResolver::new(),
            suggest: SuggestClient::new(),
        };
        app.flush()?;
        Ok(app)
    }

    /// One-time startup pull: when sync is on and the origin is not local,
    /// adopt the remote document (reconciled against defaults like any
    /// other snapshot). Pull failures keep local data.
    pub async fn startup_pull(&mut self) {
        if !self.sync_settings.is_configured() || sync_service::is_local_origin(&self.origin) {
            return;
        }
        let store = GitHubContentStore::from_settings(&self.sync_settings);
        if let Some(remote) = sync_service::pull(&store, &self.sync_settings).await {
            info!("adopting remote navigation data");
            let defaults = match default_dataset() {
                Ok(d) => d,
                Err(e) => {
                    warn!(error = %e, "defaults unavailable, keeping remote as-is");
                    NavDocument {
                        sections: Vec::new(),
                        categories: Vec::new(),
                    }
                }
            };
            let document = reconcile(remote, &defaults);
            self.section_manager = SectionManager::new(document.sections);
            self.engine_manager = EngineManager::new(document.categories);
            if let Err(e) = self.flush() {
                warn!(error = %e, "flush after remote adoption failed");
            }
        }
    }

    /// Snapshot of the current dataset in canonical document form.
    pub fn document(&self) -> NavDocument {
        NavDocument {
            sections: self.section_manager.sections().to_vec(),
            categories: self.engine_manager.categories().to_vec(),
        }
    }

    /// Writes both collection snapshots to the local store.
    pub fn flush(&self) -> Result<(), StoreError> {
        self.store.set(KEY_SECTIONS, &self.section_manager.sections())?;
        self.store.set(KEY_CATEGORIES, &self.engine_manager.categories())?;
        Ok(())
    }

    /// Replaces and persists the sync settings.
    pub fn set_sync_settings(&mut self, settings: SyncSettings) -> Result<(), StoreError> {
        self.store.set(KEY_SYNC_SETTINGS, &settings)?;
        self.sync_settings = settings;
        Ok(())
    }

    /// True when a push should follow a mutation.
    pub fn sync_active(&self) -> bool {
        self.sync_settings.is_configured() && !sync_service::is_local_origin(&self.origin)
    }
}

/// Reads the persisted dataset, falling back to defaults per key.
///
/// Unreadable snapshots degrade to the defaults with a warning rather than
/// failing startup — the reconciler restores shipped content either way.
fn load_local_document(store: &LocalStore, defaults: &NavDocument) -> NavDocument {
    let sections: Vec<Section> = store
        .get(KEY_SECTIONS)
        .unwrap_or_else(|e| {
            warn!(error = %e, "sections snapshot unreadable, using defaults");
            None
        })
        .unwrap_or_else(|| defaults.sections.clone());

    let categories = store
        .get::<StoredCategories>(KEY_CATEGORIES)
        .unwrap_or_else(|e| {
            warn!(error = %e, "categories snapshot unreadable, using defaults");
            None
        })
        .map(normalize_categories)
        .unwrap_or_else(|| defaults.categories.clone());

    NavDocument {
        sections,
        categories,
    }
}
