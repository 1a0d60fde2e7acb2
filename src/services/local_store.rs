//! Local Store Adapter for NavHub.
//!
//! Typed get/set wrapper over the key-value `storage` table — the SQLite
//! analog of the browser storage the shell historically used. Each stable
//! key holds one JSON-serialized snapshot of a domain collection; reads of
//! a missing key return `None` so the caller can fall back to the shipped
//! defaults.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::params;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::database::Database;
use crate::types::errors::StoreError;

/// Storage key for the bookmark sections snapshot.
pub const KEY_SECTIONS: &str = "nav_sections";
/// Storage key for the search categories snapshot.
pub const KEY_CATEGORIES: &str = "nav_categories";
/// Storage key for the sync settings snapshot.
pub const KEY_SYNC_SETTINGS: &str = "nav_sync_settings";

/// Trait defining the local store interface.
pub trait LocalStoreTrait {
    /// Reads and deserializes the snapshot under `key`, `None` if absent.
    fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError>;
    /// Serializes `value` and writes it under `key`, replacing any previous snapshot.
    fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError>;
    /// Removes the snapshot under `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Local store backed by the SQLite `storage` table.
pub struct LocalStore {
    db: Arc<Database>,
}

impl LocalStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    fn now() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64
    }

    /// Reads the raw JSON text under `key` without deserializing.
    pub fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError> {
        let conn = self.db.connection();
        let result = conn.query_row(
            "SELECT value FROM storage WHERE key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );
        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(StoreError::DatabaseError(e.to_string())),
        }
    }
}

impl LocalStoreTrait for LocalStore {
    fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        match self.get_raw(key)? {
            Some(text) => {
                let value = serde_json::from_str(&text)
                    .map_err(|e| StoreError::SerializationError(e.to_string()))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let text = serde_json::to_string(value)
            .map_err(|e| StoreError::SerializationError(e.to_string()))?;
        self.db
            .connection()
            .execute(
                "INSERT OR REPLACE INTO storage (key, value, updated_at) VALUES (?1, ?2, ?3)",
                params![key, text, Self::now()],
            )
            .map_err(|e| StoreError::DatabaseError(e.to_string()))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.db
            .connection()
            .execute("DELETE FROM storage WHERE key = ?1", params![key])
            .map_err(|e| StoreError::DatabaseError(e.to_string()))?;
        Ok(())
    }
}
