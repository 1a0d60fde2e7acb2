//! Shipped default dataset for NavHub.
//!
//! The defaults are the authority for healing: the reconciler fills gaps in
//! locally persisted data from this dataset and appends entries that shipped
//! after the user's snapshot was written. The data lives in
//! `assets/defaults.json` so the dev-only promote flow can regenerate it
//! from a live dataset without touching Rust source.

use crate::types::errors::StoreError;
use crate::types::nav::NavDocument;

const DEFAULT_DATASET_JSON: &str = include_str!("../../assets/defaults.json");

/// Parses the embedded default dataset.
///
/// # Errors
/// Returns `StoreError::SerializationError` if the embedded asset is
/// malformed — a build problem, not a runtime condition, but propagated
/// rather than panicked on so the RPC shell can report it.
pub fn default_dataset() -> Result<NavDocument, StoreError> {
    serde_json::from_str(DEFAULT_DATASET_JSON)
        .map_err(|e| StoreError::SerializationError(format!("defaults asset: {}", e)))
}
