use std::fmt;

// === StoreError ===

/// Errors related to the local key-value store.
#[derive(Debug)]
pub enum StoreError {
    /// Database operation failed.
    DatabaseError(String),
    /// Failed to serialize or deserialize a stored snapshot.
    SerializationError(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::DatabaseError(msg) => write!(f, "Store database error: {}", msg),
            StoreError::SerializationError(msg) => {
                write!(f, "Store serialization error: {}", msg)
            }
        }
    }
}

impl std::error::Error for StoreError {}

// === CollectionError ===

/// Errors related to section/item/category/engine mutations.
#[derive(Debug, PartialEq, Eq)]
pub enum CollectionError {
    /// Section with the given ID was not found.
    SectionNotFound(String),
    /// Item with the given ID was not found in the section.
    ItemNotFound(String),
    /// Category with the given ID was not found.
    CategoryNotFound(String),
    /// Engine with the given name was not found in the category.
    EngineNotFound(String),
    /// A section/category with the given ID already exists.
    AlreadyExists(String),
    /// The provided reorder index is out of bounds.
    InvalidIndex(usize),
    /// A required field was empty.
    EmptyField(&'static str),
    /// The last remaining category cannot be deleted.
    LastCategory,
    /// The last remaining engine in a category cannot be deleted.
    LastEngine(String),
}

impl fmt::Display for CollectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectionError::SectionNotFound(id) => write!(f, "Section not found: {}", id),
            CollectionError::ItemNotFound(id) => write!(f, "Item not found: {}", id),
            CollectionError::CategoryNotFound(id) => write!(f, "Category not found: {}", id),
            CollectionError::EngineNotFound(name) => write!(f, "Engine not found: {}", name),
            CollectionError::AlreadyExists(id) => write!(f, "Entry already exists: {}", id),
            CollectionError::InvalidIndex(index) => write!(f, "Invalid index: {}", index),
            CollectionError::EmptyField(field) => write!(f, "Field cannot be empty: {}", field),
            CollectionError::LastCategory => {
                write!(f, "Cannot delete the last remaining category")
            }
            CollectionError::LastEngine(category) => {
                write!(f, "Cannot delete the last engine in category: {}", category)
            }
        }
    }
}

impl std::error::Error for CollectionError {}

// === ResolveError ===

/// Errors related to site metadata resolution.
///
/// Network failures never surface here — each tier swallows them and the
/// runner advances to the next tier. Only cancellation propagates.
#[derive(Debug, PartialEq, Eq)]
pub enum ResolveError {
    /// Resolution was cancelled by the caller.
    Cancelled,
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::Cancelled => write!(f, "Metadata resolution cancelled"),
        }
    }
}

impl std::error::Error for ResolveError {}

// === SuggestError ===

/// Errors related to suggestion fetching. Internal to the suggest client —
/// the public API collapses all of these into an empty suggestion list.
#[derive(Debug)]
pub enum SuggestError {
    /// A network error occurred while fetching suggestions.
    NetworkError(String),
    /// The JSONP envelope did not match the requested callback.
    BadEnvelope(String),
    /// The payload could not be parsed.
    ParseError(String),
    /// The request did not complete within the timeout.
    Timeout,
}

impl fmt::Display for SuggestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SuggestError::NetworkError(msg) => write!(f, "Suggest network error: {}", msg),
            SuggestError::BadEnvelope(msg) => write!(f, "Suggest bad envelope: {}", msg),
            SuggestError::ParseError(msg) => write!(f, "Suggest parse error: {}", msg),
            SuggestError::Timeout => write!(f, "Suggest request timed out"),
        }
    }
}

impl std::error::Error for SuggestError {}

// === SyncError ===

/// Errors related to remote document sync.
#[derive(Debug)]
pub enum SyncError {
    /// Sync is disabled or credentials are incomplete.
    NotConfigured,
    /// Running in a local development context; sync is production-only.
    LocalContext,
    /// A network error occurred while talking to the content store.
    NetworkError(String),
    /// The content store returned an API error.
    ApiError(String),
    /// The conditional write was rejected: the fingerprint went stale.
    Conflict(String),
    /// The remote document could not be decoded.
    DecodeError(String),
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncError::NotConfigured => write!(f, "Sync not configured"),
            SyncError::LocalContext => write!(f, "Sync skipped in local context"),
            SyncError::NetworkError(msg) => write!(f, "Sync network error: {}", msg),
            SyncError::ApiError(msg) => write!(f, "Sync API error: {}", msg),
            SyncError::Conflict(msg) => write!(f, "Sync fingerprint conflict: {}", msg),
            SyncError::DecodeError(msg) => write!(f, "Sync decode error: {}", msg),
        }
    }
}

impl std::error::Error for SyncError {}
