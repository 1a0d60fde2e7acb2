// NavHub services
// Services provide core functionality: local storage, defaults, reconciliation,
// metadata/favicon resolution, autocomplete, and remote sync.

pub mod defaults;
pub mod favicon;
pub mod local_store;
pub mod metadata_resolver;
pub mod reconciler;
pub mod suggest;
pub mod sync_service;
