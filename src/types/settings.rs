use serde::{Deserialize, Serialize};

/// Credentials and switch for the GitHub-backed remote document store.
///
/// Values are taken as pasted — nothing beyond presence is ever validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SyncSettings {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub repo: String,
    #[serde(default)]
    pub enabled: bool,
}

impl SyncSettings {
    /// True when sync is switched on and all credentials are present.
    pub fn is_configured(&self) -> bool {
        self.enabled && !self.token.is_empty() && !self.owner.is_empty() && !self.repo.is_empty()
    }
}
