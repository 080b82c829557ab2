// Bearer token and cached profile over a key-value store

use crate::error::StoreError;
use crate::session::KeyValueStore;
use serde_json::Value;
use std::sync::Arc;

/// Key holding the raw bearer token
pub const TOKEN_KEY: &str = "auth_token";
/// Key holding the cached user profile JSON
pub const PROFILE_KEY: &str = "user";

/// Process-wide session credential. Cloning shares the same store.
#[derive(Clone)]
pub struct Credentials {
    store: Arc<dyn KeyValueStore>,
}

impl Credentials {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn token(&self) -> Option<String> {
        self.store.get(TOKEN_KEY).filter(|token| !token.is_empty())
    }

    /// Replace any existing token
    pub fn set_token(&self, token: &str) -> Result<(), StoreError> {
        self.store.set(TOKEN_KEY, token)
    }

    pub fn clear_token(&self) -> Result<(), StoreError> {
        self.store.remove(TOKEN_KEY)
    }

    /// Cached profile; an unreadable entry counts as absent
    pub fn profile(&self) -> Option<Value> {
        self.store
            .get(PROFILE_KEY)
            .and_then(|raw| serde_json::from_str(&raw).ok())
    }

    pub fn set_profile(&self, profile: &Value) -> Result<(), StoreError> {
        let raw = serde_json::to_string(profile).map_err(|source| StoreError::Encode {
            key: PROFILE_KEY.to_string(),
            source,
        })?;
        self.store.set(PROFILE_KEY, &raw)
    }

    pub fn clear_profile(&self) -> Result<(), StoreError> {
        self.store.remove(PROFILE_KEY)
    }

    /// Drop token and profile together. Both removals are attempted even
    /// if the first fails.
    pub fn clear(&self) -> Result<(), StoreError> {
        let token = self.clear_token();
        let profile = self.clear_profile();
        token.and(profile)
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}
