//! Session state: the credential pair and the cached user
//!
//! All reads and writes of persisted credentials go through [`Session`].
//! The access token is read fresh on every request, so a refresh performed by
//! one call is visible to the next.

use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::warn;

use crate::types::CurrentUser;

/// Storage key of the short-lived bearer credential
pub const ACCESS_TOKEN_KEY: &str = "access_token";

/// Storage key of the credential exchanged for new access tokens
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

/// Storage key of the JSON-encoded user cached at login
pub const USER_KEY: &str = "user";

/// Durable string key/value storage
pub trait TokenStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str);

    fn remove(&self, key: &str);
}

/// In-process token store for native use and tests
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }
}

/// Typed view over a [`TokenStore`]
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn TokenStore>,
}

impl Session {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self { store }
    }

    pub fn access_token(&self) -> Option<String> {
        self.store.get(ACCESS_TOKEN_KEY)
    }

    pub fn set_access_token(&self, token: &str) {
        self.store.set(ACCESS_TOKEN_KEY, token);
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.store.get(REFRESH_TOKEN_KEY)
    }

    /// Persist everything a successful login hands back
    pub fn start(&self, access: &str, refresh: &str, user: &JsonValue) {
        self.store.set(ACCESS_TOKEN_KEY, access);
        self.store.set(REFRESH_TOKEN_KEY, refresh);
        self.store.set(USER_KEY, &user.to_string());
    }

    /// Erase both tokens and the cached user
    pub fn clear(&self) {
        self.store.remove(ACCESS_TOKEN_KEY);
        self.store.remove(REFRESH_TOKEN_KEY);
        self.store.remove(USER_KEY);
    }

    /// The cached user, if present and well-formed
    pub fn user(&self) -> Option<CurrentUser> {
        let raw = self.store.get(USER_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(err) => {
                warn!(error = %err, "Ignoring malformed cached user");
                None
            }
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token().is_some()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn session() -> (Arc<MemoryTokenStore>, Session) {
        let store = Arc::new(MemoryTokenStore::new());
        let session = Session::new(store.clone());
        (store, session)
    }

    #[test]
    fn test_start_and_clear() {
        let (store, session) = session();
        session.start("access-1", "refresh-1", &json!({"id": 1, "username": "alice"}));

        assert_eq!(session.access_token().as_deref(), Some("access-1"));
        assert_eq!(session.refresh_token().as_deref(), Some("refresh-1"));
        assert_eq!(session.user().map(|u| u.username), Some("alice".to_string()));

        session.clear();
        assert!(store.get(ACCESS_TOKEN_KEY).is_none());
        assert!(store.get(REFRESH_TOKEN_KEY).is_none());
        assert!(store.get(USER_KEY).is_none());
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_refresh_overwrites_only_access_token() {
        let (_, session) = session();
        session.start("old", "refresh-1", &json!({"id": 1, "username": "alice"}));
        session.set_access_token("new");

        assert_eq!(session.access_token().as_deref(), Some("new"));
        assert_eq!(session.refresh_token().as_deref(), Some("refresh-1"));
    }

    #[test]
    fn test_malformed_user_is_ignored() {
        let (store, session) = session();
        store.set(USER_KEY, "{not json");
        assert!(session.user().is_none());
    }
}
