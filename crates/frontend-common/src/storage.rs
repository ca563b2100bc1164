//! `localStorage`-backed token storage

use crm_http::TokenStore;
use tracing::warn;
use web_sys::Storage;

/// Token store over the window's `localStorage`
///
/// Values are stored as raw strings. Missing storage (private browsing,
/// no window) reads as empty and drops writes.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageTokenStore;

fn local_storage() -> Option<Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

impl TokenStore for LocalStorageTokenStore {
    fn get(&self, key: &str) -> Option<String> {
        local_storage().and_then(|storage| storage.get_item(key).ok().flatten())
    }

    fn set(&self, key: &str, value: &str) {
        let Some(storage) = local_storage() else {
            warn!(%key, "localStorage unavailable, value not stored");
            return;
        };
        if let Err(err) = storage.set_item(key, value) {
            warn!(%key, error = ?err, "Failed to write localStorage");
        }
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = local_storage() {
            let _ = storage.remove_item(key);
        }
    }
}
