//! Lightweight preference storage contracts and adapters.
//!
//! The session profile record is the only durable value the desktop core keeps, so this store is
//! deliberately small: raw JSON text per key, plus typed helpers on top.

use std::{collections::HashMap, sync::Arc};

use futures::future::BoxFuture;
use parking_lot::Mutex;
use serde::{de::DeserializeOwned, Serialize};

/// Object-safe boxed future used by [`PrefsStore`] async methods.
pub type PrefsStoreFuture<'a, T> = BoxFuture<'a, T>;

/// Host service for lightweight preference values (JSON stored as text per key).
pub trait PrefsStore: Send + Sync {
    /// Loads a raw JSON string for a preference key.
    fn load_pref<'a>(
        &'a self,
        key: &'a str,
    ) -> PrefsStoreFuture<'a, Result<Option<String>, String>>;

    /// Saves a raw JSON string for a preference key.
    fn save_pref<'a>(
        &'a self,
        key: &'a str,
        raw_json: &'a str,
    ) -> PrefsStoreFuture<'a, Result<(), String>>;

    /// Deletes a preference key.
    fn delete_pref<'a>(&'a self, key: &'a str) -> PrefsStoreFuture<'a, Result<(), String>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// No-op preference store for hosts without durable storage.
pub struct NoopPrefsStore;

impl PrefsStore for NoopPrefsStore {
    fn load_pref<'a>(
        &'a self,
        _key: &'a str,
    ) -> PrefsStoreFuture<'a, Result<Option<String>, String>> {
        Box::pin(async { Ok(None) })
    }

    fn save_pref<'a>(
        &'a self,
        _key: &'a str,
        _raw_json: &'a str,
    ) -> PrefsStoreFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }

    fn delete_pref<'a>(&'a self, _key: &'a str) -> PrefsStoreFuture<'a, Result<(), String>> {
        Box::pin(async { Ok(()) })
    }
}

#[derive(Debug, Clone, Default)]
/// In-memory preference store keyed by string.
///
/// Clones share the same backing map, so a test can keep one handle while the session owns
/// another.
pub struct MemoryPrefsStore {
    inner: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryPrefsStore {
    /// Returns the raw JSON currently stored under `key`, if any.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.inner.lock().get(key).cloned()
    }

    /// Seeds a raw JSON value without going through the async contract.
    pub fn insert_raw(&self, key: impl Into<String>, raw_json: impl Into<String>) {
        self.inner.lock().insert(key.into(), raw_json.into());
    }
}

impl PrefsStore for MemoryPrefsStore {
    fn load_pref<'a>(
        &'a self,
        key: &'a str,
    ) -> PrefsStoreFuture<'a, Result<Option<String>, String>> {
        Box::pin(async move { Ok(self.inner.lock().get(key).cloned()) })
    }

    fn save_pref<'a>(
        &'a self,
        key: &'a str,
        raw_json: &'a str,
    ) -> PrefsStoreFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.inner
                .lock()
                .insert(key.to_string(), raw_json.to_string());
            Ok(())
        })
    }

    fn delete_pref<'a>(&'a self, key: &'a str) -> PrefsStoreFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.inner.lock().remove(key);
            Ok(())
        })
    }
}

/// Loads and deserializes a typed preference value through a [`PrefsStore`] implementation.
///
/// # Errors
///
/// Returns an error when the store or JSON deserialization fails.
pub async fn load_pref_with<S: PrefsStore + ?Sized, T: DeserializeOwned>(
    store: &S,
    key: &str,
) -> Result<Option<T>, String> {
    let Some(raw) = store.load_pref(key).await? else {
        return Ok(None);
    };
    let value = serde_json::from_str(&raw).map_err(|e| e.to_string())?;
    Ok(Some(value))
}

/// Serializes and saves a typed preference value through a [`PrefsStore`] implementation.
///
/// # Errors
///
/// Returns an error when serialization or store save fails.
pub async fn save_pref_with<S: PrefsStore + ?Sized, T: Serialize>(
    store: &S,
    key: &str,
    value: &T,
) -> Result<(), String> {
    let raw = serde_json::to_string(value).map_err(|e| e.to_string())?;
    store.save_pref(key, &raw).await
}

/// Deletes a preference key through a [`PrefsStore`] implementation.
///
/// # Errors
///
/// Returns an error when the store delete fails.
pub async fn delete_pref_with<S: PrefsStore + ?Sized>(store: &S, key: &str) -> Result<(), String> {
    store.delete_pref(key).await
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;
    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct StoredProfile {
        name: String,
        timezone: String,
    }

    #[test]
    fn memory_prefs_store_save_load_and_delete() {
        let store = MemoryPrefsStore::default();
        let store_obj: &dyn PrefsStore = &store;

        block_on(store_obj.save_pref("vdesk.key", "{\"k\":1}")).expect("save");
        assert_eq!(
            block_on(store_obj.load_pref("vdesk.key")).expect("load"),
            Some("{\"k\":1}".to_string())
        );
        block_on(store_obj.delete_pref("vdesk.key")).expect("delete");
        assert_eq!(
            block_on(store_obj.load_pref("vdesk.key")).expect("load"),
            None
        );
    }

    #[test]
    fn typed_helpers_preserve_the_record() {
        let store = MemoryPrefsStore::default();
        let store_obj: &dyn PrefsStore = &store;
        block_on(save_pref_with(
            store_obj,
            "profile",
            &StoredProfile {
                name: "Ada".to_string(),
                timezone: "Europe/London".to_string(),
            },
        ))
        .expect("save typed pref");

        let loaded: Option<StoredProfile> =
            block_on(load_pref_with(store_obj, "profile")).expect("load typed pref");
        assert_eq!(
            loaded,
            Some(StoredProfile {
                name: "Ada".to_string(),
                timezone: "Europe/London".to_string(),
            })
        );

        block_on(delete_pref_with(store_obj, "profile")).expect("delete typed pref");
        assert_eq!(store.raw("profile"), None);
    }

    #[test]
    fn typed_load_reports_corrupt_json() {
        let store = MemoryPrefsStore::default();
        store.insert_raw("profile", "{not json");
        let loaded = block_on(load_pref_with::<_, StoredProfile>(&store, "profile"));
        assert!(loaded.is_err());
    }

    #[test]
    fn clones_share_backing_storage() {
        let store = MemoryPrefsStore::default();
        let other = store.clone();
        block_on(store.save_pref("k", "1")).expect("save");
        assert_eq!(other.raw("k"), Some("1".to_string()));
    }

    #[test]
    fn noop_prefs_store_is_empty_and_successful() {
        let store = NoopPrefsStore;
        let store_obj: &dyn PrefsStore = &store;
        assert_eq!(block_on(store_obj.load_pref("k")).expect("load"), None);
        block_on(store_obj.save_pref("k", "{}")).expect("save");
        block_on(store_obj.delete_pref("k")).expect("delete");
    }
}
