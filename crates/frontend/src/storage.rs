//! `window.localStorage` as a [`KeyValueStore`]

use secure_auth_core::{KeyValueStore, StorageError};
use wasm_bindgen::JsValue;
use web_sys::Storage;

/// Handle to the page's local storage
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BrowserStore;

impl BrowserStore {
    fn storage() -> Result<Storage, StorageError> {
        web_sys::window()
            .ok_or_else(|| StorageError::unavailable("no window"))?
            .local_storage()
            .map_err(|e| StorageError::unavailable(describe(&e)))?
            .ok_or_else(|| StorageError::unavailable("localStorage disabled"))
    }
}

impl KeyValueStore for BrowserStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Self::storage()?
            .get_item(key)
            .map_err(|e| StorageError::unavailable(describe(&e)))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|e| StorageError::write_rejected(key, describe(&e)))
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        Self::storage()?
            .remove_item(key)
            .map_err(|e| StorageError::write_rejected(key, describe(&e)))
    }
}

fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use secure_auth_core::SessionStore;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn local_storage_round_trips_values() {
        let store = BrowserStore;
        store.set("secure-auth-test", "value").unwrap();
        assert_eq!(
            store.get("secure-auth-test").unwrap().as_deref(),
            Some("value")
        );

        store.remove("secure-auth-test").unwrap();
        assert_eq!(store.get("secure-auth-test").unwrap(), None);
    }

    #[wasm_bindgen_test]
    fn corrupt_session_entries_read_as_signed_out() {
        let store = BrowserStore;
        store.set("access", "{").unwrap();
        store.set("user", "{}").unwrap();

        let sessions = SessionStore::new(store);
        assert_eq!(sessions.load(), None);

        sessions.clear().unwrap();
        assert_eq!(store.get("access").unwrap(), None);
        assert_eq!(store.get("user").unwrap(), None);
    }
}
