//! `localStorage`-backed state store.
//!
//! The browser API is synchronous; the adapter wraps each call in a ready future so it satisfies
//! the async [`platform_host::StateStore`] contract.

use std::rc::Rc;

#[cfg(not(target_arch = "wasm32"))]
use platform_host::MemoryStateStore;
use platform_host::{StateStore, StateStoreFuture};

#[derive(Debug, Clone, Copy, Default)]
/// State store backed by `window.localStorage`. Inert on non-wasm targets.
pub struct WebLocalStateStore;

impl WebLocalStateStore {
    #[cfg(target_arch = "wasm32")]
    fn storage() -> Result<web_sys::Storage, String> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .ok_or_else(|| "localStorage unavailable".to_string())
    }

    /// Reads the raw JSON text for `key`.
    pub fn get(self, key: &str) -> Option<String> {
        #[cfg(target_arch = "wasm32")]
        {
            Self::storage().ok()?.get_item(key).ok().flatten()
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = key;
            None
        }
    }

    /// Writes raw JSON text for `key`.
    ///
    /// # Errors
    ///
    /// Returns an error when localStorage is unavailable or the write fails (quota exceeded).
    pub fn set(self, key: &str, raw_json: &str) -> Result<(), String> {
        #[cfg(target_arch = "wasm32")]
        {
            Self::storage()?
                .set_item(key, raw_json)
                .map_err(|e| format!("localStorage set_item failed: {e:?}"))
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = (key, raw_json);
            Ok(())
        }
    }

    /// Removes `key`.
    ///
    /// # Errors
    ///
    /// Returns an error when localStorage is unavailable or the delete fails.
    pub fn remove(self, key: &str) -> Result<(), String> {
        #[cfg(target_arch = "wasm32")]
        {
            Self::storage()?
                .remove_item(key)
                .map_err(|e| format!("localStorage remove_item failed: {e:?}"))
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = key;
            Ok(())
        }
    }
}

impl StateStore for WebLocalStateStore {
    fn load_raw<'a>(
        &'a self,
        key: &'a str,
    ) -> StateStoreFuture<'a, Result<Option<String>, String>> {
        let store = *self;
        Box::pin(async move { Ok(store.get(key)) })
    }

    fn save_raw<'a>(
        &'a self,
        key: &'a str,
        raw_json: &'a str,
    ) -> StateStoreFuture<'a, Result<(), String>> {
        let store = *self;
        Box::pin(async move { store.set(key, raw_json) })
    }

    fn delete_raw<'a>(&'a self, key: &'a str) -> StateStoreFuture<'a, Result<(), String>> {
        let store = *self;
        Box::pin(async move { store.remove(key) })
    }
}

/// Returns the state store for the current target.
///
/// Browsers get `localStorage`; native builds (tests, tooling) get a process-local in-memory
/// store so a session still round-trips.
pub fn state_store() -> Rc<dyn StateStore> {
    #[cfg(target_arch = "wasm32")]
    {
        Rc::new(WebLocalStateStore)
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        Rc::new(MemoryStateStore::default())
    }
}
