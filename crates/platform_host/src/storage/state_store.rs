//! Raw key/value state storage contracts and adapters.

use std::{cell::RefCell, collections::BTreeMap, future::Future, pin::Pin, rc::Rc};

use serde::{de::DeserializeOwned, Serialize};

/// Object-safe boxed future used by [`StateStore`] async methods.
pub type StateStoreFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Host service persisting JSON text blobs by key (the browser's `localStorage` shape).
pub trait StateStore {
    /// Loads the raw JSON text stored under `key`.
    fn load_raw<'a>(&'a self, key: &'a str)
        -> StateStoreFuture<'a, Result<Option<String>, String>>;

    /// Stores raw JSON text under `key`, replacing any previous value.
    fn save_raw<'a>(
        &'a self,
        key: &'a str,
        raw_json: &'a str,
    ) -> StateStoreFuture<'a, Result<(), String>>;

    /// Removes `key` if present.
    fn delete_raw<'a>(&'a self, key: &'a str) -> StateStoreFuture<'a, Result<(), String>>;
}

#[derive(Debug, Clone, Default)]
/// In-memory store keyed by string. Clones share the same backing map.
pub struct MemoryStateStore {
    inner: Rc<RefCell<BTreeMap<String, String>>>,
}

impl StateStore for MemoryStateStore {
    fn load_raw<'a>(
        &'a self,
        key: &'a str,
    ) -> StateStoreFuture<'a, Result<Option<String>, String>> {
        Box::pin(async move { Ok(self.inner.borrow().get(key).cloned()) })
    }

    fn save_raw<'a>(
        &'a self,
        key: &'a str,
        raw_json: &'a str,
    ) -> StateStoreFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.inner
                .borrow_mut()
                .insert(key.to_string(), raw_json.to_string());
            Ok(())
        })
    }

    fn delete_raw<'a>(&'a self, key: &'a str) -> StateStoreFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.inner.borrow_mut().remove(key);
            Ok(())
        })
    }
}

/// Loads and deserializes a typed JSON value through a [`StateStore`].
///
/// # Errors
///
/// Returns an error when the store read or JSON deserialization fails.
pub async fn load_json_with<S: StateStore + ?Sized, T: DeserializeOwned>(
    store: &S,
    key: &str,
) -> Result<Option<T>, String> {
    let Some(raw) = store.load_raw(key).await? else {
        return Ok(None);
    };
    let value = serde_json::from_str(&raw).map_err(|e| format!("decode `{key}`: {e}"))?;
    Ok(Some(value))
}

/// Serializes and saves a typed JSON value through a [`StateStore`].
///
/// # Errors
///
/// Returns an error when serialization or the store write fails.
pub async fn save_json_with<S: StateStore + ?Sized, T: Serialize>(
    store: &S,
    key: &str,
    value: &T,
) -> Result<(), String> {
    let raw = serde_json::to_string(value).map_err(|e| format!("encode `{key}`: {e}"))?;
    store.save_raw(key, &raw).await
}
