//! Browser (`wasm32`) implementations of [`platform_host`] service contracts.
//!
//! The grid persists one JSON blob in `window.localStorage`; this crate provides that adapter and
//! the factory the runtime uses to pick a store for the current target.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod storage;

pub use storage::local_state::{state_store, WebLocalStateStore};
