//! Typed host-domain contracts shared by the grid runtime and browser adapters.
//!
//! This crate is the persistence boundary for Omni-Grid. It exposes the raw key/value
//! [`StateStore`] service trait, the versioned [`StateEnvelope`] that wraps the persisted grid
//! blob, typed JSON helpers, and time helpers. Concrete browser storage lives in
//! `platform_host_web`.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod storage;
pub mod time;

pub use storage::envelope::{
    build_state_envelope, migrate_envelope_payload, save_state_envelope_with, StateEnvelope,
    STATE_ENVELOPE_VERSION,
};
pub use storage::state_store::{
    load_json_with, save_json_with, MemoryStateStore, StateStore, StateStoreFuture,
};
pub use time::{
    clock_label_from_unix_ms, iso8601_from_unix_ms, next_monotonic_timestamp_ms, unix_time_ms_now,
};
