//! Durable storage contracts: raw key/value stores and the versioned state envelope.

pub mod envelope;
pub mod state_store;
