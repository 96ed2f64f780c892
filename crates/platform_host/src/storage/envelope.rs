//! Versioned envelope wrapping a persisted state payload.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use super::state_store::StateStore;

/// Version for [`StateEnvelope`] metadata serialization.
pub const STATE_ENVELOPE_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Versioned envelope for a persisted state payload.
pub struct StateEnvelope {
    /// Envelope schema version.
    pub envelope_version: u32,
    /// Namespace identifying the owner of the payload. Doubles as the storage key.
    pub namespace: String,
    /// Owner-defined schema version for the payload.
    pub schema_version: u32,
    /// Last update time in unix milliseconds.
    pub updated_at_unix_ms: u64,
    /// Serialized payload.
    pub payload: Value,
}

impl StateEnvelope {
    /// Creates a new envelope and stamps it with a monotonic timestamp.
    pub fn new(namespace: impl Into<String>, schema_version: u32, payload: Value) -> Self {
        Self {
            envelope_version: STATE_ENVELOPE_VERSION,
            namespace: namespace.into(),
            schema_version,
            updated_at_unix_ms: crate::time::next_monotonic_timestamp_ms(),
            payload,
        }
    }
}

/// Builds a [`StateEnvelope`] from a serializable payload.
///
/// # Errors
///
/// Returns an error when `payload` cannot be converted to JSON.
pub fn build_state_envelope<T: Serialize>(
    namespace: &str,
    schema_version: u32,
    payload: &T,
) -> Result<StateEnvelope, String> {
    let payload = serde_json::to_value(payload).map_err(|e| e.to_string())?;
    Ok(StateEnvelope::new(namespace, schema_version, payload))
}

/// Deserializes an envelope payload into a target type.
///
/// # Errors
///
/// Returns an error when deserialization fails.
pub fn migrate_envelope_payload<T: DeserializeOwned>(
    envelope: &StateEnvelope,
) -> Result<T, String> {
    serde_json::from_value(envelope.payload.clone()).map_err(|e| e.to_string())
}

/// Saves `envelope` under its own namespace.
///
/// # Errors
///
/// Returns an error when serialization or the store write fails.
pub async fn save_state_envelope_with<S: StateStore + ?Sized>(
    store: &S,
    envelope: &StateEnvelope,
) -> Result<(), String> {
    crate::storage::state_store::save_json_with(store, &envelope.namespace, envelope).await
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use serde_json::json;

    use super::*;
    use crate::storage::state_store::MemoryStateStore;

    #[derive(Debug, Deserialize, PartialEq)]
    struct LayoutPayload {
        visible: Vec<String>,
    }

    #[test]
    fn envelope_serialization_shape_is_snake_case() {
        let envelope = StateEnvelope {
            envelope_version: STATE_ENVELOPE_VERSION,
            namespace: "omni-grid-storage".to_string(),
            schema_version: 1,
            updated_at_unix_ms: 1234,
            payload: json!({"visible": ["SYSTEM"]}),
        };

        let value = serde_json::to_value(&envelope).expect("serialize envelope");
        let object = value.as_object().expect("object");
        assert_eq!(object.get("envelope_version"), Some(&json!(1)));
        assert_eq!(object.get("namespace"), Some(&json!("omni-grid-storage")));
        assert_eq!(object.get("updated_at_unix_ms"), Some(&json!(1234)));
        assert!(!object.contains_key("updatedAtUnixMs"));
    }

    #[test]
    fn new_envelopes_get_increasing_timestamps() {
        let first = StateEnvelope::new("omni-grid-storage", 1, json!({}));
        let second = StateEnvelope::new("omni-grid-storage", 1, json!({}));
        assert!(second.updated_at_unix_ms > first.updated_at_unix_ms);
    }

    #[test]
    fn migrate_payload_decodes_and_rejects_mismatches() {
        let envelope = build_state_envelope("grid", 0, &json!({"visible": ["HELP"]}))
            .expect("build envelope");
        let decoded: LayoutPayload = migrate_envelope_payload(&envelope).expect("decode");
        assert_eq!(decoded.visible, vec!["HELP".to_string()]);

        let bad = build_state_envelope("grid", 0, &json!({"visible": 3})).expect("build");
        assert!(migrate_envelope_payload::<LayoutPayload>(&bad).is_err());
    }

    #[test]
    fn envelopes_are_stored_under_their_namespace() {
        let store = MemoryStateStore::default();
        let envelope =
            build_state_envelope("omni-grid-storage", 1, &json!({"visible": []})).expect("build");

        block_on(save_state_envelope_with(&store, &envelope)).expect("save");

        let raw = block_on(store.load_raw("omni-grid-storage"))
            .expect("load")
            .expect("present");
        let loaded: StateEnvelope = serde_json::from_str(&raw).expect("decode envelope");
        assert_eq!(loaded, envelope);
    }
}
