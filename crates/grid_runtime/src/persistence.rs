//! Grid runtime persistence adapters for boot hydration and snapshot writes.

use leptos::logging;
use platform_host::{build_state_envelope, save_state_envelope_with, StateEnvelope, StateStore};
use serde::Deserialize;

use crate::model::{GridSnapshot, GridState, GRID_STATE_SCHEMA_VERSION};

/// Key the whole-state blob is stored under.
pub const STATE_KEY: &str = "omni-grid-storage";

/// Blob layout written by the browser build before envelopes existed.
#[derive(Debug, Deserialize)]
struct LegacyPersistedState {
    state: GridSnapshot,
}

fn migrate_grid_snapshot(
    schema_version: u32,
    envelope: &StateEnvelope,
) -> Result<Option<GridSnapshot>, String> {
    match schema_version {
        0 | GRID_STATE_SCHEMA_VERSION => {
            platform_host::migrate_envelope_payload(envelope).map(Some)
        }
        _ => Ok(None),
    }
}

fn decode_stored_snapshot(raw: &str) -> Result<Option<GridSnapshot>, String> {
    if let Ok(envelope) = serde_json::from_str::<StateEnvelope>(raw) {
        if envelope.namespace != STATE_KEY {
            return Err(format!("unexpected namespace `{}`", envelope.namespace));
        }
        return migrate_grid_snapshot(envelope.schema_version, &envelope);
    }

    serde_json::from_str::<LegacyPersistedState>(raw)
        .map(|legacy| Some(legacy.state))
        .map_err(|e| format!("decode `{STATE_KEY}`: {e}"))
}

/// Loads the persisted snapshot, if one exists and can be read.
///
/// Unreadable or unknown-schema blobs are logged and treated as absent so the grid boots from
/// defaults.
pub async fn load_boot_snapshot<S: StateStore + ?Sized>(store: &S) -> Option<GridSnapshot> {
    let raw = match store.load_raw(STATE_KEY).await {
        Ok(raw) => raw?,
        Err(err) => {
            logging::warn!("grid snapshot load failed: {err}");
            return None;
        }
    };

    match decode_stored_snapshot(&raw) {
        Ok(Some(snapshot)) => Some(snapshot),
        Ok(None) => {
            logging::warn!("grid snapshot has an unknown schema; booting from defaults");
            None
        }
        Err(err) => {
            logging::warn!("grid snapshot decode failed: {err}");
            None
        }
    }
}

/// Writes the full persisted subset of `state`.
///
/// # Errors
///
/// Returns an error when serialization or the store write fails.
pub async fn persist_snapshot<S: StateStore + ?Sized>(
    store: &S,
    state: &GridState,
) -> Result<(), String> {
    let envelope = build_state_envelope(STATE_KEY, GRID_STATE_SCHEMA_VERSION, &state.snapshot())?;
    save_state_envelope_with(store, &envelope).await
}

/// Removes the persisted snapshot.
///
/// # Errors
///
/// Returns an error when the store delete fails.
pub async fn clear_persisted_state<S: StateStore + ?Sized>(store: &S) -> Result<(), String> {
    store.delete_raw(STATE_KEY).await
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use platform_host::MemoryStateStore;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::model::{GridPolicy, LayoutEntry, WidgetId};

    #[test]
    fn schema_zero_migration_decodes_payload() {
        let snapshot = GridState::default().snapshot();
        let envelope = build_state_envelope(STATE_KEY, 0, &snapshot).expect("build envelope");
        let migrated = migrate_grid_snapshot(0, &envelope).expect("schema-zero migration");
        assert_eq!(migrated, Some(snapshot));
    }

    #[test]
    fn unknown_schema_is_ignored() {
        let store = MemoryStateStore::default();
        let envelope = build_state_envelope(STATE_KEY, 99, &json!({"visibleWidgets": ["CALC"]}))
            .expect("build");
        block_on(save_state_envelope_with(&store, &envelope)).expect("save");
        assert_eq!(block_on(load_boot_snapshot(&store)), None);
    }

    #[test]
    fn persisted_state_round_trips_through_store() {
        let store = MemoryStateStore::default();
        let mut state = GridState::default();
        state.toggle_visibility(&WidgetId::from("CALC"));
        state.layout_locked = true;

        block_on(persist_snapshot(&store, &state)).expect("persist");
        let loaded = block_on(load_boot_snapshot(&store)).expect("snapshot present");
        let restored = GridState::from_snapshot(loaded, GridPolicy::default());
        assert_eq!(restored, state);
    }

    #[test]
    fn legacy_browser_blob_is_accepted() {
        let store = MemoryStateStore::default();
        let raw = json!({
            "state": {
                "layouts": {"lg": [{"i": "SYSTEM", "x": 1, "y": 2, "w": 4, "h": 6}]},
                "visibleWidgets": ["SYSTEM"],
                "isCmdPaletteOpen": true
            },
            "version": 0
        });
        block_on(store.save_raw(STATE_KEY, &raw.to_string())).expect("save");

        let snapshot = block_on(load_boot_snapshot(&store)).expect("legacy snapshot");
        assert_eq!(snapshot.visible_widgets, vec![WidgetId::from("SYSTEM")]);
        assert_eq!(snapshot.layouts.lg[0].x, 1);
        assert_eq!(snapshot.theme.name, "Midnight Cyberpunk");
    }

    #[test]
    fn corrupt_blob_boots_from_defaults_and_clear_removes_key() {
        let store = MemoryStateStore::default();
        block_on(store.save_raw(STATE_KEY, "not json")).expect("save");
        assert_eq!(block_on(load_boot_snapshot(&store)), None);

        block_on(clear_persisted_state(&store)).expect("clear");
        assert_eq!(block_on(store.load_raw(STATE_KEY)).expect("load"), None);
    }

    #[test]
    fn hydrated_visible_widget_without_entry_gets_its_default_placement() {
        let store = MemoryStateStore::default();
        let envelope = build_state_envelope(
            STATE_KEY,
            GRID_STATE_SCHEMA_VERSION,
            &json!({"layouts": {"lg": []}, "visibleWidgets": ["CALC", "HOMEBREW"]}),
        )
        .expect("build");
        block_on(save_state_envelope_with(&store, &envelope)).expect("save");

        let snapshot = block_on(load_boot_snapshot(&store)).expect("snapshot present");
        let state = GridState::from_snapshot(snapshot, GridPolicy::default());
        assert_eq!(
            state.layout(),
            &[
                LayoutEntry::new("CALC", 6, 20, 3, 8),
                LayoutEntry::new("HOMEBREW", 0, 0, 4, 6),
            ]
        );
    }
}
