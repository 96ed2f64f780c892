//! Runtime tuning knobs, read once at boot.

use std::time::Duration;

use leptos::logging;
use platform_host::{load_json_with, StateStore};
use serde::{Deserialize, Serialize};

use crate::model::{GhostPlacement, GridPolicy, DEFAULT_LOG_CAPACITY};

/// Store key holding an optional [`GridRuntimeConfig`] override.
pub const RUNTIME_CONFIG_KEY: &str = "omni-grid.runtime-config";
pub const DEFAULT_PERSIST_DEBOUNCE_MS: u64 = 400;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridRuntimeConfig {
    /// Quiet period before a state change is written to storage.
    pub persist_debounce_ms: u64,
    /// Maximum number of activity-log lines kept in state.
    pub log_capacity: usize,
    pub ghost_placement: GhostPlacement,
}

impl Default for GridRuntimeConfig {
    fn default() -> Self {
        Self {
            persist_debounce_ms: DEFAULT_PERSIST_DEBOUNCE_MS,
            log_capacity: DEFAULT_LOG_CAPACITY,
            ghost_placement: GhostPlacement::RegistryDefault,
        }
    }
}

impl GridRuntimeConfig {
    pub fn persist_debounce(&self) -> Duration {
        Duration::from_millis(self.persist_debounce_ms)
    }

    pub fn policy(&self) -> GridPolicy {
        GridPolicy {
            log_capacity: self.log_capacity.max(1),
            ghost_placement: self.ghost_placement,
        }
    }
}

/// Loads the runtime config override, falling back to defaults when absent or unreadable.
pub async fn load_runtime_config<S: StateStore + ?Sized>(store: &S) -> GridRuntimeConfig {
    match load_json_with::<S, GridRuntimeConfig>(store, RUNTIME_CONFIG_KEY).await {
        Ok(config) => config.unwrap_or_default(),
        Err(err) => {
            logging::warn!("runtime config load failed, using defaults: {err}");
            GridRuntimeConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use platform_host::MemoryStateStore;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn missing_config_uses_defaults() {
        let store = MemoryStateStore::default();
        let config = block_on(load_runtime_config(&store));
        assert_eq!(config, GridRuntimeConfig::default());
        assert_eq!(config.persist_debounce(), Duration::from_millis(400));
        assert_eq!(config.policy(), GridPolicy::default());
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let store = MemoryStateStore::default();
        block_on(store.save_raw(
            RUNTIME_CONFIG_KEY,
            r#"{"persist_debounce_ms":50,"ghost_placement":"preview-position"}"#,
        ))
        .expect("save config");

        let config = block_on(load_runtime_config(&store));
        assert_eq!(config.persist_debounce_ms, 50);
        assert_eq!(config.log_capacity, DEFAULT_LOG_CAPACITY);
        assert_eq!(config.ghost_placement, GhostPlacement::PreviewPosition);
    }

    #[test]
    fn unreadable_config_falls_back() {
        let store = MemoryStateStore::default();
        block_on(store.save_raw(RUNTIME_CONFIG_KEY, "{oops")).expect("save");
        assert_eq!(block_on(load_runtime_config(&store)), GridRuntimeConfig::default());
    }

    #[test]
    fn zero_log_capacity_is_clamped() {
        let config = GridRuntimeConfig {
            log_capacity: 0,
            ..GridRuntimeConfig::default()
        };
        assert_eq!(config.policy().log_capacity, 1);
    }
}
