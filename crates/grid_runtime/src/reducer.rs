//! Reducer actions, side-effect intents, and transition logic for the grid runtime.

use crate::{
    content::ContentAction,
    model::{GhostSuggestion, GridSnapshot, GridState, GridTheme, LayoutEntry, SettingKey, WidgetId},
};

#[derive(Debug, Clone, PartialEq)]
/// Actions accepted by [`reduce_grid`] to mutate [`GridState`].
pub enum GridAction {
    /// Show a hidden widget or hide a visible one.
    ToggleWidget {
        /// Widget to toggle. Ids outside the known kinds are accepted.
        widget_id: WidgetId,
    },
    /// Overlay renderer-reported positions onto the canonical layout.
    MergeLayout {
        /// Cleaned entries from the renderer's layout-change event.
        entries: Vec<LayoutEntry>,
    },
    /// Factory reset of layout, visibility, ghost, flags, theme and widget content.
    ResetAll,
    /// Replace (or clear) the held ghost suggestion.
    SetGhostSuggestion {
        /// New suggestion, or `None` to discard the current one.
        ghost: Option<GhostSuggestion>,
    },
    /// Turn the held ghost suggestion into a visible widget.
    MaterializeGhost,
    /// Toggle the drag/resize lock.
    ToggleLayoutLock,
    /// Toggle vertical compaction.
    ToggleCompact,
    /// Open or close the command palette.
    SetCommandPaletteOpen {
        /// Whether the palette should be open.
        open: bool,
    },
    /// Flip a display setting.
    ToggleSetting {
        /// Setting to flip.
        setting: SettingKey,
    },
    /// Replace the color theme.
    SetTheme {
        /// New theme.
        theme: GridTheme,
    },
    /// Append a line to the activity log.
    AppendLog {
        /// Message text, without the timestamp.
        message: String,
    },
    /// Edit a widget content slice.
    Content(ContentAction),
    /// Hydrate runtime state from a persisted snapshot.
    HydrateSnapshot {
        /// Snapshot payload to restore.
        snapshot: GridSnapshot,
    },
    /// Replace persisted state with a validated backup import.
    ApplyImportedState {
        /// Snapshot produced by the backup importer.
        snapshot: GridSnapshot,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Side-effect intents emitted by [`reduce_grid`] for the runtime to execute.
pub enum RuntimeEffect {
    /// Schedule a (debounced) write of the current snapshot.
    PersistState,
}

/// Applies a [`GridAction`] to the grid state and collects resulting side effects.
///
/// Every action is infallible. An action that leaves persisted state untouched emits no
/// effects.
pub fn reduce_grid(state: &mut GridState, action: GridAction) -> Vec<RuntimeEffect> {
    let persist = match action {
        GridAction::ToggleWidget { widget_id } => {
            state.toggle_visibility(&widget_id);
            true
        }
        GridAction::MergeLayout { entries } => state.merge_layout(&entries),
        GridAction::ResetAll => {
            state.reset_all();
            true
        }
        GridAction::SetGhostSuggestion { ghost } => {
            if state.ghost() == ghost.as_ref() {
                false
            } else {
                state.set_ghost_suggestion(ghost);
                true
            }
        }
        GridAction::MaterializeGhost => state.materialize_ghost().is_some(),
        GridAction::ToggleLayoutLock => {
            state.layout_locked = !state.layout_locked;
            true
        }
        GridAction::ToggleCompact => {
            state.compact = !state.compact;
            true
        }
        GridAction::SetCommandPaletteOpen { open } => {
            state.command_palette_open = open;
            false
        }
        GridAction::ToggleSetting { setting } => {
            state.settings.toggle(setting);
            true
        }
        GridAction::SetTheme { theme } => {
            if state.theme == theme {
                false
            } else {
                state.theme = theme;
                true
            }
        }
        GridAction::AppendLog { message } => {
            state.push_log(message);
            true
        }
        GridAction::Content(content_action) => state.content.apply(content_action),
        GridAction::HydrateSnapshot { snapshot } => {
            *state = GridState::from_snapshot(snapshot, state.policy);
            false
        }
        GridAction::ApplyImportedState { snapshot } => {
            *state = GridState::from_snapshot(snapshot, state.policy);
            state.push_log("Backup restored.");
            true
        }
    };

    if persist {
        vec![RuntimeEffect::PersistState]
    } else {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::content::WidgetContent;
    use crate::model::{GhostPlacement, GridPolicy, WidgetKind};

    fn toggle(state: &mut GridState, id: &str) -> Vec<RuntimeEffect> {
        reduce_grid(
            state,
            GridAction::ToggleWidget {
                widget_id: WidgetId::from(id),
            },
        )
    }

    #[test]
    fn toggle_creates_registry_entry_once_and_keeps_it_on_hide() {
        let mut state = GridState::default();
        let len_before = state.layout().len();

        assert_eq!(toggle(&mut state, "CALC"), vec![RuntimeEffect::PersistState]);
        assert!(state.is_visible("CALC"));
        assert_eq!(state.layout().len(), len_before);

        toggle(&mut state, "CALC");
        assert!(!state.is_visible("CALC"));
        assert_eq!(
            state.layout_entry("CALC"),
            Some(&LayoutEntry::new("CALC", 6, 20, 3, 8))
        );
        assert!(state.logs[0].ends_with("Terminated widget: CALC"));
        assert!(state.logs[1].ends_with("Initialized widget: CALC"));
    }

    #[test]
    fn toggle_unknown_id_uses_fallback_entry() {
        let mut state = GridState::default();
        toggle(&mut state, "HOMEBREW");
        assert_eq!(
            state.layout_entry("HOMEBREW"),
            Some(&LayoutEntry::new("HOMEBREW", 0, 0, 4, 6))
        );
        assert_eq!(state.visible_widgets().last(), Some(&WidgetId::from("HOMEBREW")));
    }

    #[test]
    fn merge_without_changes_emits_no_effect() {
        let mut state = GridState::default();
        let current = state.layout_entry("SYSTEM").cloned().expect("system entry");
        let effects = reduce_grid(
            &mut state,
            GridAction::MergeLayout {
                entries: vec![current],
            },
        );
        assert!(effects.is_empty());
    }

    #[test]
    fn reset_restores_defaults_and_clears_content() {
        let mut state = GridState::default();
        toggle(&mut state, "CALC");
        state.layout_locked = true;
        state.settings.scanlines = false;
        reduce_grid(
            &mut state,
            GridAction::SetGhostSuggestion {
                ghost: Some(GhostSuggestion::new("WEATHER", "rain")),
            },
        );

        reduce_grid(&mut state, GridAction::ResetAll);

        assert_eq!(state.layout(), crate::registry::default_layout().as_slice());
        assert_eq!(
            state.visible_widgets(),
            &[WidgetId::from("SYSTEM"), WidgetId::from("HELP")]
        );
        assert_eq!(state.ghost(), None);
        assert!(!state.layout_locked);
        assert_eq!(state.content, WidgetContent::cleared());
        assert!(!state.settings.scanlines);
    }

    #[test]
    fn materialize_shows_suggested_widget_and_clears_ghost() {
        let mut state = GridState::default();
        reduce_grid(
            &mut state,
            GridAction::SetGhostSuggestion {
                ghost: Some(
                    GhostSuggestion::new("WEATHER", "Forecast shows rain")
                        .with_preview("Rain at 4pm"),
                ),
            },
        );

        let effects = reduce_grid(&mut state, GridAction::MaterializeGhost);
        assert_eq!(effects, vec![RuntimeEffect::PersistState]);
        assert!(state.is_visible("WEATHER"));
        assert_eq!(state.ghost(), None);
        assert_eq!(
            state.layout_entry("WEATHER"),
            Some(&LayoutEntry::new("WEATHER", 0, 36, 4, 6))
        );

        assert!(reduce_grid(&mut state, GridAction::MaterializeGhost).is_empty());
    }

    #[test]
    fn materialize_never_hides_an_already_visible_widget() {
        let mut state = GridState::default();
        reduce_grid(
            &mut state,
            GridAction::SetGhostSuggestion {
                ghost: Some(GhostSuggestion::new("SYSTEM", "already open")),
            },
        );
        reduce_grid(&mut state, GridAction::MaterializeGhost);
        assert!(state.is_visible("SYSTEM"));
        assert_eq!(state.ghost(), None);
    }

    #[test]
    fn preview_placement_policy_uses_ghost_origin() {
        let mut state = GridState::with_policy(GridPolicy {
            ghost_placement: GhostPlacement::PreviewPosition,
            ..GridPolicy::default()
        });
        reduce_grid(&mut state, GridAction::ResetAll);
        let layout_without_weather: Vec<LayoutEntry> = state
            .layout()
            .iter()
            .filter(|entry| entry.id != "WEATHER")
            .cloned()
            .collect();
        let snapshot = GridSnapshot {
            layouts: crate::model::LayoutSet {
                lg: layout_without_weather,
            },
            ..state.snapshot()
        };
        state = GridState::from_snapshot(snapshot, state.policy);
        state.set_ghost_suggestion(Some(GhostSuggestion::new("WEATHER", "rain")));

        state.materialize_ghost();

        // SYSTEM and HELP both end at row 6.
        assert_eq!(
            state.layout_entry("WEATHER"),
            Some(&LayoutEntry::new("WEATHER", 0, 6, 4, 6))
        );
    }

    #[test]
    fn palette_flag_is_transient() {
        let mut state = GridState::default();
        let effects = reduce_grid(&mut state, GridAction::SetCommandPaletteOpen { open: true });
        assert!(state.command_palette_open);
        assert!(effects.is_empty());
        assert!(!state.snapshot().is_layout_locked);
    }

    #[test]
    fn hydrate_replaces_state_without_persisting() {
        let mut source = GridState::default();
        toggle(&mut source, "SUDOKU");
        let snapshot = source.snapshot();

        let mut state = GridState::default();
        let effects = reduce_grid(&mut state, GridAction::HydrateSnapshot { snapshot });
        assert!(effects.is_empty());
        assert!(state.is_visible("SUDOKU"));
    }

    #[test]
    fn content_actions_persist_only_on_change() {
        let mut state = GridState::default();
        let set = |content: &str| {
            GridAction::Content(ContentAction::SetWeatherLocation {
                location: content.to_string(),
            })
        };
        assert_eq!(reduce_grid(&mut state, set("Oslo")), vec![RuntimeEffect::PersistState]);
        assert!(reduce_grid(&mut state, set("Oslo")).is_empty());
    }

    #[test]
    fn log_is_capped_by_policy() {
        let mut state = GridState::with_policy(GridPolicy {
            log_capacity: 3,
            ..GridPolicy::default()
        });
        for i in 0..5 {
            reduce_grid(
                &mut state,
                GridAction::AppendLog {
                    message: format!("event {i}"),
                },
            );
        }
        assert_eq!(state.logs.len(), 3);
        assert!(state.logs[0].ends_with("event 4"));
        assert!(state.logs[0].starts_with('['));
    }

    #[test]
    fn setting_toggles_flip_flags() {
        let mut state = GridState::default();
        reduce_grid(
            &mut state,
            GridAction::ToggleSetting {
                setting: SettingKey::Sound,
            },
        );
        assert!(!state.settings.sound);
        reduce_grid(&mut state, GridAction::ToggleCompact);
        assert!(state.compact);
        assert_eq!(WidgetKind::from_id("SUDOKU"), Some(WidgetKind::Sudoku));
    }
}
