//! Layout-list helpers used by the grid reducer and the renderer glue.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::{GridState, LayoutEntry, WidgetId, WidgetKind, GHOST_LAYOUT_ID};

/// Number of grid columns at the large breakpoint.
pub const GRID_COLUMNS: i32 = 12;
/// Row height in px.
pub const GRID_ROW_HEIGHT_PX: i32 = 30;
/// Horizontal and vertical gap between cells in px.
pub const GRID_MARGIN_PX: i32 = 16;
pub const GHOST_PLACEHOLDER_WIDTH: i32 = 4;
pub const GHOST_PLACEHOLDER_HEIGHT: i32 = 4;

/// Overlays `updates` onto the canonical list.
///
/// Entries keep their canonical order; ids missing from the canonical list are ignored and a
/// repeated id in `updates` resolves to its last occurrence. Returns `true` when any entry changed.
pub fn merge_layout(layout: &mut [LayoutEntry], updates: &[LayoutEntry]) -> bool {
    if updates.is_empty() {
        return false;
    }

    let lookup: HashMap<&WidgetId, &LayoutEntry> =
        updates.iter().map(|entry| (&entry.id, entry)).collect();

    let mut changed = false;
    for entry in layout.iter_mut() {
        if let Some(update) = lookup.get(&entry.id) {
            if *entry != **update {
                *entry = (*update).clone();
                changed = true;
            }
        }
    }
    changed
}

/// Appends an entry for `widget_id` built by `placement` unless one already exists.
///
/// Returns `true` when an entry was created.
pub fn ensure_layout_entry(
    layout: &mut Vec<LayoutEntry>,
    widget_id: &WidgetId,
    placement: impl FnOnce() -> LayoutEntry,
) -> bool {
    if layout.iter().any(|entry| &entry.id == widget_id) {
        return false;
    }
    let mut entry = placement();
    entry.id = widget_id.clone();
    layout.push(entry);
    true
}

/// Drops every entry whose id already appeared earlier in the list.
pub fn dedupe_layout(layout: Vec<LayoutEntry>) -> Vec<LayoutEntry> {
    let mut out: Vec<LayoutEntry> = Vec::with_capacity(layout.len());
    for entry in layout {
        if !out.iter().any(|kept| kept.id == entry.id) {
            out.push(entry);
        }
    }
    out
}

/// Where the ghost preview box renders: the canonical `GHOST` entry when present, otherwise
/// appended below every visible widget.
pub fn ghost_placeholder(state: &GridState) -> LayoutEntry {
    if let Some(entry) = state.layout_entry(GHOST_LAYOUT_ID) {
        return entry.clone();
    }

    let bottom = state
        .layout()
        .iter()
        .filter(|entry| state.is_visible(entry.id.as_str()))
        .map(|entry| entry.rect().bottom())
        .max()
        .unwrap_or(0);
    LayoutEntry::new(
        WidgetId::ghost(),
        0,
        bottom,
        GHOST_PLACEHOLDER_WIDTH,
        GHOST_PLACEHOLDER_HEIGHT,
    )
}

/// Entries handed to the renderer: visible widgets in canonical order, plus the ghost preview
/// when a suggestion is held.
pub fn active_layout(state: &GridState) -> Vec<LayoutEntry> {
    let mut out: Vec<LayoutEntry> = state
        .layout()
        .iter()
        .filter(|entry| !entry.id.is_ghost() && state.is_visible(entry.id.as_str()))
        .cloned()
        .collect();

    if state.ghost().is_some() {
        out.push(ghost_placeholder(state));
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridCell {
    Widget(WidgetKind),
    Ghost,
    /// Renders as an "unknown widget" placeholder; never fails the grid.
    Unknown(WidgetId),
}

pub fn resolve_cell(widget_id: &WidgetId) -> GridCell {
    if widget_id.is_ghost() {
        return GridCell::Ghost;
    }
    match widget_id.kind() {
        Some(kind) => GridCell::Widget(kind),
        None => GridCell::Unknown(widget_id.clone()),
    }
}

/// A layout item as the drag/resize renderer reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLayoutItem {
    pub i: String,
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_w: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_h: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_w: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_h: Option<i32>,
    #[serde(default)]
    pub moved: bool,
    #[serde(default, rename = "static")]
    pub is_static: bool,
}

/// Strips renderer-only fields from a layout-change event.
pub fn clean_layout_change(raw: &[RawLayoutItem]) -> Vec<LayoutEntry> {
    raw.iter()
        .map(|item| LayoutEntry::new(item.i.as_str(), item.x, item.y, item.w, item.h))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CompactType {
    Vertical,
}

/// Renderer properties derived from the grid flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridRenderConfig {
    pub cols: i32,
    pub row_height: i32,
    pub margin: [i32; 2],
    pub is_draggable: bool,
    pub is_resizable: bool,
    pub compact_type: Option<CompactType>,
}

impl GridRenderConfig {
    pub fn from_settings(layout_locked: bool, compact: bool) -> Self {
        Self {
            cols: GRID_COLUMNS,
            row_height: GRID_ROW_HEIGHT_PX,
            margin: [GRID_MARGIN_PX, GRID_MARGIN_PX],
            is_draggable: !layout_locked,
            is_resizable: !layout_locked,
            compact_type: compact.then_some(CompactType::Vertical),
        }
    }

    pub fn for_state(state: &GridState) -> Self {
        Self::from_settings(state.layout_locked, state.compact)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::{GhostSuggestion, GridPolicy, GridSnapshot, LayoutSet};

    fn state_with(layout: Vec<LayoutEntry>, visible: &[&str]) -> GridState {
        let snapshot = GridSnapshot {
            layouts: LayoutSet { lg: layout },
            visible_widgets: visible.iter().map(|id| WidgetId::from(*id)).collect(),
            ..GridSnapshot::default()
        };
        GridState::from_snapshot(snapshot, GridPolicy::default())
    }

    #[test]
    fn merge_replaces_in_place_and_ignores_strangers() {
        let mut layout = vec![
            LayoutEntry::new("A", 0, 0, 4, 6),
            LayoutEntry::new("B", 4, 0, 4, 6),
        ];
        let changed = merge_layout(
            &mut layout,
            &[
                LayoutEntry::new("B", 0, 6, 4, 6),
                LayoutEntry::new("C", 8, 0, 4, 6),
            ],
        );

        assert!(changed);
        assert_eq!(
            layout,
            vec![
                LayoutEntry::new("A", 0, 0, 4, 6),
                LayoutEntry::new("B", 0, 6, 4, 6),
            ]
        );
    }

    #[test]
    fn merge_uses_last_duplicate_and_reports_no_op() {
        let mut layout = vec![LayoutEntry::new("A", 0, 0, 4, 6)];
        merge_layout(
            &mut layout,
            &[
                LayoutEntry::new("A", 1, 1, 4, 6),
                LayoutEntry::new("A", 2, 2, 4, 6),
            ],
        );
        assert_eq!(layout, vec![LayoutEntry::new("A", 2, 2, 4, 6)]);

        assert!(!merge_layout(&mut layout, &[LayoutEntry::new("A", 2, 2, 4, 6)]));
        assert!(!merge_layout(&mut layout, &[]));
    }

    #[test]
    fn ensure_entry_never_duplicates() {
        let mut layout = vec![LayoutEntry::new("CALC", 1, 1, 3, 8)];
        let id = WidgetId::from("CALC");
        assert!(!ensure_layout_entry(&mut layout, &id, || LayoutEntry::fallback("CALC")));
        assert!(ensure_layout_entry(
            &mut layout,
            &WidgetId::from("X"),
            || LayoutEntry::fallback("ignored")
        ));
        assert_eq!(layout[1], LayoutEntry::new("X", 0, 0, 4, 6));
    }

    #[test]
    fn dedupe_keeps_first_occurrence() {
        let deduped = dedupe_layout(vec![
            LayoutEntry::new("A", 0, 0, 1, 1),
            LayoutEntry::new("B", 0, 0, 1, 1),
            LayoutEntry::new("A", 5, 5, 1, 1),
        ]);
        assert_eq!(
            deduped,
            vec![
                LayoutEntry::new("A", 0, 0, 1, 1),
                LayoutEntry::new("B", 0, 0, 1, 1),
            ]
        );
    }

    #[test]
    fn active_layout_filters_hidden_and_appends_ghost_at_bottom() {
        let mut state = state_with(
            vec![
                LayoutEntry::new("SYSTEM", 0, 0, 4, 6),
                LayoutEntry::new("HELP", 4, 0, 4, 6),
                LayoutEntry::new("CALC", 0, 20, 3, 8),
            ],
            &["HELP", "SYSTEM"],
        );
        assert_eq!(
            active_layout(&state),
            vec![
                LayoutEntry::new("SYSTEM", 0, 0, 4, 6),
                LayoutEntry::new("HELP", 4, 0, 4, 6),
            ]
        );

        state.ghost = Some(GhostSuggestion::new("WEATHER", "rain later"));
        let active = active_layout(&state);
        assert_eq!(active.len(), 3);
        assert_eq!(active[2], LayoutEntry::new("GHOST", 0, 6, 4, 4));
    }

    #[test]
    fn canonical_ghost_entry_wins_over_bottom_placement() {
        let mut state = state_with(
            vec![
                LayoutEntry::new("SYSTEM", 0, 0, 4, 6),
                LayoutEntry::new("GHOST", 8, 2, 4, 4),
            ],
            &["SYSTEM"],
        );
        assert_eq!(active_layout(&state).len(), 1);

        state.ghost = Some(GhostSuggestion::new("CALC", "numbers"));
        assert_eq!(
            active_layout(&state),
            vec![
                LayoutEntry::new("SYSTEM", 0, 0, 4, 6),
                LayoutEntry::new("GHOST", 8, 2, 4, 4),
            ]
        );
    }

    #[test]
    fn cells_resolve_known_ghost_and_unknown_ids() {
        assert_eq!(
            resolve_cell(&WidgetId::from("SUDOKU")),
            GridCell::Widget(WidgetKind::Sudoku)
        );
        assert_eq!(resolve_cell(&WidgetId::ghost()), GridCell::Ghost);
        assert_eq!(
            resolve_cell(&WidgetId::from("LEGACY_WIDGET")),
            GridCell::Unknown(WidgetId::from("LEGACY_WIDGET"))
        );
    }

    #[test]
    fn raw_renderer_items_are_cleaned() {
        let raw: Vec<RawLayoutItem> = serde_json::from_str(
            r#"[{"i":"CALC","x":1,"y":2,"w":3,"h":8,"minW":2,"moved":false,"static":false}]"#,
        )
        .expect("decode raw");
        assert_eq!(
            clean_layout_change(&raw),
            vec![LayoutEntry::new("CALC", 1, 2, 3, 8)]
        );
    }

    #[test]
    fn render_config_follows_lock_and_compact_flags() {
        let config = GridRenderConfig::from_settings(true, true);
        assert_eq!(config.cols, 12);
        assert_eq!(config.row_height, 30);
        assert!(!config.is_draggable);
        assert!(!config.is_resizable);
        assert_eq!(config.compact_type, Some(CompactType::Vertical));

        let open = GridRenderConfig::from_settings(false, false);
        assert!(open.is_draggable);
        assert_eq!(open.compact_type, None);
    }
}
