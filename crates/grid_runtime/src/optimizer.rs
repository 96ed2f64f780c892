//! Auto-organize: request building and result handling around an external layout optimizer.
//!
//! The optimizer itself (a generative model behind some client) is injected through
//! [`LayoutOptimizer`]. This module only owns the contract for what goes in and how the answer is
//! folded back into reducer actions.

use futures::future::LocalBoxFuture;
use leptos::logging;
use serde::Deserialize;
use serde_json::Value;

use crate::{
    model::{GhostSuggestion, GridState, LayoutEntry, WidgetId, WidgetKind},
    reducer::GridAction,
};

/// Row the optimizer merge parks a `GHOST` entry at when the answer does not place one.
pub const GHOST_PARKING_ROW: i32 = 100;

/// Snapshot of what the optimizer gets to see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptimizationRequest {
    pub layout: Vec<LayoutEntry>,
    pub visible: Vec<WidgetId>,
}

impl OptimizationRequest {
    pub fn from_state(state: &GridState) -> Self {
        Self {
            layout: state.layout().to_vec(),
            visible: state.visible_widgets().to_vec(),
        }
    }

    /// Instruction text for a JSON-mode text model.
    pub fn prompt(&self) -> String {
        let visible = self
            .visible
            .iter()
            .map(WidgetId::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        let layout = serde_json::to_string(&self.layout).unwrap_or_else(|_| "[]".to_string());
        let available = WidgetKind::ALL
            .iter()
            .map(|kind| kind.id())
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "Act as a UI/UX expert for bento-box grid layouts.\n\
             Current active widgets: {visible}\n\
             Current layout JSON: {layout}\n\
             1. Reorganize the layout on a 12-column grid so related tools sit together, \
             with no overlaps.\n\
             2. Suggest ONE widget that is not active but would be useful. \
             Available ids: {available}.\n\
             Return JSON: {{\"layout\": \
             [{{\"i\": \"ID\", \"x\": 0, \"y\": 0, \"w\": 4, \"h\": 6}}], \
             \"ghost\": {{\"suggestedWidgetId\": \"ID\", \"reason\": \"why\", \
             \"previewContent\": \"sample\"}}}}.\n\
             Set ghost to null when every widget is active."
        )
    }
}

/// External service that proposes a layout and an optional ghost suggestion.
///
/// Implementations return the model's raw response text.
pub trait LayoutOptimizer {
    fn optimize<'a>(
        &'a self,
        request: &'a OptimizationRequest,
    ) -> LocalBoxFuture<'a, Result<String, String>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptimizationOutcome {
    pub layout: Vec<LayoutEntry>,
    pub ghost: Option<GhostSuggestion>,
}

impl OptimizationOutcome {
    /// The "keep what we have" outcome used when the optimizer fails.
    pub fn unchanged(current_layout: &[LayoutEntry]) -> Self {
        Self {
            layout: current_layout.to_vec(),
            ghost: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawOptimizationResponse {
    #[serde(default)]
    layout: Option<Value>,
    #[serde(default)]
    ghost: Option<Value>,
}

/// Interprets the optimizer's raw JSON answer.
///
/// Malformed JSON keeps the current layout and drops the ghost. A malformed `layout` field alone
/// falls back to the current layout; a malformed `ghost`, or one naming a visible widget or the
/// reserved ghost id, is dropped.
pub fn parse_optimization_response(
    raw: &str,
    current_layout: &[LayoutEntry],
    visible: &[WidgetId],
) -> OptimizationOutcome {
    let response: RawOptimizationResponse = match serde_json::from_str(raw) {
        Ok(response) => response,
        Err(err) => {
            logging::warn!("layout optimizer returned malformed JSON: {err}");
            return OptimizationOutcome::unchanged(current_layout);
        }
    };

    let layout = response
        .layout
        .filter(|value| !value.is_null())
        .and_then(|value| match serde_json::from_value::<Vec<LayoutEntry>>(value) {
            Ok(layout) => Some(layout),
            Err(err) => {
                logging::warn!("layout optimizer returned an unusable layout: {err}");
                None
            }
        })
        .unwrap_or_else(|| current_layout.to_vec());

    let ghost = response
        .ghost
        .filter(|value| !value.is_null())
        .and_then(|value| serde_json::from_value::<GhostSuggestion>(value).ok())
        .filter(|ghost| {
            !ghost.suggested_widget_id.is_ghost() && !visible.contains(&ghost.suggested_widget_id)
        });

    OptimizationOutcome { layout, ghost }
}

/// Reducer actions that apply an optimization outcome: set (or clear) the ghost, then merge.
///
/// When a ghost is suggested and the candidate layout has no ghost entry, one is parked at
/// [`GHOST_PARKING_ROW`]. The merge only moves ids the canonical list already has, so the parked
/// entry is dropped unless the canonical layout carries a `GHOST` entry. Otherwise the preview box
/// renders from [`crate::layout::ghost_placeholder`].
pub fn outcome_actions(outcome: OptimizationOutcome) -> Vec<GridAction> {
    let OptimizationOutcome { mut layout, ghost } = outcome;
    if ghost.is_some() && !layout.iter().any(|entry| entry.id.is_ghost()) {
        layout.push(LayoutEntry::new(WidgetId::ghost(), 0, GHOST_PARKING_ROW, 4, 4));
    }
    vec![
        GridAction::SetGhostSuggestion { ghost },
        GridAction::MergeLayout { entries: layout },
    ]
}

/// Runs the optimizer against `request` and returns the actions to dispatch.
///
/// Optimizer failures are logged and yield the unchanged outcome.
pub async fn auto_organize<O: LayoutOptimizer + ?Sized>(
    optimizer: &O,
    request: &OptimizationRequest,
) -> Vec<GridAction> {
    let outcome = match optimizer.optimize(request).await {
        Ok(raw) => parse_optimization_response(&raw, &request.layout, &request.visible),
        Err(err) => {
            logging::warn!("layout optimizer failed: {err}");
            OptimizationOutcome::unchanged(&request.layout)
        }
    };
    outcome_actions(outcome)
}
