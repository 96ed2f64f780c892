//! Command palette intents classified by an external language model.

use serde::Deserialize;
use serde_json::Value;

use crate::{
    model::{WidgetId, WidgetKind},
    reducer::GridAction,
};

/// A classified palette command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteCommand {
    ToggleWidget(WidgetId),
    ResetSystem,
    LockLayout,
    Unknown,
}

#[derive(Debug, Deserialize)]
struct RawIntent {
    #[serde(default)]
    action: Option<String>,
    #[serde(default)]
    payload: Option<Value>,
}

/// Maps the classifier's `{ "action": …, "payload": … }` answer to a command.
///
/// Anything unparseable, or a toggle without a widget id, is [`PaletteCommand::Unknown`].
pub fn parse_palette_response(raw: &str) -> PaletteCommand {
    let Ok(intent) = serde_json::from_str::<RawIntent>(raw) else {
        return PaletteCommand::Unknown;
    };

    match intent.action.as_deref() {
        Some("TOGGLE_WIDGET") => match intent.payload {
            Some(Value::String(id)) if !id.trim().is_empty() => {
                PaletteCommand::ToggleWidget(WidgetId::new(id.trim()))
            }
            _ => PaletteCommand::Unknown,
        },
        Some("RESET_SYSTEM") => PaletteCommand::ResetSystem,
        Some("LOCK_LAYOUT") => PaletteCommand::LockLayout,
        _ => PaletteCommand::Unknown,
    }
}

impl PaletteCommand {
    /// Destructive commands the UI must confirm before dispatching.
    pub fn requires_confirmation(&self) -> bool {
        matches!(self, Self::ResetSystem)
    }

    /// Reducer actions for this command. Recognized commands also close the palette; unknown
    /// commands yield nothing so the palette stays open for another try.
    pub fn into_actions(self) -> Vec<GridAction> {
        let action = match self {
            Self::ToggleWidget(widget_id) => GridAction::ToggleWidget { widget_id },
            Self::ResetSystem => GridAction::ResetAll,
            Self::LockLayout => GridAction::ToggleLayoutLock,
            Self::Unknown => return Vec::new(),
        };
        vec![action, GridAction::SetCommandPaletteOpen { open: false }]
    }
}

/// Instruction text for the intent classifier.
pub fn classifier_prompt(input: &str) -> String {
    let ids = WidgetKind::ALL
        .iter()
        .map(|kind| kind.id())
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "You are an OS command processor. User input: \"{input}\"\n\
         Available actions:\n\
         - TOGGLE_WIDGET(id): open or close a widget. Ids: {ids}.\n\
         - RESET_SYSTEM: factory reset.\n\
         - LOCK_LAYOUT: toggle layout lock.\n\
         - UNKNOWN: if not clear.\n\
         Return JSON only: {{ \"action\": \"ACTION_NAME\", \"payload\": \"ID_OR_NULL\" }}"
    )
}
