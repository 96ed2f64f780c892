//! Per-widget content slices persisted alongside the grid, and their export/import payloads.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::model::WidgetKind;

/// Maximum number of remembered clipboard entries.
pub const CLIPBOARD_HISTORY_CAPACITY: usize = 20;
pub const DEFAULT_RSS_FEED: &str = "https://news.ycombinator.com/rss";
const DEFAULT_TICKERS: [&str; 5] = ["BTC", "ETH", "SOL", "USDT", "NOK"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Todo,
    Done,
}

impl TaskStatus {
    pub fn toggled(self) -> Self {
        match self {
            Self::Todo => Self::Done,
            Self::Done => Self::Todo,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub text: String,
    pub status: TaskStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub date: String,
    pub title: String,
    pub encrypted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorTab {
    pub id: String,
    pub name: String,
    pub language: String,
    pub content: String,
}

impl EditorTab {
    fn untitled() -> Self {
        Self {
            id: "1".to_string(),
            name: "untitled.tsx".to_string(),
            language: "typescript".to_string(),
            content: "// Start coding...\n".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WidgetContent {
    pub scratchpad_content: String,
    pub tasks: Vec<Task>,
    pub tickers: Vec<String>,
    pub write_pad_content: String,
    pub weather_location: String,
    pub git_token: String,
    pub rss_feeds: Vec<String>,
    pub calendar_events: Vec<CalendarEvent>,
    /// Note id to ciphertext.
    pub encrypted_notes: BTreeMap<String, String>,
    /// Most recent first, no duplicates.
    pub clipboard_history: Vec<String>,
    pub cyber_editor_tabs: Vec<EditorTab>,
    pub cyber_editor_active_tab: String,
}

impl Default for WidgetContent {
    fn default() -> Self {
        Self {
            scratchpad_content: "# Neural Scratchpad\n\nHighlight text here and use the AI tools \
                                 to refine, expand, or translate."
                .to_string(),
            tasks: vec![
                Task {
                    id: "1".to_string(),
                    text: "Define project scope".to_string(),
                    status: TaskStatus::Done,
                },
                Task {
                    id: "2".to_string(),
                    text: "Build widgets".to_string(),
                    status: TaskStatus::Todo,
                },
            ],
            tickers: DEFAULT_TICKERS.iter().map(|t| t.to_string()).collect(),
            write_pad_content: String::new(),
            weather_location: String::new(),
            git_token: String::new(),
            rss_feeds: vec![DEFAULT_RSS_FEED.to_string()],
            calendar_events: Vec::new(),
            encrypted_notes: BTreeMap::new(),
            clipboard_history: Vec::new(),
            cyber_editor_tabs: vec![EditorTab::untitled()],
            cyber_editor_active_tab: "1".to_string(),
        }
    }
}

impl WidgetContent {
    /// Factory-reset values: every slice empty.
    pub fn cleared() -> Self {
        Self {
            scratchpad_content: String::new(),
            tasks: Vec::new(),
            tickers: Vec::new(),
            write_pad_content: String::new(),
            weather_location: String::new(),
            git_token: String::new(),
            rss_feeds: Vec::new(),
            calendar_events: Vec::new(),
            encrypted_notes: BTreeMap::new(),
            clipboard_history: Vec::new(),
            cyber_editor_tabs: Vec::new(),
            cyber_editor_active_tab: String::new(),
        }
    }

    /// Applies a content edit. Returns `true` when anything changed.
    pub fn apply(&mut self, action: ContentAction) -> bool {
        match action {
            ContentAction::SetScratchpad { content } => {
                replace(&mut self.scratchpad_content, content)
            }
            ContentAction::SetWritePad { content } => replace(&mut self.write_pad_content, content),
            ContentAction::SetWeatherLocation { location } => {
                replace(&mut self.weather_location, location)
            }
            ContentAction::SetGitToken { token } => replace(&mut self.git_token, token),
            ContentAction::AddTask { id, text } => {
                self.tasks.push(Task {
                    id,
                    text,
                    status: TaskStatus::Todo,
                });
                true
            }
            ContentAction::ToggleTask { id } => {
                let mut changed = false;
                for task in self.tasks.iter_mut().filter(|task| task.id == id) {
                    task.status = task.status.toggled();
                    changed = true;
                }
                changed
            }
            ContentAction::DeleteTask { id } => {
                let before = self.tasks.len();
                self.tasks.retain(|task| task.id != id);
                self.tasks.len() != before
            }
            ContentAction::SetTasks { tasks } => replace(&mut self.tasks, tasks),
            ContentAction::AddTicker { ticker } => {
                self.tickers.push(ticker);
                true
            }
            ContentAction::RemoveTicker { ticker } => {
                let before = self.tickers.len();
                self.tickers.retain(|t| *t != ticker);
                self.tickers.len() != before
            }
            ContentAction::SetTickers { tickers } => replace(&mut self.tickers, tickers),
            ContentAction::AddRssFeed { url } => {
                self.rss_feeds.push(url);
                true
            }
            ContentAction::RemoveRssFeed { url } => {
                let before = self.rss_feeds.len();
                self.rss_feeds.retain(|feed| *feed != url);
                self.rss_feeds.len() != before
            }
            ContentAction::AddCalendarEvent { event } => {
                self.calendar_events.push(event);
                true
            }
            ContentAction::SaveEncryptedNote { id, ciphertext } => {
                self.encrypted_notes.insert(id, ciphertext.clone()) != Some(ciphertext)
            }
            ContentAction::PushClipboard { text } => {
                if self.clipboard_history.first() == Some(&text) {
                    return false;
                }
                self.clipboard_history.retain(|entry| *entry != text);
                self.clipboard_history.insert(0, text);
                self.clipboard_history.truncate(CLIPBOARD_HISTORY_CAPACITY);
                true
            }
            ContentAction::ClearClipboard => replace(&mut self.clipboard_history, Vec::new()),
            ContentAction::SetEditorTabs { tabs } => replace(&mut self.cyber_editor_tabs, tabs),
            ContentAction::SelectEditorTab { id } => replace(&mut self.cyber_editor_active_tab, id),
        }
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

/// Edits to widget content slices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentAction {
    SetScratchpad { content: String },
    SetWritePad { content: String },
    SetWeatherLocation { location: String },
    SetGitToken { token: String },
    /// Appends a `todo` task. The caller supplies a unique id.
    AddTask { id: String, text: String },
    ToggleTask { id: String },
    DeleteTask { id: String },
    SetTasks { tasks: Vec<Task> },
    AddTicker { ticker: String },
    RemoveTicker { ticker: String },
    SetTickers { tickers: Vec<String> },
    AddRssFeed { url: String },
    RemoveRssFeed { url: String },
    AddCalendarEvent { event: CalendarEvent },
    SaveEncryptedNote { id: String, ciphertext: String },
    /// Moves `text` to the front of the history, dropping older copies and the overflow.
    PushClipboard { text: String },
    ClearClipboard,
    SetEditorTabs { tabs: Vec<EditorTab> },
    SelectEditorTab { id: String },
}

/// File name and JSON body for a widget's standalone export, for widgets that support one.
pub fn export_widget_data(
    kind: WidgetKind,
    content: &WidgetContent,
) -> Option<(&'static str, Value)> {
    let exported = match kind {
        WidgetKind::Scratchpad => (
            "scratchpad.json",
            json!({ "content": content.scratchpad_content }),
        ),
        WidgetKind::FocusHud => ("tasks.json", json!({ "tasks": content.tasks })),
        WidgetKind::Asset => ("assets.json", json!({ "tickers": content.tickers })),
        WidgetKind::Writepad => (
            "document.json",
            json!({ "content": content.write_pad_content }),
        ),
        WidgetKind::Weather => (
            "weather_loc.json",
            json!({ "location": content.weather_location }),
        ),
        _ => return None,
    };
    Some(exported)
}

/// Maps an uploaded per-widget file to the content edit it implies.
///
/// Returns `None` when the widget has no import, or the expected field is missing, empty or of
/// the wrong type.
pub fn import_widget_data(kind: WidgetKind, data: &Value) -> Option<ContentAction> {
    let non_empty_str = |field: &str| {
        data.get(field)
            .and_then(Value::as_str)
            .filter(|text| !text.is_empty())
            .map(str::to_string)
    };

    match kind {
        WidgetKind::Scratchpad => {
            non_empty_str("content").map(|content| ContentAction::SetScratchpad { content })
        }
        WidgetKind::Writepad => {
            non_empty_str("content").map(|content| ContentAction::SetWritePad { content })
        }
        WidgetKind::Weather => {
            non_empty_str("location").map(|location| ContentAction::SetWeatherLocation { location })
        }
        WidgetKind::FocusHud => {
            let tasks = serde_json::from_value(data.get("tasks")?.clone()).ok()?;
            Some(ContentAction::SetTasks { tasks })
        }
        WidgetKind::Asset => {
            let tickers = serde_json::from_value(data.get("tickers")?.clone()).ok()?;
            Some(ContentAction::SetTickers { tickers })
        }
        _ => None,
    }
}
