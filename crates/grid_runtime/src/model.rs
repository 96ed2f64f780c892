use std::fmt;

use serde::{Deserialize, Serialize};

use crate::content::WidgetContent;

pub const GRID_STATE_SCHEMA_VERSION: u32 = 1;
/// Reserved layout id for the not-yet-real ghost preview box.
pub const GHOST_LAYOUT_ID: &str = "GHOST";
pub const FALLBACK_ENTRY_WIDTH: i32 = 4;
pub const FALLBACK_ENTRY_HEIGHT: i32 = 6;
pub const DEFAULT_LOG_CAPACITY: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WidgetId(String);

impl WidgetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn ghost() -> Self {
        Self(GHOST_LAYOUT_ID.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn kind(&self) -> Option<WidgetKind> {
        WidgetKind::from_id(&self.0)
    }

    pub fn is_ghost(&self) -> bool {
        self.0 == GHOST_LAYOUT_ID
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WidgetId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for WidgetId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<WidgetKind> for WidgetId {
    fn from(kind: WidgetKind) -> Self {
        Self::new(kind.id())
    }
}

impl PartialEq<str> for WidgetId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for WidgetId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WidgetKind {
    System,
    Help,
    Transformer,
    Scratchpad,
    FocusHud,
    DevOptic,
    CipherVault,
    ChromaLab,
    Temporal,
    Sonic,
    Calc,
    Asset,
    Polyglot,
    Writepad,
    Weather,
    Valuta,
    Architect,
    ThemeEngine,
    Radio,
    Sudoku,
    DocuHub,
    GitPulse,
    ProjectTracker,
    WebTerminal,
    CyberEditor,
    NewsFeed,
    CipherPad,
    PdfViewer,
    ResearchBrowser,
    SecureCalendar,
    MacroNet,
    ChainPulse,
    RegRadar,
    Market,
    Strategic,
    Clipboard,
    PromptLab,
}

impl WidgetKind {
    pub const ALL: [WidgetKind; 37] = [
        Self::System,
        Self::Help,
        Self::Transformer,
        Self::Scratchpad,
        Self::FocusHud,
        Self::DevOptic,
        Self::CipherVault,
        Self::ChromaLab,
        Self::Temporal,
        Self::Sonic,
        Self::Calc,
        Self::Asset,
        Self::Polyglot,
        Self::Writepad,
        Self::Weather,
        Self::Valuta,
        Self::Architect,
        Self::ThemeEngine,
        Self::Radio,
        Self::Sudoku,
        Self::DocuHub,
        Self::GitPulse,
        Self::ProjectTracker,
        Self::WebTerminal,
        Self::CyberEditor,
        Self::NewsFeed,
        Self::CipherPad,
        Self::PdfViewer,
        Self::ResearchBrowser,
        Self::SecureCalendar,
        Self::MacroNet,
        Self::ChainPulse,
        Self::RegRadar,
        Self::Market,
        Self::Strategic,
        Self::Clipboard,
        Self::PromptLab,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Self::System => "SYSTEM",
            Self::Help => "HELP",
            Self::Transformer => "TRANSFORMER",
            Self::Scratchpad => "SCRATCHPAD",
            Self::FocusHud => "FOCUS_HUD",
            Self::DevOptic => "DEV_OPTIC",
            Self::CipherVault => "CIPHER_VAULT",
            Self::ChromaLab => "CHROMA_LAB",
            Self::Temporal => "TEMPORAL",
            Self::Sonic => "SONIC",
            Self::Calc => "CALC",
            Self::Asset => "ASSET",
            Self::Polyglot => "POLYGLOT",
            Self::Writepad => "WRITEPAD",
            Self::Weather => "WEATHER",
            Self::Valuta => "VALUTA",
            Self::Architect => "ARCHITECT",
            Self::ThemeEngine => "THEME_ENGINE",
            Self::Radio => "RADIO",
            Self::Sudoku => "SUDOKU",
            Self::DocuHub => "DOCU_HUB",
            Self::GitPulse => "GIT_PULSE",
            Self::ProjectTracker => "PROJECT_TRACKER",
            Self::WebTerminal => "WEB_TERMINAL",
            Self::CyberEditor => "CYBER_EDITOR",
            Self::NewsFeed => "NEWS_FEED",
            Self::CipherPad => "CIPHER_PAD",
            Self::PdfViewer => "PDF_VIEWER",
            Self::ResearchBrowser => "RESEARCH_BROWSER",
            Self::SecureCalendar => "SECURE_CALENDAR",
            Self::MacroNet => "MACRO_NET",
            Self::ChainPulse => "CHAIN_PULSE",
            Self::RegRadar => "REG_RADAR",
            Self::Market => "MARKET",
            Self::Strategic => "STRATEGIC",
            Self::Clipboard => "CLIPBOARD",
            Self::PromptLab => "PROMPT_LAB",
        }
    }

    pub fn from_id(raw: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.id() == raw)
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::System => "System Core",
            Self::Help => "Help Desk",
            Self::Transformer => "Transformer",
            Self::Scratchpad => "Neural Scratchpad",
            Self::FocusHud => "Focus HUD",
            Self::DevOptic => "Dev Optic",
            Self::CipherVault => "Cipher Vault",
            Self::ChromaLab => "Chroma Lab",
            Self::Temporal => "Temporal Nexus",
            Self::Sonic => "Sonic Architecture",
            Self::Calc => "Quantum Calc",
            Self::Asset => "Asset Command",
            Self::Polyglot => "Polyglot Box",
            Self::Writepad => "WritePad",
            Self::Weather => "Weather",
            Self::Valuta => "Valuta",
            Self::Architect => "Widget Architect",
            Self::ThemeEngine => "Aesthetic Engine",
            Self::Radio => "Signal Radio",
            Self::Sudoku => "Sudoku",
            Self::DocuHub => "DocuHub",
            Self::GitPulse => "Git Pulse",
            Self::ProjectTracker => "Project Tracker",
            Self::WebTerminal => "Web Terminal",
            Self::CyberEditor => "Cyber Editor",
            Self::NewsFeed => "News Feed",
            Self::CipherPad => "Cipher Pad",
            Self::PdfViewer => "PDF Viewer",
            Self::ResearchBrowser => "Research Browser",
            Self::SecureCalendar => "Secure Calendar",
            Self::MacroNet => "Macro Net",
            Self::ChainPulse => "Chain Pulse",
            Self::RegRadar => "Reg Radar",
            Self::Market => "Market Feed",
            Self::Strategic => "Strategic Blueprint",
            Self::Clipboard => "Memory Buffer",
            Self::PromptLab => "Prompt Lab",
        }
    }

    pub fn icon_id(self) -> &'static str {
        match self {
            Self::System | Self::WebTerminal => "terminal",
            Self::Help => "help-circle",
            Self::Transformer => "file-json",
            Self::Scratchpad => "brain-circuit",
            Self::FocusHud | Self::ChainPulse | Self::Market => "activity",
            Self::DevOptic => "code-2",
            Self::CipherVault | Self::CipherPad => "lock",
            Self::ChromaLab => "palette",
            Self::Temporal => "clock",
            Self::Sonic => "music",
            Self::Calc => "calculator",
            Self::Asset => "trending-up",
            Self::Polyglot => "languages",
            Self::Writepad | Self::Architect => "pen-tool",
            Self::Weather => "cloud",
            Self::Valuta => "dollar-sign",
            Self::ThemeEngine => "wand-2",
            Self::Radio => "radio",
            Self::Sudoku => "grid",
            Self::DocuHub => "book",
            Self::GitPulse => "git-pull-request",
            Self::ProjectTracker => "layout",
            Self::CyberEditor => "file-code",
            Self::NewsFeed => "rss",
            Self::PdfViewer => "file-text",
            Self::ResearchBrowser | Self::MacroNet => "globe",
            Self::SecureCalendar => "calendar",
            Self::RegRadar => "scale",
            Self::Strategic => "briefcase",
            Self::Clipboard => "clipboard",
            Self::PromptLab => "sparkles",
        }
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl GridRect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Row just past the bottom edge.
    pub fn bottom(self) -> i32 {
        self.y.saturating_add(self.h)
    }
}

/// One widget's placement on the grid, in grid units.
///
/// Serialized with the renderer's `i` key so stored blobs and backups keep the browser store's
/// shape. `id` is accepted on input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutEntry {
    #[serde(rename = "i", alias = "id")]
    pub id: WidgetId,
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl LayoutEntry {
    pub fn new(id: impl Into<WidgetId>, x: i32, y: i32, w: i32, h: i32) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            w,
            h,
        }
    }

    pub fn at(id: impl Into<WidgetId>, rect: GridRect) -> Self {
        Self::new(id, rect.x, rect.y, rect.w, rect.h)
    }

    /// Placement for ids the registry does not know.
    pub fn fallback(id: impl Into<WidgetId>) -> Self {
        Self::new(id, 0, 0, FALLBACK_ENTRY_WIDTH, FALLBACK_ENTRY_HEIGHT)
    }

    pub fn rect(&self) -> GridRect {
        GridRect::new(self.x, self.y, self.w, self.h)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GhostSuggestion {
    pub suggested_widget_id: WidgetId,
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_content: Option<String>,
}

impl GhostSuggestion {
    pub fn new(suggested_widget_id: impl Into<WidgetId>, reason: impl Into<String>) -> Self {
        Self {
            suggested_widget_id: suggested_widget_id.into(),
            reason: reason.into(),
            preview_content: None,
        }
    }

    pub fn with_preview(mut self, preview: impl Into<String>) -> Self {
        self.preview_content = Some(preview.into());
        self
    }
}

/// Where a materialized ghost widget lands when it has no remembered position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GhostPlacement {
    /// Registry default position; the ghost preview's position is discarded.
    #[default]
    RegistryDefault,
    /// The ghost preview's on-screen origin, keeping the widget's default size.
    PreviewPosition,
}

/// Runtime policy knobs carried by the state but never persisted with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridPolicy {
    pub log_capacity: usize,
    pub ghost_placement: GhostPlacement,
}

impl Default for GridPolicy {
    fn default() -> Self {
        Self {
            log_capacity: DEFAULT_LOG_CAPACITY,
            ghost_placement: GhostPlacement::RegistryDefault,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSettings {
    pub scanlines: bool,
    pub sound: bool,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            scanlines: true,
            sound: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingKey {
    Scanlines,
    Sound,
}

impl GridSettings {
    pub fn toggle(&mut self, key: SettingKey) {
        match key {
            SettingKey::Scanlines => self.scanlines = !self.scanlines,
            SettingKey::Sound => self.sound = !self.sound,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeColors {
    pub background: String,
    pub surface: String,
    pub primary: String,
    pub secondary: String,
    pub text: String,
    pub accent: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridTheme {
    pub name: String,
    pub colors: ThemeColors,
    pub font: String,
    pub radius: String,
}

impl Default for GridTheme {
    fn default() -> Self {
        Self {
            name: "Midnight Cyberpunk".to_string(),
            colors: ThemeColors {
                background: "#020617".to_string(),
                surface: "#0f172a".to_string(),
                primary: "#06b6d4".to_string(),
                secondary: "#d946ef".to_string(),
                text: "#e2e8f0".to_string(),
                accent: "#10b981".to_string(),
            },
            font: "Share Tech Mono".to_string(),
            radius: "0.5rem".to_string(),
        }
    }
}

/// Layout lists keyed by breakpoint. Only the large breakpoint is used.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LayoutSet {
    #[serde(default)]
    pub lg: Vec<LayoutEntry>,
}

pub fn default_visible_widgets() -> Vec<WidgetId> {
    [
        WidgetKind::System,
        WidgetKind::Help,
        WidgetKind::Scratchpad,
        WidgetKind::Transformer,
        WidgetKind::Asset,
        WidgetKind::Strategic,
    ]
    .into_iter()
    .map(WidgetId::from)
    .collect()
}

pub fn reset_visible_widgets() -> Vec<WidgetId> {
    vec![WidgetKind::System.into(), WidgetKind::Help.into()]
}

fn boot_logs() -> Vec<String> {
    vec![
        "Omni-Grid System initialized...".to_string(),
        "Secure connection established.".to_string(),
    ]
}

/// Registry default entry for `widget_id`, or the fallback for ids the registry does not know.
fn default_placement(widget_id: &WidgetId) -> LayoutEntry {
    crate::registry::default_entry_for(widget_id)
        .unwrap_or_else(|| LayoutEntry::fallback(widget_id.clone()))
}

/// Canonical grid state. The layout list, visible set and ghost are only mutated through the
/// store operations below so the one-entry-per-id and stable-order invariants hold.
#[derive(Debug, Clone, PartialEq)]
pub struct GridState {
    pub(crate) layout: Vec<LayoutEntry>,
    pub(crate) visible: Vec<WidgetId>,
    pub(crate) ghost: Option<GhostSuggestion>,
    pub layout_locked: bool,
    pub compact: bool,
    pub command_palette_open: bool,
    pub settings: GridSettings,
    pub theme: GridTheme,
    pub logs: Vec<String>,
    pub content: WidgetContent,
    pub policy: GridPolicy,
}

impl Default for GridState {
    fn default() -> Self {
        Self {
            layout: crate::registry::default_layout(),
            visible: default_visible_widgets(),
            ghost: None,
            layout_locked: false,
            compact: false,
            command_palette_open: false,
            settings: GridSettings::default(),
            theme: GridTheme::default(),
            logs: boot_logs(),
            content: WidgetContent::default(),
            policy: GridPolicy::default(),
        }
    }
}

impl GridState {
    pub fn with_policy(policy: GridPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn layout(&self) -> &[LayoutEntry] {
        &self.layout
    }

    pub fn visible_widgets(&self) -> &[WidgetId] {
        &self.visible
    }

    pub fn ghost(&self) -> Option<&GhostSuggestion> {
        self.ghost.as_ref()
    }

    pub fn is_visible(&self, widget_id: &str) -> bool {
        self.visible.iter().any(|id| id == widget_id)
    }

    pub fn layout_entry(&self, widget_id: &str) -> Option<&LayoutEntry> {
        self.layout.iter().find(|entry| entry.id == widget_id)
    }

    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot {
            layouts: LayoutSet {
                lg: self.layout.clone(),
            },
            visible_widgets: self.visible.clone(),
            ghost_widget: self.ghost.clone(),
            is_layout_locked: self.layout_locked,
            is_compact: self.compact,
            settings: self.settings,
            theme: self.theme.clone(),
            logs: self.logs.clone(),
            content: self.content.clone(),
        }
    }

    /// Rebuilds state from a persisted snapshot, keeping the current runtime policy.
    ///
    /// Duplicate layout ids in the snapshot collapse to their first occurrence and duplicate
    /// visible ids to one. A visible id with no layout entry gets its default placement, as if
    /// it had just been shown.
    pub fn from_snapshot(snapshot: GridSnapshot, policy: GridPolicy) -> Self {
        let mut layout = crate::layout::dedupe_layout(snapshot.layouts.lg);
        let mut visible: Vec<WidgetId> = Vec::with_capacity(snapshot.visible_widgets.len());
        for id in snapshot.visible_widgets {
            if !visible.contains(&id) {
                crate::layout::ensure_layout_entry(&mut layout, &id, || default_placement(&id));
                visible.push(id);
            }
        }

        Self {
            layout,
            visible,
            ghost: snapshot.ghost_widget,
            layout_locked: snapshot.is_layout_locked,
            compact: snapshot.is_compact,
            command_palette_open: false,
            settings: snapshot.settings,
            theme: snapshot.theme,
            logs: snapshot.logs,
            content: snapshot.content,
            policy,
        }
    }

    /// Hides a visible widget or shows a hidden one. Returns `true` when the widget is now visible.
    ///
    /// Hiding keeps the layout entry so the widget reappears where it was.
    pub fn toggle_visibility(&mut self, widget_id: &WidgetId) -> bool {
        if self.is_visible(widget_id.as_str()) {
            self.visible.retain(|id| id != widget_id);
            self.push_log(format!("Terminated widget: {widget_id}"));
            false
        } else {
            self.show_widget(widget_id, None);
            true
        }
    }

    /// Makes `widget_id` visible, creating its layout entry on first show.
    ///
    /// `preview` is the origin to use instead of the registry default when no entry exists yet.
    fn show_widget(&mut self, widget_id: &WidgetId, preview: Option<GridRect>) {
        crate::layout::ensure_layout_entry(&mut self.layout, widget_id, || {
            let mut entry = default_placement(widget_id);
            if let Some(origin) = preview {
                entry.x = origin.x;
                entry.y = origin.y;
            }
            entry
        });
        self.visible.push(widget_id.clone());
        self.push_log(format!("Initialized widget: {widget_id}"));
    }

    /// Overlays renderer-reported positions. Returns `true` when any entry changed.
    pub fn merge_layout(&mut self, updates: &[LayoutEntry]) -> bool {
        crate::layout::merge_layout(&mut self.layout, updates)
    }

    /// Factory reset of layout, visibility, ghost, flags, theme and widget content.
    ///
    /// The activity log and display settings survive.
    pub fn reset_all(&mut self) {
        self.layout = crate::registry::default_layout();
        self.visible = reset_visible_widgets();
        self.ghost = None;
        self.layout_locked = false;
        self.compact = false;
        self.theme = GridTheme::default();
        self.content = WidgetContent::cleared();
    }

    pub fn set_ghost_suggestion(&mut self, ghost: Option<GhostSuggestion>) {
        self.ghost = ghost;
    }

    /// Turns the held suggestion into a real visible widget and clears it.
    ///
    /// Returns the materialized id, or `None` when no suggestion was held. A suggestion for an
    /// already visible widget is consumed without hiding it.
    pub fn materialize_ghost(&mut self) -> Option<WidgetId> {
        let ghost = self.ghost.take()?;
        let widget_id = ghost.suggested_widget_id;
        if !self.is_visible(widget_id.as_str()) {
            let preview = match self.policy.ghost_placement {
                GhostPlacement::RegistryDefault => None,
                GhostPlacement::PreviewPosition => {
                    Some(crate::layout::ghost_placeholder(self).rect())
                }
            };
            self.show_widget(&widget_id, preview);
        }
        Some(widget_id)
    }

    /// Prepends a `[HH:MM:SS] message` line and drops lines past the log capacity.
    pub fn push_log(&mut self, message: impl AsRef<str>) {
        let stamp = platform_host::clock_label_from_unix_ms(platform_host::unix_time_ms_now());
        self.logs.insert(0, format!("[{stamp}] {}", message.as_ref()));
        self.logs.truncate(self.policy.log_capacity);
    }
}

/// The persisted shape of [`GridState`] (everything except transient UI flags and policy).
///
/// Field names follow the browser store's camelCase keys so backups stay interchangeable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridSnapshot {
    pub layouts: LayoutSet,
    pub visible_widgets: Vec<WidgetId>,
    pub ghost_widget: Option<GhostSuggestion>,
    pub is_layout_locked: bool,
    pub is_compact: bool,
    pub settings: GridSettings,
    pub theme: GridTheme,
    pub logs: Vec<String>,
    #[serde(flatten)]
    pub content: WidgetContent,
}

impl Default for GridSnapshot {
    fn default() -> Self {
        GridState::default().snapshot()
    }
}
