//! Static catalog of every widget kind: default placement, minimum size and launcher metadata.

use crate::model::{GridRect, LayoutEntry, WidgetId, WidgetKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetCategory {
    Core,
    Productivity,
    Developer,
    Utilities,
    Creative,
    Research,
    Finance,
}

impl WidgetCategory {
    pub fn label(self) -> &'static str {
        match self {
            Self::Core => "Core",
            Self::Productivity => "Productivity",
            Self::Developer => "Developer",
            Self::Utilities => "Utilities",
            Self::Creative => "Creative",
            Self::Research => "Research",
            Self::Finance => "Finance",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidgetDescriptor {
    pub kind: WidgetKind,
    pub launcher_label: &'static str,
    pub category: WidgetCategory,
    pub default_rect: GridRect,
    pub min_w: i32,
    pub min_h: i32,
    /// Tailwind color family used for the launcher tile.
    pub accent: &'static str,
    pub show_in_launcher: bool,
}

impl WidgetDescriptor {
    pub fn title(&self) -> &'static str {
        self.kind.title()
    }

    pub fn default_entry(&self) -> LayoutEntry {
        LayoutEntry::at(self.kind, self.default_rect)
    }
}

const fn widget(
    kind: WidgetKind,
    launcher_label: &'static str,
    category: WidgetCategory,
    (x, y, w, h): (i32, i32, i32, i32),
    min: (i32, i32),
    accent: &'static str,
) -> WidgetDescriptor {
    WidgetDescriptor {
        kind,
        launcher_label,
        category,
        default_rect: GridRect::new(x, y, w, h),
        min_w: min.0,
        min_h: min.1,
        accent,
        show_in_launcher: true,
    }
}

const SMALL: (i32, i32) = (2, 2);
const PANEL: (i32, i32) = (3, 4);
const WIDE: (i32, i32) = (4, 6);

// Entries are listed in `WidgetKind::ALL` order; `descriptor` indexes by discriminant.
const WIDGET_REGISTRY: [WidgetDescriptor; 37] = {
    use WidgetCategory::*;
    use WidgetKind as K;
    [
        widget(K::System, "System Core", Core, (0, 0, 4, 6), SMALL, "red"),
        widget(K::Help, "Help Desk", Core, (4, 0, 4, 6), SMALL, "emerald"),
        widget(K::Transformer, "Transformer", Developer, (8, 0, 4, 8), PANEL, "indigo"),
        widget(K::Scratchpad, "Neural Notes", Productivity, (0, 6, 4, 8), PANEL, "fuchsia"),
        widget(K::FocusHud, "Focus HUD", Productivity, (4, 6, 4, 6), SMALL, "cyan"),
        widget(K::DevOptic, "Dev Optic", Developer, (8, 8, 4, 6), SMALL, "orange"),
        widget(K::CipherVault, "Cipher Vault", Utilities, (0, 14, 4, 6), SMALL, "emerald"),
        widget(K::ChromaLab, "Chroma Lab", Creative, (4, 12, 4, 6), SMALL, "pink"),
        widget(K::Temporal, "Temporal", Utilities, (8, 14, 4, 6), SMALL, "blue"),
        widget(K::Sonic, "Sonic Arch", Creative, (0, 20, 6, 8), PANEL, "purple"),
        widget(K::Calc, "Quantum Calc", Utilities, (6, 20, 3, 8), PANEL, "teal"),
        widget(K::Asset, "Asset Cmd", Finance, (9, 20, 3, 8), PANEL, "emerald"),
        widget(K::Polyglot, "Polyglot", Utilities, (0, 28, 6, 8), PANEL, "indigo"),
        widget(K::Writepad, "WritePad", Productivity, (6, 28, 6, 8), PANEL, "rose"),
        widget(K::Weather, "Weather", Utilities, (0, 36, 4, 6), SMALL, "sky"),
        widget(K::Valuta, "Valuta", Finance, (4, 36, 4, 6), SMALL, "emerald"),
        widget(K::Architect, "Architect", Creative, (0, 42, 6, 10), WIDE, "indigo"),
        widget(K::ThemeEngine, "Aesthetic", Creative, (6, 42, 6, 10), WIDE, "pink"),
        widget(K::Radio, "Signal Radio", Creative, (0, 52, 6, 8), PANEL, "cyan"),
        widget(K::Sudoku, "Sudoku", Creative, (6, 52, 6, 8), WIDE, "cyan"),
        widget(K::DocuHub, "DocuHub", Developer, (0, 60, 6, 8), PANEL, "indigo"),
        widget(K::GitPulse, "Git Pulse", Developer, (6, 60, 6, 8), PANEL, "orange"),
        widget(K::ProjectTracker, "Tracker", Productivity, (0, 68, 8, 8), WIDE, "blue"),
        widget(K::WebTerminal, "Terminal", Developer, (8, 68, 4, 8), PANEL, "slate"),
        widget(K::CyberEditor, "Cyber Editor", Developer, (0, 76, 12, 12), WIDE, "fuchsia"),
        widget(K::NewsFeed, "News Feed", Research, (0, 88, 4, 8), PANEL, "orange"),
        widget(K::CipherPad, "Cipher Pad", Utilities, (4, 88, 4, 8), PANEL, "emerald"),
        widget(K::PdfViewer, "PDF Viewer", Research, (8, 88, 4, 8), PANEL, "red"),
        widget(K::ResearchBrowser, "Browser", Research, (0, 96, 6, 8), WIDE, "cyan"),
        widget(K::SecureCalendar, "Calendar", Productivity, (6, 96, 6, 8), PANEL, "indigo"),
        widget(K::MacroNet, "Macro Net", Finance, (0, 104, 4, 8), PANEL, "blue"),
        widget(K::ChainPulse, "Chain Pulse", Finance, (4, 104, 4, 8), PANEL, "fuchsia"),
        widget(K::RegRadar, "Reg Radar", Research, (8, 104, 4, 8), PANEL, "amber"),
        widget(K::Market, "Market Feed", Finance, (0, 112, 4, 8), PANEL, "blue"),
        widget(K::Strategic, "Blueprint", Productivity, (6, 112, 6, 8), PANEL, "blue"),
        widget(K::Clipboard, "Mem Buffer", Utilities, (0, 120, 4, 8), SMALL, "cyan"),
        widget(K::PromptLab, "Prompt Lab", Developer, (4, 120, 8, 10), WIDE, "fuchsia"),
    ]
};

pub fn widget_registry() -> &'static [WidgetDescriptor] {
    &WIDGET_REGISTRY
}

pub fn descriptor(kind: WidgetKind) -> &'static WidgetDescriptor {
    &WIDGET_REGISTRY[kind as usize]
}

pub fn launcher_widgets() -> Vec<WidgetDescriptor> {
    widget_registry()
        .iter()
        .copied()
        .filter(|entry| entry.show_in_launcher)
        .collect()
}

/// Returns a fresh copy of the default placement for `widget_id`, if it names a known kind.
pub fn default_entry_for(widget_id: &WidgetId) -> Option<LayoutEntry> {
    widget_id.kind().map(|kind| descriptor(kind).default_entry())
}

/// The full default layout in registry order. Every call builds new entries.
pub fn default_layout() -> Vec<LayoutEntry> {
    widget_registry()
        .iter()
        .map(WidgetDescriptor::default_entry)
        .collect()
}
