//! Widget grid runtime: layout and visibility store, widget registry, persistence and the Leptos
//! provider that wires them to a drag/resize grid renderer.

pub mod backup;
pub mod command;
pub mod config;
pub mod content;
mod effect_executor;
pub mod host;
pub mod layout;
pub mod model;
pub mod optimizer;
pub mod persistence;
pub mod reducer;
pub mod registry;
pub mod runtime_context;
pub mod scheduler;

pub use backup::{backup_file_name, export_backup, parse_backup, BackupEnvelope, BackupError};
pub use command::{parse_palette_response, PaletteCommand};
pub use config::{load_runtime_config, GridRuntimeConfig};
pub use content::{ContentAction, WidgetContent};
pub use host::GridHostContext;
pub use layout::{active_layout, resolve_cell, GridCell, GridRenderConfig, RawLayoutItem};
pub use model::*;
pub use optimizer::{
    parse_optimization_response, LayoutOptimizer, OptimizationOutcome, OptimizationRequest,
};
pub use persistence::{load_boot_snapshot, persist_snapshot, STATE_KEY};
pub use reducer::{reduce_grid, GridAction, RuntimeEffect};
pub use registry::{default_entry_for, default_layout, descriptor, launcher_widgets};
pub use runtime_context::{use_grid_runtime, GridProvider, GridRuntimeContext};
pub use scheduler::PersistScheduler;
