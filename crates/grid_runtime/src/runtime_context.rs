//! Runtime provider and context wiring for the widget grid.
//!
//! This module owns the long-lived reducer container, the runtime effect queue and host bootstrap
//! wiring, plus the integration entry points the UI layer calls (renderer events, backups,
//! auto-organize and the command palette).
#![allow(clippy::clone_on_copy)]

use std::rc::Rc;

use leptos::*;
use serde_json::Value;

use crate::{
    backup::{self, BackupError},
    command::{parse_palette_response, PaletteCommand},
    content::{export_widget_data, import_widget_data},
    effect_executor,
    host::GridHostContext,
    layout::{self, clean_layout_change, GridRenderConfig, RawLayoutItem},
    model::{GridState, LayoutEntry, WidgetKind},
    optimizer::{auto_organize, LayoutOptimizer, OptimizationRequest},
    reducer::{reduce_grid, GridAction, RuntimeEffect},
};

#[derive(Clone, Copy)]
/// Leptos context for reading grid state and dispatching [`GridAction`] values.
pub struct GridRuntimeContext {
    /// Host service bundle for executing runtime side effects.
    pub host: StoredValue<GridHostContext>,
    /// Reactive grid state signal. Only the dispatch callback writes it.
    pub state: RwSignal<GridState>,
    /// Queue of runtime effects emitted by the reducer.
    pub effects: RwSignal<Vec<RuntimeEffect>>,
    /// Set once boot hydration has finished.
    pub booted: RwSignal<bool>,
    /// Reducer dispatch callback.
    pub dispatch: Callback<GridAction>,
}

impl GridRuntimeContext {
    /// Dispatches a reducer action through the runtime context callback.
    pub fn dispatch_action(&self, action: GridAction) {
        self.dispatch.call(action);
    }

    pub fn dispatch_all(&self, actions: impl IntoIterator<Item = GridAction>) {
        for action in actions {
            self.dispatch.call(action);
        }
    }

    /// Entries the renderer should draw, tracked.
    pub fn active_layout(&self) -> Vec<LayoutEntry> {
        self.state.with(layout::active_layout)
    }

    pub fn render_config(&self) -> GridRenderConfig {
        self.state.with(GridRenderConfig::for_state)
    }

    /// Renderer `onLayoutChange` hook.
    pub fn handle_layout_change(&self, raw: &[RawLayoutItem]) {
        self.dispatch_action(GridAction::MergeLayout {
            entries: clean_layout_change(raw),
        });
    }

    /// File name and JSON text for a whole-state backup download.
    ///
    /// # Errors
    ///
    /// Returns [`BackupError::Encode`] when the state cannot be serialized.
    pub fn backup_download(&self) -> Result<(String, String), BackupError> {
        let now = platform_host::unix_time_ms_now();
        let json = self
            .state
            .with_untracked(|state| backup::export_backup(state, now))
            .to_json()?;
        Ok((backup::backup_file_name(now), json))
    }

    /// Validates an uploaded backup and applies it wholesale.
    ///
    /// # Errors
    ///
    /// Returns the [`BackupError`] describing why the file was rejected; state is untouched then.
    pub fn restore_backup(&self, raw: &str) -> Result<(), BackupError> {
        let current = self.state.with_untracked(GridState::snapshot);
        let snapshot = backup::parse_backup(raw, &current)?;
        self.dispatch_action(GridAction::ApplyImportedState { snapshot });
        Ok(())
    }

    /// File name and body for a single widget's export, if the widget has one.
    pub fn export_widget(&self, kind: WidgetKind) -> Option<(&'static str, Value)> {
        self.state
            .with_untracked(|state| export_widget_data(kind, &state.content))
    }

    /// Applies a single widget's uploaded file. Returns `false` when the file was ignored.
    pub fn import_widget(&self, kind: WidgetKind, raw: &str) -> bool {
        let Ok(data) = serde_json::from_str::<Value>(raw) else {
            logging::warn!("widget import for {kind} is not JSON");
            return false;
        };
        match import_widget_data(kind, &data) {
            Some(action) => {
                self.dispatch_action(GridAction::Content(action));
                true
            }
            None => false,
        }
    }

    /// Asks `optimizer` for a better arrangement and a ghost suggestion, then applies the answer.
    pub fn run_auto_organize(&self, optimizer: Rc<dyn LayoutOptimizer>) {
        let runtime = *self;
        let request = self.state.with_untracked(OptimizationRequest::from_state);
        spawn_local(async move {
            let actions = auto_organize(optimizer.as_ref(), &request).await;
            runtime.dispatch_all(actions);
        });
    }

    /// Applies a classified palette answer. `confirm` is consulted for destructive commands.
    ///
    /// Returns the parsed command so the caller can report unknown input.
    pub fn run_palette_command(&self, raw: &str, confirm: impl FnOnce() -> bool) -> PaletteCommand {
        let command = parse_palette_response(raw);
        if command.requires_confirmation() && !confirm() {
            self.dispatch_action(GridAction::SetCommandPaletteOpen { open: false });
            return command;
        }
        self.dispatch_all(command.clone().into_actions());
        command
    }

    /// Drops any pending write and deletes the stored snapshot.
    pub fn wipe_persisted_state(&self) {
        self.host.get_value().wipe_persisted_state();
    }
}

fn install_runtime_orchestration(runtime: GridRuntimeContext) {
    runtime.host.get_value().install_boot_hydration(runtime);
    effect_executor::install(runtime);
}

#[component]
/// Provides [`GridRuntimeContext`] to descendant components and boots persisted state.
pub fn GridProvider(
    /// Host bundle; defaults to the browser's local storage.
    #[prop(optional)]
    host: Option<GridHostContext>,
    children: Children,
) -> impl IntoView {
    let host = store_value(host.unwrap_or_default());
    let state = create_rw_signal(GridState::with_policy(host.get_value().config().policy()));
    let effects = create_rw_signal(Vec::<RuntimeEffect>::new());
    let booted = create_rw_signal(false);

    let dispatch = Callback::new(move |action: GridAction| {
        let mut grid = state.get_untracked();
        let previous = grid.clone();

        let new_effects = reduce_grid(&mut grid, action);
        if grid != previous {
            state.set(grid);
        }
        if !new_effects.is_empty() {
            let mut queue = effects.get_untracked();
            queue.extend(new_effects);
            effects.set(queue);
        }
    });

    let runtime = GridRuntimeContext {
        host,
        state,
        effects,
        booted,
        dispatch,
    };

    provide_context(runtime.clone());

    install_runtime_orchestration(runtime);

    children().into_view()
}

/// Returns the current [`GridRuntimeContext`].
///
/// # Panics
///
/// Panics if called outside [`GridProvider`].
pub fn use_grid_runtime() -> GridRuntimeContext {
    use_context::<GridRuntimeContext>().expect("GridRuntimeContext not provided")
}
