use std::time::Duration;

use futures::executor::block_on;
use grid_runtime::{
    export_backup, load_boot_snapshot, parse_backup, persist_snapshot, reduce_grid,
    scheduler::PersistTicket, ContentAction, GridAction, GridState, LayoutEntry, PersistScheduler,
    RuntimeEffect, WidgetId,
};
use platform_host::{MemoryStateStore, StateStore};
use pretty_assertions::assert_eq;

/// Drives reducer effects the way the runtime does, with a manual clock for the debounce.
struct Harness {
    state: GridState,
    store: MemoryStateStore,
    scheduler: PersistScheduler,
    armed: Vec<PersistTicket>,
    writes: usize,
}

impl Harness {
    fn new() -> Self {
        Self {
            state: GridState::default(),
            store: MemoryStateStore::default(),
            scheduler: PersistScheduler::new(Duration::from_millis(400)),
            armed: Vec::new(),
            writes: 0,
        }
    }

    fn dispatch(&mut self, action: GridAction) {
        for effect in reduce_grid(&mut self.state, action) {
            match effect {
                RuntimeEffect::PersistState => self.armed.push(self.scheduler.request()),
            }
        }
    }

    fn elapse(&mut self) {
        for ticket in std::mem::take(&mut self.armed) {
            if self.scheduler.fire(ticket) {
                block_on(persist_snapshot(&self.store, &self.state)).expect("persist");
                self.writes += 1;
            }
        }
    }
}

#[test]
fn burst_of_changes_writes_once_with_latest_state() {
    let mut harness = Harness::new();
    harness.dispatch(GridAction::ToggleWidget {
        widget_id: WidgetId::from("CALC"),
    });
    harness.dispatch(GridAction::MergeLayout {
        entries: vec![LayoutEntry::new("CALC", 0, 50, 3, 8)],
    });
    harness.dispatch(GridAction::Content(ContentAction::SetScratchpad {
        content: "draft".to_string(),
    }));
    harness.elapse();

    assert_eq!(harness.writes, 1);
    let stored = block_on(load_boot_snapshot(&harness.store)).expect("stored snapshot");
    assert_eq!(
        stored.layouts.lg.iter().find(|entry| entry.id == "CALC"),
        Some(&LayoutEntry::new("CALC", 0, 50, 3, 8))
    );
    assert_eq!(stored.content.scratchpad_content, "draft");
}

#[test]
fn reload_hydrates_persisted_state() {
    let mut harness = Harness::new();
    harness.dispatch(GridAction::ToggleWidget {
        widget_id: WidgetId::from("SUDOKU"),
    });
    harness.dispatch(GridAction::ToggleLayoutLock);
    harness.elapse();

    let snapshot = block_on(load_boot_snapshot(&harness.store)).expect("stored snapshot");
    let mut reloaded = GridState::default();
    let effects = reduce_grid(&mut reloaded, GridAction::HydrateSnapshot { snapshot });

    assert!(effects.is_empty());
    assert!(reloaded.is_visible("SUDOKU"));
    assert!(reloaded.layout_locked);
}

#[test]
fn transient_palette_flag_never_triggers_a_write() {
    let mut harness = Harness::new();
    harness.dispatch(GridAction::SetCommandPaletteOpen { open: true });
    harness.elapse();
    assert_eq!(harness.writes, 0);
    assert!(block_on(harness.store.load_raw(grid_runtime::STATE_KEY))
        .expect("load")
        .is_none());
}

#[test]
fn imported_backup_replaces_state_and_persists() {
    let mut source = GridState::default();
    source.toggle_visibility(&WidgetId::from("RADIO"));
    let backup = export_backup(&source, 0).to_json().expect("encode");

    let mut harness = Harness::new();
    let snapshot = parse_backup(&backup, &harness.state.snapshot()).expect("valid backup");
    harness.dispatch(GridAction::ApplyImportedState { snapshot });
    harness.elapse();

    assert!(harness.state.is_visible("RADIO"));
    assert_eq!(harness.writes, 1);
}
