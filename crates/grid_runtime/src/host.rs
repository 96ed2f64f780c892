//! Host-side runtime helpers: boot hydration and debounced snapshot writes.

use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use leptos::{
    logging, set_timeout, spawn_local, Callable, SignalGetUntracked, SignalSet, SignalUpdate,
};
use platform_host::StateStore;

use crate::{
    config::{load_runtime_config, GridRuntimeConfig},
    persistence,
    reducer::{GridAction, RuntimeEffect},
    runtime_context::GridRuntimeContext,
    scheduler::{PersistScheduler, PersistTicket},
};

#[derive(Clone)]
/// Host service bundle for grid runtime side effects.
pub struct GridHostContext {
    store: Rc<dyn StateStore>,
    config: Rc<Cell<GridRuntimeConfig>>,
    scheduler: Rc<RefCell<PersistScheduler>>,
}

impl Default for GridHostContext {
    fn default() -> Self {
        Self::new(platform_host_web::state_store())
    }
}

impl GridHostContext {
    pub fn new(store: Rc<dyn StateStore>) -> Self {
        let config = GridRuntimeConfig::default();
        Self {
            store,
            config: Rc::new(Cell::new(config)),
            scheduler: Rc::new(RefCell::new(PersistScheduler::new(config.persist_debounce()))),
        }
    }

    /// Returns the configured state store.
    pub fn state_store(&self) -> Rc<dyn StateStore> {
        self.store.clone()
    }

    pub fn config(&self) -> GridRuntimeConfig {
        self.config.get()
    }

    fn apply_config(&self, config: GridRuntimeConfig) {
        self.config.set(config);
        self.scheduler
            .borrow_mut()
            .set_quiet_period(config.persist_debounce());
    }

    /// Loads runtime config and the persisted snapshot, then hydrates the runtime.
    ///
    /// A missing or unreadable snapshot leaves the first-boot defaults in place.
    pub fn install_boot_hydration(&self, runtime: GridRuntimeContext) {
        let host = self.clone();
        spawn_local(async move {
            let config = load_runtime_config(host.store.as_ref()).await;
            host.apply_config(config);
            runtime.state.update(|state| state.policy = config.policy());

            if let Some(snapshot) = persistence::load_boot_snapshot(host.store.as_ref()).await {
                runtime
                    .dispatch
                    .call(GridAction::HydrateSnapshot { snapshot });
            }
            runtime.booted.set(true);
        });
    }

    /// Executes a single [`RuntimeEffect`] emitted by the reducer.
    pub fn run_runtime_effect(&self, runtime: GridRuntimeContext, effect: RuntimeEffect) {
        match effect {
            RuntimeEffect::PersistState => self.schedule_persist(runtime),
        }
    }

    /// Arms a trailing-debounce write. Only the most recent request within the quiet period
    /// writes, and it writes whatever the state is when the timer fires.
    fn schedule_persist(&self, runtime: GridRuntimeContext) {
        let ticket = self.scheduler.borrow_mut().request();
        let quiet_period = self.scheduler.borrow().quiet_period();
        let host = self.clone();
        set_timeout(move || host.fire_persist(runtime, ticket), quiet_period);
    }

    fn fire_persist(&self, runtime: GridRuntimeContext, ticket: PersistTicket) {
        if !self.scheduler.borrow_mut().fire(ticket) {
            return;
        }
        let state = runtime.state.get_untracked();
        let host = self.clone();
        spawn_local(async move {
            if let Err(err) = persistence::persist_snapshot(host.store.as_ref(), &state).await {
                logging::warn!("persist grid snapshot failed: {err}");
            }
        });
    }

    /// Cancels any pending write and deletes the persisted snapshot.
    pub fn wipe_persisted_state(&self) {
        self.scheduler.borrow_mut().cancel();
        let host = self.clone();
        spawn_local(async move {
            if let Err(err) = persistence::clear_persisted_state(host.store.as_ref()).await {
                logging::warn!("clear grid snapshot failed: {err}");
            }
        });
    }
}
