#![forbid(unsafe_code)]

//! Process-wide modal context.
//!
//! A [`ModalsContext`] bundles one modals store and one unit registry. The
//! default context is thread-local and shared by the free functions of this
//! crate; tests and embedders can build their own with
//! [`ModalsContext::with_config`] and pass it around instead.

use std::rc::Rc;

use indexmap::IndexSet;
use modal_sync_store::{AnyData, ModalId, ModalsStore, RegistryStore};

use crate::config::ModalsConfig;
use crate::instance::Instance;
use crate::root::RegistryRoot;
use crate::view::Unit;

thread_local! {
    static DEFAULT_CONTEXT: ModalsContext = ModalsContext::from_env();
}

/// Modals store, unit registry and configuration shared by instances.
#[derive(Clone)]
pub struct ModalsContext {
    config: Rc<ModalsConfig>,
    modals: ModalsStore<AnyData>,
    registry: RegistryStore<Rc<dyn Unit>>,
}

impl Default for ModalsContext {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ModalsContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModalsContext")
            .field("config", &self.config)
            .field("modals", &self.modals)
            .field("registry", &self.registry)
            .finish()
    }
}

impl ModalsContext {
    /// Fresh context with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ModalsConfig::default())
    }

    /// Fresh context with `config`.
    #[must_use]
    pub fn with_config(config: ModalsConfig) -> Self {
        Self {
            modals: ModalsStore::with_logging(config.log_transitions),
            registry: RegistryStore::new(),
            config: Rc::new(config),
        }
    }

    /// Fresh context configured from the environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::with_config(ModalsConfig::from_env())
    }

    /// The default context of the current thread.
    #[must_use]
    pub fn global() -> Self {
        DEFAULT_CONTEXT.with(Clone::clone)
    }

    #[must_use]
    pub fn config(&self) -> &ModalsConfig {
        &self.config
    }

    #[must_use]
    pub fn modals(&self) -> &ModalsStore<AnyData> {
        &self.modals
    }

    #[must_use]
    pub fn registry(&self) -> &RegistryStore<Rc<dyn Unit>> {
        &self.registry
    }

    /// Allocate a new modal instance in this context.
    #[must_use]
    pub fn create<T: Clone + PartialEq + 'static>(&self) -> Instance<T> {
        Instance::new(self)
    }

    /// Root that hosts every registered unit. Mount it once.
    #[must_use]
    pub fn registry_root(&self) -> RegistryRoot {
        RegistryRoot::new(&self.registry)
    }

    #[must_use]
    pub fn any_visible(&self) -> bool {
        self.modals.any_visible()
    }

    /// Close the most recently opened visible modal.
    pub fn close_latest(&self) {
        self.modals.close_latest();
    }

    /// Close every visible modal at once.
    pub fn close_all(&self) {
        self.modals.close_all();
    }

    /// Copy of the visible ids, in open order.
    #[must_use]
    pub fn visible_ids(&self) -> IndexSet<ModalId> {
        self.modals.visible_ids().clone()
    }

    /// Reset all modal and registry state. Meant for test isolation.
    pub fn cleanup(&self) {
        self.modals.clear();
        self.registry.clear();
    }
}

/// Allocate a new modal instance in the default context.
#[must_use]
pub fn create<T: Clone + PartialEq + 'static>() -> Instance<T> {
    ModalsContext::global().create()
}

/// Allocate a new modal instance in `context`.
#[must_use]
pub fn create_in<T: Clone + PartialEq + 'static>(context: &ModalsContext) -> Instance<T> {
    context.create()
}

/// Root hosting every unit registered in the default context.
#[must_use]
pub fn registry_root() -> RegistryRoot {
    ModalsContext::global().registry_root()
}

/// Whether any modal of the default context is visible.
#[must_use]
pub fn any_visible() -> bool {
    ModalsContext::global().any_visible()
}

/// Close the latest visible modal of the default context.
pub fn close_latest() {
    ModalsContext::global().close_latest();
}

/// Close every visible modal of the default context.
pub fn close_all() {
    ModalsContext::global().close_all();
}

/// Copy of the default context's visible ids, in open order.
#[must_use]
pub fn visible_ids() -> IndexSet<ModalId> {
    ModalsContext::global().visible_ids()
}

/// Reset the default context. Meant for test isolation.
pub fn cleanup() {
    ModalsContext::global().cleanup();
}
