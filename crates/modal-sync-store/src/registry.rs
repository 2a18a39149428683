#![forbid(unsafe_code)]

//! Id → renderable-unit mapping rendered by a single root.
//!
//! The registry knows nothing about visibility. A unit may be registered
//! without ever being opened, and an id may be opened before any unit is
//! registered for it.
//!
//! # Invariants
//!
//! - The first registration for an id wins; re-adding is a no-op.
//! - Entries keep registration order.
//! - Every mutation that changes the mapping republishes the full snapshot.

use std::rc::Rc;

use indexmap::IndexMap;

use crate::ModalId;
use crate::store::{Store, Subscription};

/// Snapshot of the registry.
pub type Registry<H> = IndexMap<ModalId, H>;

/// Observable id → handle mapping.
pub struct RegistryStore<H> {
    store: Store<Registry<H>>,
}

impl<H> Clone for RegistryStore<H> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<H: Clone + 'static> Default for RegistryStore<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: 'static> std::fmt::Debug for RegistryStore<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ids: Vec<ModalId> = self.store.get_state().keys().cloned().collect();
        f.debug_struct("RegistryStore").field("ids", &ids).finish()
    }
}

impl<H: Clone + 'static> RegistryStore<H> {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            store: Store::new(Registry::new()),
        }
    }

    /// Register `handle` under `id`, unless the id is already registered.
    pub fn add(&self, id: &ModalId, handle: H) {
        let state = self.store.get_state();
        if state.contains_key(id) {
            tracing::trace!(target: "modal_sync::registry", id = %id, "already registered");
            return;
        }
        let mut next = (*state).clone();
        next.insert(id.clone(), handle);
        tracing::debug!(target: "modal_sync::registry", id = %id, "registered");
        self.store.set_state(Rc::new(next));
    }

    /// Drop the entry for `id`, if any.
    pub fn remove(&self, id: &ModalId) {
        let state = self.store.get_state();
        if !state.contains_key(id) {
            return;
        }
        let mut next = (*state).clone();
        next.shift_remove(id);
        tracing::debug!(target: "modal_sync::registry", id = %id, "unregistered");
        self.store.set_state(Rc::new(next));
    }

    /// Remove every entry.
    pub fn clear(&self) {
        self.store.set_state(Rc::new(Registry::new()));
    }

    /// Current snapshot.
    #[must_use]
    pub fn get_state(&self) -> Rc<Registry<H>> {
        self.store.get_state()
    }

    /// Handle registered under `id`.
    #[must_use]
    pub fn get(&self, id: &ModalId) -> Option<H> {
        self.store.get_state().get(id).cloned()
    }

    #[must_use]
    pub fn contains(&self, id: &ModalId) -> bool {
        self.store.get_state().contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.store.get_state().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.get_state().is_empty()
    }

    /// Listen for registry changes.
    pub fn subscribe(&self, listener: impl Fn(&Rc<Registry<H>>) + 'static) -> Subscription {
        self.store.subscribe(listener)
    }
}
