#![forbid(unsafe_code)]

//! Modal visibility state machine.
//!
//! Per id, a modal is in one of four phases (see [`ModalPhase`]):
//!
//! ```text
//!            open (unit not bound)                 unit mounted
//! Unbound ─────────────────────────▶ Pending ─────────────────────▶ Visible
//!    ▲                                  │                          │   ▲
//!    │              remove              │          close           │   │ open
//!    └──────────────────────────────────┴───── BoundInvisible ◀────┘   │
//!    ▲                                              │                  │
//!    └──────────────── remove ──────────────────────┴──────────────────┘
//! ```
//!
//! Records live in a persistent map so a mutation only replaces the record
//! it touches. Records that did not change keep their `Rc` identity, which
//! is what per-id projections compare to stay quiet on unrelated changes.
//!
//! # Invariants
//!
//! 1. A visible record exists in the mapping.
//! 2. An id is in the visible set iff its record exists and is visible.
//! 3. A pending id has a record that is not visible.
//! 4. No id is both visible and pending.
//! 5. Removing a record drops the id from both index sets.
//! 6. Index sets are updated before the snapshot is published, so listeners
//!    always see indices that match the snapshot they receive.
//!
//! # Failure Modes
//!
//! None. Redundant or out-of-order calls are no-ops, logged at `trace`.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use ahash::AHashSet;
use indexmap::IndexSet;

use crate::ModalId;
use crate::store::{Store, Subscription};
use crate::update::Update;

/// Per-id state entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ModalRecord<D> {
    pub id: ModalId,
    pub visible: bool,
    pub data: Option<D>,
}

impl<D: Clone> ModalRecord<D> {
    fn with_visible(&self, visible: bool) -> Self {
        Self {
            id: self.id.clone(),
            visible,
            data: self.data.clone(),
        }
    }
}

/// Snapshot of every modal record, keyed by id.
pub type Modals<D> = im::HashMap<ModalId, Rc<ModalRecord<D>>>;

/// Lifecycle phase of one id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModalPhase {
    /// No record.
    Unbound,
    /// Opened, waiting for its unit to mount.
    Pending,
    /// Record exists but is hidden (closed, or never opened since mounting).
    BoundInvisible,
    /// Record exists and is shown.
    Visible,
}

#[derive(Default)]
struct Indices {
    /// Visible ids in open order; the last entry is the latest.
    visible: IndexSet<ModalId>,
    pending: AHashSet<ModalId>,
}

/// Observable store of modal records plus the visible/pending indices.
pub struct ModalsStore<D> {
    modals: Store<Modals<D>>,
    indices: Rc<RefCell<Indices>>,
    log_transitions: bool,
}

impl<D> Clone for ModalsStore<D> {
    fn clone(&self) -> Self {
        Self {
            modals: self.modals.clone(),
            indices: Rc::clone(&self.indices),
            log_transitions: self.log_transitions,
        }
    }
}

impl<D: 'static> std::fmt::Debug for ModalsStore<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let indices = self.indices.borrow();
        f.debug_struct("ModalsStore")
            .field("records", &self.modals.get_state().len())
            .field("visible", &indices.visible)
            .field("pending", &indices.pending.len())
            .finish()
    }
}

impl<D: Clone + PartialEq + 'static> Default for ModalsStore<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Clone + PartialEq + 'static> ModalsStore<D> {
    /// Create an empty store that logs transitions at `debug`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_logging(true)
    }

    /// Create an empty store; `log_transitions = false` silences the
    /// per-transition `debug` events.
    #[must_use]
    pub fn with_logging(log_transitions: bool) -> Self {
        Self {
            modals: Store::new(Modals::new()),
            indices: Rc::new(RefCell::new(Indices::default())),
            log_transitions,
        }
    }

    // --- Transitions ---

    /// Request that `id` be shown.
    ///
    /// Swallowed while the id is already visible or pending. Without a record
    /// the id becomes pending and is shown once its unit mounts; with a
    /// (hidden) record it is shown immediately and its payload replaced.
    pub fn open(&self, id: &ModalId, data: Option<D>) {
        {
            let indices = self.indices.borrow();
            if indices.visible.contains(id) || indices.pending.contains(id) {
                tracing::trace!(target: "modal_sync::store", id = %id, "open swallowed, already active");
                return;
            }
        }

        let state = self.modals.get_state();
        let bound = state.contains_key(id);
        let record = Rc::new(ModalRecord {
            id: id.clone(),
            visible: bound,
            data,
        });

        {
            let mut indices = self.indices.borrow_mut();
            if bound {
                indices.visible.insert(id.clone());
            } else {
                indices.pending.insert(id.clone());
            }
        }
        self.log(id, if bound { "open" } else { "open-pending" });
        self.modals.set_state(Rc::new(state.update(id.clone(), record)));
    }

    /// Hide `id` if it is visible. The record is kept until [`remove`](Self::remove).
    pub fn close(&self, id: &ModalId) {
        let state = self.modals.get_state();
        let Some(record) = state.get(id).filter(|r| r.visible) else {
            tracing::trace!(target: "modal_sync::store", id = %id, "close ignored, not visible");
            return;
        };
        let next = Rc::new(record.with_visible(false));

        self.indices.borrow_mut().visible.shift_remove(id);
        self.log(id, "close");
        self.modals.set_state(Rc::new(state.update(id.clone(), next)));
    }

    /// Hide every visible modal in a single publication.
    pub fn close_all(&self) {
        if self.indices.borrow().visible.is_empty() {
            return;
        }

        let state = self.modals.get_state();
        let mut next = (*state).clone();
        for (id, record) in state.iter().filter(|(_, r)| r.visible) {
            next.insert(id.clone(), Rc::new(record.with_visible(false)));
        }

        let closed = {
            let mut indices = self.indices.borrow_mut();
            let closed = indices.visible.len();
            indices.visible.clear();
            closed
        };
        if self.log_transitions {
            tracing::debug!(target: "modal_sync::store", closed, "close all");
        }
        self.modals.set_state(Rc::new(next));
    }

    /// Hide the most recently opened visible modal.
    pub fn close_latest(&self) {
        let latest = self.indices.borrow().visible.last().cloned();
        if let Some(id) = latest {
            self.close(&id);
        }
    }

    /// Change the payload of `id`.
    ///
    /// No-op without a record, and no publication when the next payload
    /// equals the current one.
    pub fn update(&self, id: &ModalId, change: Update<D>) {
        let state = self.modals.get_state();
        let Some(record) = state.get(id) else {
            tracing::trace!(target: "modal_sync::store", id = %id, "update ignored, no record");
            return;
        };

        let data = change.apply(record.data.as_ref());
        if data == record.data {
            tracing::trace!(target: "modal_sync::store", id = %id, "update ignored, payload unchanged");
            return;
        }

        let next = Rc::new(ModalRecord {
            id: record.id.clone(),
            visible: record.visible,
            data,
        });
        self.log(id, "update");
        self.modals.set_state(Rc::new(state.update(id.clone(), next)));
    }

    /// Delete the record for `id`. Expected once the close transition has
    /// finished playing, not straight after `close`.
    pub fn remove(&self, id: &ModalId) {
        let state = self.modals.get_state();
        if !state.contains_key(id) {
            tracing::trace!(target: "modal_sync::store", id = %id, "remove ignored, no record");
            return;
        }

        {
            let mut indices = self.indices.borrow_mut();
            indices.visible.shift_remove(id);
            indices.pending.remove(id);
        }
        self.log(id, "remove");
        self.modals.set_state(Rc::new(state.without(id)));
    }

    /// Pending → visible, signalled once the unit bound to `id` has mounted.
    pub fn set_visible_on_mount_if_needed(&self, id: &ModalId) {
        if !self.indices.borrow().pending.contains(id) {
            return;
        }
        let state = self.modals.get_state();
        let Some(record) = state.get(id) else {
            return;
        };
        if record.visible {
            return;
        }
        let next = Rc::new(record.with_visible(true));

        {
            let mut indices = self.indices.borrow_mut();
            indices.pending.remove(id);
            indices.visible.insert(id.clone());
        }
        self.log(id, "mounted-visible");
        self.modals.set_state(Rc::new(state.update(id.clone(), next)));
    }

    /// Drop every record and both index sets.
    pub fn clear(&self) {
        {
            let mut indices = self.indices.borrow_mut();
            indices.visible.clear();
            indices.pending.clear();
        }
        if self.log_transitions {
            tracing::debug!(target: "modal_sync::store", "clear");
        }
        self.modals.set_state(Rc::new(Modals::new()));
    }

    // --- Queries ---

    /// Current snapshot.
    #[must_use]
    pub fn get_state(&self) -> Rc<Modals<D>> {
        self.modals.get_state()
    }

    /// Listen for snapshot changes.
    pub fn subscribe(&self, listener: impl Fn(&Rc<Modals<D>>) + 'static) -> Subscription {
        self.modals.subscribe(listener)
    }

    /// Number of snapshot listeners.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.modals.subscriber_count()
    }

    /// Record for `id`, if bound.
    #[must_use]
    pub fn record(&self, id: &ModalId) -> Option<Rc<ModalRecord<D>>> {
        self.modals.get_state().get(id).cloned()
    }

    #[must_use]
    pub fn any_visible(&self) -> bool {
        !self.indices.borrow().visible.is_empty()
    }

    /// Live view of the visible ids, in open order. Do not hold the borrow
    /// across store mutations.
    #[must_use]
    pub fn visible_ids(&self) -> Ref<'_, IndexSet<ModalId>> {
        Ref::map(self.indices.borrow(), |indices| &indices.visible)
    }

    /// Copy of the pending ids.
    #[must_use]
    pub fn pending_ids(&self) -> AHashSet<ModalId> {
        self.indices.borrow().pending.clone()
    }

    #[must_use]
    pub fn is_visible(&self, id: &ModalId) -> bool {
        self.indices.borrow().visible.contains(id)
    }

    #[must_use]
    pub fn is_pending(&self, id: &ModalId) -> bool {
        self.indices.borrow().pending.contains(id)
    }

    /// Lifecycle phase of `id`.
    #[must_use]
    pub fn phase(&self, id: &ModalId) -> ModalPhase {
        match self.record(id) {
            None => ModalPhase::Unbound,
            Some(record) if record.visible => ModalPhase::Visible,
            Some(_) if self.is_pending(id) => ModalPhase::Pending,
            Some(_) => ModalPhase::BoundInvisible,
        }
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.modals.get_state().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modals.get_state().is_empty()
    }

    fn log(&self, id: &ModalId, transition: &'static str) {
        if self.log_transitions {
            tracing::debug!(target: "modal_sync::store", id = %id, transition, "modal transition");
        }
    }
}
