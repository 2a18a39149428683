#![forbid(unsafe_code)]

//! Bind-activation gate.
//!
//! A [`Gate`] wraps a caller's unit and mounts it only while a record exists
//! for the gate's id, whether or not the modal is visible, so the unit can
//! observe the visible → hidden transition and play its exit. After each
//! mount of the wrapped unit the gate signals
//! [`ModalsStore::set_visible_on_mount_if_needed`], which turns a pending
//! open into a visible one.
//!
//! Activation order on first open:
//!
//! 1. gate mounted with no record: draws nothing;
//! 2. a record appears: the wrapped unit mounts and sees `visible = false`;
//! 3. the gate signals the mount;
//! 4. the store republishes and the unit's projection sees `visible = true`.
//!
//! # Failure Modes
//!
//! - A mount error at gate mount time is returned to the caller.
//! - A mount error while reacting to a store notification is logged once at
//!   `error`. The gate stays empty and does not retry until the record
//!   disappears and reappears.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use modal_sync_store::{AnyData, ModalError, ModalId, ModalsStore};

use crate::view::{Frame, MountScope, Mounted, Unit, View, mount};

/// Gated unit produced by `define`. Mount it wherever the modal should live.
#[derive(Clone)]
pub struct Gate {
    id: ModalId,
    unit: Rc<dyn Unit>,
    store: ModalsStore<AnyData>,
}

impl Gate {
    pub(crate) fn new(store: &ModalsStore<AnyData>, id: &ModalId, unit: Rc<dyn Unit>) -> Self {
        Self {
            id: id.clone(),
            unit,
            store: store.clone(),
        }
    }

    /// Id the gate is bound to.
    #[must_use]
    pub fn id(&self) -> &ModalId {
        &self.id
    }
}

impl std::fmt::Debug for Gate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gate").field("id", &self.id).finish()
    }
}

impl Unit for Gate {
    fn mount(&self, scope: &mut MountScope) -> Result<Box<dyn View>, ModalError> {
        let slot = Rc::new(GateSlot {
            id: self.id.clone(),
            unit: Rc::clone(&self.unit),
            store: self.store.clone(),
            child: RefCell::new(None),
            failed: Cell::new(false),
        });

        let weak = Rc::downgrade(&slot);
        scope.hold(self.store.subscribe(move |modals| {
            if let Some(slot) = weak.upgrade() {
                slot.sync(modals.contains_key(&slot.id));
            }
        }));

        if self.store.record(&self.id).is_some() {
            slot.activate()?;
        }
        Ok(Box::new(GateView { slot }))
    }
}

struct GateSlot {
    id: ModalId,
    unit: Rc<dyn Unit>,
    store: ModalsStore<AnyData>,
    child: RefCell<Option<Mounted>>,
    /// Set after a failed mount; cleared when the record goes away.
    failed: Cell<bool>,
}

impl GateSlot {
    fn sync(&self, should_render: bool) {
        if !should_render {
            self.failed.set(false);
        }
        let rendering = self.child.borrow().is_some();
        match (rendering, should_render) {
            (false, true) if !self.failed.get() => {
                if let Err(err) = self.activate() {
                    self.failed.set(true);
                    tracing::error!(target: "modal_sync::gate", id = %self.id, error = %err, "unit failed to mount");
                }
            }
            (true, false) => {
                let child = self.child.borrow_mut().take();
                drop(child);
                tracing::debug!(target: "modal_sync::gate", id = %self.id, "unit unmounted");
            }
            _ => {}
        }
    }

    fn activate(&self) -> Result<(), ModalError> {
        let child = mount(&*self.unit)?;
        *self.child.borrow_mut() = Some(child);
        tracing::debug!(target: "modal_sync::gate", id = %self.id, "unit mounted");
        self.store.set_visible_on_mount_if_needed(&self.id);
        Ok(())
    }
}

struct GateView {
    slot: Rc<GateSlot>,
}

impl View for GateView {
    fn draw(&self, frame: &mut Frame) {
        if let Some(child) = self.slot.child.borrow().as_ref() {
            child.draw(frame);
        }
    }
}
