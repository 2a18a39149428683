#![forbid(unsafe_code)]

//! Registry root: hosts every registered unit.
//!
//! Mount one [`RegistryRoot`] per process. It mounts each registered unit
//! keyed by id, in registration order, and follows registry additions and
//! removals. Units registered while no root is mounted never appear.

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;
use modal_sync_store::{ModalError, ModalId, Registry, RegistryStore};

use crate::view::{Frame, MountScope, Mounted, Unit, View, mount};

/// Renderable root for the unit registry.
#[derive(Clone)]
pub struct RegistryRoot {
    registry: RegistryStore<Rc<dyn Unit>>,
}

impl RegistryRoot {
    pub(crate) fn new(registry: &RegistryStore<Rc<dyn Unit>>) -> Self {
        Self {
            registry: registry.clone(),
        }
    }
}

impl std::fmt::Debug for RegistryRoot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryRoot")
            .field("registered", &self.registry.len())
            .finish()
    }
}

impl Unit for RegistryRoot {
    fn mount(&self, scope: &mut MountScope) -> Result<Box<dyn View>, ModalError> {
        let slot = Rc::new(RootSlot {
            children: RefCell::new(IndexMap::new()),
        });

        let weak = Rc::downgrade(&slot);
        scope.hold(self.registry.subscribe(move |registry| {
            if let Some(slot) = weak.upgrade() {
                slot.reconcile(registry);
            }
        }));

        slot.reconcile(&self.registry.get_state());
        Ok(Box::new(RootView { slot }))
    }
}

struct RootSlot {
    children: RefCell<IndexMap<ModalId, Mounted>>,
}

impl RootSlot {
    fn reconcile(&self, registry: &Registry<Rc<dyn Unit>>) {
        let stale: Vec<Mounted> = {
            let mut children = self.children.borrow_mut();
            let gone: Vec<ModalId> = children
                .keys()
                .filter(|id| !registry.contains_key(*id))
                .cloned()
                .collect();
            gone.iter().filter_map(|id| children.shift_remove(id)).collect()
        };
        drop(stale);

        for (id, unit) in registry {
            if self.children.borrow().contains_key(id) {
                continue;
            }
            match mount(&**unit) {
                Ok(mounted) => {
                    self.children.borrow_mut().entry(id.clone()).or_insert(mounted);
                }
                Err(err) => {
                    tracing::error!(target: "modal_sync::root", id = %id, error = %err, "registered unit failed to mount");
                }
            }
        }
    }
}

struct RootView {
    slot: Rc<RootSlot>,
}

impl View for RootView {
    fn draw(&self, frame: &mut Frame) {
        for child in self.slot.children.borrow().values() {
            child.draw(frame);
        }
    }
}
