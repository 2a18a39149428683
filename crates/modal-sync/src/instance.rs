#![forbid(unsafe_code)]

//! Caller-facing modal handles.

use std::marker::PhantomData;
use std::rc::Rc;

use modal_sync_store::{AnyData, ModalError, ModalId, Update};

use crate::context::ModalsContext;
use crate::gate::Gate;
use crate::projection::{ModalState, erase_update};
use crate::view::Unit;

/// Handle bound to one modal id, carrying the payload type `T`.
///
/// Cheap to clone; clones share the id and context. Operations on ids that
/// are not in a suitable phase are silent no-ops.
pub struct Instance<T = ()> {
    id: ModalId,
    context: ModalsContext,
    _payload: PhantomData<fn() -> T>,
}

impl<T> Clone for Instance<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            context: self.context.clone(),
            _payload: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for Instance<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Instance")
            .field("id", &self.id)
            .field("payload", &std::any::type_name::<T>())
            .finish()
    }
}

impl<T: Clone + PartialEq + 'static> Instance<T> {
    pub(crate) fn new(context: &ModalsContext) -> Self {
        Self {
            id: ModalId::next(&context.config().id_prefix),
            context: context.clone(),
            _payload: PhantomData,
        }
    }

    #[must_use]
    pub fn id(&self) -> &ModalId {
        &self.id
    }

    /// Open without a payload.
    pub fn open(&self) {
        self.context.modals().open(&self.id, None);
    }

    /// Open with `data` as the payload.
    pub fn open_with(&self, data: T) {
        self.context.modals().open(&self.id, Some(AnyData::new(data)));
    }

    pub fn close(&self) {
        self.context.modals().close(&self.id);
    }

    /// Replace the payload.
    pub fn update(&self, data: T) {
        self.context
            .modals()
            .update(&self.id, erase_update(Update::literal(data)));
    }

    /// Derive the payload from the previous one.
    pub fn update_with(&self, f: impl FnOnce(&T) -> T + 'static) {
        self.context
            .modals()
            .update(&self.id, erase_update(Update::transform(f)));
    }

    /// Drop the record; call once the close transition has finished.
    pub fn remove(&self) {
        self.context.modals().remove(&self.id);
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.context.modals().is_visible(&self.id)
    }

    /// Wrap `unit` in a gate bound to this id. Mount the gate wherever the
    /// modal should live.
    pub fn define(&self, unit: impl Unit) -> Gate {
        Gate::new(self.context.modals(), &self.id, Rc::new(unit))
    }

    /// Gate `unit` and add it to the registry, to be hosted by the
    /// [`RegistryRoot`](crate::RegistryRoot).
    pub fn register(&self, unit: impl Unit) -> Registration {
        let gate: Rc<dyn Unit> = Rc::new(self.define(unit));
        self.context.registry().add(&self.id, gate);
        Registration {
            id: self.id.clone(),
            context: self.context.clone(),
        }
    }

    /// Project this modal's state. Call it while mounting a gated unit.
    ///
    /// # Errors
    ///
    /// [`ModalError::UnboundModalAccess`] when the modal has no record, which
    /// means the unit was mounted without `define`/`register`.
    pub fn use_state(&self) -> Result<ModalState<T>, ModalError> {
        ModalState::new(self.context.modals(), &self.id)
    }
}

/// Registry entry created by [`Instance::register`].
///
/// Dropping it leaves the unit registered; call
/// [`unregister`](Self::unregister) on teardown.
#[derive(Debug)]
pub struct Registration {
    id: ModalId,
    context: ModalsContext,
}

impl Registration {
    #[must_use]
    pub fn id(&self) -> &ModalId {
        &self.id
    }

    /// Remove the unit from the registry.
    pub fn unregister(self) {
        self.context.registry().remove(&self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::{Frame, MountScope, View, mount};
    use modal_sync_store::ModalPhase;

    struct Empty;

    impl View for Empty {
        fn draw(&self, frame: &mut Frame) {
            frame.push("empty");
        }
    }

    fn empty_unit(_: &mut MountScope) -> Result<Box<dyn View>, ModalError> {
        Ok(Box::new(Empty))
    }

    #[test]
    fn ids_use_configured_prefix() {
        let ctx = ModalsContext::with_config(crate::ModalsConfig::new().id_prefix("dlg"));
        let modal: Instance = ctx.create();
        assert!(modal.id().as_str().starts_with("dlg::"));
    }

    #[test]
    fn instances_get_distinct_ids() {
        let ctx = ModalsContext::new();
        let a: Instance = ctx.create();
        let b: Instance = ctx.create();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn open_without_unit_stays_pending() {
        let ctx = ModalsContext::new();
        let modal: Instance = ctx.create();
        modal.open();
        assert!(!modal.is_visible());
        assert_eq!(ctx.modals().phase(modal.id()), ModalPhase::Pending);
    }

    #[test]
    fn open_then_define_and_mount_becomes_visible() {
        let ctx = ModalsContext::new();
        let modal: Instance<String> = ctx.create();
        modal.open_with("hi".to_string());

        let gate = modal.define(empty_unit);
        let _mounted = mount(&gate).expect("gate mounts");
        assert!(modal.is_visible());
        assert_eq!(
            modal.use_state().expect("bound").data().as_deref(),
            Some("hi")
        );
    }

    #[test]
    fn register_and_unregister() {
        let ctx = ModalsContext::new();
        let modal: Instance = ctx.create();
        let registration = modal.register(empty_unit);
        assert!(ctx.registry().contains(modal.id()));
        assert_eq!(registration.id(), modal.id());

        registration.unregister();
        assert!(!ctx.registry().contains(modal.id()));
    }

    #[test]
    fn use_state_before_binding_fails() {
        let ctx = ModalsContext::new();
        let modal: Instance = ctx.create();
        let err = modal.use_state().expect_err("not bound");
        assert!(err.to_string().contains(modal.id().as_str()));
    }

    #[test]
    fn open_without_payload_reads_none() {
        let ctx = ModalsContext::new();
        let modal: Instance<u32> = ctx.create();
        modal.open();
        assert_eq!(modal.use_state().expect("record").data(), None);
    }
}
