#![forbid(unsafe_code)]

//! Per-id state projection.
//!
//! A [`ModalState<T>`] follows one modal's record and republishes only when
//! that record changes. Records untouched by a store mutation keep their
//! identity, so updating one modal never wakes projections of another.
//!
//! # Failure Modes
//!
//! - Creating a projection for an id without a record fails with
//!   [`ModalError::UnboundModalAccess`]. This is what happens when a unit
//!   is mounted directly instead of through `define`/`register`.
//! - If the record is removed later, the projection keeps its last record
//!   and stops publishing.

use std::marker::PhantomData;
use std::rc::Rc;

use modal_sync_store::{
    AnyData, ModalError, ModalId, ModalRecord, ModalsStore, Store, Subscription, Update,
};

/// Typed copy of one modal's record.
#[derive(Debug, Clone, PartialEq)]
pub struct ModalSnapshot<T> {
    pub id: ModalId,
    pub visible: bool,
    pub data: Option<T>,
}

impl<T: Clone + 'static> ModalSnapshot<T> {
    fn from_record(record: &ModalRecord<AnyData>) -> Self {
        Self {
            id: record.id.clone(),
            visible: record.visible,
            data: record
                .data
                .as_ref()
                .and_then(|data| data.downcast_ref::<T>().cloned()),
        }
    }
}

/// Live projection of one modal, plus operations bound to its id.
pub struct ModalState<T> {
    id: ModalId,
    store: ModalsStore<AnyData>,
    slice: Store<ModalRecord<AnyData>>,
    _link: Rc<Subscription>,
    _payload: PhantomData<fn() -> T>,
}

impl<T> Clone for ModalState<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            store: self.store.clone(),
            slice: self.slice.clone(),
            _link: Rc::clone(&self._link),
            _payload: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for ModalState<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let record = self.slice.get_state();
        f.debug_struct("ModalState")
            .field("id", &self.id)
            .field("visible", &record.visible)
            .field("data", &record.data)
            .finish()
    }
}

impl<T: Clone + PartialEq + 'static> ModalState<T> {
    /// Project `id` out of `store`.
    ///
    /// # Errors
    ///
    /// [`ModalError::UnboundModalAccess`] if `id` has no record.
    pub fn new(store: &ModalsStore<AnyData>, id: &ModalId) -> Result<Self, ModalError> {
        let record = store
            .record(id)
            .ok_or_else(|| ModalError::UnboundModalAccess { id: id.clone() })?;
        let slice = Store::from_rc(record);

        let target = slice.clone();
        let key = id.clone();
        let link = store.subscribe(move |modals| {
            if let Some(record) = modals.get(&key) {
                target.set_state(Rc::clone(record));
            }
        });

        Ok(Self {
            id: id.clone(),
            store: store.clone(),
            slice,
            _link: Rc::new(link),
            _payload: PhantomData,
        })
    }

    #[must_use]
    pub fn id(&self) -> &ModalId {
        &self.id
    }

    #[must_use]
    pub fn visible(&self) -> bool {
        self.slice.get_state().visible
    }

    /// Current payload; `None` when none was given or it is not a `T`.
    #[must_use]
    pub fn data(&self) -> Option<T> {
        self.snapshot().data
    }

    #[must_use]
    pub fn snapshot(&self) -> ModalSnapshot<T> {
        ModalSnapshot::from_record(&self.slice.get_state())
    }

    /// Listen for changes to this modal only.
    pub fn subscribe(&self, listener: impl Fn(&ModalSnapshot<T>) + 'static) -> Subscription {
        self.slice
            .subscribe(move |record| listener(&ModalSnapshot::from_record(record)))
    }

    pub fn close(&self) {
        self.store.close(&self.id);
    }

    pub fn remove(&self) {
        self.store.remove(&self.id);
    }

    /// Replace the payload.
    pub fn update(&self, data: T) {
        self.store.update(&self.id, erase_update(Update::literal(data)));
    }

    /// Derive the payload from the previous one.
    pub fn update_with(&self, f: impl FnOnce(&T) -> T + 'static) {
        self.store.update(&self.id, erase_update(Update::transform(f)));
    }
}

/// Lift a typed update onto erased payloads. A transform whose previous
/// payload is of another type leaves it untouched.
pub(crate) fn erase_update<T: PartialEq + 'static>(update: Update<T>) -> Update<AnyData> {
    match update {
        Update::Literal(value) => Update::Literal(AnyData::new(value)),
        Update::Transform(f) => Update::transform(move |prev: &AnyData| {
            match prev.downcast_ref::<T>() {
                Some(prev) => AnyData::new(f(prev)),
                None => prev.clone(),
            }
        }),
    }
}
