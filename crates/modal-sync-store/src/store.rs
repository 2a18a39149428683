#![forbid(unsafe_code)]

//! Minimal observable state container.
//!
//! A [`Store<T>`] holds one immutable snapshot (`Rc<T>`) and a list of
//! listeners. Replacing the snapshot notifies every listener synchronously,
//! in registration order, with the new snapshot.
//!
//! # Invariants
//!
//! 1. Listeners are notified in registration order.
//! 2. Setting a snapshot that is pointer-identical to the current one is a
//!    no-op (no notification).
//! 3. A listener released through its [`Subscription`] is never called again,
//!    including for the remainder of a notification pass already in flight.
//! 4. Notification passes never interleave: a `set_state` issued by a
//!    listener is applied immediately and a follow-up pass runs after the
//!    current one completes.
//! 5. A listener is always called with the snapshot that is current at call
//!    time, and never twice with the same snapshot. Snapshots replaced
//!    within one pass coalesce: a listener may skip intermediate ones.
//!
//! # Failure Modes
//!
//! - Listener panic: propagates to the caller of `set_state`. The store stays
//!   usable; the follow-up pass of the aborted pass is dropped.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

type Listener<T> = dyn Fn(&Rc<T>);

struct Slot<T> {
    active: Cell<bool>,
    /// Last snapshot delivered, or the current one at subscription time.
    seen: RefCell<Rc<T>>,
    listener: Box<Listener<T>>,
}

struct Inner<T> {
    state: RefCell<Rc<T>>,
    slots: RefCell<Vec<Rc<Slot<T>>>>,
    notifying: Cell<bool>,
    dirty: Cell<bool>,
}

/// Shared, single-threaded observable snapshot.
///
/// Cloning a `Store` yields another handle to the same state.
pub struct Store<T> {
    inner: Rc<Inner<T>>,
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Store<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("state", &*self.inner.state.borrow())
            .field("subscribers", &self.inner.slots.borrow().len())
            .finish()
    }
}

impl<T: Default + 'static> Default for Store<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: 'static> Store<T> {
    /// Create a store holding `initial`.
    #[must_use]
    pub fn new(initial: T) -> Self {
        Self::from_rc(Rc::new(initial))
    }

    /// Create a store around an existing snapshot, keeping its identity.
    #[must_use]
    pub fn from_rc(initial: Rc<T>) -> Self {
        Self {
            inner: Rc::new(Inner {
                state: RefCell::new(initial),
                slots: RefCell::new(Vec::new()),
                notifying: Cell::new(false),
                dirty: Cell::new(false),
            }),
        }
    }

    /// Current snapshot.
    #[must_use]
    pub fn get_state(&self) -> Rc<T> {
        Rc::clone(&self.inner.state.borrow())
    }

    /// Replace the snapshot and notify listeners.
    ///
    /// Does nothing when `next` is the snapshot already held.
    pub fn set_state(&self, next: Rc<T>) {
        {
            let mut state = self.inner.state.borrow_mut();
            if Rc::ptr_eq(&state, &next) {
                return;
            }
            *state = next;
        }
        self.publish();
    }

    /// Register a listener. It stays registered until the returned
    /// [`Subscription`] is dropped or released.
    pub fn subscribe(&self, listener: impl Fn(&Rc<T>) + 'static) -> Subscription {
        let slot = Rc::new(Slot {
            active: Cell::new(true),
            seen: RefCell::new(self.get_state()),
            listener: Box::new(listener),
        });
        self.inner.slots.borrow_mut().push(Rc::clone(&slot));

        let store: Weak<Inner<T>> = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            slot.active.set(false);
            if let Some(inner) = store.upgrade() {
                inner.slots.borrow_mut().retain(|s| !Rc::ptr_eq(s, &slot));
            }
        })
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.slots.borrow().len()
    }

    fn publish(&self) {
        if self.inner.notifying.get() {
            self.inner.dirty.set(true);
            return;
        }

        let _pass = NotifyPass::begin(&self.inner);
        loop {
            self.inner.dirty.set(false);
            // Listeners may subscribe or unsubscribe while being notified.
            let slots: Vec<Rc<Slot<T>>> = self.inner.slots.borrow().clone();
            for slot in &slots {
                if !slot.active.get() {
                    continue;
                }
                let current = self.get_state();
                if Rc::ptr_eq(&slot.seen.borrow(), &current) {
                    continue;
                }
                *slot.seen.borrow_mut() = Rc::clone(&current);
                (slot.listener)(&current);
            }
            if !self.inner.dirty.get() {
                break;
            }
        }
    }
}

/// Marks a store as notifying for the lifetime of the guard.
struct NotifyPass<'a, T> {
    inner: &'a Inner<T>,
}

impl<'a, T> NotifyPass<'a, T> {
    fn begin(inner: &'a Inner<T>) -> Self {
        inner.notifying.set(true);
        Self { inner }
    }
}

impl<T> Drop for NotifyPass<'_, T> {
    fn drop(&mut self) {
        self.inner.notifying.set(false);
        self.inner.dirty.set(false);
    }
}

/// RAII guard for a store listener.
///
/// Dropping the guard releases the listener; [`unsubscribe`](Self::unsubscribe)
/// does the same explicitly.
#[must_use = "dropping a Subscription releases its listener"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub(crate) fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// Release the listener now.
    pub fn unsubscribe(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder<T: Clone + 'static>() -> (Rc<RefCell<Vec<T>>>, impl Fn(&Rc<T>) + 'static) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        (seen, move |v: &Rc<T>| sink.borrow_mut().push((**v).clone()))
    }

    #[test]
    fn get_state_returns_initial() {
        let store = Store::new(7);
        assert_eq!(*store.get_state(), 7);
    }

    #[test]
    fn set_state_notifies_with_new_snapshot() {
        let store = Store::new(0);
        let (seen, listener) = recorder();
        let _sub = store.subscribe(listener);

        store.set_state(Rc::new(1));
        store.set_state(Rc::new(2));
        assert_eq!(*seen.borrow(), vec![1, 2]);
        assert_eq!(*store.get_state(), 2);
    }

    #[test]
    fn identical_snapshot_is_not_published() {
        let store = Store::new(String::from("a"));
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        let _sub = store.subscribe(move |_| c.set(c.get() + 1));

        store.set_state(store.get_state());
        assert_eq!(count.get(), 0);

        // Equal but distinct snapshots still publish.
        store.set_state(Rc::new(String::from("a")));
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn listeners_run_in_registration_order() {
        let store = Store::new(0);
        let order = Rc::new(RefCell::new(Vec::new()));
        let subs: Vec<Subscription> = (0..4)
            .map(|i| {
                let o = Rc::clone(&order);
                store.subscribe(move |_| o.borrow_mut().push(i))
            })
            .collect();

        store.set_state(Rc::new(1));
        assert_eq!(*order.borrow(), vec![0, 1, 2, 3]);
        drop(subs);
    }

    #[test]
    fn drop_releases_listener() {
        let store = Store::new(0);
        let (seen, listener) = recorder();
        {
            let _sub = store.subscribe(listener);
            store.set_state(Rc::new(1));
        }
        store.set_state(Rc::new(2));
        assert_eq!(*seen.borrow(), vec![1]);
        assert_eq!(store.subscriber_count(), 0);
    }

    #[test]
    fn unsubscribe_releases_listener() {
        let store = Store::new(0);
        let (seen, listener) = recorder();
        let sub = store.subscribe(listener);
        assert_eq!(store.subscriber_count(), 1);

        sub.unsubscribe();
        store.set_state(Rc::new(5));
        assert!(seen.borrow().is_empty());
        assert_eq!(store.subscriber_count(), 0);
    }

    #[test]
    fn listener_released_mid_pass_is_skipped() {
        let store = Store::new(0);
        let victim: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        let hits = Rc::new(Cell::new(0));

        let v = Rc::clone(&victim);
        let _killer = store.subscribe(move |_| {
            v.borrow_mut().take();
        });
        let h = Rc::clone(&hits);
        *victim.borrow_mut() = Some(store.subscribe(move |_| h.set(h.get() + 1)));

        store.set_state(Rc::new(1));
        assert_eq!(hits.get(), 0, "released listener must not run");
    }

    #[test]
    fn reentrant_set_state_reaches_every_listener_once() {
        let store = Store::new(0);
        let log = Rc::new(RefCell::new(Vec::new()));

        let s = store.clone();
        let l = Rc::clone(&log);
        let _first = store.subscribe(move |v| {
            l.borrow_mut().push(("first", **v));
            if **v == 1 {
                s.set_state(Rc::new(2));
            }
        });
        let l = Rc::clone(&log);
        let _second = store.subscribe(move |v| l.borrow_mut().push(("second", **v)));

        store.set_state(Rc::new(1));
        // `second` never sees the superseded snapshot.
        assert_eq!(
            *log.borrow(),
            vec![("first", 1), ("second", 2), ("first", 2)]
        );
        assert_eq!(*store.get_state(), 2);
    }

    #[test]
    fn listeners_always_receive_the_current_snapshot() {
        let store = Store::new(0);
        let stale = Rc::new(Cell::new(0));

        let s = store.clone();
        let _bumper = store.subscribe(move |v| {
            if **v < 3 {
                s.set_state(Rc::new(**v + 1));
            }
        });
        let s = store.clone();
        let st = Rc::clone(&stale);
        let _watcher = store.subscribe(move |v| {
            if !Rc::ptr_eq(v, &s.get_state()) {
                st.set(st.get() + 1);
            }
        });

        store.set_state(Rc::new(1));
        assert_eq!(*store.get_state(), 3);
        assert_eq!(stale.get(), 0);
    }

    #[test]
    fn subscriber_added_mid_pass_waits_for_next_publish() {
        let store = Store::new(0);
        let late_hits = Rc::new(Cell::new(0));
        let held: Rc<RefCell<Vec<Subscription>>> = Rc::new(RefCell::new(Vec::new()));

        let s = store.clone();
        let h = Rc::clone(&held);
        let hits = Rc::clone(&late_hits);
        let _adder = store.subscribe(move |_| {
            if h.borrow().is_empty() {
                let hits = Rc::clone(&hits);
                let sub = s.subscribe(move |_| hits.set(hits.get() + 1));
                h.borrow_mut().push(sub);
            }
        });

        store.set_state(Rc::new(1));
        assert_eq!(late_hits.get(), 0);
        store.set_state(Rc::new(2));
        assert_eq!(late_hits.get(), 1);
    }

    #[test]
    fn subscription_outliving_store_is_harmless() {
        let store = Store::new(0);
        let sub = store.subscribe(|_| {});
        drop(store);
        drop(sub);
    }

    #[test]
    fn debug_format() {
        let store = Store::new(3);
        let _sub = store.subscribe(|_| {});
        let debug = format!("{store:?}");
        assert!(debug.contains("state: 3"));
        assert!(debug.contains("subscribers: 1"));
    }
}
