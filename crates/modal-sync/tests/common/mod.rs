#![allow(dead_code)]

//! Shared fixtures: a fake timer standing in for the close-transition
//! scheduler, and a dialog unit that counts its renders.

use std::cell::{Cell, RefCell};
use std::fmt::Debug;
use std::rc::Rc;

use modal_sync::{Frame, Instance, ModalError, ModalState, MountScope, Unit, View};

/// Length of the dialog's close transition, in milliseconds.
pub const CLOSE_DELAY: u64 = 300;

type Task = Box<dyn FnOnce()>;

#[derive(Default)]
struct Clock {
    now: u64,
    tasks: Vec<(u64, Task)>,
}

/// Manually advanced timer queue.
#[derive(Clone, Default)]
pub struct FakeTimers {
    clock: Rc<RefCell<Clock>>,
}

impl FakeTimers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_timeout(&self, delay: u64, task: impl FnOnce() + 'static) {
        let mut clock = self.clock.borrow_mut();
        let due = clock.now + delay;
        clock.tasks.push((due, Box::new(task)));
    }

    pub fn pending(&self) -> usize {
        self.clock.borrow().tasks.len()
    }

    /// Move time forward, running every task that falls due, earliest first.
    pub fn advance_by(&self, ms: u64) {
        let target = self.clock.borrow().now + ms;
        loop {
            let next = {
                let mut clock = self.clock.borrow_mut();
                let earliest = clock
                    .tasks
                    .iter()
                    .enumerate()
                    .filter(|(_, (due, _))| *due <= target)
                    .min_by_key(|(_, (due, _))| *due)
                    .map(|(index, _)| index);
                earliest.map(|index| {
                    let (due, task) = clock.tasks.remove(index);
                    clock.now = due;
                    task
                })
            };
            match next {
                Some(task) => task(),
                None => break,
            }
        }
        self.clock.borrow_mut().now = target;
    }
}

/// Dialog unit: draws its payload, counts renders, and removes itself
/// `CLOSE_DELAY` ms after it is hidden.
pub struct Dialog<T> {
    instance: Instance<T>,
    timers: FakeTimers,
    renders: Rc<Cell<usize>>,
    keep_mounted: bool,
}

impl<T: Clone + PartialEq + 'static> Dialog<T> {
    pub fn new(instance: &Instance<T>, timers: &FakeTimers) -> Self {
        Self {
            instance: instance.clone(),
            timers: timers.clone(),
            renders: Rc::new(Cell::new(0)),
            keep_mounted: false,
        }
    }

    /// Never schedule `remove` after closing.
    pub fn keep_mounted(mut self) -> Self {
        self.keep_mounted = true;
        self
    }

    /// Shared render counter: one per mount plus one per projection publish.
    pub fn renders(&self) -> Rc<Cell<usize>> {
        Rc::clone(&self.renders)
    }
}

impl<T: Clone + PartialEq + Debug + 'static> Unit for Dialog<T> {
    fn mount(&self, scope: &mut MountScope) -> Result<Box<dyn View>, ModalError> {
        let state = self.instance.use_state()?;
        self.renders.set(self.renders.get() + 1);

        let renders = Rc::clone(&self.renders);
        let timers = self.timers.clone();
        let instance = self.instance.clone();
        let keep_mounted = self.keep_mounted;
        let was_visible = Cell::new(state.visible());
        scope.hold(state.subscribe(move |snapshot| {
            renders.set(renders.get() + 1);
            if was_visible.get() && !snapshot.visible && !keep_mounted {
                let instance = instance.clone();
                timers.set_timeout(CLOSE_DELAY, move || instance.remove());
            }
            was_visible.set(snapshot.visible);
        }));

        Ok(Box::new(DialogView { state }))
    }
}

struct DialogView<T> {
    state: ModalState<T>,
}

impl<T: Clone + PartialEq + Debug + 'static> View for DialogView<T> {
    fn draw(&self, frame: &mut Frame) {
        let snapshot = self.state.snapshot();
        let phase = if snapshot.visible { "open" } else { "closing" };
        frame.push(format!("[dialog {}] {phase} {:?}", snapshot.id, snapshot.data));
    }
}
