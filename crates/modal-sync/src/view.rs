#![forbid(unsafe_code)]

//! Headless, retained view model.
//!
//! Modal-sync does not draw anything itself. Applications plug their own
//! rendering in through two traits:
//!
//! - [`Unit`]: a renderable unit. Mounting it yields a [`View`] and may take
//!   subscriptions, which the [`MountScope`] keeps alive.
//! - [`View`]: a mounted unit that can draw its current state into a
//!   [`Frame`].
//!
//! A [`Mounted`] value owns a view and its scope; dropping it unmounts the
//! unit and releases every subscription taken while mounting.
//!
//! # Invariants
//!
//! 1. Subscriptions held by a scope are released when the scope drops.
//! 2. Views are drawn on demand; drawing never mutates store state.

use modal_sync_store::{ModalError, Subscription};

/// Lines of drawn output.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Frame {
    lines: Vec<String>,
}

impl Frame {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one line.
    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Whether any line contains `text`.
    #[must_use]
    pub fn contains(&self, text: &str) -> bool {
        self.lines.iter().any(|line| line.contains(text))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// A mounted unit.
pub trait View {
    /// Draw the current state.
    fn draw(&self, frame: &mut Frame);
}

/// A renderable unit: something that can be mounted into a [`View`].
///
/// Closures `Fn(&mut MountScope) -> Result<Box<dyn View>, ModalError>` are units.
pub trait Unit: 'static {
    /// Mount a fresh instance of the unit.
    ///
    /// # Errors
    ///
    /// Whatever the unit reports; typically [`ModalError::UnboundModalAccess`]
    /// when it reads the state of a modal that was never bound.
    fn mount(&self, scope: &mut MountScope) -> Result<Box<dyn View>, ModalError>;
}

impl<F> Unit for F
where
    F: Fn(&mut MountScope) -> Result<Box<dyn View>, ModalError> + 'static,
{
    fn mount(&self, scope: &mut MountScope) -> Result<Box<dyn View>, ModalError> {
        self(scope)
    }
}

/// Subscriptions owned by one mounted unit.
#[derive(Default)]
pub struct MountScope {
    subscriptions: Vec<Subscription>,
}

impl MountScope {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep `sub` alive until the unit unmounts.
    pub fn hold(&mut self, sub: Subscription) -> &mut Self {
        self.subscriptions.push(sub);
        self
    }

    /// Number of held subscriptions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }
}

impl std::fmt::Debug for MountScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MountScope")
            .field("subscriptions", &self.subscriptions.len())
            .finish()
    }
}

/// A unit that is currently mounted. Drop to unmount.
pub struct Mounted {
    view: Box<dyn View>,
    scope: MountScope,
}

impl Mounted {
    /// Draw into `frame`.
    pub fn draw(&self, frame: &mut Frame) {
        self.view.draw(frame);
    }

    /// Draw into a fresh frame.
    #[must_use]
    pub fn render(&self) -> Frame {
        let mut frame = Frame::new();
        self.draw(&mut frame);
        frame
    }
}

impl std::fmt::Debug for Mounted {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mounted").field("scope", &self.scope).finish()
    }
}

/// Mount `unit` at top level.
///
/// # Errors
///
/// Propagates the unit's mount error; nothing stays subscribed in that case.
pub fn mount(unit: &(impl Unit + ?Sized)) -> Result<Mounted, ModalError> {
    let mut scope = MountScope::new();
    let view = unit.mount(&mut scope)?;
    Ok(Mounted { view, scope })
}
