#![forbid(unsafe_code)]

//! Opaque modal identifiers.

use std::borrow::Borrow;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide counter backing [`ModalId::next`].
static MODAL_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Identifier shared by a modal's record, its registry entry and its instance.
///
/// Ids are human-readable (`<prefix>::<hex>`) but not meant to be parsed.
/// Ids produced by [`ModalId::next`] are unique for the lifetime of the process.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModalId(Rc<str>);

impl ModalId {
    /// Allocate a fresh id with the given prefix.
    #[must_use]
    pub fn next(prefix: &str) -> Self {
        let n = MODAL_ID_COUNTER.fetch_add(1, Ordering::Relaxed);
        Self(format!("{prefix}::{n:x}").into())
    }

    /// The id as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ModalId {
    fn from(raw: &str) -> Self {
        Self(raw.into())
    }
}

impl From<String> for ModalId {
    fn from(raw: String) -> Self {
        Self(raw.into())
    }
}

impl Borrow<str> for ModalId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for ModalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ModalId").field(&&*self.0).finish()
    }
}
