#![forbid(unsafe_code)]

use std::fmt;

/// How [`ModalsStore::update`](crate::ModalsStore::update) computes the next payload.
///
/// The variant is explicit so a payload that is itself a function can still
/// be stored as a literal.
pub enum Update<D> {
    /// Replace the payload with this value.
    Literal(D),
    /// Derive the payload from the previous one. Skipped when the record has
    /// no payload yet.
    Transform(Box<dyn FnOnce(&D) -> D>),
}

impl<D> Update<D> {
    /// Replace the payload with `value`.
    pub fn literal(value: D) -> Self {
        Self::Literal(value)
    }

    /// Derive the payload from the previous one.
    pub fn transform(f: impl FnOnce(&D) -> D + 'static) -> Self {
        Self::Transform(Box::new(f))
    }

    /// Next payload given the previous one.
    pub(crate) fn apply(self, prev: Option<&D>) -> Option<D> {
        match self {
            Self::Literal(value) => Some(value),
            Self::Transform(f) => prev.map(f),
        }
    }
}

impl<D> From<D> for Update<D> {
    fn from(value: D) -> Self {
        Self::Literal(value)
    }
}

impl<D: fmt::Debug> fmt::Debug for Update<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Self::Transform(_) => f.write_str("Transform(..)"),
        }
    }
}
