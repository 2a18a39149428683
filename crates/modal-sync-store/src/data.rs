#![forbid(unsafe_code)]

//! Type-erased modal payloads.
//!
//! The process-wide modals store holds payloads of many types side by side.
//! [`AnyData`] erases the payload type while keeping value equality, so the
//! store's "unchanged update" short-circuit still works across types.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

trait ErasedData {
    fn as_any(&self) -> &dyn Any;
    fn eq_erased(&self, other: &dyn Any) -> bool;
    fn type_name(&self) -> &'static str;
}

impl<T: PartialEq + 'static> ErasedData for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn eq_erased(&self, other: &dyn Any) -> bool {
        other.downcast_ref::<T>().is_some_and(|other| self == other)
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

/// Shared, immutable payload of any `PartialEq` type.
///
/// Two payloads are equal if they share an allocation, or if they hold the
/// same type and the values compare equal.
#[derive(Clone)]
pub struct AnyData(Rc<dyn ErasedData>);

impl AnyData {
    /// Wrap a value.
    pub fn new<T: PartialEq + 'static>(value: T) -> Self {
        Self(Rc::new(value))
    }

    /// Borrow the payload as `T`, if that is its type.
    #[must_use]
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        (*self.0).as_any().downcast_ref::<T>()
    }

    /// Whether the payload is a `T`.
    #[must_use]
    pub fn is<T: 'static>(&self) -> bool {
        (*self.0).as_any().is::<T>()
    }

    /// Whether both handles share one allocation.
    #[must_use]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }

    /// Name of the erased type, for diagnostics.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        (*self.0).type_name()
    }
}

impl PartialEq for AnyData {
    fn eq(&self, other: &Self) -> bool {
        Self::ptr_eq(self, other) || (*self.0).eq_erased((*other.0).as_any())
    }
}

impl fmt::Debug for AnyData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AnyData").field(&self.type_name()).finish()
    }
}
