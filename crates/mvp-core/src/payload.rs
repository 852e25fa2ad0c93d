#![forbid(unsafe_code)]

//! Opaque, cheaply cloneable payloads (screen parameters, widget props).

use std::any::{Any, type_name};
use std::fmt;
use std::rc::Rc;

/// A shared, type-erased value.
///
/// Cloning shares the same allocation; [`Payload::ptr_eq`] compares identity.
#[derive(Clone)]
pub struct Payload {
    value: Rc<dyn Any>,
    type_name: &'static str,
}

impl Payload {
    /// Wrap `value`.
    #[must_use]
    pub fn new<T: 'static>(value: T) -> Self {
        Self {
            value: Rc::new(value),
            type_name: type_name::<T>(),
        }
    }

    /// Borrow the value as `T`, if it is one.
    #[must_use]
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// Whether the payload holds a `T`.
    #[must_use]
    pub fn is<T: 'static>(&self) -> bool {
        self.value.is::<T>()
    }

    /// Name of the wrapped type, for diagnostics.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Whether both payloads share the same allocation.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.value, &other.value)
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Payload")
            .field("type", &self.type_name)
            .finish()
    }
}
