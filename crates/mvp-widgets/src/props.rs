#![forbid(unsafe_code)]

//! Opaque per-widget properties.

use std::any::type_name;

use mvp_core::error::{CoreError, Result};
use mvp_core::payload::Payload;

/// Caller-defined properties attached to a widget before activation.
///
/// Cloning shares the payload; composites hand their own props to children
/// created without explicit props.
#[derive(Debug, Clone)]
pub struct WidgetProps(Payload);

impl WidgetProps {
    #[must_use]
    pub fn new<T: 'static>(value: T) -> Self {
        Self(Payload::new(value))
    }

    /// Borrow the props as `T`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::PropsTypeMismatch`] when the props hold another
    /// type.
    pub fn get<T: 'static>(&self) -> Result<&T> {
        self.0
            .downcast_ref::<T>()
            .ok_or(CoreError::PropsTypeMismatch {
                expected: type_name::<T>(),
            })
    }

    #[must_use]
    pub fn is<T: 'static>(&self) -> bool {
        self.0.is::<T>()
    }

    /// Whether both props share the same payload.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.0.ptr_eq(&other.0)
    }
}
