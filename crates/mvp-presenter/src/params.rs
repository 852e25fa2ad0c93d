#![forbid(unsafe_code)]

//! Opaque open parameters handed to a screen's model.

use std::any::type_name;

use mvp_core::error::{CoreError, Result};
use mvp_core::payload::Payload;

/// Parameters a screen is opened with.
///
/// The presenter never inspects them; it passes them to
/// [`Model::activate`](crate::Model::activate) on every activation.
#[derive(Debug, Clone)]
pub struct ScreenParams(Payload);

impl ScreenParams {
    #[must_use]
    pub fn new<T: 'static>(value: T) -> Self {
        Self(Payload::new(value))
    }

    /// Borrow the parameters as `T`.
    pub fn get<T: 'static>(&self) -> Result<&T> {
        self.0
            .downcast_ref::<T>()
            .ok_or(CoreError::ParamsTypeMismatch {
                expected: type_name::<T>(),
            })
    }

    #[must_use]
    pub fn is<T: 'static>(&self) -> bool {
        self.0.is::<T>()
    }

    #[must_use]
    pub fn payload(&self) -> &Payload {
        &self.0
    }
}
