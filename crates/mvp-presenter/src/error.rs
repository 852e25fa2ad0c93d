#![forbid(unsafe_code)]

//! Presenter errors.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PresenterError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PresenterError {
    /// A view handed to [`Presenter::attach_view`](crate::Presenter::attach_view)
    /// is not the presenter's view type.
    #[error("attached view is not of type {expected}")]
    ViewTypeMismatch { expected: &'static str },
}
