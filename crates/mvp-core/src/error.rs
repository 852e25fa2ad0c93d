#![forbid(unsafe_code)]

//! Shared error type.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A combination mode name that is neither `any` nor `all`.
    #[error("unknown combination mode: {input}")]
    UnknownCombinationMode { input: String },

    #[error("screen parameters are not of type {expected}")]
    ParamsTypeMismatch { expected: &'static str },

    #[error("widget props are not of type {expected}")]
    PropsTypeMismatch { expected: &'static str },
}

impl CoreError {
    #[must_use]
    pub fn unknown_mode(input: impl Into<String>) -> Self {
        Self::UnknownCombinationMode {
            input: input.into(),
        }
    }
}
