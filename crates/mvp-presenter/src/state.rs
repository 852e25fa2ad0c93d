#![forbid(unsafe_code)]

//! Presenter lifecycle states.

use std::fmt;

/// Where a presenter is in its lifecycle.
///
/// `NotInitialized` only precedes the first activation. `Inactive` is torn
/// down but constructed. `Active` and `Hidden` are mutually reachable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PresenterState {
    #[default]
    NotInitialized,
    Inactive,
    Active,
    Hidden,
}

impl PresenterState {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotInitialized => "not_initialized",
            Self::Inactive => "inactive",
            Self::Active => "active",
            Self::Hidden => "hidden",
        }
    }

    /// Whether widgets and subscriptions are live.
    #[must_use]
    pub const fn is_live(self) -> bool {
        matches!(self, Self::Active | Self::Hidden)
    }
}

impl fmt::Display for PresenterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
