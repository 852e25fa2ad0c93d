#![forbid(unsafe_code)]

//! Owner identity used to group subscriptions for bulk release.

use std::sync::atomic::{AtomicU64, Ordering};

/// Allocated ids carry this bit so they never collide with address-derived ids.
const ALLOCATED_TAG: u64 = 1 << 63;

static NEXT_OWNER_ID: AtomicU64 = AtomicU64::new(1);

/// Identity key for a subscription owner.
///
/// Presenters and widgets allocate a fresh id with [`OwnerId::next`] when
/// they are constructed. Arbitrary objects can be keyed by address with
/// [`OwnerId::of`]; such an id is only meaningful while the object is alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OwnerId(u64);

impl OwnerId {
    /// Allocate a process-unique owner id.
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_OWNER_ID.fetch_add(1, Ordering::Relaxed) | ALLOCATED_TAG)
    }

    /// Identity of `value` by address (reference equality).
    #[must_use]
    pub fn of<T: ?Sized>(value: &T) -> Self {
        Self((value as *const T).cast::<()>() as usize as u64 & !ALLOCATED_TAG)
    }

    /// Raw numeric value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for OwnerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "owner#{:x}", self.0)
    }
}
