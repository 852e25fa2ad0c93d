#![forbid(unsafe_code)]

//! Bounded free lists.
//!
//! [`FreeList<T>`] is the building block behind every pool in the framework
//! (subscription handles, owner registries, pooled widgets, scratch buffers).
//! Release is a consuming operation: once an item is handed back, the caller
//! no longer has it.
//!
//! # Invariants
//!
//! 1. `len() <= cap` at all times; releasing into a full list drops the item.
//! 2. `acquire_or` returns the most recently released item first (LIFO).
//! 3. `stats.created + stats.reused` equals the number of acquisitions.

/// Counters describing pool traffic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Items built because the free list was empty.
    pub created: u64,
    /// Items handed out from the free list.
    pub reused: u64,
    /// Items accepted back into the free list.
    pub released: u64,
    /// Items dropped on release because the free list was full.
    pub dropped: u64,
}

impl PoolStats {
    /// Total number of acquisitions.
    #[must_use]
    pub const fn acquired(&self) -> u64 {
        self.created + self.reused
    }
}

/// A LIFO free list with an upper bound on retained items.
#[derive(Debug)]
pub struct FreeList<T> {
    items: Vec<T>,
    cap: usize,
    stats: PoolStats,
}

impl<T> Default for FreeList<T> {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl<T> FreeList<T> {
    /// Create a free list retaining at most `cap` items.
    #[must_use]
    pub fn new(cap: usize) -> Self {
        Self {
            items: Vec::new(),
            cap,
            stats: PoolStats::default(),
        }
    }

    /// Create a free list without a retention bound.
    #[must_use]
    pub fn unbounded() -> Self {
        Self::new(usize::MAX)
    }

    /// Pop a free item if one is available.
    pub fn try_acquire(&mut self) -> Option<T> {
        let item = self.items.pop();
        if item.is_some() {
            self.stats.reused += 1;
        }
        item
    }

    /// Pop a free item, or build one with `make`.
    pub fn acquire_or(&mut self, make: impl FnOnce() -> T) -> T {
        match self.try_acquire() {
            Some(item) => item,
            None => {
                self.stats.created += 1;
                make()
            }
        }
    }

    /// Return an item. Returns `false` when the list is full and the item was
    /// dropped instead.
    pub fn release(&mut self, item: T) -> bool {
        if self.items.len() >= self.cap {
            self.stats.dropped += 1;
            return false;
        }
        self.stats.released += 1;
        self.items.push(item);
        true
    }

    /// Fill the list with up to `count` freshly built items.
    pub fn prewarm(&mut self, count: usize, mut make: impl FnMut() -> T) {
        let target = count.min(self.cap);
        while self.items.len() < target {
            self.items.push(make());
        }
    }

    /// Whether any retained item matches `pred`.
    pub fn any(&self, pred: impl FnMut(&T) -> bool) -> bool {
        self.items.iter().any(pred)
    }

    /// Number of retained items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether no items are retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Retention bound.
    #[must_use]
    pub const fn cap(&self) -> usize {
        self.cap
    }

    /// Traffic counters.
    #[must_use]
    pub const fn stats(&self) -> PoolStats {
        self.stats
    }

    /// Drop every retained item.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}
