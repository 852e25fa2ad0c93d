#![forbid(unsafe_code)]

//! Pool of idle subscription handles.
//!
//! Handles are pooled per concrete shape (`EventHandle<A>`, `SignalHandle<T>`)
//! so that steady-state subscribe/unsubscribe churn allocates nothing.
//!
//! # Invariants
//!
//! 1. Every handle returned to the pool has been reset first.
//! 2. Handles acquired from the pool are always idle.
//! 3. At most `max_free_per_shape` idle handles are retained per shape.

use std::any::TypeId;
use std::fmt;

use ahash::AHashMap;
use mvp_core::pool::{FreeList, PoolStats};

use crate::handle::Subscription;

/// Retention policy for handle pools.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    /// Idle handles kept per shape; extra releases are dropped.
    pub max_free_per_shape: usize,
    /// Idle handles built when a shape is first requested.
    pub prewarm: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_free_per_shape: 256,
            prewarm: 0,
        }
    }
}

impl PoolConfig {
    #[must_use]
    pub fn with_max_free_per_shape(mut self, max: usize) -> Self {
        self.max_free_per_shape = max;
        self
    }

    #[must_use]
    pub fn with_prewarm(mut self, count: usize) -> Self {
        self.prewarm = count;
        self
    }
}

/// Free lists of idle handles, keyed by handle shape.
#[derive(Default)]
pub struct SubscriptionPool {
    config: PoolConfig,
    shelves: AHashMap<TypeId, FreeList<Box<dyn std::any::Any>>>,
}

impl fmt::Debug for SubscriptionPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriptionPool")
            .field("config", &self.config)
            .field("shapes", &self.shelves.len())
            .field("idle", &self.idle_count())
            .finish()
    }
}

impl SubscriptionPool {
    #[must_use]
    pub fn new(config: PoolConfig) -> Self {
        Self {
            config,
            shelves: AHashMap::new(),
        }
    }

    /// Take an idle handle of shape `H`, building one if none is free.
    pub fn acquire<H: Subscription + Default>(&mut self) -> Box<H> {
        let config = self.config;
        let shelf = self.shelves.entry(TypeId::of::<H>()).or_insert_with(|| {
            let mut shelf = FreeList::new(config.max_free_per_shape);
            shelf.prewarm(config.prewarm, || Box::new(H::default()) as Box<dyn std::any::Any>);
            shelf
        });
        let erased = shelf.acquire_or(|| Box::new(H::default()));
        // Shelves are keyed by `TypeId::of::<H>()`; the fallback is unreachable
        // in practice but keeps the path total.
        erased.downcast::<H>().unwrap_or_else(|_| Box::default())
    }

    /// Reset `handle` and keep it for reuse. Returns `false` if the shape's
    /// free list was full and the handle was dropped.
    pub fn release(&mut self, mut handle: Box<dyn Subscription>) -> bool {
        handle.reset();
        self.shelve(handle)
    }

    /// Keep an already reset handle for reuse.
    pub(crate) fn shelve(&mut self, handle: Box<dyn Subscription>) -> bool {
        let cap = self.config.max_free_per_shape;
        self.shelves
            .entry(handle.shape())
            .or_insert_with(|| FreeList::new(cap))
            .release(handle.into_any())
    }

    /// Idle handles retained for shape `H`.
    #[must_use]
    pub fn idle_of<H: 'static>(&self) -> usize {
        self.shelves
            .get(&TypeId::of::<H>())
            .map_or(0, FreeList::len)
    }

    /// Idle handles retained across all shapes.
    #[must_use]
    pub fn idle_count(&self) -> usize {
        self.shelves.values().map(FreeList::len).sum()
    }

    /// Traffic counters summed across all shapes.
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        self.shelves
            .values()
            .map(FreeList::stats)
            .fold(PoolStats::default(), |acc, s| PoolStats {
                created: acc.created + s.created,
                reused: acc.reused + s.reused,
                released: acc.released + s.released,
                dropped: acc.dropped + s.dropped,
            })
    }

    #[must_use]
    pub const fn config(&self) -> PoolConfig {
        self.config
    }
}
