#![forbid(unsafe_code)]

//! Subscription bookkeeping.
//!
//! Presenters and widgets never hold listener ids themselves. They subscribe
//! through an [`EventsStore`] under their [`OwnerId`](mvp_core::OwnerId) and
//! release everything in one call when they deactivate.
//!
//! # Layers
//!
//! | Layer | Type | Role |
//! |-------|------|------|
//! | handle | [`EventHandle`], [`SignalHandle`] | one binding to one source |
//! | pool | [`SubscriptionPool`] | free lists of idle handles, keyed by handle shape |
//! | registry | [`SubscriptionRegistry`] | every live handle of one owner |
//! | store | [`EventsStore`] | owner → registry map plus pooled registries |

pub mod handle;
pub mod pool;
pub mod registry;
pub mod store;

pub use handle::{EventHandle, HandleState, SignalHandle, Subscription};
pub use pool::{PoolConfig, SubscriptionPool};
pub use registry::SubscriptionRegistry;
pub use store::{EventsStore, EventsStoreConfig};
