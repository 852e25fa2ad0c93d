#![forbid(unsafe_code)]

//! Core: notification sources, the typed signal hub, owner identity, free
//! lists, and the shared error type.

pub mod error;
pub mod event;
pub mod geometry;
pub mod owner;
pub mod payload;
pub mod pool;
pub mod signal;

pub use error::{CoreError, Result};
pub use event::{Event, Event0, Event2, Handler, ListenerId, WeakEvent};
pub use geometry::Transform;
pub use owner::OwnerId;
pub use payload::Payload;
pub use pool::{FreeList, PoolStats};
pub use signal::{SignalHub, WeakSignalHub};
