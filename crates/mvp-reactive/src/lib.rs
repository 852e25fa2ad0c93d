#![forbid(unsafe_code)]

//! Reactive data bindings.
//!
//! This crate provides the observable primitives presenters and widgets bind
//! to:
//!
//! - [`ReactiveValue`]: a shared value with `before change` and `changed`
//!   notifications, equal-value suppression, and derived projections.
//! - [`Composite2`], [`Composite3`], [`Composite4`]: a single notification
//!   carrying the live values of several reactive values.
//! - [`ConditionalComposite`]: a boolean aggregate of heterogeneous reactive
//!   values through per-source predicates, combined with ALL or ANY.
//! - [`ReactiveList`]: an ordered list with add/remove notifications.
//!
//! # Architecture
//!
//! Every primitive uses `Rc<..>` with interior mutability for single-threaded
//! shared ownership. Listeners that point back at an aggregate hold a `Weak`
//! reference, so sources never keep their aggregates alive.
//!
//! # Invariants
//!
//! 1. A `changed` notification fires iff the value differs from the previous
//!    one, or the value was built with `change_on_equal`.
//! 2. Aggregates never cache a constituent's value across a notification:
//!    composite broadcasts read every source at broadcast time.
//! 3. No `RefCell` borrow is held while user callbacks run, so handlers may
//!    write back into the graph.

pub mod composite;
pub mod conditional;
pub mod list;
pub mod value;

pub use composite::{Composite2, Composite3, Composite4, combine2, combine3, combine4};
pub use conditional::{CombinationMode, ConditionalComposite};
pub use list::ReactiveList;
pub use value::{ReactiveValue, WeakReactiveValue};
