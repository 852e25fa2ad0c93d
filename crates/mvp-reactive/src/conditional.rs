#![forbid(unsafe_code)]

//! Boolean aggregation over heterogeneous reactive values.
//!
//! A [`ConditionalComposite`] tracks any number of reactive values, each with
//! its own predicate, and folds the predicate results with a
//! [`CombinationMode`]. It is the usual backing for "can submit" or "is busy"
//! style flags that depend on several unrelated pieces of model state.
//!
//! # Notification rules
//!
//! - Source changes notify only when the aggregate flips.
//! - Structural changes (`add`, `remove`, `clear_all`, `set_mode`) always
//!   notify, even if the aggregate keeps its value.
//!
//! # Failure Modes
//!
//! - **Predicate re-enters the composite**: predicates run while the
//!   constituent list is borrowed; adding or removing sources from inside a
//!   predicate panics. Result listeners run after the borrow ends and may do
//!   anything.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::str::FromStr;

use mvp_core::error::CoreError;
use mvp_core::event::{Event, ListenerId};

use crate::value::ReactiveValue;

/// How predicate results are folded into one boolean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CombinationMode {
    /// True when at least one predicate holds.
    #[default]
    Any,
    /// True when every predicate holds.
    All,
}

impl CombinationMode {
    /// Lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::All => "all",
        }
    }
}

impl fmt::Display for CombinationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CombinationMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "any" | "or" => Ok(Self::Any),
            "all" | "and" => Ok(Self::All),
            _ => Err(CoreError::unknown_mode(s)),
        }
    }
}

struct Constituent {
    key: usize,
    last_value: Box<dyn Any>,
    predicate: Box<dyn Fn(&dyn Any) -> bool>,
    detach: Box<dyn Fn()>,
}

struct ConditionalInner {
    constituents: RefCell<Vec<Constituent>>,
    mode: Cell<CombinationMode>,
    cached: Cell<bool>,
    empty_value: bool,
    on_result_changed: Event<bool>,
}

impl ConditionalInner {
    fn evaluate(&self) -> bool {
        let constituents = self.constituents.borrow();
        if constituents.is_empty() {
            return self.empty_value;
        }
        let holds = |c: &Constituent| (c.predicate)(c.last_value.as_ref());
        match self.mode.get() {
            CombinationMode::Any => constituents.iter().any(holds),
            CombinationMode::All => constituents.iter().all(holds),
        }
    }

    fn recompute(&self, force: bool) {
        let previous = self.cached.get();
        let result = self.evaluate();
        self.cached.set(result);
        if force || result != previous {
            tracing::trace!(
                message = "conditional.result",
                result,
                previous,
                forced = force,
                mode = self.mode.get().as_str()
            );
            self.on_result_changed.emit(&result);
        }
    }

    fn observe(&self, key: usize, value: Box<dyn Any>) {
        {
            let mut constituents = self.constituents.borrow_mut();
            let Some(entry) = constituents.iter_mut().find(|c| c.key == key) else {
                return;
            };
            entry.last_value = value;
        }
        self.recompute(false);
    }
}

impl Drop for ConditionalInner {
    fn drop(&mut self) {
        for constituent in self.constituents.get_mut().drain(..) {
            (constituent.detach)();
        }
    }
}

/// Boolean aggregate of per-source predicates.
///
/// Cloning shares the same aggregate.
///
/// # Invariants
///
/// 1. A source (by reference identity) appears at most once.
/// 2. With no sources the value equals the configured empty value.
/// 3. Predicates see the value each source most recently announced.
#[derive(Clone)]
pub struct ConditionalComposite {
    inner: Rc<ConditionalInner>,
}

impl Default for ConditionalComposite {
    fn default() -> Self {
        Self::new(CombinationMode::default())
    }
}

impl fmt::Debug for ConditionalComposite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConditionalComposite")
            .field("mode", &self.inner.mode.get())
            .field("value", &self.inner.cached.get())
            .field("sources", &self.len())
            .finish()
    }
}

impl ConditionalComposite {
    /// Create an empty aggregate whose empty value is `false`.
    #[must_use]
    pub fn new(mode: CombinationMode) -> Self {
        Self::with_empty_value(mode, false)
    }

    /// Create an empty aggregate with an explicit empty value.
    #[must_use]
    pub fn with_empty_value(mode: CombinationMode, empty_value: bool) -> Self {
        Self {
            inner: Rc::new(ConditionalInner {
                constituents: RefCell::new(Vec::new()),
                mode: Cell::new(mode),
                cached: Cell::new(empty_value),
                empty_value,
                on_result_changed: Event::new(),
            }),
        }
    }

    /// Track `source` through `predicate`. Adding a source that is already
    /// tracked does nothing.
    pub fn add<T>(&self, source: &ReactiveValue<T>, predicate: impl Fn(&T) -> bool + 'static)
    where
        T: Clone + PartialEq + 'static,
    {
        let key = source.source_key();
        if self.contains_key(key) {
            return;
        }

        let weak: Weak<ConditionalInner> = Rc::downgrade(&self.inner);
        let listener: ListenerId = source.subscribe(move |fresh: &T| {
            if let Some(inner) = weak.upgrade() {
                inner.observe(key, Box::new(fresh.clone()));
            }
        });
        let owned = source.clone();
        let constituent = Constituent {
            key,
            last_value: Box::new(source.get()),
            predicate: Box::new(move |value: &dyn Any| {
                value.downcast_ref::<T>().is_some_and(&predicate)
            }),
            detach: Box::new(move || {
                owned.on_changed().remove_listener(listener);
            }),
        };
        self.inner.constituents.borrow_mut().push(constituent);
        self.inner.recompute(true);
    }

    /// Stop tracking `source`. Does nothing if it was not tracked.
    pub fn remove<T: 'static>(&self, source: &ReactiveValue<T>) {
        let key = source.source_key();
        let removed = {
            let mut constituents = self.inner.constituents.borrow_mut();
            constituents
                .iter()
                .position(|c| c.key == key)
                .map(|index| constituents.remove(index))
        };
        if let Some(constituent) = removed {
            (constituent.detach)();
            self.inner.recompute(true);
        }
    }

    /// Stop tracking every source.
    pub fn clear_all(&self) {
        let drained = std::mem::take(&mut *self.inner.constituents.borrow_mut());
        for constituent in &drained {
            (constituent.detach)();
        }
        drop(drained);
        self.inner.recompute(true);
    }

    /// Change the fold. Setting the current mode again does nothing.
    pub fn set_mode(&self, mode: CombinationMode) {
        if self.inner.mode.get() == mode {
            return;
        }
        self.inner.mode.set(mode);
        self.inner.recompute(true);
    }

    /// Current fold.
    #[must_use]
    pub fn mode(&self) -> CombinationMode {
        self.inner.mode.get()
    }

    /// Current aggregate.
    #[must_use]
    pub fn value(&self) -> bool {
        self.inner.cached.get()
    }

    /// Aggregate reported while no source is tracked.
    #[must_use]
    pub fn empty_value(&self) -> bool {
        self.inner.empty_value
    }

    /// Event fired with the aggregate; see the module docs for when.
    #[must_use]
    pub fn on_result_changed(&self) -> &Event<bool> {
        &self.inner.on_result_changed
    }

    /// Subscribe to aggregate notifications.
    pub fn subscribe(&self, handler: impl Fn(&bool) + 'static) -> ListenerId {
        self.inner.on_result_changed.add_listener(handler)
    }

    /// Whether `source` is tracked.
    #[must_use]
    pub fn contains<T: 'static>(&self, source: &ReactiveValue<T>) -> bool {
        self.contains_key(source.source_key())
    }

    /// Number of tracked sources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.constituents.borrow().len()
    }

    /// Whether no source is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn contains_key(&self, key: usize) -> bool {
        self.inner
            .constituents
            .borrow()
            .iter()
            .any(|c| c.key == key)
    }
}
