#![forbid(unsafe_code)]

//! Single reactive values.
//!
//! # Design
//!
//! [`ReactiveValue<T>`] keeps its value in shared, reference-counted storage
//! together with two events: `before change` receives `(old, new)` and
//! `changed` receives the committed value. Cloning a handle shares the value.
//!
//! # Failure Modes
//!
//! - **Handler writes back**: a `changed` handler that sets the same value
//!   again recurses once per distinct value; equal-value suppression bounds
//!   the recursion for well-behaved graphs.
//! - **Derived value dropped**: the forwarding listener installed by
//!   [`ReactiveValue::select`] holds the derived value weakly. Once the
//!   caller drops it, the listener removes itself on the next change.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use mvp_core::event::{Event, ListenerId};

struct ValueInner<T> {
    value: RefCell<T>,
    change_on_equal: bool,
    on_changed: Event<T>,
    on_before_change: Event<(T, T)>,
}

/// An observable single value.
///
/// # Invariants
///
/// 1. `set` with a value equal to the current one is a no-op unless the value
///    was created with `change_on_equal`.
/// 2. `before change` always fires before the commit and `changed` after it.
/// 3. `set_silently` and `reset` never notify.
pub struct ReactiveValue<T> {
    inner: Rc<ValueInner<T>>,
}

impl<T> Clone for ReactiveValue<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for ReactiveValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReactiveValue")
            .field("value", &*self.inner.value.borrow())
            .field("change_on_equal", &self.inner.change_on_equal)
            .finish()
    }
}

impl<T: Clone + PartialEq + Default + 'static> Default for ReactiveValue<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: 'static> ReactiveValue<T> {
    /// Event fired after every committed change, with the new value.
    #[must_use]
    pub fn on_changed(&self) -> &Event<T> {
        &self.inner.on_changed
    }

    /// Event fired before a change is committed, with `(old, new)`.
    #[must_use]
    pub fn on_before_change(&self) -> &Event<(T, T)> {
        &self.inner.on_before_change
    }

    /// Remove every observer of both events without notifying.
    pub fn clear_listeners(&self) {
        self.inner.on_changed.remove_all_listeners();
        self.inner.on_before_change.remove_all_listeners();
    }

    /// Whether equal values still produce notifications.
    #[must_use]
    pub fn change_on_equal(&self) -> bool {
        self.inner.change_on_equal
    }

    /// Identity of the underlying storage (reference equality).
    #[must_use]
    pub fn source_key(&self) -> usize {
        Rc::as_ptr(&self.inner).cast::<()>() as usize
    }

    /// Whether both handles share the same storage.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Create a weak handle.
    #[must_use]
    pub fn downgrade(&self) -> WeakReactiveValue<T> {
        WeakReactiveValue {
            inner: Rc::downgrade(&self.inner),
        }
    }
}

impl<T: Clone + PartialEq + 'static> ReactiveValue<T> {
    /// Create a value that suppresses equal-value notifications.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self::with_change_on_equal(value, false)
    }

    /// Create a value, choosing whether equal values still notify.
    #[must_use]
    pub fn with_change_on_equal(value: T, change_on_equal: bool) -> Self {
        Self {
            inner: Rc::new(ValueInner {
                value: RefCell::new(value),
                change_on_equal,
                on_changed: Event::new(),
                on_before_change: Event::new(),
            }),
        }
    }

    /// Clone of the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.value.borrow().clone()
    }

    /// Access the current value by reference.
    ///
    /// # Panics
    ///
    /// Panics if `f` sets this same value (re-entrant borrow).
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.value.borrow())
    }

    /// Set the value, notifying observers unless it is unchanged.
    pub fn set(&self, value: T) {
        if !self.inner.change_on_equal && *self.inner.value.borrow() == value {
            return;
        }
        if self.inner.on_before_change.listener_count() > 0 {
            let old = self.get();
            self.inner.on_before_change.emit(&(old, value.clone()));
        }
        *self.inner.value.borrow_mut() = value;
        let current = self.get();
        self.inner.on_changed.emit(&current);
    }

    /// Commit a value without any notification.
    pub fn set_silently(&self, value: T) {
        *self.inner.value.borrow_mut() = value;
    }

    /// Re-broadcast the current value without changing it.
    pub fn touch(&self) {
        let current = self.get();
        self.inner.on_changed.emit(&current);
    }

    /// Derive a new value that follows `map(source)` on every change.
    pub fn select<U>(&self, map: impl Fn(&T) -> U + 'static) -> ReactiveValue<U>
    where
        U: Clone + PartialEq + 'static,
    {
        self.select_where(map, |_| true)
    }

    /// Derive a new value that follows `map(source)` whenever `predicate`
    /// accepts the source's new value.
    ///
    /// The derived value starts at `map(current)` regardless of `predicate`.
    pub fn select_where<U>(
        &self,
        map: impl Fn(&T) -> U + 'static,
        predicate: impl Fn(&T) -> bool + 'static,
    ) -> ReactiveValue<U>
    where
        U: Clone + PartialEq + 'static,
    {
        let derived = ReactiveValue::new(self.with(&map));
        let weak = derived.downgrade();
        let source = self.inner.on_changed.downgrade();
        let slot: Rc<Cell<Option<ListenerId>>> = Rc::new(Cell::new(None));
        let own_id = Rc::clone(&slot);
        let id = self.inner.on_changed.add_listener(move |value: &T| {
            let Some(derived) = weak.upgrade() else {
                if let (Some(event), Some(id)) = (source.upgrade(), own_id.take()) {
                    event.remove_listener(id);
                }
                return;
            };
            if predicate(value) {
                derived.set(map(value));
            }
        });
        slot.set(Some(id));
        derived
    }

    /// Derive a value that only follows source values accepted by `predicate`.
    pub fn filter(&self, predicate: impl Fn(&T) -> bool + 'static) -> ReactiveValue<T> {
        self.select_where(T::clone, predicate)
    }

    /// Subscribe to `changed`; shorthand for `on_changed().add_listener`.
    pub fn subscribe(&self, handler: impl Fn(&T) + 'static) -> ListenerId {
        self.inner.on_changed.add_listener(handler)
    }
}

impl<T: Clone + PartialEq + Default + 'static> ReactiveValue<T> {
    /// Silently restore the type default and drop every observer.
    pub fn reset(&self) {
        self.set_silently(T::default());
        self.clear_listeners();
    }
}

/// Weak counterpart of [`ReactiveValue`].
pub struct WeakReactiveValue<T> {
    inner: Weak<ValueInner<T>>,
}

impl<T> Clone for WeakReactiveValue<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<T> WeakReactiveValue<T> {
    /// Upgrade to a strong handle if the value still exists.
    #[must_use]
    pub fn upgrade(&self) -> Option<ReactiveValue<T>> {
        self.inner.upgrade().map(|inner| ReactiveValue { inner })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
