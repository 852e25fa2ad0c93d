#![forbid(unsafe_code)]

//! Multicast notification sources.
//!
//! An [`Event<A>`] is a shared, single-threaded list of handlers that all
//! receive `&A` when the event is emitted. Zero-, one- and two-argument
//! notification shapes are expressed through the argument type: `Event<()>`,
//! `Event<T>` and `Event<(T1, T2)>`.
//!
//! # Invariants
//!
//! 1. Handlers are invoked in registration order.
//! 2. `emit` works on a snapshot of the handler list: handlers added or
//!    removed while an emission is in flight take effect on the next emission.
//! 3. A [`ListenerId`] is unique per event for the lifetime of that event.
//! 4. No `RefCell` borrow is held while a handler runs, so handlers may freely
//!    re-enter the event (add, remove, or emit again).

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

/// Shared handler type stored by events.
pub type Handler<A> = Rc<dyn Fn(&A)>;

/// Zero-argument event.
pub type Event0 = Event<()>;

/// Two-argument event.
pub type Event2<A, B> = Event<(A, B)>;

/// Identifier returned by [`Event::add_listener`], used to remove the handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    /// Raw numeric value (unique within one event).
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

struct EventInner<A> {
    next_id: Cell<u64>,
    listeners: RefCell<Vec<(ListenerId, Handler<A>)>>,
}

/// A multicast notification source.
///
/// Cloning an `Event` creates a new handle to the **same** listener list.
pub struct Event<A> {
    inner: Rc<EventInner<A>>,
}

impl<A> Clone for Event<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<A: 'static> Default for Event<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> fmt::Debug for Event<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("listeners", &self.inner.listeners.borrow().len())
            .finish()
    }
}

impl<A: 'static> Event<A> {
    /// Create an event with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(EventInner {
                next_id: Cell::new(1),
                listeners: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Register a handler. Returns the id used to remove it again.
    pub fn add_listener(&self, handler: impl Fn(&A) + 'static) -> ListenerId {
        self.add_handler(Rc::new(handler))
    }

    /// Register an already shared handler.
    pub fn add_handler(&self, handler: Handler<A>) -> ListenerId {
        let id = ListenerId(self.inner.next_id.get());
        self.inner.next_id.set(id.0 + 1);
        self.inner.listeners.borrow_mut().push((id, handler));
        id
    }

    /// Remove a handler. Returns `false` if the id was not registered.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        // The removed handler is dropped after the borrow ends.
        let removed = {
            let mut listeners = self.inner.listeners.borrow_mut();
            listeners
                .iter()
                .position(|(lid, _)| *lid == id)
                .map(|index| listeners.remove(index))
        };
        removed.is_some()
    }

    /// Remove every handler without notifying anyone.
    pub fn remove_all_listeners(&self) {
        // Handlers may own captures with their own `Drop`; release them
        // outside the borrow.
        let drained = std::mem::take(&mut *self.inner.listeners.borrow_mut());
        drop(drained);
    }

    /// Whether `id` is currently registered.
    #[must_use]
    pub fn has_listener(&self, id: ListenerId) -> bool {
        self.inner
            .listeners
            .borrow()
            .iter()
            .any(|(lid, _)| *lid == id)
    }

    /// Number of registered handlers.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    /// Invoke every handler with `args`.
    pub fn emit(&self, args: &A) {
        let snapshot: Vec<Handler<A>> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .map(|(_, handler)| Rc::clone(handler))
            .collect();
        for handler in snapshot {
            handler(args);
        }
    }

    /// Create a weak handle that does not keep the listener list alive.
    #[must_use]
    pub fn downgrade(&self) -> WeakEvent<A> {
        WeakEvent {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Whether both handles point at the same event.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Event<()> {
    /// Emit a zero-argument event.
    pub fn fire(&self) {
        self.emit(&());
    }
}

impl<A: 'static, B: 'static> Event<(A, B)> {
    /// Emit a two-argument event.
    pub fn emit2(&self, a: A, b: B) {
        self.emit(&(a, b));
    }
}

/// Weak counterpart of [`Event`].
pub struct WeakEvent<A> {
    inner: Weak<EventInner<A>>,
}

impl<A> Clone for WeakEvent<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<A> fmt::Debug for WeakEvent<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakEvent")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}

impl<A: 'static> WeakEvent<A> {
    /// Upgrade to a strong handle if the event still exists.
    #[must_use]
    pub fn upgrade(&self) -> Option<Event<A>> {
        self.inner.upgrade().map(|inner| Event { inner })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emit_reaches_listeners_in_order() {
        let event: Event<i32> = Event::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let a = Rc::clone(&seen);
        let b = Rc::clone(&seen);
        event.add_listener(move |v| a.borrow_mut().push(("a", *v)));
        event.add_listener(move |v| b.borrow_mut().push(("b", *v)));

        event.emit(&7);
        assert_eq!(*seen.borrow(), vec![("a", 7), ("b", 7)]);
    }

    #[test]
    fn remove_listener_detaches_once() {
        let event: Event<i32> = Event::new();
        let id = event.add_listener(|_| {});
        assert!(event.has_listener(id));
        assert!(event.remove_listener(id));
        assert!(!event.remove_listener(id));
        assert_eq!(event.listener_count(), 0);
    }

    #[test]
    fn listener_ids_are_not_reused() {
        let event: Event0 = Event::new();
        let first = event.add_listener(|_| {});
        event.remove_listener(first);
        let second = event.add_listener(|_| {});
        assert_ne!(first, second);
    }

    #[test]
    fn handler_may_remove_itself_during_emit() {
        let event: Event0 = Event::new();
        let calls = Rc::new(Cell::new(0u32));
        let slot: Rc<Cell<Option<ListenerId>>> = Rc::new(Cell::new(None));

        let ev = event.clone();
        let calls_in = Rc::clone(&calls);
        let slot_in = Rc::clone(&slot);
        let id = event.add_listener(move |_| {
            calls_in.set(calls_in.get() + 1);
            if let Some(id) = slot_in.get() {
                ev.remove_listener(id);
            }
        });
        slot.set(Some(id));

        event.fire();
        event.fire();
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn listener_added_during_emit_runs_next_time() {
        let event: Event0 = Event::new();
        let late_calls = Rc::new(Cell::new(0u32));
        let ev = event.clone();
        let late = Rc::clone(&late_calls);
        let armed = Rc::new(Cell::new(false));
        let armed_in = Rc::clone(&armed);
        event.add_listener(move |_| {
            if !armed_in.replace(true) {
                let late = Rc::clone(&late);
                ev.add_listener(move |_| late.set(late.get() + 1));
            }
        });

        event.fire();
        assert_eq!(late_calls.get(), 0);
        event.fire();
        assert_eq!(late_calls.get(), 1);
    }

    #[test]
    fn two_argument_shape() {
        let event: Event2<&'static str, u8> = Event::new();
        let seen = Rc::new(RefCell::new(None));
        let s = Rc::clone(&seen);
        event.add_listener(move |(name, n)| *s.borrow_mut() = Some((*name, *n)));
        event.emit2("x", 3);
        assert_eq!(*seen.borrow(), Some(("x", 3)));
    }

    #[test]
    fn weak_event_does_not_keep_event_alive() {
        let event: Event<u8> = Event::new();
        let weak = event.downgrade();
        assert!(weak.upgrade().is_some());
        drop(event);
        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn clones_share_listeners() {
        let event: Event<u8> = Event::new();
        let other = event.clone();
        other.add_listener(|_| {});
        assert_eq!(event.listener_count(), 1);
        assert!(event.ptr_eq(&other));
    }
}
