#![forbid(unsafe_code)]

//! Per-owner list of live subscriptions.

use std::fmt;

use mvp_core::event::{Event, Handler};
use mvp_core::signal::SignalHub;

use crate::handle::{EventHandle, SignalHandle, Subscription};
use crate::pool::SubscriptionPool;

/// Every live handle belonging to one owner.
///
/// Releasing a registry unsubscribes every handle and returns it to the
/// pool; the registry itself is left empty and reusable.
#[derive(Default)]
pub struct SubscriptionRegistry {
    subscriptions: Vec<Box<dyn Subscription>>,
}

impl fmt::Debug for SubscriptionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriptionRegistry")
            .field("subscriptions", &self.subscriptions.len())
            .finish()
    }
}

impl SubscriptionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `handler` to `event` with a pooled handle.
    pub fn subscribe<A: 'static>(
        &mut self,
        pool: &mut SubscriptionPool,
        event: &Event<A>,
        handler: Handler<A>,
    ) {
        let mut handle = pool.acquire::<EventHandle<A>>();
        handle.bind(event, handler);
        self.subscriptions.push(handle);
    }

    /// Bind `handler` to signals of type `T` with a pooled handle.
    pub fn subscribe_signal<T: 'static>(
        &mut self,
        pool: &mut SubscriptionPool,
        hub: &SignalHub,
        handler: Handler<T>,
    ) {
        let mut handle = pool.acquire::<SignalHandle<T>>();
        handle.bind(hub, handler);
        self.subscriptions.push(handle);
    }

    /// Unsubscribe everything and return the handles to `pool`. Calling this
    /// on an empty registry does nothing.
    pub fn release(&mut self, pool: &mut SubscriptionPool) {
        for handle in self.subscriptions.drain(..) {
            pool.release(handle);
        }
    }

    /// Move every handle out, leaving the registry empty.
    pub(crate) fn take_all(&mut self) -> Vec<Box<dyn Subscription>> {
        std::mem::take(&mut self.subscriptions)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handle::handler;
    use mvp_core::event::Event0;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn release_unsubscribes_everything() {
        let mut pool = SubscriptionPool::default();
        let mut registry = SubscriptionRegistry::new();
        let hub = SignalHub::new();
        let a: Event<u8> = Event::new();
        let b: Event<String> = Event::new();
        let hits = Rc::new(Cell::new(0u32));

        let h = Rc::clone(&hits);
        registry.subscribe(&mut pool, &a, handler(move |_: &u8| h.set(h.get() + 1)));
        let h = Rc::clone(&hits);
        registry.subscribe(&mut pool, &b, handler(move |_: &String| h.set(h.get() + 1)));
        let h = Rc::clone(&hits);
        registry.subscribe_signal(&mut pool, &hub, handler(move |_: &u8| h.set(h.get() + 1)));
        assert_eq!(registry.len(), 3);

        a.emit(&1);
        b.emit(&String::new());
        hub.fire(&2u8);
        assert_eq!(hits.get(), 3);

        registry.release(&mut pool);
        a.emit(&1);
        b.emit(&String::new());
        hub.fire(&2u8);
        assert_eq!(hits.get(), 3);
        assert!(registry.is_empty());
        assert_eq!(pool.idle_count(), 3);
    }

    #[test]
    fn release_is_idempotent() {
        let mut pool = SubscriptionPool::default();
        let mut registry = SubscriptionRegistry::new();
        let event: Event0 = Event::new();
        registry.subscribe(&mut pool, &event, handler(|_: &()| {}));
        registry.release(&mut pool);
        registry.release(&mut pool);
        assert_eq!(pool.idle_count(), 1);
        assert_eq!(pool.stats().released, 1);
    }
}
