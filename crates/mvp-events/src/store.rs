#![forbid(unsafe_code)]

//! Owner-keyed subscription store.
//!
//! [`EventsStore`] is the one object presenters and widgets talk to when they
//! subscribe. It maps each [`OwnerId`] to a pooled [`SubscriptionRegistry`]
//! and owns the handle pool shared by all registries.
//!
//! # Invariants
//!
//! 1. After `unsubscribe(owner)` no handler registered under `owner` runs
//!    again, and `has_owner(owner)` is false.
//! 2. Unsubscribing an unknown owner is a no-op.
//! 3. No store borrow is held while handles detach, so dropping a handler
//!    whose captures re-enter the store is safe.
//!
//! # Design
//!
//! Unsubscribe takes the owner's registry out of the map, detaches every
//! handle with the store unborrowed, then re-borrows to shelve the handles
//! and the emptied registry.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use ahash::AHashMap;
use mvp_core::event::Event;
use mvp_core::owner::OwnerId;
use mvp_core::pool::{FreeList, PoolStats};
use mvp_core::signal::SignalHub;

use crate::pool::{PoolConfig, SubscriptionPool};
use crate::registry::SubscriptionRegistry;

/// Store-wide pool settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventsStoreConfig {
    /// Settings for the shared handle pool.
    pub handles: PoolConfig,
    /// Emptied registries kept for reuse.
    pub max_free_registries: usize,
}

impl Default for EventsStoreConfig {
    fn default() -> Self {
        Self {
            handles: PoolConfig::default(),
            max_free_registries: 64,
        }
    }
}

impl EventsStoreConfig {
    #[must_use]
    pub fn with_handles(mut self, handles: PoolConfig) -> Self {
        self.handles = handles;
        self
    }

    #[must_use]
    pub fn with_max_free_registries(mut self, max: usize) -> Self {
        self.max_free_registries = max;
        self
    }
}

struct StoreInner {
    registries: AHashMap<OwnerId, SubscriptionRegistry>,
    free_registries: FreeList<SubscriptionRegistry>,
    handles: SubscriptionPool,
}

/// Subscription bookkeeping keyed by owner.
pub struct EventsStore {
    inner: RefCell<StoreInner>,
    hub: SignalHub,
}

impl fmt::Debug for EventsStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("EventsStore")
            .field("owners", &inner.registries.len())
            .field("free_registries", &inner.free_registries.len())
            .field("handles", &inner.handles)
            .finish()
    }
}

impl Default for EventsStore {
    fn default() -> Self {
        Self::new(SignalHub::new())
    }
}

impl EventsStore {
    /// Create a store that routes signals through `hub`.
    #[must_use]
    pub fn new(hub: SignalHub) -> Self {
        Self::with_config(hub, EventsStoreConfig::default())
    }

    #[must_use]
    pub fn with_config(hub: SignalHub, config: EventsStoreConfig) -> Self {
        Self {
            inner: RefCell::new(StoreInner {
                registries: AHashMap::new(),
                free_registries: FreeList::new(config.max_free_registries),
                handles: SubscriptionPool::new(config.handles),
            }),
            hub,
        }
    }

    /// Convenience for the common `Rc<EventsStore>` sharing.
    #[must_use]
    pub fn shared(hub: SignalHub) -> Rc<Self> {
        Rc::new(Self::new(hub))
    }

    /// The hub signal subscriptions are bound to.
    #[must_use]
    pub fn hub(&self) -> &SignalHub {
        &self.hub
    }

    /// Subscribe `handler` to `event` on behalf of `owner`.
    pub fn subscribe_event<A: 'static>(
        &self,
        owner: OwnerId,
        event: &Event<A>,
        handler: impl Fn(&A) + 'static,
    ) {
        let mut inner = self.inner.borrow_mut();
        let StoreInner {
            registries,
            free_registries,
            handles,
        } = &mut *inner;
        registries
            .entry(owner)
            .or_insert_with(|| free_registries.acquire_or(SubscriptionRegistry::new))
            .subscribe(handles, event, Rc::new(handler));
        tracing::trace!(
            message = "events.subscribe",
            %owner,
            source = std::any::type_name::<A>()
        );
    }

    /// Subscribe `handler` to signals of type `T` on behalf of `owner`.
    pub fn subscribe_signal<T: 'static>(&self, owner: OwnerId, handler: impl Fn(&T) + 'static) {
        let mut inner = self.inner.borrow_mut();
        let StoreInner {
            registries,
            free_registries,
            handles,
        } = &mut *inner;
        registries
            .entry(owner)
            .or_insert_with(|| free_registries.acquire_or(SubscriptionRegistry::new))
            .subscribe_signal(handles, &self.hub, Rc::new(handler));
        tracing::trace!(
            message = "events.subscribe_signal",
            %owner,
            signal = std::any::type_name::<T>()
        );
    }

    /// Broadcast a signal through the store's hub.
    pub fn fire_signal<T: 'static>(&self, signal: &T) {
        self.hub.fire(signal);
    }

    /// Release every subscription held by `owner`.
    pub fn unsubscribe(&self, owner: OwnerId) {
        let removed = self.inner.borrow_mut().registries.remove(&owner);
        let Some(mut registry) = removed else {
            return;
        };

        let mut detached = registry.take_all();
        for handle in &mut detached {
            handle.reset();
        }
        let released = detached.len();

        let mut inner = self.inner.borrow_mut();
        for handle in detached {
            inner.handles.shelve(handle);
        }
        inner.free_registries.release(registry);
        drop(inner);

        tracing::debug!(message = "events.unsubscribe", %owner, released);
    }

    /// Number of live subscriptions held by `owner`.
    #[must_use]
    pub fn subscription_count(&self, owner: OwnerId) -> usize {
        self.inner
            .borrow()
            .registries
            .get(&owner)
            .map_or(0, SubscriptionRegistry::len)
    }

    /// Whether `owner` currently holds any subscription.
    #[must_use]
    pub fn has_owner(&self, owner: OwnerId) -> bool {
        self.inner.borrow().registries.contains_key(&owner)
    }

    /// Number of owners with live subscriptions.
    #[must_use]
    pub fn owner_count(&self) -> usize {
        self.inner.borrow().registries.len()
    }

    /// Idle handles retained by the pool.
    #[must_use]
    pub fn idle_handles(&self) -> usize {
        self.inner.borrow().handles.idle_count()
    }

    /// Handle pool traffic.
    #[must_use]
    pub fn handle_stats(&self) -> PoolStats {
        self.inner.borrow().handles.stats()
    }

    /// Registry pool traffic.
    #[must_use]
    pub fn registry_stats(&self) -> PoolStats {
        self.inner.borrow().free_registries.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::sync::{Arc, Mutex};
    use tracing::Subscriber;
    use tracing_subscriber::Layer;
    use tracing_subscriber::layer::{Context, SubscriberExt};

    struct Saved;

    fn counter() -> (Rc<Cell<u32>>, impl Fn() + Clone + 'static) {
        let hits = Rc::new(Cell::new(0u32));
        let h = Rc::clone(&hits);
        (hits, move || h.set(h.get() + 1))
    }

    #[test]
    fn unsubscribe_releases_events_and_signals() {
        let store = EventsStore::default();
        let owner = OwnerId::next();
        let clicked: Event<()> = Event::new();
        let (hits, bump) = counter();

        let b = bump.clone();
        store.subscribe_event(owner, &clicked, move |_| b());
        store.subscribe_signal::<Saved>(owner, move |_| bump());
        assert_eq!(store.subscription_count(owner), 2);

        clicked.fire();
        store.fire_signal(&Saved);
        assert_eq!(hits.get(), 2);

        store.unsubscribe(owner);
        clicked.fire();
        store.fire_signal(&Saved);
        assert_eq!(hits.get(), 2);
        assert!(!store.has_owner(owner));
        assert_eq!(clicked.listener_count(), 0);
        assert_eq!(store.hub().listener_count::<Saved>(), 0);
    }

    #[test]
    fn owners_are_isolated() {
        let store = EventsStore::default();
        let a = OwnerId::next();
        let b = OwnerId::next();
        let event: Event<u8> = Event::new();
        let (hits, bump) = counter();

        let f = bump.clone();
        store.subscribe_event(a, &event, move |_| f());
        store.subscribe_event(b, &event, move |_| bump());

        store.unsubscribe(a);
        event.emit(&0);
        assert_eq!(hits.get(), 1);
        assert_eq!(store.owner_count(), 1);
    }

    #[test]
    fn unknown_owner_is_noop() {
        let store = EventsStore::default();
        store.unsubscribe(OwnerId::next());
        assert_eq!(store.owner_count(), 0);
    }

    #[test]
    fn handles_and_registries_are_recycled() {
        let store = EventsStore::default();
        let event: Event<u8> = Event::new();

        for _ in 0..5 {
            let owner = OwnerId::next();
            store.subscribe_event(owner, &event, |_| {});
            store.subscribe_event(owner, &event, |_| {});
            store.unsubscribe(owner);
        }

        let handles = store.handle_stats();
        assert_eq!(handles.created, 2);
        assert_eq!(handles.reused, 8);
        assert_eq!(store.registry_stats().created, 1);
        assert_eq!(store.registry_stats().reused, 4);
        assert_eq!(store.idle_handles(), 2);
    }

    #[test]
    fn handler_may_unsubscribe_its_owner() {
        let store = Rc::new(EventsStore::default());
        let owner = OwnerId::next();
        let event: Event<()> = Event::new();
        let (hits, bump) = counter();

        let s = Rc::downgrade(&store);
        store.subscribe_event(owner, &event, move |_| {
            bump();
            if let Some(store) = s.upgrade() {
                store.unsubscribe(owner);
            }
        });

        event.fire();
        event.fire();
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn dropping_a_handler_may_reenter_the_store() {
        struct Reenter {
            store: Rc<EventsStore>,
            other: OwnerId,
        }
        impl Drop for Reenter {
            fn drop(&mut self) {
                self.store.unsubscribe(self.other);
            }
        }

        let store = Rc::new(EventsStore::default());
        let owner = OwnerId::next();
        let other = OwnerId::next();
        let event: Event<()> = Event::new();
        store.subscribe_event(other, &event, |_| {});

        let guard = Reenter {
            store: Rc::clone(&store),
            other,
        };
        store.subscribe_event(owner, &event, move |_| {
            let _held = &guard;
        });

        store.unsubscribe(owner);
        assert!(!store.has_owner(other));
    }

    #[test]
    fn bounded_registry_retention() {
        let store = EventsStore::with_config(
            SignalHub::new(),
            EventsStoreConfig::default().with_max_free_registries(0),
        );
        let owner = OwnerId::next();
        let event: Event<()> = Event::new();
        store.subscribe_event(owner, &event, |_| {});
        store.unsubscribe(owner);
        assert_eq!(store.registry_stats().dropped, 1);
    }

    // -- tracing --------------------------------------------------------

    #[derive(Default)]
    struct StoreTraceState {
        subscribes: u32,
        unsubscribes: u32,
    }

    struct StoreTraceCapture {
        state: Arc<Mutex<StoreTraceState>>,
    }

    impl<S> Layer<S> for StoreTraceCapture
    where
        S: Subscriber + for<'lookup> tracing_subscriber::registry::LookupSpan<'lookup>,
    {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            struct Msg {
                message: Option<String>,
            }
            impl tracing::field::Visit for Msg {
                fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
                    if field.name() == "message" {
                        self.message = Some(value.to_string());
                    }
                }

                fn record_debug(
                    &mut self,
                    field: &tracing::field::Field,
                    value: &dyn std::fmt::Debug,
                ) {
                    if field.name() == "message" {
                        self.message = Some(format!("{value:?}").trim_matches('"').to_string());
                    }
                }
            }
            let mut msg = Msg { message: None };
            event.record(&mut msg);
            let mut state = self.state.lock().expect("store trace lock");
            match msg.message.as_deref() {
                Some("events.subscribe") => state.subscribes += 1,
                Some("events.unsubscribe") => state.unsubscribes += 1,
                _ => {}
            }
        }
    }

    #[test]
    fn subscribe_and_unsubscribe_are_traced() {
        let state = Arc::new(Mutex::new(StoreTraceState::default()));
        let subscriber = tracing_subscriber::registry().with(StoreTraceCapture {
            state: Arc::clone(&state),
        });
        let _guard = tracing::subscriber::set_default(subscriber);

        let store = EventsStore::default();
        let owner = OwnerId::next();
        let event: Event<()> = Event::new();
        store.subscribe_event(owner, &event, |_| {});
        store.unsubscribe(owner);
        store.unsubscribe(owner);

        let snapshot = state.lock().expect("store trace lock");
        assert_eq!(snapshot.subscribes, 1);
        assert_eq!(snapshot.unsubscribes, 1, "unknown owner is not traced");
    }
}
