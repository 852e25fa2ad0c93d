#![forbid(unsafe_code)]

//! Subscription handles.
//!
//! A handle binds one handler to one notification source and can undo that
//! binding later. Handles hold their source weakly: a handle never keeps an
//! event or the signal hub alive, and unsubscribing from a source that has
//! already been dropped is a no-op.
//!
//! Transitions: Idle → Bound (`bind`) → Idle (`unsubscribe` / `reset`).

use std::any::{Any, TypeId};
use std::fmt;
use std::rc::Rc;

use mvp_core::event::{Event, Handler, ListenerId, WeakEvent};
use mvp_core::signal::{SignalHub, WeakSignalHub};

/// Whether a handle currently holds a live binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HandleState {
    #[default]
    Idle,
    Bound,
}

/// Object-safe interface shared by every handle shape.
pub trait Subscription: Any {
    /// Detach from the source. Idempotent.
    fn unsubscribe(&mut self);

    /// Detach and forget the source so the handle can be reused.
    fn reset(&mut self);

    /// Current binding state.
    fn state(&self) -> HandleState;

    /// Pool key for this handle's concrete type.
    fn shape(&self) -> TypeId;

    /// Erase to `Any` for storage in a pool.
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

// ---------------------------------------------------------------------------
// EventHandle
// ---------------------------------------------------------------------------

/// Binding of a handler to an [`Event<A>`].
pub struct EventHandle<A: 'static> {
    source: Option<WeakEvent<A>>,
    listener: Option<ListenerId>,
}

impl<A: 'static> Default for EventHandle<A> {
    fn default() -> Self {
        Self {
            source: None,
            listener: None,
        }
    }
}

impl<A: 'static> fmt::Debug for EventHandle<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventHandle")
            .field("state", &self.state())
            .field("listener", &self.listener)
            .finish()
    }
}

impl<A: 'static> EventHandle<A> {
    /// Create an idle handle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `handler` to `event`, replacing any previous binding.
    pub fn bind(&mut self, event: &Event<A>, handler: Handler<A>) {
        self.reset();
        self.listener = Some(event.add_handler(handler));
        self.source = Some(event.downgrade());
    }

    /// Id of the live binding, if any.
    #[must_use]
    pub fn listener(&self) -> Option<ListenerId> {
        self.listener
    }
}

impl<A: 'static> Subscription for EventHandle<A> {
    fn unsubscribe(&mut self) {
        let Some(id) = self.listener.take() else {
            return;
        };
        if let Some(event) = self.source.as_ref().and_then(WeakEvent::upgrade) {
            event.remove_listener(id);
        }
    }

    fn reset(&mut self) {
        self.unsubscribe();
        self.source = None;
    }

    fn state(&self) -> HandleState {
        if self.listener.is_some() {
            HandleState::Bound
        } else {
            HandleState::Idle
        }
    }

    fn shape(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

// ---------------------------------------------------------------------------
// SignalHandle
// ---------------------------------------------------------------------------

/// Binding of a handler to signals of type `T` on a [`SignalHub`].
pub struct SignalHandle<T: 'static> {
    hub: Option<WeakSignalHub>,
    listener: Option<ListenerId>,
    _signal: std::marker::PhantomData<fn(&T)>,
}

impl<T: 'static> Default for SignalHandle<T> {
    fn default() -> Self {
        Self {
            hub: None,
            listener: None,
            _signal: std::marker::PhantomData,
        }
    }
}

impl<T: 'static> fmt::Debug for SignalHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignalHandle")
            .field("signal", &std::any::type_name::<T>())
            .field("state", &self.state())
            .finish()
    }
}

impl<T: 'static> SignalHandle<T> {
    /// Create an idle handle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `handler` to signals of type `T`, replacing any previous
    /// binding.
    pub fn bind(&mut self, hub: &SignalHub, handler: Handler<T>) {
        self.reset();
        self.listener = Some(hub.add_listener::<T>(handler));
        self.hub = Some(hub.downgrade());
    }
}

impl<T: 'static> Subscription for SignalHandle<T> {
    fn unsubscribe(&mut self) {
        let Some(id) = self.listener.take() else {
            return;
        };
        if let Some(hub) = self.hub.as_ref().and_then(WeakSignalHub::upgrade) {
            hub.remove_listener::<T>(id);
        }
    }

    fn reset(&mut self) {
        self.unsubscribe();
        self.hub = None;
    }

    fn state(&self) -> HandleState {
        if self.listener.is_some() {
            HandleState::Bound
        } else {
            HandleState::Idle
        }
    }

    fn shape(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// Shorthand for wrapping a closure as a shared handler.
pub(crate) fn handler<A>(f: impl Fn(&A) + 'static) -> Handler<A> {
    Rc::new(f)
}
