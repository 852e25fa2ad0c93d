#![forbid(unsafe_code)]

//! Typed signal hub.
//!
//! A [`SignalHub`] delivers broadcasts keyed by the signal's Rust type rather
//! than by a particular source instance. One hub is constructed per
//! application scope and handed to every store that needs it.

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use ahash::AHashMap;

use crate::event::{Event, Handler, ListenerId};

type Channels = RefCell<AHashMap<TypeId, Box<dyn Any>>>;

/// Broadcast hub for typed signals.
///
/// Cloning a `SignalHub` shares the same channels.
#[derive(Clone, Default)]
pub struct SignalHub {
    channels: Rc<Channels>,
}

impl fmt::Debug for SignalHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignalHub")
            .field("channels", &self.channels.borrow().len())
            .finish()
    }
}

impl SignalHub {
    /// Create an empty hub.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn channel<T: 'static>(&self) -> Event<T> {
        let mut channels = self.channels.borrow_mut();
        let slot = channels
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(Event::<T>::new()));
        match slot.downcast_ref::<Event<T>>() {
            Some(event) => event.clone(),
            // Keyed by `TypeId::of::<T>()`, so the slot always holds `Event<T>`.
            None => unreachable!("signal channel stored under a foreign TypeId"),
        }
    }

    fn existing_channel<T: 'static>(&self) -> Option<Event<T>> {
        self.channels
            .borrow()
            .get(&TypeId::of::<T>())
            .and_then(|slot| slot.downcast_ref::<Event<T>>())
            .cloned()
    }

    /// Subscribe `handler` to signals of type `T`.
    pub fn add_listener<T: 'static>(&self, handler: Handler<T>) -> ListenerId {
        self.channel::<T>().add_handler(handler)
    }

    /// Remove a handler previously added for `T`.
    pub fn remove_listener<T: 'static>(&self, id: ListenerId) -> bool {
        self.existing_channel::<T>()
            .is_some_and(|channel| channel.remove_listener(id))
    }

    /// Broadcast `signal` to every listener of `T`.
    pub fn fire<T: 'static>(&self, signal: &T) {
        // The map borrow ends before any handler runs.
        let channel = self.existing_channel::<T>();
        if let Some(channel) = channel {
            channel.emit(signal);
        }
    }

    /// Number of listeners registered for `T`.
    #[must_use]
    pub fn listener_count<T: 'static>(&self) -> usize {
        self.existing_channel::<T>()
            .map_or(0, |channel| channel.listener_count())
    }

    /// Weak handle used by subscription handles so they never extend the
    /// hub's lifetime.
    #[must_use]
    pub fn downgrade(&self) -> WeakSignalHub {
        WeakSignalHub {
            channels: Rc::downgrade(&self.channels),
        }
    }
}

/// Weak counterpart of [`SignalHub`].
#[derive(Clone, Default)]
pub struct WeakSignalHub {
    channels: Weak<Channels>,
}

impl fmt::Debug for WeakSignalHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakSignalHub")
            .field("alive", &(self.channels.strong_count() > 0))
            .finish()
    }
}

impl WeakSignalHub {
    /// Upgrade to a strong hub if it still exists.
    #[must_use]
    pub fn upgrade(&self) -> Option<SignalHub> {
        self.channels.upgrade().map(|channels| SignalHub { channels })
    }
}
