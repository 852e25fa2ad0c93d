#![forbid(unsafe_code)]

//! Construction context handed to widgets.
//!
//! Widgets declare their dependencies by reading them from the
//! [`WidgetContext`] in [`Construct::construct`](crate::Construct). The
//! context always provides the events store and the widget factory; anything
//! else comes from [`Resources`], a typed map filled by the application.

use std::any::{Any, TypeId, type_name};
use std::fmt;
use std::rc::Rc;

use ahash::AHashMap;
use mvp_events::EventsStore;

use crate::factory::WidgetFactory;

/// Typed map of shared dependencies.
#[derive(Clone, Default)]
pub struct Resources {
    map: Rc<AHashMap<TypeId, (Rc<dyn Any>, &'static str)>>,
}

impl fmt::Debug for Resources {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(self.map.values().map(|(_, name)| name))
            .finish()
    }
}

impl Resources {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `value` as the resource of type `T`, replacing any previous
    /// one.
    #[must_use]
    pub fn with<T: 'static>(mut self, value: Rc<T>) -> Self {
        Rc::make_mut(&mut self.map).insert(TypeId::of::<T>(), (value, type_name::<T>()));
        self
    }

    /// The resource of type `T`, if registered.
    #[must_use]
    pub fn get<T: 'static>(&self) -> Option<Rc<T>> {
        let (value, _) = self.map.get(&TypeId::of::<T>())?;
        Rc::clone(value).downcast::<T>().ok()
    }

    #[must_use]
    pub fn contains<T: 'static>(&self) -> bool {
        self.map.contains_key(&TypeId::of::<T>())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Everything a widget may depend on at construction.
#[derive(Debug, Clone)]
pub struct WidgetContext {
    events: Rc<EventsStore>,
    factory: WidgetFactory,
    resources: Resources,
}

impl WidgetContext {
    pub(crate) fn new(events: Rc<EventsStore>, factory: WidgetFactory, resources: Resources) -> Self {
        Self {
            events,
            factory,
            resources,
        }
    }

    #[must_use]
    pub fn events(&self) -> &Rc<EventsStore> {
        &self.events
    }

    #[must_use]
    pub fn factory(&self) -> &WidgetFactory {
        &self.factory
    }

    #[must_use]
    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    /// Shorthand for `resources().get::<T>()`.
    #[must_use]
    pub fn resource<T: 'static>(&self) -> Option<Rc<T>> {
        self.resources.get::<T>()
    }
}
