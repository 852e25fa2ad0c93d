#![forbid(unsafe_code)]

//! Widget construction and pooling.
//!
//! [`WidgetFactory`] builds widgets through [`Construct`] and keeps a free
//! stack per widget type for widgets that are spawned rather than created.
//!
//! # Invariants
//!
//! 1. A widget in a free stack is never handed out twice: `spawn` pops it,
//!    and despawning a widget that is already stacked is ignored.
//! 2. `on_despawned` runs before a widget enters its stack, and clears the
//!    widget's view and data.
//! 3. `on_spawned` runs on every spawn, reused or fresh.
//!
//! # Failure Modes
//!
//! - **Pooled composites**: a stacked composite keeps its `ChildWidgets`,
//!   which holds a factory handle, so stacks can keep the factory alive.
//!   Call [`WidgetFactory::clear_pools`] when the owning scope ends.

use std::any::{Any, TypeId, type_name};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use ahash::AHashMap;
use mvp_core::owner::OwnerId;
use mvp_core::pool::{FreeList, PoolStats};
use mvp_events::EventsStore;

use crate::context::{Resources, WidgetContext};
use crate::widget::Widget;

/// Construction through the factory.
///
/// This is the seam where an application wires dependencies: read them from
/// the context.
pub trait Construct: Sized {
    fn construct(ctx: &WidgetContext) -> Self;
}

/// Factory settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidgetFactoryConfig {
    /// Despawned widgets kept per widget type; extra despawns are dropped.
    pub max_pooled_per_type: usize,
}

impl Default for WidgetFactoryConfig {
    fn default() -> Self {
        Self {
            max_pooled_per_type: 64,
        }
    }
}

impl WidgetFactoryConfig {
    #[must_use]
    pub fn with_max_pooled_per_type(mut self, max: usize) -> Self {
        self.max_pooled_per_type = max;
        self
    }
}

/// A spawned widget with its type erased, so heterogeneous pooled widgets
/// can share one list and be despawned without naming their type.
#[derive(Clone)]
pub struct PooledWidget {
    widget: Rc<RefCell<dyn Widget>>,
    erased: Rc<dyn Any>,
    kind: TypeId,
    type_name: &'static str,
}

impl fmt::Debug for PooledWidget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PooledWidget")
            .field("type", &self.type_name)
            .finish()
    }
}

impl PooledWidget {
    #[must_use]
    pub fn new<W: Widget>(widget: Rc<RefCell<W>>) -> Self {
        Self {
            widget: Rc::clone(&widget) as Rc<RefCell<dyn Widget>>,
            erased: widget,
            kind: TypeId::of::<W>(),
            type_name: type_name::<W>(),
        }
    }

    #[must_use]
    pub fn widget(&self) -> &Rc<RefCell<dyn Widget>> {
        &self.widget
    }

    #[must_use]
    pub fn owner_id(&self) -> OwnerId {
        self.widget.borrow().owner_id()
    }

    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Whether both wrap the same widget instance.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.erased, &other.erased)
    }
}

struct FactoryInner {
    events: Rc<EventsStore>,
    resources: Resources,
    config: WidgetFactoryConfig,
    stacks: RefCell<AHashMap<TypeId, FreeList<Rc<dyn Any>>>>,
}

/// Creates widgets and recycles pooled ones by type.
///
/// Cloning shares the same stacks.
#[derive(Clone)]
pub struct WidgetFactory {
    inner: Rc<FactoryInner>,
}

impl fmt::Debug for WidgetFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetFactory")
            .field("config", &self.inner.config)
            .field("types", &self.inner.stacks.borrow().len())
            .field("resources", &self.inner.resources)
            .finish()
    }
}

impl WidgetFactory {
    #[must_use]
    pub fn new(events: Rc<EventsStore>, resources: Resources) -> Self {
        Self::with_config(events, resources, WidgetFactoryConfig::default())
    }

    #[must_use]
    pub fn with_config(
        events: Rc<EventsStore>,
        resources: Resources,
        config: WidgetFactoryConfig,
    ) -> Self {
        Self {
            inner: Rc::new(FactoryInner {
                events,
                resources,
                config,
                stacks: RefCell::new(AHashMap::new()),
            }),
        }
    }

    /// Context passed to [`Construct::construct`].
    #[must_use]
    pub fn context(&self) -> WidgetContext {
        WidgetContext::new(
            Rc::clone(&self.inner.events),
            self.clone(),
            self.inner.resources.clone(),
        )
    }

    #[must_use]
    pub fn events(&self) -> &Rc<EventsStore> {
        &self.inner.events
    }

    #[must_use]
    pub fn config(&self) -> WidgetFactoryConfig {
        self.inner.config
    }

    /// Construct a fresh, non-pooled widget.
    pub fn create<W: Widget + Construct>(&self) -> Rc<RefCell<W>> {
        Rc::new(RefCell::new(W::construct(&self.context())))
    }

    /// Pop a despawned `W` or construct a new one, then run `on_spawned`.
    pub fn spawn<W: Widget + Construct>(&self) -> Rc<RefCell<W>> {
        let popped = self
            .inner
            .stacks
            .borrow_mut()
            .get_mut(&TypeId::of::<W>())
            .and_then(FreeList::try_acquire);
        let reused = popped.is_some();
        let widget = match popped.map(|erased| erased.downcast::<RefCell<W>>()) {
            Some(Ok(widget)) => widget,
            _ => self.create::<W>(),
        };
        widget.borrow_mut().on_spawned();
        tracing::trace!(message = "widget.spawn", widget = type_name::<W>(), reused);
        widget
    }

    /// Run `on_despawned` and push `widget` onto its type's free stack.
    pub fn despawn<W: Widget>(&self, widget: Rc<RefCell<W>>) {
        self.despawn_pooled(PooledWidget::new(widget));
    }

    /// Type-erased [`despawn`](Self::despawn).
    pub fn despawn_pooled(&self, widget: PooledWidget) {
        if self.is_pooled(&widget) {
            tracing::warn!(message = "widget.despawn_twice", widget = widget.type_name);
            return;
        }
        widget.widget.borrow_mut().on_despawned();

        let cap = self.inner.config.max_pooled_per_type;
        let kept = self
            .inner
            .stacks
            .borrow_mut()
            .entry(widget.kind)
            .or_insert_with(|| FreeList::new(cap))
            .release(widget.erased);
        tracing::trace!(message = "widget.despawn", widget = widget.type_name, kept);
    }

    /// Whether `widget` is currently sitting in a free stack.
    #[must_use]
    pub fn is_pooled(&self, widget: &PooledWidget) -> bool {
        self.inner
            .stacks
            .borrow()
            .get(&widget.kind)
            .is_some_and(|stack| stack.any(|entry| Rc::ptr_eq(entry, &widget.erased)))
    }

    /// Despawned widgets waiting in the stack for `W`.
    #[must_use]
    pub fn pooled_count<W: Widget>(&self) -> usize {
        self.inner
            .stacks
            .borrow()
            .get(&TypeId::of::<W>())
            .map_or(0, FreeList::len)
    }

    /// Stack traffic for `W`.
    #[must_use]
    pub fn stats<W: Widget>(&self) -> PoolStats {
        self.inner
            .stacks
            .borrow()
            .get(&TypeId::of::<W>())
            .map_or_else(PoolStats::default, FreeList::stats)
    }

    /// Drop every despawned widget.
    pub fn clear_pools(&self) {
        let drained = std::mem::take(&mut *self.inner.stacks.borrow_mut());
        drop(drained);
    }
}
