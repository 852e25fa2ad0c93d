#![forbid(unsafe_code)]

//! The widget capability and the lifecycle that drives it.
//!
//! [`Widget`] is the object-safe surface presenters and composites use to
//! drive heterogeneous widgets. Widgets are written by implementing
//! [`WidgetBehavior`]: the blanket `impl Widget for B` supplies the
//! lifecycle, and the behavior supplies hooks.
//!
//! # Lifecycle
//!
//! Transitions: Created → Bound (`bind`) → Activated (`activate`) →
//! Deactivated (`deactivate`) → Bound again (`rebind`).
//!
//! `activate`:
//! 1. create child widgets (composites),
//! 2. activate every child,
//! 3. if a view is bound: activate the view with the data, run
//!    `subscribe_events`, mark activated.
//!
//! `deactivate`:
//! 1. release this widget's subscriptions (always, even if never activated),
//! 2. if a view is bound: deactivate it, mark not activated,
//! 3. for each child: run `on_before_child_deactivated`, deactivate it,
//!    despawn it when pooled,
//! 4. run `deactivated`.
//!
//! # Invariants
//!
//! 1. `rebind` is a full deactivate/activate cycle, so subscriptions are
//!    never duplicated across a data swap.
//! 2. A despawned widget holds no view and no data.

use std::rc::Rc;

use mvp_core::owner::OwnerId;

use crate::base::WidgetBase;
use crate::composite::ChildWidgets;
use crate::props::WidgetProps;
use crate::view::{ViewHandle, WidgetView};

/// Object-safe widget surface.
pub trait Widget: 'static {
    /// Identity under which this widget's subscriptions are registered.
    fn owner_id(&self) -> OwnerId;

    fn is_activated(&self) -> bool;

    /// Whether presenters and composites leave activation to the caller.
    fn is_manual_lifecycle(&self) -> bool;

    fn set_manual_lifecycle(&mut self, manual: bool);

    fn set_props(&mut self, props: Option<WidgetProps>);

    fn props(&self) -> Option<&WidgetProps>;

    /// The bound view while it is alive.
    fn view(&self) -> Option<Rc<dyn ViewHandle>>;

    fn activate(&mut self);

    fn deactivate(&mut self);

    /// Called by the factory every time the widget is spawned.
    fn on_spawned(&mut self);

    /// Called by the factory before the widget enters its free stack.
    fn on_despawned(&mut self);
}

/// Hooks and state access for a concrete widget.
///
/// Only `base` and `base_mut` are required. Composite widgets also return
/// their [`ChildWidgets`] from `children` and populate it in
/// `create_widgets`.
pub trait WidgetBehavior: 'static {
    type View: WidgetView;

    fn base(&self) -> &WidgetBase<Self::View>;

    fn base_mut(&mut self) -> &mut WidgetBase<Self::View>;

    /// Register subscriptions through `self.base()`. Runs on every
    /// activation with a bound view.
    fn subscribe_events(&mut self) {}

    /// Create child widgets. Runs at the start of every activation.
    fn create_widgets(&mut self) {}

    /// Child widgets owned by a composite.
    fn children(&mut self) -> Option<&mut ChildWidgets> {
        None
    }

    /// Runs before each child is deactivated.
    fn on_before_child_deactivated(&mut self, _child: OwnerId) {}

    /// Runs at the end of every deactivation.
    fn deactivated(&mut self) {}

    fn spawned(&mut self) {}

    fn despawned(&mut self) {}

    /// Store `view` and `data`, activating right away when `activate` is set
    /// and the widget is not in manual-lifecycle mode.
    fn bind(&mut self, view: Rc<Self::View>, data: <Self::View as WidgetView>::Data, activate: bool)
    where
        Self: Sized,
    {
        self.base_mut().set_binding(view, data);
        if activate && !self.base().is_manual_lifecycle() {
            Widget::activate(self);
        }
    }

    /// Swap the data and run a full deactivate/activate cycle.
    fn rebind(&mut self, data: <Self::View as WidgetView>::Data)
    where
        Self: Sized,
    {
        self.base_mut().set_data(data);
        Widget::deactivate(self);
        Widget::activate(self);
    }

    /// Forget the view without deactivating, for views destroyed out of band.
    fn detach_view(&mut self)
    where
        Self: Sized,
    {
        self.base_mut().detach_view();
    }

    /// Remove one child early: run the before-deactivation hook, deactivate
    /// it and despawn it when pooled. Returns `false` if `child` is not a
    /// child of this widget.
    fn remove_child(&mut self, child: OwnerId) -> bool
    where
        Self: Sized,
    {
        let Some(entry) = self.children().and_then(|children| children.detach(child)) else {
            return false;
        };
        self.on_before_child_deactivated(child);
        entry.widget().borrow_mut().deactivate();
        if let Some(children) = self.children() {
            children.retire(entry);
        }
        true
    }
}

impl<B: WidgetBehavior> Widget for B {
    fn owner_id(&self) -> OwnerId {
        self.base().owner()
    }

    fn is_activated(&self) -> bool {
        self.base().is_activated()
    }

    fn is_manual_lifecycle(&self) -> bool {
        self.base().is_manual_lifecycle()
    }

    fn set_manual_lifecycle(&mut self, manual: bool) {
        self.base_mut().set_manual_lifecycle(manual);
    }

    fn set_props(&mut self, props: Option<WidgetProps>) {
        self.base_mut().set_props(props);
    }

    fn props(&self) -> Option<&WidgetProps> {
        self.base().props()
    }

    fn view(&self) -> Option<Rc<dyn ViewHandle>> {
        self.base()
            .view()
            .map(|view| Rc::clone(view) as Rc<dyn ViewHandle>)
    }

    fn activate(&mut self) {
        let inherited = self.base().props().cloned();
        if let Some(children) = self.children() {
            children.set_inherited_props(inherited);
        }
        self.create_widgets();
        if let Some(children) = self.children() {
            children.activate_all();
        }

        if !self.base().activate_view() {
            return;
        }
        self.subscribe_events();
        self.base_mut().set_activated(true);
        tracing::trace!(
            message = "widget.activate",
            owner = %self.base().owner(),
            widget = std::any::type_name::<B>()
        );
    }

    fn deactivate(&mut self) {
        self.base().unsubscribe_events();
        if self.base().deactivate_view() {
            self.base_mut().set_activated(false);
        }

        let entries = self
            .children()
            .map(ChildWidgets::take_all)
            .unwrap_or_default();
        for entry in entries {
            self.on_before_child_deactivated(entry.owner_id());
            entry.widget().borrow_mut().deactivate();
            if let Some(children) = self.children() {
                children.retire(entry);
            }
        }

        self.deactivated();
        tracing::trace!(
            message = "widget.deactivate",
            owner = %self.base().owner(),
            widget = std::any::type_name::<B>()
        );
    }

    fn on_spawned(&mut self) {
        self.spawned();
    }

    fn on_despawned(&mut self) {
        self.despawned();
        self.base_mut().clear_binding();
    }
}
