#![forbid(unsafe_code)]

//! Shared widget state.
//!
//! [`WidgetBase`] holds what every widget has: its owner identity, the
//! events store it subscribes through, the bound view and data, props and
//! the lifecycle flags. Behavior lives in [`WidgetBehavior`](crate::WidgetBehavior);
//! the base only stores and exposes state.

use std::fmt;
use std::rc::Rc;

use mvp_core::event::Event;
use mvp_core::owner::OwnerId;
use mvp_events::EventsStore;

use crate::context::WidgetContext;
use crate::props::WidgetProps;
use crate::view::WidgetView;

/// State common to every widget bound to a view of type `V`.
pub struct WidgetBase<V: WidgetView> {
    owner: OwnerId,
    events: Rc<EventsStore>,
    view: Option<Rc<V>>,
    data: Option<V::Data>,
    props: Option<WidgetProps>,
    activated: bool,
    manual_lifecycle: bool,
}

impl<V: WidgetView> fmt::Debug for WidgetBase<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetBase")
            .field("owner", &self.owner)
            .field("bound", &self.view.is_some())
            .field("activated", &self.activated)
            .field("manual_lifecycle", &self.manual_lifecycle)
            .finish()
    }
}

impl<V: WidgetView> WidgetBase<V> {
    /// Create an unbound base with a fresh owner identity.
    #[must_use]
    pub fn new(ctx: &WidgetContext) -> Self {
        Self::with_events(Rc::clone(ctx.events()))
    }

    #[must_use]
    pub fn with_events(events: Rc<EventsStore>) -> Self {
        Self {
            owner: OwnerId::next(),
            events,
            view: None,
            data: None,
            props: None,
            activated: false,
            manual_lifecycle: false,
        }
    }

    #[must_use]
    pub fn owner(&self) -> OwnerId {
        self.owner
    }

    #[must_use]
    pub fn events(&self) -> &Rc<EventsStore> {
        &self.events
    }

    /// The bound view, while it is still alive.
    #[must_use]
    pub fn view(&self) -> Option<&Rc<V>> {
        self.view.as_ref().filter(|view| view.is_alive())
    }

    /// Whether a view is bound, alive or not.
    #[must_use]
    pub fn has_view(&self) -> bool {
        self.view.is_some()
    }

    #[must_use]
    pub fn data(&self) -> Option<&V::Data> {
        self.data.as_ref()
    }

    #[must_use]
    pub fn props(&self) -> Option<&WidgetProps> {
        self.props.as_ref()
    }

    #[must_use]
    pub fn is_activated(&self) -> bool {
        self.activated
    }

    #[must_use]
    pub fn is_manual_lifecycle(&self) -> bool {
        self.manual_lifecycle
    }

    /// Subscribe `handler` to `event` under this widget's owner identity.
    pub fn subscribe<A: 'static>(&self, event: &Event<A>, handler: impl Fn(&A) + 'static) {
        self.events.subscribe_event(self.owner, event, handler);
    }

    /// Subscribe `handler` to signals of type `T` under this widget's owner
    /// identity.
    pub fn subscribe_signal<T: 'static>(&self, handler: impl Fn(&T) + 'static) {
        self.events.subscribe_signal(self.owner, handler);
    }

    /// Release every subscription held under this widget's owner identity.
    pub fn unsubscribe_events(&self) {
        self.events.unsubscribe(self.owner);
    }

    pub(crate) fn set_binding(&mut self, view: Rc<V>, data: V::Data) {
        self.view = Some(view);
        self.data = Some(data);
    }

    pub(crate) fn set_data(&mut self, data: V::Data) {
        self.data = Some(data);
    }

    pub(crate) fn detach_view(&mut self) {
        self.view = None;
    }

    pub(crate) fn clear_binding(&mut self) {
        self.view = None;
        self.data = None;
    }

    pub(crate) fn set_props(&mut self, props: Option<WidgetProps>) {
        self.props = props;
    }

    pub(crate) fn set_manual_lifecycle(&mut self, manual: bool) {
        self.manual_lifecycle = manual;
    }

    /// Tell the view to present the current data. Returns `false` when no
    /// view or no data is bound.
    pub(crate) fn activate_view(&self) -> bool {
        match (&self.view, &self.data) {
            (Some(view), Some(data)) => {
                view.activate(data);
                true
            }
            _ => false,
        }
    }

    /// Tell the view to stop presenting. Returns `false` when no view is
    /// bound.
    pub(crate) fn deactivate_view(&self) -> bool {
        match &self.view {
            Some(view) => {
                view.deactivate();
                true
            }
            None => false,
        }
    }

    pub(crate) fn set_activated(&mut self, activated: bool) {
        self.activated = activated;
    }
}
