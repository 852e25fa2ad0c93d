#![forbid(unsafe_code)]

//! State shared by every presenter.
//!
//! [`PresenterCore`] owns the model, the attached view, the open parameters
//! and the presenter's widgets. It registers subscriptions under its own
//! owner identity and knows how to activate and tear down its widgets; the
//! ordering of those steps lives in [`Presenter`](crate::Presenter).
//!
//! # Invariants
//!
//! 1. Owned widgets live as long as the presenter; they are deactivated on
//!    teardown but stay registered for the next activation.
//! 2. Pooled widgets live for one activation; teardown despawns them and
//!    empties the pooled list.
//! 3. Widgets in manual-lifecycle mode are never activated or deactivated by
//!    the presenter.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use mvp_core::event::Event;
use mvp_core::owner::OwnerId;
use mvp_events::EventsStore;
use mvp_widgets::{Construct, PooledWidget, Widget, WidgetFactory, WidgetProps};

use crate::model::Model;
use crate::params::ScreenParams;
use crate::state::PresenterState;
use crate::view::ScreenView;

/// Model, view, widgets and subscription identity of one presenter.
pub struct PresenterCore<M: Model, V: ScreenView> {
    owner: OwnerId,
    state: PresenterState,
    model: M,
    view: Option<Rc<V>>,
    open_params: Option<ScreenParams>,
    factory: WidgetFactory,
    widgets: Vec<Rc<RefCell<dyn Widget>>>,
    pooled: Vec<PooledWidget>,
}

impl<M: Model, V: ScreenView> fmt::Debug for PresenterCore<M, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PresenterCore")
            .field("owner", &self.owner)
            .field("state", &self.state)
            .field("has_view", &self.view.is_some())
            .field("widgets", &self.widgets.len())
            .field("pooled", &self.pooled)
            .finish()
    }
}

impl<M: Model, V: ScreenView> PresenterCore<M, V> {
    /// A presenter core that creates widgets through `factory` and subscribes
    /// through the factory's events store.
    #[must_use]
    pub fn new(model: M, factory: WidgetFactory) -> Self {
        Self {
            owner: OwnerId::next(),
            state: PresenterState::NotInitialized,
            model,
            view: None,
            open_params: None,
            factory,
            widgets: Vec::new(),
            pooled: Vec::new(),
        }
    }

    /// Identity under which the presenter's own subscriptions are kept.
    #[must_use]
    pub fn owner(&self) -> OwnerId {
        self.owner
    }

    #[must_use]
    pub fn state(&self) -> PresenterState {
        self.state
    }

    #[must_use]
    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    #[must_use]
    pub fn view(&self) -> Option<&Rc<V>> {
        self.view.as_ref()
    }

    /// Attach the screen view. Replaces any earlier view.
    pub fn set_view(&mut self, view: Rc<V>) {
        self.view = Some(view);
    }

    #[must_use]
    pub fn open_params(&self) -> Option<&ScreenParams> {
        self.open_params.as_ref()
    }

    pub fn set_open_params(&mut self, params: Option<ScreenParams>) {
        self.open_params = params;
    }

    #[must_use]
    pub fn factory(&self) -> &WidgetFactory {
        &self.factory
    }

    #[must_use]
    pub fn events(&self) -> &Rc<EventsStore> {
        self.factory.events()
    }

    /// Construct an owned widget and register it with this presenter.
    pub fn create_widget<W: Widget + Construct>(
        &mut self,
        props: Option<WidgetProps>,
        manual_lifecycle: bool,
    ) -> Rc<RefCell<W>> {
        let widget = self.factory.create::<W>();
        {
            let mut w = widget.borrow_mut();
            w.set_manual_lifecycle(manual_lifecycle);
            w.set_props(props);
        }
        self.widgets.push(Rc::clone(&widget) as _);
        widget
    }

    /// Spawn a pooled widget and register it until the next teardown.
    /// A recycled instance gets `manual_lifecycle` reapplied.
    pub fn spawn_widget<W: Widget + Construct>(
        &mut self,
        props: Option<WidgetProps>,
        manual_lifecycle: bool,
    ) -> Rc<RefCell<W>> {
        let widget = self.factory.spawn::<W>();
        {
            let mut w = widget.borrow_mut();
            w.set_manual_lifecycle(manual_lifecycle);
            w.set_props(props);
        }
        self.pooled.push(PooledWidget::new(Rc::clone(&widget)));
        widget
    }

    /// Owned widgets in registration order.
    #[must_use]
    pub fn widgets(&self) -> &[Rc<RefCell<dyn Widget>>] {
        &self.widgets
    }

    /// Pooled widgets in registration order.
    #[must_use]
    pub fn pooled_widgets(&self) -> &[PooledWidget] {
        &self.pooled
    }

    /// Subscribe `handler` to `event` under the presenter's identity.
    pub fn subscribe<A: 'static>(&self, event: &Event<A>, handler: impl Fn(&A) + 'static) {
        self.events().subscribe_event(self.owner, event, handler);
    }

    /// Subscribe `handler` to `event` under another owner identity.
    pub fn subscribe_for<A: 'static>(
        &self,
        owner: OwnerId,
        event: &Event<A>,
        handler: impl Fn(&A) + 'static,
    ) {
        self.events().subscribe_event(owner, event, handler);
    }

    /// Subscribe `handler` to signals of type `T` under the presenter's
    /// identity.
    pub fn subscribe_signal<T: 'static>(&self, handler: impl Fn(&T) + 'static) {
        self.events().subscribe_signal(self.owner, handler);
    }

    /// Release subscriptions kept under `owner`.
    pub fn unsubscribe_owner(&self, owner: OwnerId) {
        self.events().unsubscribe(owner);
    }

    pub(crate) fn set_state(&mut self, state: PresenterState) {
        self.state = state;
    }

    pub(crate) fn activate_model(&mut self) {
        self.model.activate(self.open_params.as_ref());
    }

    pub(crate) fn unsubscribe_events(&self) {
        self.events().unsubscribe(self.owner);
    }

    /// Activate non-manual widgets, owned first, then pooled.
    pub(crate) fn activate_widgets(&self) {
        let pooled = self.pooled.iter().map(PooledWidget::widget);
        for widget in self.widgets.iter().chain(pooled) {
            activate_unless_manual(widget);
        }
    }

    pub(crate) fn take_widgets(&mut self) -> Vec<Rc<RefCell<dyn Widget>>> {
        std::mem::take(&mut self.widgets)
    }

    /// Put owned widgets back after teardown, ahead of any registered while
    /// they were out.
    pub(crate) fn restore_widgets(&mut self, mut widgets: Vec<Rc<RefCell<dyn Widget>>>) {
        widgets.append(&mut self.widgets);
        self.widgets = widgets;
    }

    pub(crate) fn take_pooled(&mut self) -> Vec<PooledWidget> {
        std::mem::take(&mut self.pooled)
    }

    pub(crate) fn detach_widget(&mut self, owner: OwnerId) -> Option<Rc<RefCell<dyn Widget>>> {
        let index = self
            .widgets
            .iter()
            .position(|widget| widget.borrow().owner_id() == owner)?;
        Some(self.widgets.remove(index))
    }

    pub(crate) fn detach_pooled(&mut self, owner: OwnerId) -> Option<PooledWidget> {
        let index = self
            .pooled
            .iter()
            .position(|widget| widget.owner_id() == owner)?;
        Some(self.pooled.remove(index))
    }
}

pub(crate) fn activate_unless_manual(widget: &Rc<RefCell<dyn Widget>>) {
    let manual = widget.borrow().is_manual_lifecycle();
    if !manual {
        widget.borrow_mut().activate();
    }
}

pub(crate) fn deactivate_unless_manual(widget: &Rc<RefCell<dyn Widget>>) {
    let manual = widget.borrow().is_manual_lifecycle();
    if !manual {
        widget.borrow_mut().deactivate();
    }
}
