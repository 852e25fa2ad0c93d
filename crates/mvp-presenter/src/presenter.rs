#![forbid(unsafe_code)]

//! The presenter state machine.
//!
//! A screen is written by implementing [`Screen`]: it exposes its
//! [`PresenterCore`] and overrides the hooks it needs. The blanket
//! `impl Presenter for S` supplies the state machine, and a screen router
//! drives screens through `dyn Presenter<K>`.
//!
//! # State Machine
//!
//! ```text
//! NotInitialized ──activate──► Active ◄──activate── Hidden
//!                                │  └────hide──────►  │
//!                           deactivate            deactivate
//!                                ▼                    │
//!                             Inactive ◄──────────────┘
//!                                └──activate──► Active
//! ```
//!
//! `activate` runs a gated sequence of steps:
//!
//! 1. from `NotInitialized` or `Inactive`: activate the model, then
//!    `customize_model`;
//! 2. from `NotInitialized`: `create_widgets`, move to `Inactive`;
//! 3. from `Inactive`: `subscribe_events`, `on_activate`, `bind_widgets`,
//!    activate non-manual widgets (owned, then pooled), `on_widgets_activated`;
//! 4. from `Hidden`: the model's `on_show`, then `on_show`;
//! 5. always: move to `Active`, show the view.
//!
//! Step 2 falls through into step 3, so a first activation runs every setup
//! step exactly once, and a redundant activation of an `Active` screen only
//! re-shows the view.
//!
//! `deactivate` (from `Active` or `Hidden` only): deactivate the model,
//! `on_deactivate`, release the presenter's subscriptions, deactivate owned
//! widgets, deactivate and despawn pooled widgets, move to `Inactive`, hide
//! the view.
//!
//! `hide` (from `Active` only): `on_hide`, move to `Hidden`. Widgets and
//! subscriptions stay live.
//!
//! # Failure Modes
//!
//! - **No view attached**: the show and hide steps are skipped with a
//!   warning; every other step runs.

use std::any::{Any, type_name};
use std::fmt;
use std::rc::Rc;

use mvp_core::owner::OwnerId;

use crate::base::{PresenterCore, deactivate_unless_manual};
use crate::error::{PresenterError, Result};
use crate::model::Model;
use crate::params::ScreenParams;
use crate::state::PresenterState;
use crate::view::ScreenView;

/// Hooks and state access for a concrete screen.
pub trait Screen: 'static {
    /// Key a screen router uses to find this presenter.
    type Kind: Copy + Eq + fmt::Debug + 'static;
    type Model: Model;
    type View: ScreenView;

    fn kind(&self) -> Self::Kind;

    fn core(&self) -> &PresenterCore<Self::Model, Self::View>;

    fn core_mut(&mut self) -> &mut PresenterCore<Self::Model, Self::View>;

    /// Runs right after the model is activated.
    fn customize_model(&mut self) {}

    /// Register widgets with `create_widget`/`spawn_widget`. Runs once.
    fn create_widgets(&mut self) {}

    fn subscribe_events(&mut self) {}

    fn on_activate(&mut self) {}

    /// Bind widgets to views and data before they are activated.
    fn bind_widgets(&mut self) {}

    fn on_widgets_activated(&mut self) {}

    /// A hidden screen is shown again.
    fn on_show(&mut self) {}

    fn on_deactivate(&mut self) {}

    fn on_hide(&mut self) {}

    /// Runs before each widget is deactivated during teardown or removal.
    fn on_before_widget_deactivated(&mut self, _widget: OwnerId) {}

    /// Remove an owned widget early and deactivate it. Returns `false` if
    /// `widget` is not an owned widget of this presenter.
    fn remove_widget(&mut self, widget: OwnerId) -> bool
    where
        Self: Sized,
    {
        let Some(entry) = self.core_mut().detach_widget(widget) else {
            return false;
        };
        self.on_before_widget_deactivated(widget);
        deactivate_unless_manual(&entry);
        true
    }

    /// Remove a pooled widget early, deactivate it and despawn it. Returns
    /// `false` if `widget` is not a pooled widget of this presenter.
    fn despawn_widget(&mut self, widget: OwnerId) -> bool
    where
        Self: Sized,
    {
        let Some(entry) = self.core_mut().detach_pooled(widget) else {
            return false;
        };
        self.on_before_widget_deactivated(widget);
        deactivate_unless_manual(entry.widget());
        self.core().factory().despawn_pooled(entry);
        true
    }
}

/// Object-safe presenter surface used by screen routers.
pub trait Presenter<K>: 'static {
    fn kind(&self) -> K;

    fn state(&self) -> PresenterState;

    /// Attach a type-erased screen view.
    fn attach_view(&mut self, view: Rc<dyn Any>) -> Result<()>;

    fn set_open_params(&mut self, params: Option<ScreenParams>);

    fn activate(&mut self);

    fn deactivate(&mut self);

    fn hide(&mut self);
}

impl<S: Screen> Presenter<S::Kind> for S {
    fn kind(&self) -> S::Kind {
        Screen::kind(self)
    }

    fn state(&self) -> PresenterState {
        self.core().state()
    }

    fn attach_view(&mut self, view: Rc<dyn Any>) -> Result<()> {
        let view = view
            .downcast::<S::View>()
            .map_err(|_| PresenterError::ViewTypeMismatch {
                expected: type_name::<S::View>(),
            })?;
        self.core_mut().set_view(view);
        Ok(())
    }

    fn set_open_params(&mut self, params: Option<ScreenParams>) {
        self.core_mut().set_open_params(params);
    }

    fn activate(&mut self) {
        let from = self.core().state();

        if matches!(
            self.core().state(),
            PresenterState::NotInitialized | PresenterState::Inactive
        ) {
            self.core_mut().activate_model();
            self.customize_model();
        }

        if self.core().state() == PresenterState::NotInitialized {
            self.create_widgets();
            self.core_mut().set_state(PresenterState::Inactive);
        }

        if self.core().state() == PresenterState::Inactive {
            self.subscribe_events();
            self.on_activate();
            self.bind_widgets();
            self.core().activate_widgets();
            self.on_widgets_activated();
        }

        if self.core().state() == PresenterState::Hidden {
            self.core_mut().model_mut().on_show();
            self.on_show();
        }

        self.core_mut().set_state(PresenterState::Active);
        tracing::debug!(
            message = "presenter.activate",
            kind = ?Screen::kind(self),
            from = %from,
            to = %PresenterState::Active
        );

        match self.core().view() {
            Some(view) => view.show(),
            None => tracing::warn!(
                message = "presenter.no_view",
                kind = ?Screen::kind(self),
                step = "show"
            ),
        }
    }

    fn deactivate(&mut self) {
        let from = self.core().state();
        if !from.is_live() {
            return;
        }

        self.core_mut().model_mut().deactivate();
        self.on_deactivate();
        self.core().unsubscribe_events();

        let owned = self.core_mut().take_widgets();
        for widget in &owned {
            let owner = widget.borrow().owner_id();
            self.on_before_widget_deactivated(owner);
            deactivate_unless_manual(widget);
        }
        self.core_mut().restore_widgets(owned);

        let pooled = self.core_mut().take_pooled();
        let despawned = pooled.len();
        for widget in pooled {
            self.on_before_widget_deactivated(widget.owner_id());
            deactivate_unless_manual(widget.widget());
            self.core().factory().despawn_pooled(widget);
        }

        self.core_mut().set_state(PresenterState::Inactive);
        tracing::debug!(
            message = "presenter.deactivate",
            kind = ?Screen::kind(self),
            from = %from,
            despawned
        );

        match self.core().view() {
            Some(view) => view.hide(),
            None => tracing::warn!(
                message = "presenter.no_view",
                kind = ?Screen::kind(self),
                step = "hide"
            ),
        }
    }

    fn hide(&mut self) {
        if self.core().state() != PresenterState::Active {
            return;
        }
        self.on_hide();
        self.core_mut().set_state(PresenterState::Hidden);
        tracing::debug!(
            message = "presenter.hide",
            kind = ?Screen::kind(self)
        );
    }
}
