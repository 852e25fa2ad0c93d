#![forbid(unsafe_code)]

//! Views that journal every call.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use mvp_core::geometry::Transform;
use mvp_presenter::{ScreenView, View};
use mvp_widgets::{ViewHandle, WidgetView};

use crate::journal::{Counter, Journal};

/// Widget view logging `{name}.activate` and `{name}.deactivate`.
pub struct RecordingWidgetView<D> {
    name: &'static str,
    journal: Journal,
    alive: Cell<bool>,
    active: Cell<bool>,
    activations: Counter,
    deactivations: Counter,
    last_data: RefCell<Option<D>>,
}

impl<D> fmt::Debug for RecordingWidgetView<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordingWidgetView")
            .field("name", &self.name)
            .field("alive", &self.alive.get())
            .field("active", &self.active.get())
            .finish()
    }
}

impl<D: Clone + 'static> RecordingWidgetView<D> {
    #[must_use]
    pub fn new(name: &'static str, journal: &Journal) -> Rc<Self> {
        Rc::new(Self {
            name,
            journal: journal.clone(),
            alive: Cell::new(true),
            active: Cell::new(false),
            activations: Counter::default(),
            deactivations: Counter::default(),
            last_data: RefCell::new(None),
        })
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Simulate the host destroying the view out of band.
    pub fn kill(&self) {
        self.alive.set(false);
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    #[must_use]
    pub fn activations(&self) -> usize {
        self.activations.get()
    }

    #[must_use]
    pub fn deactivations(&self) -> usize {
        self.deactivations.get()
    }

    /// Data passed to the latest activation.
    #[must_use]
    pub fn last_data(&self) -> Option<D> {
        self.last_data.borrow().clone()
    }
}

impl<D: Clone + 'static> ViewHandle for RecordingWidgetView<D> {
    fn deactivate(&self) {
        self.active.set(false);
        self.deactivations.bump();
        self.journal.push(format!("{}.deactivate", self.name));
    }

    fn is_alive(&self) -> bool {
        self.alive.get()
    }
}

impl<D: Clone + 'static> WidgetView for RecordingWidgetView<D> {
    type Data = D;

    fn activate(&self, data: &D) {
        self.active.set(true);
        self.activations.bump();
        *self.last_data.borrow_mut() = Some(data.clone());
        self.journal.push(format!("{}.activate", self.name));
    }
}

/// Screen view logging `{name}.show`, `{name}.hide` and `{name}.destroy`.
pub struct RecordingScreenView {
    name: &'static str,
    journal: Journal,
    active: Cell<bool>,
    transform: Cell<Transform>,
    shows: Counter,
    hides: Counter,
}

impl fmt::Debug for RecordingScreenView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordingScreenView")
            .field("name", &self.name)
            .field("active", &self.active.get())
            .finish()
    }
}

impl RecordingScreenView {
    #[must_use]
    pub fn new(name: &'static str, journal: &Journal) -> Rc<Self> {
        Rc::new(Self {
            name,
            journal: journal.clone(),
            active: Cell::new(false),
            transform: Cell::new(Transform::IDENTITY),
            shows: Counter::default(),
            hides: Counter::default(),
        })
    }

    #[must_use]
    pub fn shows(&self) -> usize {
        self.shows.get()
    }

    #[must_use]
    pub fn hides(&self) -> usize {
        self.hides.get()
    }
}

impl View for RecordingScreenView {
    fn set_active(&self, active: bool) {
        self.active.set(active);
    }

    fn is_active(&self) -> bool {
        self.active.get()
    }

    fn transform(&self) -> Transform {
        self.transform.get()
    }

    fn apply_transform(&self, transform: Transform) {
        self.transform.set(transform);
    }

    fn destroy(&self) {
        self.active.set(false);
        self.journal.push(format!("{}.destroy", self.name));
    }
}

impl ScreenView for RecordingScreenView {
    fn on_activate(&self) {
        self.shows.bump();
        self.journal.push(format!("{}.show", self.name));
    }

    fn on_deactivate(&self) {
        self.hides.bump();
        self.journal.push(format!("{}.hide", self.name));
    }
}
