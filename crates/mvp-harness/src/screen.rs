#![forbid(unsafe_code)]

//! A screen that journals every presenter hook.

use std::cell::RefCell;
use std::rc::Rc;

use mvp_core::event::Event;
use mvp_core::owner::OwnerId;
use mvp_events::EventsStore;
use mvp_presenter::{PresenterCore, Screen};
use mvp_reactive::ReactiveValue;
use mvp_widgets::{Resources, WidgetBehavior, WidgetFactory};

use crate::journal::{Counter, Journal};
use crate::model::CountingModel;
use crate::probe::{ProbeView, ProbeWidget, probe_view};
use crate::views::RecordingScreenView;

const OWNED: [&str; 4] = ["owned0", "owned1", "owned2", "owned3"];
const MANUAL: [&str; 4] = ["manual0", "manual1", "manual2", "manual3"];
const POOLED: [&str; 4] = ["pooled0", "pooled1", "pooled2", "pooled3"];

/// How many probe widgets of each kind a [`JournalScreen`] registers.
/// Each count is capped at four.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScreenLayout {
    /// Owned widgets, created once.
    pub owned: usize,
    /// Owned widgets in manual-lifecycle mode.
    pub manual: usize,
    /// Pooled widgets, spawned on every activation.
    pub pooled: usize,
}

impl ScreenLayout {
    #[must_use]
    pub fn with_owned(mut self, owned: usize) -> Self {
        self.owned = owned.min(OWNED.len());
        self
    }

    #[must_use]
    pub fn with_manual(mut self, manual: usize) -> Self {
        self.manual = manual.min(MANUAL.len());
        self
    }

    #[must_use]
    pub fn with_pooled(mut self, pooled: usize) -> Self {
        self.pooled = pooled.min(POOLED.len());
        self
    }
}

/// A widget factory whose widgets log into `journal`.
#[must_use]
pub fn probe_factory(journal: &Journal) -> WidgetFactory {
    WidgetFactory::new(
        Rc::new(EventsStore::default()),
        Resources::new().with(Rc::new(journal.clone())),
    )
}

type Probe = (Rc<RefCell<ProbeWidget>>, Rc<ProbeView>);

/// Screen whose hooks log `screen.{hook}` and whose widgets are probes
/// bound to [`JournalScreen::title`].
///
/// Owned probes are created in `create_widgets` and bound in
/// `bind_widgets`; pooled probes are spawned and bound in `bind_widgets`.
/// `subscribe_events` counts emissions of [`JournalScreen::ping`].
pub struct JournalScreen {
    core: PresenterCore<CountingModel, RecordingScreenView>,
    kind: &'static str,
    journal: Journal,
    layout: ScreenLayout,
    title: ReactiveValue<String>,
    ping: Event<u32>,
    pings: Counter,
    owned: Vec<Probe>,
    pooled: Vec<Probe>,
}

impl JournalScreen {
    #[must_use]
    pub fn new(
        kind: &'static str,
        layout: ScreenLayout,
        factory: WidgetFactory,
        journal: &Journal,
    ) -> Self {
        Self {
            core: PresenterCore::new(CountingModel::new(journal), factory),
            kind,
            journal: journal.clone(),
            layout,
            title: ReactiveValue::new(String::new()),
            ping: Event::new(),
            pings: Counter::default(),
            owned: Vec::new(),
            pooled: Vec::new(),
        }
    }

    /// Text every probe is bound to.
    #[must_use]
    pub fn title(&self) -> &ReactiveValue<String> {
        &self.title
    }

    /// Event the screen subscribes to while active.
    #[must_use]
    pub fn ping(&self) -> &Event<u32> {
        &self.ping
    }

    /// Pings received while subscribed.
    #[must_use]
    pub fn pings(&self) -> usize {
        self.pings.get()
    }

    #[must_use]
    pub fn model(&self) -> &CountingModel {
        self.core.model()
    }

    /// Owned probes (manual ones included) in creation order.
    #[must_use]
    pub fn owned(&self) -> &[(Rc<RefCell<ProbeWidget>>, Rc<ProbeView>)] {
        &self.owned
    }

    /// Pooled probes of the latest activation.
    #[must_use]
    pub fn pooled(&self) -> &[(Rc<RefCell<ProbeWidget>>, Rc<ProbeView>)] {
        &self.pooled
    }
}

impl Screen for JournalScreen {
    type Kind = &'static str;
    type Model = CountingModel;
    type View = RecordingScreenView;

    fn kind(&self) -> &'static str {
        self.kind
    }

    fn core(&self) -> &PresenterCore<CountingModel, RecordingScreenView> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut PresenterCore<CountingModel, RecordingScreenView> {
        &mut self.core
    }

    fn customize_model(&mut self) {
        self.journal.push("screen.customize_model");
    }

    fn create_widgets(&mut self) {
        self.journal.push("screen.create_widgets");
        let owned = OWNED.iter().take(self.layout.owned).map(|name| (*name, false));
        let manual = MANUAL.iter().take(self.layout.manual).map(|name| (*name, true));
        for (name, manual) in owned.chain(manual) {
            let widget = self.core.create_widget::<ProbeWidget>(None, manual);
            self.owned.push((widget, probe_view(name, &self.journal)));
        }
    }

    fn subscribe_events(&mut self) {
        self.journal.push("screen.subscribe_events");
        let pings = self.pings.clone();
        self.core.subscribe(&self.ping, move |_| pings.bump());
    }

    fn on_activate(&mut self) {
        self.journal.push("screen.on_activate");
    }

    fn bind_widgets(&mut self) {
        self.journal.push("screen.bind_widgets");
        for (widget, view) in &self.owned {
            widget
                .borrow_mut()
                .bind(Rc::clone(view), self.title.clone(), false);
        }

        self.pooled.clear();
        for name in POOLED.iter().copied().take(self.layout.pooled) {
            let widget = self.core.spawn_widget::<ProbeWidget>(None, false);
            let view = probe_view(name, &self.journal);
            widget
                .borrow_mut()
                .bind(Rc::clone(&view), self.title.clone(), false);
            self.pooled.push((widget, view));
        }
    }

    fn on_widgets_activated(&mut self) {
        self.journal.push("screen.on_widgets_activated");
    }

    fn on_show(&mut self) {
        self.journal.push("screen.on_show");
    }

    fn on_deactivate(&mut self) {
        self.journal.push("screen.on_deactivate");
    }

    fn on_hide(&mut self) {
        self.journal.push("screen.on_hide");
    }

    fn on_before_widget_deactivated(&mut self, _widget: OwnerId) {
        self.journal.push("screen.before_widget");
    }
}
