#![forbid(unsafe_code)]

//! A widget that journals its hooks and the text it observes.

use std::rc::Rc;

use mvp_reactive::ReactiveValue;
use mvp_widgets::{Construct, WidgetBase, WidgetBehavior, WidgetContext};

use crate::journal::{Counter, Journal};
use crate::views::RecordingWidgetView;

pub type ProbeView = RecordingWidgetView<ReactiveValue<String>>;

/// Leaf widget bound to a text value.
///
/// Takes its [`Journal`] from the context resources. Logs
/// `probe.spawned`, `probe.despawned`, `probe.deactivated` and
/// `{view}.changed:{text}` for every change observed while active.
#[derive(Debug)]
pub struct ProbeWidget {
    base: WidgetBase<ProbeView>,
    journal: Journal,
    changes: Counter,
}

impl Construct for ProbeWidget {
    fn construct(ctx: &WidgetContext) -> Self {
        Self {
            base: WidgetBase::new(ctx),
            journal: ctx
                .resource::<Journal>()
                .map(|journal| (*journal).clone())
                .unwrap_or_default(),
            changes: Counter::default(),
        }
    }
}

impl ProbeWidget {
    /// Text changes observed while subscribed.
    #[must_use]
    pub fn changes(&self) -> usize {
        self.changes.get()
    }
}

impl WidgetBehavior for ProbeWidget {
    type View = ProbeView;

    fn base(&self) -> &WidgetBase<ProbeView> {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase<ProbeView> {
        &mut self.base
    }

    fn subscribe_events(&mut self) {
        let (Some(view), Some(text)) = (self.base.view(), self.base.data()) else {
            return;
        };
        let name = view.name();
        let journal = self.journal.clone();
        let changes = self.changes.clone();
        self.base.subscribe(text.on_changed(), move |t: &String| {
            changes.bump();
            journal.push(format!("{name}.changed:{t}"));
        });
    }

    fn deactivated(&mut self) {
        self.journal.push("probe.deactivated");
    }

    fn spawned(&mut self) {
        self.journal.push("probe.spawned");
    }

    fn despawned(&mut self) {
        self.journal.push("probe.despawned");
    }
}

/// View for a probe widget, logging under `name`.
#[must_use]
pub fn probe_view(name: &'static str, journal: &Journal) -> Rc<ProbeView> {
    RecordingWidgetView::new(name, journal)
}
