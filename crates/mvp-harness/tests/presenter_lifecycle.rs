//! Presenter lifecycle driven end to end: model, widgets, store and view.

use std::any::Any;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use mvp_harness::{
    Journal, JournalScreen, ProbeWidget, RecordingScreenView, ScreenLayout, probe_factory,
};
use mvp_presenter::{Presenter, PresenterError, PresenterState, Screen, ScreenParams};
use mvp_widgets::Widget;
use tracing::Subscriber;
use tracing_subscriber::Layer;
use tracing_subscriber::layer::{Context, SubscriberExt};

fn lobby(layout: ScreenLayout) -> (JournalScreen, Journal, Rc<RecordingScreenView>) {
    let journal = Journal::new();
    let mut screen = JournalScreen::new("lobby", layout, probe_factory(&journal), &journal);
    let view = RecordingScreenView::new("lobby", &journal);
    screen.core_mut().set_view(Rc::clone(&view));
    (screen, journal, view)
}

// ═════════════════════════════════════════════════════════════════════════
// State machine
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn activate_hide_activate_deactivate() {
    let (mut screen, _journal, view) = lobby(ScreenLayout::default().with_owned(1));
    assert!(screen.owned().is_empty());

    screen.activate();
    let (widget, widget_view) = screen.owned()[0].clone();
    assert_eq!(screen.state(), PresenterState::Active);
    assert_eq!(screen.model().activations(), 1);
    assert_eq!(widget_view.activations(), 1);
    assert!(widget.borrow().is_activated());

    screen.hide();
    assert_eq!(screen.state(), PresenterState::Hidden);
    assert!(widget_view.is_active());
    assert!(widget.borrow().is_activated());

    screen.activate();
    assert_eq!(screen.state(), PresenterState::Active);
    assert_eq!(widget_view.activations(), 1);
    assert_eq!(screen.model().activations(), 1);
    assert_eq!(screen.model().shows(), 1);

    screen.deactivate();
    assert_eq!(screen.state(), PresenterState::Inactive);
    assert_eq!(widget_view.deactivations(), 1);
    assert!(!widget.borrow().is_activated());
    assert_eq!(screen.model().deactivations(), 1);

    let events = Rc::clone(screen.core().events());
    assert!(!events.has_owner(screen.core().owner()));
    assert_eq!(events.subscription_count(widget.borrow().owner_id()), 0);
    screen.ping().emit(&1);
    assert_eq!(screen.pings(), 0);

    assert_eq!((view.shows(), view.hides()), (2, 1));
}

#[test]
fn first_activation_order() {
    let (mut screen, journal, _view) = lobby(ScreenLayout::default().with_owned(1));
    screen.activate();
    assert_eq!(
        journal.take(),
        [
            "model.activate",
            "screen.customize_model",
            "screen.create_widgets",
            "screen.subscribe_events",
            "screen.on_activate",
            "screen.bind_widgets",
            "owned0.activate",
            "screen.on_widgets_activated",
            "lobby.show"
        ]
    );
}

#[test]
fn double_activation_creates_and_subscribes_once() {
    let (mut screen, journal, _view) = lobby(ScreenLayout::default().with_owned(2));
    screen.activate();
    screen.activate();

    assert_eq!(journal.count("screen.create_widgets"), 1);
    assert_eq!(journal.count("screen.subscribe_events"), 1);
    assert_eq!(journal.count("owned0.activate"), 1);
    assert_eq!(journal.count("lobby.show"), 2);

    screen.ping().emit(&7);
    assert_eq!(screen.pings(), 1);
}

#[test]
fn hide_then_activate_only_resumes() {
    let (mut screen, journal, _view) = lobby(ScreenLayout::default().with_owned(1));
    screen.activate();
    journal.clear();

    screen.hide();
    screen.activate();
    assert_eq!(
        journal.take(),
        [
            "screen.on_hide",
            "model.on_show",
            "screen.on_show",
            "lobby.show"
        ]
    );

    screen.ping().emit(&1);
    assert_eq!(screen.pings(), 1);
}

#[test]
fn deactivate_from_hidden_tears_down() {
    let (mut screen, journal, _view) = lobby(ScreenLayout::default().with_owned(1));
    screen.activate();
    screen.hide();
    journal.clear();

    screen.deactivate();
    assert_eq!(screen.state(), PresenterState::Inactive);
    assert_eq!(
        journal.take(),
        [
            "model.deactivate",
            "screen.on_deactivate",
            "screen.before_widget",
            "owned0.deactivate",
            "probe.deactivated",
            "lobby.hide"
        ]
    );
}

#[test]
fn meaningless_calls_are_noops() {
    let (mut screen, journal, view) = lobby(ScreenLayout::default().with_owned(1));

    screen.deactivate();
    screen.hide();
    assert_eq!(screen.state(), PresenterState::NotInitialized);
    assert!(journal.is_empty());
    assert_eq!(view.hides(), 0);

    screen.activate();
    screen.deactivate();
    journal.clear();
    screen.deactivate();
    screen.hide();
    assert_eq!(screen.state(), PresenterState::Inactive);
    assert!(journal.is_empty());
}

#[test]
fn reactivation_from_inactive_rebinds_without_recreating() {
    let (mut screen, journal, _view) = lobby(ScreenLayout::default().with_owned(1));
    screen.activate();
    screen.deactivate();
    journal.clear();

    screen.activate();
    assert_eq!(journal.count("screen.create_widgets"), 0);
    assert_eq!(journal.count("model.activate"), 1);
    assert_eq!(journal.count("owned0.activate"), 1);
    assert_eq!(screen.owned().len(), 1);
    assert_eq!(screen.core().widgets().len(), 1);
}

#[test]
fn open_params_reach_the_model() {
    let (mut screen, _journal, _view) = lobby(ScreenLayout::default());
    screen.set_open_params(Some(ScreenParams::new(3u32)));
    screen.activate();

    let params = screen.model().last_params().cloned();
    assert_eq!(params.as_ref().map(|p| p.get::<u32>().copied()), Some(Ok(3)));
}

#[test]
fn missing_view_skips_show_and_hide() {
    let journal = Journal::new();
    let mut screen = JournalScreen::new(
        "lobby",
        ScreenLayout::default().with_owned(1),
        probe_factory(&journal),
        &journal,
    );

    screen.activate();
    assert_eq!(screen.state(), PresenterState::Active);
    assert_eq!(journal.count("owned0.activate"), 1);

    screen.deactivate();
    assert_eq!(screen.state(), PresenterState::Inactive);
    assert_eq!(journal.count("owned0.deactivate"), 1);
}

// ═════════════════════════════════════════════════════════════════════════
// Widgets
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn widgets_observe_data_while_live() {
    let (mut screen, journal, _view) = lobby(ScreenLayout::default().with_owned(1));
    screen.activate();
    screen.title().set("a".to_string());
    screen.hide();
    screen.title().set("b".to_string());
    screen.deactivate();
    screen.title().set("c".to_string());

    assert_eq!(journal.count("owned0.changed:a"), 1);
    assert_eq!(journal.count("owned0.changed:b"), 1);
    assert_eq!(journal.count("owned0.changed:c"), 0);
    assert_eq!(screen.owned()[0].0.borrow().changes(), 2);
}

#[test]
fn pooled_widgets_are_deactivated_then_despawned() {
    let (mut screen, journal, _view) =
        lobby(ScreenLayout::default().with_owned(1).with_pooled(1));
    screen.activate();
    let factory = screen.core().factory().clone();
    assert_eq!(factory.pooled_count::<ProbeWidget>(), 0);
    let (pooled, _) = screen.pooled()[0].clone();
    journal.clear();

    screen.deactivate();
    assert_eq!(
        journal.take(),
        [
            "model.deactivate",
            "screen.on_deactivate",
            "screen.before_widget",
            "owned0.deactivate",
            "probe.deactivated",
            "screen.before_widget",
            "pooled0.deactivate",
            "probe.deactivated",
            "probe.despawned",
            "lobby.hide"
        ]
    );
    assert!(screen.core().pooled_widgets().is_empty());
    assert_eq!(factory.pooled_count::<ProbeWidget>(), 1);
    assert!(pooled.borrow().view().is_none());
    assert!(factory.events().subscription_count(pooled.borrow().owner_id()) == 0);

    screen.activate();
    let (respawned, _) = screen.pooled()[0].clone();
    assert!(Rc::ptr_eq(&pooled, &respawned));
    assert_eq!(factory.stats::<ProbeWidget>().reused, 1);
    assert_eq!(journal.count("pooled0.activate"), 1);
}

#[test]
fn respawned_widget_gets_lifecycle_flag_reapplied() {
    let (mut screen, journal, _view) = lobby(ScreenLayout::default().with_pooled(1));
    screen.activate();
    let (pooled, _) = screen.pooled()[0].clone();
    pooled.borrow_mut().set_manual_lifecycle(true);
    screen.deactivate();
    assert_eq!(journal.count("pooled0.deactivate"), 0);

    screen.activate();
    let (respawned, _) = screen.pooled()[0].clone();
    assert!(Rc::ptr_eq(&pooled, &respawned));
    assert!(!respawned.borrow().is_manual_lifecycle());
    assert_eq!(journal.count("pooled0.activate"), 2);
}

#[test]
fn manual_widgets_are_left_to_the_caller() {
    let (mut screen, journal, _view) = lobby(ScreenLayout::default().with_manual(1));
    screen.activate();
    let (widget, view) = screen.owned()[0].clone();
    assert!(widget.borrow().is_manual_lifecycle());
    assert_eq!(view.activations(), 0);

    widget.borrow_mut().activate();
    assert_eq!(view.activations(), 1);

    screen.deactivate();
    assert_eq!(journal.count("screen.before_widget"), 1);
    assert_eq!(view.deactivations(), 0);
    assert!(widget.borrow().is_activated());
}

#[test]
fn remove_widget_detaches_one_owned_widget() {
    let (mut screen, journal, _view) = lobby(ScreenLayout::default().with_owned(2));
    screen.activate();
    journal.clear();

    let id = screen.owned()[1].0.borrow().owner_id();
    assert!(screen.remove_widget(id));
    assert!(!screen.remove_widget(id));
    assert_eq!(
        journal.take(),
        [
            "screen.before_widget",
            "owned1.deactivate",
            "probe.deactivated"
        ]
    );
    assert_eq!(screen.core().widgets().len(), 1);

    screen.deactivate();
    assert_eq!(journal.count("owned1.deactivate"), 0);
    assert_eq!(journal.count("owned0.deactivate"), 1);
}

#[test]
fn despawn_widget_returns_one_pooled_widget() {
    let (mut screen, journal, _view) = lobby(ScreenLayout::default().with_pooled(2));
    screen.activate();
    journal.clear();

    let id = screen.pooled()[0].0.borrow().owner_id();
    assert!(screen.despawn_widget(id));
    assert!(!screen.despawn_widget(id));
    assert_eq!(
        journal.take(),
        [
            "screen.before_widget",
            "pooled0.deactivate",
            "probe.deactivated",
            "probe.despawned"
        ]
    );
    assert_eq!(screen.core().pooled_widgets().len(), 1);
    assert_eq!(screen.core().factory().pooled_count::<ProbeWidget>(), 1);
}

#[test]
fn repeated_cycles_do_not_leak_subscriptions() {
    let (mut screen, _journal, _view) =
        lobby(ScreenLayout::default().with_owned(2).with_pooled(2));
    let events = Rc::clone(screen.core().events());

    for i in 0..10 {
        screen.activate();
        screen.title().set(i.to_string());
        screen.hide();
        screen.activate();
        screen.deactivate();
        assert_eq!(events.owner_count(), 0);
    }

    // One ping handle plus four title handles, reused every cycle.
    assert_eq!(events.handle_stats().created, 5);
    assert_eq!(events.idle_handles(), 5);
    assert_eq!(events.registry_stats().created, 5);
    assert_eq!(screen.title().on_changed().listener_count(), 0);
    assert_eq!(screen.ping().listener_count(), 0);
}

// ═════════════════════════════════════════════════════════════════════════
// Object-safe surface
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn router_drives_screens_through_trait_objects() {
    let journal = Journal::new();
    let factory = probe_factory(&journal);
    let mut screens: Vec<Box<dyn Presenter<&'static str>>> = ["lobby", "shop"]
        .into_iter()
        .map(|kind| {
            Box::new(JournalScreen::new(
                kind,
                ScreenLayout::default(),
                factory.clone(),
                &journal,
            )) as Box<dyn Presenter<&'static str>>
        })
        .collect();

    for screen in &mut screens {
        let view: Rc<dyn Any> = RecordingScreenView::new(screen.kind(), &journal);
        assert!(screen.attach_view(view).is_ok());
    }

    screens[0].activate();
    screens[0].hide();
    screens[1].activate();
    assert_eq!(screens[0].state(), PresenterState::Hidden);
    assert_eq!(screens[1].state(), PresenterState::Active);
    assert!(journal.precedes("lobby.show", "shop.show"));

    let wrong: Rc<dyn Any> = Rc::new(0u8);
    assert!(matches!(
        screens[1].attach_view(wrong),
        Err(PresenterError::ViewTypeMismatch { .. })
    ));
    assert_eq!(screens[1].kind(), "shop");
}

// ═════════════════════════════════════════════════════════════════════════
// Tracing
// ═════════════════════════════════════════════════════════════════════════

#[derive(Default)]
struct PresenterTraceState {
    events: Vec<(tracing::Level, String)>,
}

struct PresenterTraceCapture {
    state: Arc<Mutex<PresenterTraceState>>,
}

impl<S> Layer<S> for PresenterTraceCapture
where
    S: Subscriber + for<'lookup> tracing_subscriber::registry::LookupSpan<'lookup>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        struct Msg {
            message: Option<String>,
        }
        impl tracing::field::Visit for Msg {
            fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
                if field.name() == "message" {
                    self.message = Some(value.to_string());
                }
            }

            fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
                if field.name() == "message" {
                    self.message = Some(format!("{value:?}").trim_matches('"').to_string());
                }
            }
        }
        let mut msg = Msg { message: None };
        event.record(&mut msg);
        if let Some(message) = msg.message.filter(|m| m.starts_with("presenter.")) {
            self.state
                .lock()
                .expect("presenter trace lock")
                .events
                .push((*event.metadata().level(), message));
        }
    }
}

#[test]
fn transitions_are_traced_and_missing_views_warned() {
    let state = Arc::new(Mutex::new(PresenterTraceState::default()));
    let subscriber = tracing_subscriber::registry().with(PresenterTraceCapture {
        state: Arc::clone(&state),
    });
    let _guard = tracing::subscriber::set_default(subscriber);

    let journal = Journal::new();
    let mut screen = JournalScreen::new(
        "lobby",
        ScreenLayout::default(),
        probe_factory(&journal),
        &journal,
    );
    screen.activate();
    screen.hide();
    screen.deactivate();

    let events = std::mem::take(&mut state.lock().expect("presenter trace lock").events);
    let messages: Vec<(tracing::Level, &str)> = events
        .iter()
        .map(|(level, message)| (*level, message.as_str()))
        .collect();
    assert_eq!(
        messages,
        [
            (tracing::Level::DEBUG, "presenter.activate"),
            (tracing::Level::WARN, "presenter.no_view"),
            (tracing::Level::DEBUG, "presenter.hide"),
            (tracing::Level::DEBUG, "presenter.deactivate"),
            (tracing::Level::WARN, "presenter.no_view"),
        ]
    );
}
