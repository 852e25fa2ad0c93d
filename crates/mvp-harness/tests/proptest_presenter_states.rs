//! Property tests for the presenter state machine under arbitrary call
//! sequences.

use std::rc::Rc;

use mvp_harness::{
    Journal, JournalScreen, ProbeWidget, RecordingScreenView, ScreenLayout, probe_factory,
};
use mvp_presenter::{Presenter, PresenterState, Screen};
use proptest::prelude::*;

#[derive(Debug, Clone, Copy)]
enum Op {
    Activate,
    Deactivate,
    Hide,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Activate),
        Just(Op::Deactivate),
        Just(Op::Hide),
    ]
}

/// Expected bookkeeping, advanced alongside the real presenter.
#[derive(Debug, Default)]
struct Expected {
    state: PresenterState,
    setups: usize,
    teardowns: usize,
    resumes: usize,
}

impl Expected {
    fn apply(&mut self, op: Op) {
        match op {
            Op::Activate => {
                match self.state {
                    PresenterState::NotInitialized | PresenterState::Inactive => self.setups += 1,
                    PresenterState::Hidden => self.resumes += 1,
                    PresenterState::Active => {}
                }
                self.state = PresenterState::Active;
            }
            Op::Deactivate => {
                if self.state.is_live() {
                    self.teardowns += 1;
                    self.state = PresenterState::Inactive;
                }
            }
            Op::Hide => {
                if self.state == PresenterState::Active {
                    self.state = PresenterState::Hidden;
                }
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// State machine agrees with the reference model
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn presenter_follows_reference_model(ops in proptest::collection::vec(op_strategy(), 0..40)) {
        let journal = Journal::new();
        let mut screen = JournalScreen::new(
            "lobby",
            ScreenLayout::default().with_owned(1).with_pooled(1),
            probe_factory(&journal),
            &journal,
        );
        screen.core_mut().set_view(RecordingScreenView::new("lobby", &journal));
        let events = Rc::clone(screen.core().events());
        let factory = screen.core().factory().clone();
        let mut expected = Expected::default();

        for op in ops {
            match op {
                Op::Activate => screen.activate(),
                Op::Deactivate => screen.deactivate(),
                Op::Hide => screen.hide(),
            }
            expected.apply(op);

            prop_assert_eq!(screen.state(), expected.state);
            let created = usize::from(expected.state != PresenterState::NotInitialized);
            prop_assert_eq!(journal.count("screen.create_widgets"), created);
            prop_assert_eq!(journal.count("screen.subscribe_events"), expected.setups);
            prop_assert_eq!(journal.count("screen.on_show"), expected.resumes);
            prop_assert_eq!(screen.model().activations(), expected.setups);
            prop_assert_eq!(screen.model().deactivations(), expected.teardowns);

            let live = expected.state.is_live();
            prop_assert_eq!(events.has_owner(screen.core().owner()), live);
            prop_assert_eq!(events.owner_count(), if live { 3 } else { 0 });
            if let Some((_, view)) = screen.owned().first() {
                prop_assert_eq!(view.is_active(), live);
            }
            let pooled_idle = if live || expected.setups == 0 { 0 } else { 1 };
            prop_assert_eq!(factory.pooled_count::<ProbeWidget>(), pooled_idle);
        }
    }
}
