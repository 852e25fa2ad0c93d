//! The prelude is enough to wire values, the store and a conditional.

use std::cell::Cell;
use std::rc::Rc;

use mvp::prelude::*;

#[test]
fn prelude_wires_reactive_values_through_the_store() {
    let store = EventsStore::shared(SignalHub::new());
    let owner = OwnerId::next();
    let coins = ReactiveValue::new(0u32);
    let seen = Rc::new(Cell::new(0u32));

    let sink = Rc::clone(&seen);
    store.subscribe_event(owner, coins.on_changed(), move |v| sink.set(*v));
    coins.set(5);
    store.unsubscribe(owner);
    coins.set(9);
    assert_eq!(seen.get(), 5);

    let gate = ConditionalComposite::new(CombinationMode::All);
    gate.add(&coins, |c: &u32| *c >= 9);
    assert!(gate.value());
    assert_eq!("and".parse::<CombinationMode>(), Ok(CombinationMode::All));
}
