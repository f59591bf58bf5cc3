use std::cell::RefCell;
use std::rc::Rc;

use hunk::events::Emitter;

#[test]
fn delivers_events_until_subscription_is_dropped() {
    let emitter = Emitter::<u32>::new();
    let seen = Rc::new(RefCell::new(Vec::new()));

    let sink = seen.clone();
    let subscription = emitter.subscribe(move |event| sink.borrow_mut().push(*event));
    emitter.emit(&1);
    drop(subscription);
    emitter.emit(&2);

    assert_eq!(*seen.borrow(), vec![1]);
    assert_eq!(emitter.listener_count(), 0);
}

#[test]
fn dispose_drops_listeners_and_reports_only_the_first_call() {
    let emitter = Emitter::<&'static str>::new();
    let seen = Rc::new(RefCell::new(Vec::new()));

    let sink = seen.clone();
    emitter
        .subscribe(move |event| sink.borrow_mut().push(*event))
        .detach();
    assert_eq!(emitter.listener_count(), 1);

    assert!(emitter.dispose());
    assert!(!emitter.dispose());
    assert!(emitter.is_disposed());
    assert_eq!(emitter.listener_count(), 0);

    emitter.emit(&"after dispose");
    emitter.subscribe(|_| panic!("disposed emitter should not notify")).detach();
    emitter.emit(&"still disposed");
    assert!(seen.borrow().is_empty());
}
