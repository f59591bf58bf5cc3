use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

type Listener<E> = Rc<dyn Fn(&E)>;

struct Listeners<E> {
    next_id: Cell<usize>,
    disposed: Cell<bool>,
    entries: RefCell<BTreeMap<usize, Listener<E>>>,
}

/// Single-threaded event channel. Once disposed it drops every listener and
/// ignores further subscriptions and emits.
pub struct Emitter<E> {
    listeners: Rc<Listeners<E>>,
}

impl<E: 'static> Emitter<E> {
    pub fn new() -> Self {
        Self {
            listeners: Rc::new(Listeners {
                next_id: Cell::new(0),
                disposed: Cell::new(false),
                entries: RefCell::new(BTreeMap::new()),
            }),
        }
    }

    pub fn subscribe(&self, listener: impl Fn(&E) + 'static) -> Subscription {
        if self.listeners.disposed.get() {
            return Subscription::detached();
        }

        let id = self.listeners.next_id.get();
        self.listeners.next_id.set(id.saturating_add(1));
        self.listeners
            .entries
            .borrow_mut()
            .insert(id, Rc::new(listener));

        let weak = Rc::downgrade(&self.listeners);
        Subscription {
            unsubscribe: Some(Box::new(move || remove_listener(&weak, id))),
        }
    }

    pub fn emit(&self, event: &E) {
        if self.listeners.disposed.get() {
            return;
        }

        // Listeners may subscribe or unsubscribe while being notified.
        let snapshot = self
            .listeners
            .entries
            .borrow()
            .values()
            .cloned()
            .collect::<Vec<_>>();
        for listener in snapshot {
            listener(event);
        }
    }

    /// Returns false when the channel had already been disposed.
    pub fn dispose(&self) -> bool {
        if self.listeners.disposed.replace(true) {
            return false;
        }
        self.listeners.entries.borrow_mut().clear();
        true
    }

    pub fn is_disposed(&self) -> bool {
        self.listeners.disposed.get()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.entries.borrow().len()
    }
}

impl<E: 'static> Default for Emitter<E> {
    fn default() -> Self {
        Self::new()
    }
}

fn remove_listener<E>(listeners: &Weak<Listeners<E>>, id: usize) {
    if let Some(listeners) = listeners.upgrade() {
        listeners.entries.borrow_mut().remove(&id);
    }
}

/// Handle returned by [`Emitter::subscribe`]. Dropping it removes the listener;
/// call [`Subscription::detach`] to keep the listener for the emitter's lifetime.
#[must_use]
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    fn detached() -> Self {
        Self { unsubscribe: None }
    }

    pub fn detach(mut self) {
        self.unsubscribe = None;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}
