//! `import` notifications for observers such as documentation tooling or REPL completion.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use uuid::Uuid;

use crate::runner::ds::error::Result;
use crate::runner::ds::value::Value;
use crate::runner::namespace::Resolver;

/// Emitted once per successfully registered entry.
pub struct ImportEvent {
    pub name: String,
    /// Produces the registered value; for lazy entries the first call resolves them.
    pub resolver: Resolver,
    pub path: Option<String>,
}

impl ImportEvent {
    pub fn resolve(&self) -> Result<Value> {
        (self.resolver)()
    }
}

impl fmt::Debug for ImportEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImportEvent")
            .field("name", &self.name)
            .field("path", &self.path)
            .finish()
    }
}

/// Handle returned when a listener is registered, used to remove it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(Uuid);

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_hyphenated())
    }
}

type Listener = Rc<dyn Fn(&ImportEvent)>;

#[derive(Default)]
pub(crate) struct ImportListeners {
    listeners: RefCell<Vec<(ListenerId, Listener)>>,
}

impl ImportListeners {
    pub fn add(&self, listener: Listener) -> ListenerId {
        let id = ListenerId(Uuid::new_v4());
        self.listeners.borrow_mut().push((id, listener));
        id
    }

    pub fn remove(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(lid, _)| *lid != id);
        listeners.len() != before
    }

    pub fn len(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Deliver `event` to every listener in registration order.
    ///
    /// Listeners may add or remove listeners while being notified; changes
    /// apply from the next event on.
    pub fn emit(&self, event: &ImportEvent) {
        let snapshot: Vec<Listener> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, l)| l.clone())
            .collect();
        for listener in snapshot {
            listener(event);
        }
    }
}
