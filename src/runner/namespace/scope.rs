use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use indexmap::IndexMap;

use crate::runner::ds::error::{Error, Result};
use crate::runner::ds::value::Value;
use crate::runner::namespace::lazy::LazyCell;

/// What a namespace key is bound to.
#[derive(Clone)]
pub enum Slot {
    Value(Value),
    Lazy(Rc<LazyCell>),
    Scope(Namespace),
}

impl Slot {
    /// The value of this slot, resolving a lazy binding if needed.
    pub fn resolve(&self) -> Result<Value> {
        match self {
            Slot::Value(value) => Ok(value.clone()),
            Slot::Lazy(cell) => cell.force(),
            Slot::Scope(ns) => Ok(Value::Scope(ns.clone())),
        }
    }

    pub fn is_pending(&self) -> bool {
        match self {
            Slot::Lazy(cell) => !cell.is_resolved(),
            _ => false,
        }
    }
}

impl From<Value> for Slot {
    fn from(value: Value) -> Self {
        match value {
            Value::Scope(ns) => Slot::Scope(ns),
            other => Slot::Value(other),
        }
    }
}

impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Value(value) => write!(f, "Slot::Value({:?})", value),
            Slot::Lazy(cell) => write!(f, "Slot::Lazy({:?})", cell),
            Slot::Scope(ns) => write!(f, "Slot::Scope({:?})", ns.path()),
        }
    }
}

struct ScopeData {
    path: String,
    entries: RefCell<IndexMap<String, Slot>>,
}

/// Handle to one scope of the namespace tree.
///
/// Handles are cheap to clone and all clones see the same entries. Reads never
/// hold a borrow of the scope while a lazy binding resolves, so resolvers are
/// free to read and write the namespace.
#[derive(Clone)]
pub struct Namespace(Rc<ScopeData>);

/// Non-owning handle, used by closures stored inside the namespace itself.
#[derive(Clone)]
pub struct WeakNamespace(Weak<ScopeData>);

impl WeakNamespace {
    pub fn upgrade(&self) -> Option<Namespace> {
        self.0.upgrade().map(Namespace)
    }
}

impl Namespace {
    /// Create an empty root scope.
    pub fn new() -> Self {
        Namespace::with_path("")
    }

    fn with_path(path: impl Into<String>) -> Self {
        Namespace(Rc::new(ScopeData {
            path: path.into(),
            entries: RefCell::new(IndexMap::new()),
        }))
    }

    /// Dotted path of this scope from the root; empty for the root.
    pub fn path(&self) -> &str {
        &self.0.path
    }

    pub fn ptr_eq(&self, other: &Namespace) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn downgrade(&self) -> WeakNamespace {
        WeakNamespace(Rc::downgrade(&self.0))
    }

    /// Read `name`, resolving a lazy binding on first access.
    pub fn get(&self, name: &str) -> Result<Option<Value>> {
        match self.slot(name) {
            Some(slot) => slot.resolve().map(Some),
            None => Ok(None),
        }
    }

    /// Read a dotted path such as `"expression.transform.map"`.
    pub fn get_path(&self, path: &str) -> Result<Option<Value>> {
        let (parent, name) = match path.rsplit_once('.') {
            Some((parent, name)) => (self.lookup_scope(parent), name),
            None => (Some(self.clone()), path),
        };
        match parent {
            Some(scope) => scope.get(name),
            None => Ok(None),
        }
    }

    /// The binding of `name` as it is, without resolving it.
    pub fn slot(&self, name: &str) -> Option<Slot> {
        self.0.entries.borrow().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.entries.borrow().contains_key(name)
    }

    /// True when `name` is bound lazily and has not been read yet.
    pub fn is_pending(&self, name: &str) -> bool {
        self.slot(name).map(|s| s.is_pending()).unwrap_or(false)
    }

    pub fn set(&self, name: &str, value: Value) {
        self.bind(name, Slot::from(value));
    }

    pub fn bind(&self, name: &str, slot: Slot) {
        self.0.entries.borrow_mut().insert(name.to_string(), slot);
    }

    pub fn bind_lazy(&self, name: &str, cell: Rc<LazyCell>) {
        self.bind(name, Slot::Lazy(cell));
    }

    pub fn remove(&self, name: &str) -> Option<Slot> {
        self.0.entries.borrow_mut().shift_remove(name)
    }

    pub fn names(&self) -> Vec<String> {
        self.0.entries.borrow().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.0.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.entries.borrow().is_empty()
    }

    /// Resolve a dotted path to a scope handle, creating missing scopes.
    ///
    /// Fails when a segment along the way is bound to something other than a scope.
    pub fn scope(&self, path: &str) -> Result<Namespace> {
        let mut current = self.clone();
        for segment in path.split('.').filter(|s| !s.is_empty()) {
            let next = match current.slot(segment) {
                Some(Slot::Scope(ns)) => ns,
                Some(_) => {
                    return Err(Error::PathConflict {
                        path: path.to_string(),
                        segment: segment.to_string(),
                    })
                }
                None => current.child(segment),
            };
            current = next;
        }
        Ok(current)
    }

    /// The child scope `segment`, replacing whatever else is bound there.
    pub fn child(&self, segment: &str) -> Namespace {
        match self.slot(segment) {
            Some(Slot::Scope(ns)) => ns,
            _ => {
                let child = Namespace::with_path(self.child_path(segment));
                self.bind(segment, Slot::Scope(child.clone()));
                child
            }
        }
    }

    /// Resolve a dotted path to an existing scope without creating anything.
    pub fn lookup_scope(&self, path: &str) -> Option<Namespace> {
        let mut current = self.clone();
        for segment in path.split('.').filter(|s| !s.is_empty()) {
            current = match current.slot(segment) {
                Some(Slot::Scope(ns)) => ns,
                _ => return None,
            };
        }
        Some(current)
    }

    fn child_path(&self, segment: &str) -> String {
        if self.path().is_empty() {
            segment.to_string()
        } else {
            format!("{}.{}", self.path(), segment)
        }
    }
}

impl Default for Namespace {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Namespace")
            .field("path", &self.path())
            .field("names", &self.names())
            .finish()
    }
}
