//! Once-cells for lazily bound namespace entries.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tracing::{trace, warn};

use crate::runner::ds::error::{Error, Result};
use crate::runner::ds::value::Value;

/// Deferred computation that produces the value of one namespace entry.
pub type Resolver = Rc<dyn Fn() -> Result<Value>>;

enum CellState {
    Pending(Resolver),
    Resolving,
    Resolved(Value),
    Failed(Error),
}

/// Single-assignment cell bound to one (scope, key) pair.
///
/// The resolver runs at most once, on the first `force`. Its outcome, value or
/// error, is kept and returned by every later `force`. Forcing a cell from
/// inside its own resolver is reported as [`Error::CyclicResolution`].
pub struct LazyCell {
    key: String,
    state: RefCell<CellState>,
}

impl LazyCell {
    pub fn new(key: impl Into<String>, resolver: Resolver) -> Rc<Self> {
        Rc::new(LazyCell {
            key: key.into(),
            state: RefCell::new(CellState::Pending(resolver)),
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn force(&self) -> Result<Value> {
        let resolver = {
            let mut state = self.state.borrow_mut();
            match &*state {
                CellState::Resolved(value) => return Ok(value.clone()),
                CellState::Failed(error) => return Err(error.clone()),
                CellState::Resolving => {
                    warn!(key = %self.key, "cyclic resolution detected");
                    return Err(Error::CyclicResolution(self.key.clone()));
                }
                CellState::Pending(resolver) => {
                    let resolver = resolver.clone();
                    *state = CellState::Resolving;
                    resolver
                }
            }
        };

        trace!(key = %self.key, "resolving lazy binding");
        let outcome = resolver();
        *self.state.borrow_mut() = match &outcome {
            Ok(value) => CellState::Resolved(value.clone()),
            Err(error) => CellState::Failed(error.clone()),
        };
        outcome
    }

    pub fn is_resolved(&self) -> bool {
        matches!(&*self.state.borrow(), CellState::Resolved(_))
    }

    /// The resolved value, without triggering resolution.
    pub fn peek(&self) -> Option<Value> {
        match &*self.state.borrow() {
            CellState::Resolved(value) => Some(value.clone()),
            _ => None,
        }
    }
}

impl fmt::Debug for LazyCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match &*self.state.borrow() {
            CellState::Pending(_) => "pending",
            CellState::Resolving => "resolving",
            CellState::Resolved(_) => "resolved",
            CellState::Failed(_) => "failed",
        };
        write!(f, "LazyCell({}: {})", self.key, state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_resolver_runs_once() {
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let cell = LazyCell::new(
            "pi",
            Rc::new(move || {
                counter.set(counter.get() + 1);
                Ok(Value::float(3.14159))
            }),
        );
        assert_eq!(calls.get(), 0);
        assert!(!cell.is_resolved());
        assert_eq!(cell.peek(), None);
        assert_eq!(cell.force().unwrap(), Value::float(3.14159));
        assert_eq!(cell.force().unwrap(), Value::float(3.14159));
        assert_eq!(calls.get(), 1);
        assert!(cell.is_resolved());
    }

    #[test]
    fn test_failure_is_kept() {
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let cell = LazyCell::new(
            "broken",
            Rc::new(move || {
                counter.set(counter.get() + 1);
                Err(Error::Type("boom".to_string()))
            }),
        );
        assert!(cell.force().is_err());
        assert_eq!(cell.force(), Err(Error::Type("boom".to_string())));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_self_reference_is_cyclic() {
        let slot: Rc<RefCell<Option<Rc<LazyCell>>>> = Rc::new(RefCell::new(None));
        let inner = slot.clone();
        let cell = LazyCell::new(
            "loop",
            Rc::new(move || {
                let me = inner.borrow().clone();
                match me {
                    Some(cell) => cell.force(),
                    None => Ok(Value::Undefined),
                }
            }),
        );
        *slot.borrow_mut() = Some(cell.clone());
        assert_eq!(
            cell.force(),
            Err(Error::CyclicResolution("loop".to_string()))
        );
        // Break the reference cycle created by the test.
        *slot.borrow_mut() = None;
    }
}
