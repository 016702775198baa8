//! Typed-function operations used by the import layer.
//!
//! The import layer never dispatches arguments itself. It only decides when
//! two callables are merged, when one is re-tagged with a new name, and when a
//! single-signature function is lifted into a typed one.

mod typed_function;

pub use typed_function::{Implementation, TypedFunction};

use std::rc::Rc;

use crate::runner::ds::error::{Error, Result};
use crate::runner::ds::function::{Function, FunctionRef};
use crate::runner::ds::value::Value;

/// True iff `value` is callable and carries a signature map.
pub fn is_typed_callable(value: &Value) -> bool {
    value.as_function().map(|f| f.is_typed()).unwrap_or(false)
}

/// Build a typed function named `name` from `(signature, implementation)` pairs.
pub fn tag_signature<S: AsRef<str>>(
    name: &str,
    signatures: Vec<(S, FunctionRef)>,
) -> Result<FunctionRef> {
    let mut typed = TypedFunction::new(name);
    for (signature, function) in signatures {
        typed.add_signature(signature.as_ref(), function)?;
    }
    Ok(Rc::new(Function::typed(typed)))
}

/// Merge two typed functions; signatures of `incoming` take precedence on overlap.
pub fn merge(existing: &FunctionRef, incoming: &FunctionRef) -> Result<FunctionRef> {
    match (existing.as_typed(), incoming.as_typed()) {
        (Some(a), Some(b)) => Ok(Rc::new(Function::typed(a.merged(b)))),
        _ => Err(Error::Type(format!(
            "cannot merge \"{}\" with \"{}\": both must be typed functions",
            existing.name(),
            incoming.name()
        ))),
    }
}

/// Give a typed function a new name, keeping its signatures.
pub fn retag(name: &str, function: &FunctionRef) -> Result<FunctionRef> {
    match function.as_typed() {
        Some(typed) => Ok(Rc::new(Function::typed(typed.renamed(name)))),
        None => Err(Error::Type(format!(
            "\"{}\" is not a typed function",
            function.name()
        ))),
    }
}
