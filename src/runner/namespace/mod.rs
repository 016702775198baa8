//! The namespace tree that imports write into.
//!
//! A namespace is a tree of named scopes. Every scope maps keys to a [`Slot`]:
//! a plain value, a lazily bound [`LazyCell`], or a nested scope. Nested paths
//! are addressed with [`Namespace::scope`], which returns a handle to the
//! scope instead of splitting strings at every call site.
//!
//! ```
//! use mathns::runner::namespace::Namespace;
//! use mathns::runner::ds::value::Value;
//!
//! let root = Namespace::new();
//! root.scope("units").unwrap().set("cm", Value::float(0.01));
//! assert_eq!(root.get_path("units.cm").unwrap(), Some(Value::float(0.01)));
//! ```

pub mod lazy;
pub mod scope;

pub use lazy::{LazyCell, Resolver};
pub use scope::{Namespace, Slot, WeakNamespace};
