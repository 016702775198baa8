//! # mathns - extensible math namespace in Rust
//!
//! A namespace of math functions and constants that grows at runtime through
//! a single `import` operation:
//! - Plain values, typed multi-signature functions and numeric domain types
//! - Lazy factories with declared dependencies, resolved on first read
//! - Legacy load-function factories with shared instances
//! - Transforms and an expression-safe projection of the namespace
//! - `import` notifications for observers
//!
//! ## Quick Start
//!
//! ### Importing values
//!
//! ```
//! use mathns::runner::ds::value::Value;
//! use mathns::runner::import::{Host, ImportUnit};
//!
//! let host = Host::new();
//! host.import(
//!     ImportUnit::object(vec![("myvalue", Value::integer(42))]),
//!     None,
//! )
//! .unwrap();
//! assert_eq!(host.get("myvalue").unwrap(), Some(Value::integer(42)));
//! assert!(host.expression_scope().contains("myvalue"));
//! ```
//!
//! ### Extending a typed function
//!
//! ```
//! use mathns::runner::ds::function::Function;
//! use mathns::runner::ds::value::Value;
//! use mathns::runner::import::{Host, ImportUnit};
//!
//! let host = Host::with_core().unwrap();
//! assert_eq!(
//!     host.call("add", vec![Value::integer(2), Value::integer(3)]).unwrap(),
//!     Value::integer(5)
//! );
//!
//! // Teach `add` to concatenate strings; the number signature is kept.
//! let concat = Function::native("add", |_this, args| {
//!     let parts: Vec<String> = args.iter().map(|a| a.to_string()).collect();
//!     Ok(Value::string(parts.concat()))
//! })
//! .with_signature("string, string");
//! host.import(ImportUnit::object(vec![("add", concat.into_value())]), None)
//!     .unwrap();
//!
//! assert_eq!(
//!     host.call("add", vec![Value::integer(1), Value::integer(1)]).unwrap(),
//!     Value::integer(2)
//! );
//! ```
//!
//! ### Listening to imports
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use mathns::runner::ds::value::Value;
//! use mathns::runner::import::{Host, ImportUnit};
//!
//! let host = Host::new();
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let log = seen.clone();
//! host.on_import(move |event| log.borrow_mut().push(event.name.clone()));
//!
//! host.import(ImportUnit::object(vec![("x", Value::integer(1))]), None)
//!     .unwrap();
//! assert_eq!(*seen.borrow(), vec!["x".to_string()]);
//! ```
//!
//! ## Architecture
//!
//! - **[`parser`]** - PEG grammar for typed-function signatures
//! - **[`runner`]** - Namespace, values and the import machinery
//!   - **[`runner::ds`]** - Values, functions, domain types and errors
//!   - **[`runner::namespace`]** - Scope tree with lazy bindings
//!   - **[`runner::typed`]** - Typed functions: tagging, merging, dispatch
//!   - **[`runner::expression`]** - Transforms and the expression scope
//!   - **[`runner::import`]** - The `import` operation and its host
//!   - **[`runner::std_lib`]** - Core constants and arithmetic

#[macro_use]
extern crate lazy_static;

pub mod parser;
pub mod runner;
