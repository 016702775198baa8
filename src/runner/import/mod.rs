//! The `import` operation and everything it registers.
//!
//! An import takes an [`ImportUnit`] and writes its entries into the root
//! namespace of a [`Host`]:
//!
//! - **Values** are stored under their name. Two typed functions with the same
//!   name are merged into one with the union of their signatures.
//! - **Factories** are bound lazily by default. Their `create` function runs on
//!   the first read, with the declared dependencies read from the namespace.
//! - **Legacy factories** use the older load-function protocol. Their instances
//!   are shared between everything that loads them.
//! - **Sequences** and **objects** are flattened first. A batch that names the
//!   same entry twice is rejected before anything is written.
//!
//! Every registered entry is also reflected into the expression scope, unless
//! its name is unsafe, and announced to `import` listeners.
//!
//! ## Example
//!
//! ```
//! use mathns::runner::ds::value::Value;
//! use mathns::runner::import::{Factory, Host, ImportOptions, ImportUnit};
//!
//! let host = Host::new();
//! host.import(
//!     ImportUnit::object(vec![("two", Value::integer(2))]),
//!     None,
//! )
//! .unwrap();
//!
//! let four = Factory::new("four", &["two"], |deps| {
//!     Ok(Value::float(deps.number("two")? * 2.0))
//! });
//! host.import(four, None).unwrap();
//! assert!(host.namespace().is_pending("four"));
//! assert_eq!(host.get("four").unwrap(), Some(Value::float(4.0)));
//!
//! // A second import of the same name fails unless asked to override.
//! assert!(host
//!     .import(ImportUnit::object(vec![("two", Value::integer(3))]), None)
//!     .is_err());
//! host.import(
//!     ImportUnit::object(vec![("two", Value::integer(3))]),
//!     Some(ImportOptions::new().overriding()),
//! )
//! .unwrap();
//! ```

pub mod config;
pub mod dependencies;
pub mod events;
mod factory;
mod handler;
pub mod host;
pub mod legacy;
pub mod options;
pub mod unit;
mod value;

pub use config::HostConfig;
pub use dependencies::Dependencies;
pub use events::{ImportEvent, ListenerId};
pub use host::Host;
pub use legacy::{LegacyLoader, LoadContext};
pub use options::ImportOptions;
pub use unit::{Factory, FactoryMeta, ImportArgument, ImportUnit, LegacyFactory};
