//! Core bundle of constants and arithmetic functions.
//!
//! Everything here is imported through the same path as any third-party
//! extension, as lazy factories, so nothing is computed until first read.

pub mod arithmetic;
pub mod constants;
pub mod core;

pub use self::core::{core_imports, register_core};
