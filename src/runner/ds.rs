pub mod domain;
pub mod error;
pub mod function;
pub mod value;
