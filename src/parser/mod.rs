mod api;
pub mod ast;

pub use api::{Rule, SignatureParser};
