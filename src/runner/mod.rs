pub mod ds;
pub mod expression;
pub mod import;
pub mod namespace;
pub mod std_lib;
pub mod typed;
