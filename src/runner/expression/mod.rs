//! Transforms and the expression-safe projection of the namespace.

pub mod transform;

pub use transform::{ExpressionScope, TransformRegistry};

use std::collections::HashSet;

/// Path of the scope that holds transform functions.
pub const TRANSFORM_PATH: &str = "expression.transform";

/// Path of the scope exposed to the expression evaluator.
pub const EXPRESSION_SCOPE_PATH: &str = "expression.scope";

lazy_static! {
    /// Top-level segments that are never reachable from expressions.
    pub static ref UNSAFE_SEGMENTS: HashSet<&'static str> =
        ["expression", "type", "docs", "error", "json", "chain"]
            .iter()
            .copied()
            .collect();
}

/// Whether `name` may appear in the expression scope.
pub fn allowed_in_expressions(name: &str) -> bool {
    let top = name.split('.').next().unwrap_or(name);
    !UNSAFE_SEGMENTS.contains(top)
}
