use tracing::trace;

use crate::runner::ds::error::Result;
use crate::runner::ds::value::Value;
use crate::runner::expression::{allowed_in_expressions, EXPRESSION_SCOPE_PATH, TRANSFORM_PATH};
use crate::runner::namespace::{Namespace, Slot};

/// Read-only view of the names reachable from the expression evaluator.
///
/// Entries whose top-level segment is unsafe are never present, and a name
/// with a registered transform maps to the transform instead of the raw value.
#[derive(Clone, Debug)]
pub struct ExpressionScope {
    scope: Namespace,
}

impl ExpressionScope {
    pub fn get(&self, name: &str) -> Result<Option<Value>> {
        self.scope.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.scope.contains(name)
    }

    pub fn is_pending(&self, name: &str) -> bool {
        self.scope.is_pending(name)
    }

    pub fn names(&self) -> Vec<String> {
        self.scope.names()
    }
}

/// Transforms by name, plus maintenance of the expression scope.
///
/// Both live in the namespace tree itself, under [`TRANSFORM_PATH`] and
/// [`EXPRESSION_SCOPE_PATH`]; the top-level `expression` segment is unsafe, so
/// neither is reachable from inside the expression scope.
#[derive(Clone, Debug)]
pub struct TransformRegistry {
    root: Namespace,
    transforms: Namespace,
    expression: Namespace,
}

impl TransformRegistry {
    /// Open the transform and expression scopes under `root`.
    ///
    /// Anything bound at those paths that is not a scope is replaced.
    pub fn new(root: &Namespace) -> Self {
        TransformRegistry {
            root: root.clone(),
            transforms: open_path(root, TRANSFORM_PATH),
            expression: open_path(root, EXPRESSION_SCOPE_PATH),
        }
    }

    /// Scope holding transform functions; factories with the transform path write here.
    pub fn transforms(&self) -> &Namespace {
        &self.transforms
    }

    pub fn expression_scope(&self) -> ExpressionScope {
        ExpressionScope {
            scope: self.expression.clone(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.transforms.contains(name)
    }

    pub fn get(&self, name: &str) -> Result<Option<Value>> {
        self.transforms.get(name)
    }

    /// Update transform and expression entries after `value` was written to `root[name]`.
    pub(crate) fn import_transform(&self, name: &str, value: &Value) {
        match value.transform() {
            Some(transform) => {
                trace!(name, "registering transform");
                let transform = Value::Function(transform);
                self.transforms.set(name, transform.clone());
                self.bind_expression(name, Slot::Value(transform));
            }
            None => {
                self.transforms.remove(name);
                self.bind_expression(name, Slot::from(value.clone()));
            }
        }
    }

    /// Drop the transform for `name`; the expression scope falls back to the root entry.
    pub(crate) fn delete_transform(&self, name: &str) {
        trace!(name, "removing stale transform");
        self.transforms.remove(name);
        match self.root.slot(name) {
            Some(slot) => self.bind_expression(name, slot),
            None => self.forget_expression(name),
        }
    }

    /// Bind `slot` in the expression scope; unsafe names are never bound.
    pub(crate) fn bind_expression(&self, name: &str, slot: Slot) {
        if allowed_in_expressions(name) {
            self.expression.bind(name, slot);
        } else {
            self.expression.remove(name);
        }
    }

    pub(crate) fn expression_namespace(&self) -> &Namespace {
        &self.expression
    }

    pub(crate) fn forget_expression(&self, name: &str) {
        self.expression.remove(name);
    }
}

fn open_path(root: &Namespace, path: &str) -> Namespace {
    path.split('.').fold(root.clone(), |scope, segment| scope.child(segment))
}
