use std::rc::Rc;

use crate::runner::ds::error::{Error, Result};
use crate::runner::ds::function::call_value;
use crate::runner::ds::value::Value;
use crate::runner::expression::{ExpressionScope, TransformRegistry};
use crate::runner::import::config::HostConfig;
use crate::runner::import::events::{ImportEvent, ImportListeners, ListenerId};
use crate::runner::import::legacy::LegacyLoader;
use crate::runner::namespace::{Namespace, Resolver};
use crate::runner::std_lib::core_imports;

/// The running namespace that extensions import into.
///
/// A host owns the root [`Namespace`], the [`TransformRegistry`] with its
/// expression scope, the `import` listeners and the legacy factory loader.
/// Everything is single-threaded; share a host with `Rc` if needed.
pub struct Host {
    pub(super) root: Namespace,
    pub(super) transforms: TransformRegistry,
    pub(super) listeners: ImportListeners,
    pub(super) loader: Rc<LegacyLoader>,
    pub(super) config: Rc<HostConfig>,
}

impl Host {
    /// Create a host with an empty namespace.
    pub fn new() -> Self {
        Self::with_config(HostConfig::default())
    }

    pub fn with_config(config: HostConfig) -> Self {
        let root = Namespace::new();
        let transforms = TransformRegistry::new(&root);
        Host {
            root,
            transforms,
            listeners: ImportListeners::default(),
            loader: Rc::new(LegacyLoader::new()),
            config: Rc::new(config),
        }
    }

    /// Create a host with the core constants and arithmetic functions imported.
    pub fn with_core() -> Result<Self> {
        let host = Self::new();
        host.import(core_imports(), None)?;
        Ok(host)
    }

    pub fn namespace(&self) -> &Namespace {
        &self.root
    }

    pub fn transforms(&self) -> &TransformRegistry {
        &self.transforms
    }

    /// The view of the namespace exposed to the expression evaluator.
    pub fn expression_scope(&self) -> ExpressionScope {
        self.transforms.expression_scope()
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    /// Read a root entry, resolving it if it is bound lazily.
    pub fn get(&self, name: &str) -> Result<Option<Value>> {
        self.root.get(name)
    }

    pub fn get_path(&self, path: &str) -> Result<Option<Value>> {
        self.root.get_path(path)
    }

    /// Call the function bound to `name` with the root namespace as receiver.
    pub fn call(&self, name: &str, args: Vec<Value>) -> Result<Value> {
        let function = self
            .root
            .get(name)?
            .ok_or_else(|| Error::NotDefined(name.to_string()))?;
        call_value(name, &function, &Value::Scope(self.root.clone()), args)
    }

    /// Register a listener for `import` notifications.
    pub fn on_import<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&ImportEvent) + 'static,
    {
        self.listeners.add(Rc::new(listener))
    }

    /// Remove a listener; returns false if it was not registered.
    pub fn off_import(&self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub(super) fn emit(&self, name: &str, resolver: Resolver, path: Option<String>) {
        let event = ImportEvent {
            name: name.to_string(),
            resolver,
            path,
        };
        self.listeners.emit(&event);
    }
}

impl Default for Host {
    fn default() -> Self {
        Self::new()
    }
}
