//! Creation protocol of legacy factories.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::trace;

use crate::runner::ds::error::{Error, Result};
use crate::runner::ds::value::Value;
use crate::runner::import::config::HostConfig;
use crate::runner::import::unit::{LegacyFactory, LoadFn};
use crate::runner::namespace::Namespace;

/// Memoizes legacy factory instances by factory identity.
#[derive(Default)]
pub struct LegacyLoader {
    instances: RefCell<Vec<(LoadFn, Value)>>,
    /// Factories whose load function is currently running.
    loading: RefCell<Vec<LoadFn>>,
}

impl LegacyLoader {
    pub fn new() -> Self {
        Self::default()
    }

    fn cached(&self, factory: &LoadFn) -> Option<Value> {
        self.instances
            .borrow()
            .iter()
            .find(|(f, _)| Rc::ptr_eq(f, factory))
            .map(|(_, v)| v.clone())
    }

    /// Run `factory` unless an instance of it already exists.
    pub fn load(
        self: &Rc<Self>,
        factory: &LegacyFactory,
        namespace: &Namespace,
        config: &Rc<HostConfig>,
    ) -> Result<Value> {
        if let Some(instance) = self.cached(&factory.factory) {
            return Ok(instance);
        }
        if self
            .loading
            .borrow()
            .iter()
            .any(|f| Rc::ptr_eq(f, &factory.factory))
        {
            let name = factory.name.clone().unwrap_or_else(|| "<unnamed>".to_string());
            return Err(Error::CyclicResolution(name));
        }

        trace!(name = ?factory.name, "loading legacy factory");
        let context = LoadContext {
            namespace: namespace.clone(),
            config: config.clone(),
            loader: self.clone(),
        };
        self.loading.borrow_mut().push(factory.factory.clone());
        let outcome = (factory.factory)(&context);
        self.loading
            .borrow_mut()
            .retain(|f| !Rc::ptr_eq(f, &factory.factory));

        let instance = outcome?;
        self.instances
            .borrow_mut()
            .push((factory.factory.clone(), instance.clone()));
        Ok(instance)
    }

    pub fn len(&self) -> usize {
        self.instances.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.borrow().is_empty()
    }
}

/// What a legacy factory receives when it is loaded.
pub struct LoadContext {
    namespace: Namespace,
    config: Rc<HostConfig>,
    loader: Rc<LegacyLoader>,
}

impl LoadContext {
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    /// Load another legacy factory, sharing its instance with every other caller.
    pub fn load(&self, factory: &LegacyFactory) -> Result<Value> {
        self.loader.load(factory, &self.namespace, &self.config)
    }
}
