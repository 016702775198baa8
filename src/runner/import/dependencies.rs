use indexmap::IndexMap;

use crate::runner::ds::error::{Error, Result};
use crate::runner::ds::function::FunctionRef;
use crate::runner::ds::value::Value;
use crate::runner::namespace::Namespace;

/// Values a modern factory asked for, read from the namespace when it is resolved.
pub struct Dependencies {
    factory: String,
    namespace: Namespace,
    values: IndexMap<String, Value>,
}

impl Dependencies {
    /// Read every declared dependency from `namespace`.
    ///
    /// Reading forces lazy entries, so a dependency chain that leads back to
    /// the factory being resolved fails with [`Error::CyclicResolution`].
    pub(crate) fn resolve(factory: &str, declared: &[String], namespace: &Namespace) -> Result<Self> {
        let mut values = IndexMap::new();
        for dependency in declared {
            let (name, optional) = match dependency.strip_prefix('?') {
                Some(name) => (name, true),
                None => (dependency.as_str(), false),
            };
            if name.contains('.') {
                return Err(Error::InvalidDependency {
                    factory: factory.to_string(),
                    dependency: name.to_string(),
                });
            }
            match namespace.get(name)? {
                Some(value) => {
                    values.insert(name.to_string(), value);
                }
                None if optional => {}
                None => {
                    return Err(Error::MissingDependency {
                        factory: factory.to_string(),
                        dependency: name.to_string(),
                    })
                }
            }
        }
        Ok(Dependencies {
            factory: factory.to_string(),
            namespace: namespace.clone(),
            values,
        })
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// A required dependency that must be callable.
    pub fn function(&self, name: &str) -> Result<FunctionRef> {
        match self.values.get(name) {
            Some(Value::Function(f)) => Ok(f.clone()),
            Some(_) => Err(Error::NotCallable(name.to_string())),
            None => Err(Error::MissingDependency {
                factory: self.factory.clone(),
                dependency: name.to_string(),
            }),
        }
    }

    /// A required numeric dependency.
    pub fn number(&self, name: &str) -> Result<f64> {
        match self.values.get(name) {
            Some(value) => value
                .as_f64()
                .ok_or_else(|| Error::Type(format!("{} is not a number", name))),
            None => Err(Error::MissingDependency {
                factory: self.factory.clone(),
                dependency: name.to_string(),
            }),
        }
    }

    /// The root namespace.
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }
}
