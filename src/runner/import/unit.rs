//! What can be imported: values, factories and collections of them.

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::runner::ds::error::Result;
use crate::runner::ds::value::Value;
use crate::runner::expression::TRANSFORM_PATH;
use crate::runner::import::dependencies::Dependencies;
use crate::runner::import::legacy::LoadContext;
use crate::runner::import::options::ImportOptions;

pub type CreateFn = Rc<dyn Fn(&Dependencies) -> Result<Value>>;

pub type LoadFn = Rc<dyn Fn(&LoadContext) -> Result<Value>>;

/// Extra information about a factory product.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FactoryMeta {
    /// The product is a class; classes stay out of the expression scope.
    pub is_class: bool,
    /// Deprecated name under which the product is also bound.
    pub formerly: Option<String>,
}

/// Deferred constructor of one namespace entry.
#[derive(Clone)]
pub struct Factory {
    pub name: String,
    /// Names read from the namespace and handed to `create`. A leading `?`
    /// marks a dependency as optional.
    pub dependencies: Vec<String>,
    pub create: CreateFn,
    pub path: Option<String>,
    pub lazy: bool,
    pub meta: FactoryMeta,
}

impl Factory {
    pub fn new<F>(name: impl Into<String>, dependencies: &[&str], create: F) -> Self
    where
        F: Fn(&Dependencies) -> Result<Value> + 'static,
    {
        Factory {
            name: name.into(),
            dependencies: dependencies.iter().map(|d| d.to_string()).collect(),
            create: Rc::new(create),
            path: None,
            lazy: true,
            meta: FactoryMeta::default(),
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Run `create` at import time instead of on first access.
    pub fn eager(mut self) -> Self {
        self.lazy = false;
        self
    }

    pub fn as_class(mut self) -> Self {
        self.meta.is_class = true;
        self
    }

    pub fn formerly(mut self, name: impl Into<String>) -> Self {
        self.meta.formerly = Some(name.into());
        self
    }

    /// Whether the product is a transform function.
    pub fn is_transform(&self) -> bool {
        self.path.as_deref() == Some(TRANSFORM_PATH)
    }

    pub(crate) fn same_as(&self, other: &Factory) -> bool {
        Rc::ptr_eq(&self.create, &other.create) && self.name == other.name
    }
}

impl fmt::Debug for Factory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Factory")
            .field("name", &self.name)
            .field("dependencies", &self.dependencies)
            .field("path", &self.path)
            .field("lazy", &self.lazy)
            .field("meta", &self.meta)
            .finish()
    }
}

/// Factory in the older load-function form.
///
/// A legacy factory without a name is run once at import time for its side
/// effects and registers nothing.
#[derive(Clone)]
pub struct LegacyFactory {
    pub name: Option<String>,
    pub path: Option<String>,
    pub lazy: bool,
    pub factory: LoadFn,
}

impl LegacyFactory {
    pub fn new<F>(name: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&LoadContext) -> Result<Value> + 'static,
    {
        LegacyFactory {
            name: Some(name.into()),
            path: None,
            lazy: true,
            factory: Rc::new(factory),
        }
    }

    pub fn unnamed<F>(factory: F) -> Self
    where
        F: Fn(&LoadContext) -> Result<Value> + 'static,
    {
        LegacyFactory {
            name: None,
            path: None,
            lazy: true,
            factory: Rc::new(factory),
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn eager(mut self) -> Self {
        self.lazy = false;
        self
    }

    pub fn is_transform(&self) -> bool {
        self.path.as_deref() == Some(TRANSFORM_PATH)
    }

    pub(crate) fn same_as(&self, other: &LegacyFactory) -> bool {
        Rc::ptr_eq(&self.factory, &other.factory)
    }
}

impl fmt::Debug for LegacyFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LegacyFactory")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("lazy", &self.lazy)
            .finish()
    }
}

/// One unit handed to an import.
#[derive(Clone, Debug)]
pub enum ImportUnit {
    Value(Value),
    Factory(Factory),
    Legacy(LegacyFactory),
    Sequence(Vec<ImportUnit>),
    Object(IndexMap<String, ImportUnit>),
}

impl ImportUnit {
    /// Build an object unit from `(name, unit)` pairs.
    pub fn object<I, K, U>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, U)>,
        K: Into<String>,
        U: Into<ImportUnit>,
    {
        ImportUnit::Object(
            entries
                .into_iter()
                .map(|(k, u)| (k.into(), u.into()))
                .collect(),
        )
    }

    pub fn sequence<I, U>(units: I) -> Self
    where
        I: IntoIterator<Item = U>,
        U: Into<ImportUnit>,
    {
        ImportUnit::Sequence(units.into_iter().map(Into::into).collect())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ImportUnit::Value(v) => v.type_name(),
            ImportUnit::Factory(_) => "factory",
            ImportUnit::Legacy(_) => "legacy factory",
            ImportUnit::Sequence(_) => "sequence",
            ImportUnit::Object(_) => "object",
        }
    }
}

impl From<Value> for ImportUnit {
    fn from(value: Value) -> Self {
        ImportUnit::Value(value)
    }
}

impl From<Factory> for ImportUnit {
    fn from(factory: Factory) -> Self {
        ImportUnit::Factory(factory)
    }
}

impl From<LegacyFactory> for ImportUnit {
    fn from(factory: LegacyFactory) -> Self {
        ImportUnit::Legacy(factory)
    }
}

impl From<Vec<ImportUnit>> for ImportUnit {
    fn from(units: Vec<ImportUnit>) -> Self {
        ImportUnit::Sequence(units)
    }
}

/// Arguments of a dynamically dispatched import call.
#[derive(Clone, Debug)]
pub enum ImportArgument {
    Unit(ImportUnit),
    Options(ImportOptions),
}
