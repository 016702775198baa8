//! Registration of modern and legacy factories.

use std::rc::Rc;

use tracing::debug;

use crate::runner::ds::error::{Error, Result};
use crate::runner::ds::value::Value;
use crate::runner::expression::allowed_in_expressions;
use crate::runner::import::dependencies::Dependencies;
use crate::runner::import::handler::silence;
use crate::runner::import::host::Host;
use crate::runner::import::options::ImportOptions;
use crate::runner::import::unit::{Factory, LegacyFactory};
use crate::runner::namespace::{LazyCell, Namespace, Resolver, Slot, WeakNamespace};
use crate::runner::typed;

/// Where and how a factory product is bound.
struct Registration {
    target: Namespace,
    name: String,
    path: Option<String>,
    lazy: bool,
    alias: Option<String>,
    /// A transform was registered under the name before this import.
    had_transform: bool,
    /// The product goes into the expression scope.
    expose: bool,
    options: ImportOptions,
}

/// Bindings a lazy factory displaced, put back when its product is rejected
/// as a duplicate.
struct Displaced(Vec<(WeakNamespace, String, Option<Slot>)>);

impl Displaced {
    fn capture(bindings: &[(&Namespace, &str)]) -> Self {
        Displaced(
            bindings
                .iter()
                .map(|(scope, name)| (scope.downgrade(), name.to_string(), scope.slot(name)))
                .collect(),
        )
    }

    fn restore(&self) {
        for (scope, name, slot) in &self.0 {
            let scope = match scope.upgrade() {
                Some(scope) => scope,
                None => continue,
            };
            match slot {
                Some(slot) => scope.bind(name, slot.clone()),
                None => {
                    scope.remove(name);
                }
            }
        }
    }
}

impl Host {
    pub(crate) fn import_factory(&self, factory: &Factory, name: &str, options: ImportOptions) -> Result<()> {
        if name.is_empty() {
            return Err(Error::EmptyFactoryName);
        }
        if name.contains('.') {
            return Err(Error::NestedFactoryName(name.to_string()));
        }
        let target = self.target_scope(factory.path.as_deref())?;
        let existing = target.slot(name);

        let resolver: Resolver = {
            let root = self.root.downgrade();
            let name = name.to_string();
            let create = factory.create.clone();
            let declared = factory.dependencies.clone();
            Rc::new(move || {
                let root = root.upgrade().ok_or_else(|| Error::Detached(name.clone()))?;
                let dependencies = Dependencies::resolve(&name, &declared, &root)?;
                let instance = create(&dependencies)?;
                settle(&name, existing.as_ref(), instance, options)
            })
        };

        let expose = factory.is_transform()
            || (factory.path.is_none() && !factory.meta.is_class && allowed_in_expressions(name));
        self.register(
            Registration {
                target,
                name: name.to_string(),
                path: factory.path.clone(),
                lazy: factory.lazy,
                alias: factory.meta.formerly.clone(),
                had_transform: !factory.is_transform() && self.transforms.contains(name),
                expose,
                options,
            },
            resolver,
        )
    }

    pub(crate) fn import_legacy(&self, factory: &LegacyFactory, options: ImportOptions) -> Result<()> {
        let name = match &factory.name {
            Some(name) if name.is_empty() => return Err(Error::EmptyFactoryName),
            Some(name) => name.clone(),
            None => {
                debug!("running unnamed legacy factory");
                self.loader.load(factory, &self.root, &self.config)?;
                return Ok(());
            }
        };
        let target = self.target_scope(factory.path.as_deref())?;
        let existing = target.slot(&name);

        let resolver: Resolver = {
            let root = self.root.downgrade();
            let loader = self.loader.clone();
            let config = self.config.clone();
            let factory = factory.clone();
            let name = name.clone();
            Rc::new(move || {
                let root = root.upgrade().ok_or_else(|| Error::Detached(name.clone()))?;
                let instance = loader.load(&factory, &root, &config)?;
                settle(&name, existing.as_ref(), instance, options)
            })
        };

        let expose =
            factory.is_transform() || (factory.path.is_none() && allowed_in_expressions(&name));
        self.register(
            Registration {
                target,
                had_transform: !factory.is_transform() && self.transforms.contains(&name),
                name,
                path: factory.path.clone(),
                lazy: factory.lazy,
                alias: None,
                expose,
                options,
            },
            resolver,
        )
    }

    fn target_scope(&self, path: Option<&str>) -> Result<Namespace> {
        match path {
            Some(path) => self.root.scope(path),
            None => Ok(self.root.clone()),
        }
    }

    fn register(&self, registration: Registration, resolver: Resolver) -> Result<()> {
        let Registration {
            target,
            name,
            path,
            lazy,
            alias,
            had_transform,
            expose,
            options,
        } = registration;

        let slot = if lazy {
            debug!(name = %name, path = ?path, "binding lazy factory");
            let mut bindings = vec![
                (&target, name.as_str()),
                (self.transforms.transforms(), name.as_str()),
                (self.transforms.expression_namespace(), name.as_str()),
            ];
            if let Some(alias) = &alias {
                bindings.push((&target, alias.as_str()));
                bindings.push((self.transforms.expression_namespace(), alias.as_str()));
            }
            let displaced = Displaced::capture(&bindings);
            let key = name.clone();
            let resolver: Resolver = Rc::new(move || {
                resolver().map_err(|error| {
                    if matches!(&error, Error::DuplicateName(duplicate) if *duplicate == key) {
                        debug!(%error, "restoring displaced bindings");
                        displaced.restore();
                    }
                    error
                })
            });
            Slot::Lazy(LazyCell::new(name.clone(), resolver))
        } else {
            debug!(name = %name, path = ?path, "creating eager factory");
            match resolver() {
                Ok(value) => Slot::from(value),
                Err(error @ Error::DuplicateName(_)) => return silence(error, options),
                Err(error) => return Err(error),
            }
        };

        target.bind(&name, slot.clone());
        if let Some(alias) = &alias {
            target.bind(alias, slot.clone());
        }

        if had_transform {
            self.transforms.delete_transform(&name);
        } else if expose {
            self.transforms.bind_expression(&name, slot.clone());
            if let Some(alias) = &alias {
                self.transforms.bind_expression(alias, slot.clone());
            }
        }

        self.emit(&name, Rc::new(move || slot.resolve()), path);
        Ok(())
    }
}

/// Decide what a freshly created `instance` turns into given what was bound before.
fn settle(name: &str, existing: Option<&Slot>, instance: Value, options: ImportOptions) -> Result<Value> {
    if instance.transform().is_some() {
        return Err(Error::IllegalTransformAttachment(name.to_string()));
    }

    // An entry that fails to resolve still occupies the name.
    let (existing, unresolved) = match existing.map(Slot::resolve).transpose() {
        Ok(existing) => (existing.filter(|v| !v.is_undefined()), false),
        Err(_) => (None, true),
    };

    if let (Some(Value::Function(old)), Value::Function(new)) = (&existing, &instance) {
        if old.is_typed() && new.is_typed() {
            if options.override_existing {
                return Ok(instance);
            }
            return typed::merge(old, new).map(Value::Function);
        }
    }

    if options.override_existing || (existing.is_none() && !unresolved) {
        return Ok(instance);
    }
    match existing {
        Some(existing) if options.silent => {
            debug!(name, "name already in use, keeping existing value");
            Ok(existing)
        }
        _ => Err(Error::DuplicateName(name.to_string())),
    }
}
