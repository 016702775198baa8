//! Registration of plain values.

use std::rc::Rc;

use tracing::debug;

use crate::runner::ds::error::{Error, Result};
use crate::runner::ds::function::{Function, FunctionRef};
use crate::runner::ds::value::Value;
use crate::runner::import::handler::silence;
use crate::runner::import::host::Host;
use crate::runner::import::options::ImportOptions;
use crate::runner::namespace::Namespace;
use crate::runner::typed;

impl Host {
    pub(crate) fn import_value(&self, name: &str, value: Value, options: ImportOptions) -> Result<()> {
        let mut value = value;
        if options.wrap {
            if let Some(wrapped) = value.as_function().map(|f| wrap(f, &self.root)) {
                value = Value::Function(wrapped);
            }
        }
        if let Some(lifted) = lift_signature(name, &value)? {
            value = Value::Function(lifted);
        }

        // An entry that fails to resolve still occupies the name.
        let (existing, unresolved) = match self.root.get(name) {
            Ok(existing) => (existing.filter(|v| !v.is_undefined()), false),
            Err(e) => {
                debug!(name, error = %e, "existing entry failed to resolve");
                (None, true)
            }
        };

        if let (Some(Value::Function(old)), Value::Function(new)) = (&existing, &value) {
            if old.is_typed() && new.is_typed() {
                let combined = if options.override_existing {
                    typed::retag(name, new)?
                } else {
                    typed::merge(old, new)?
                };
                self.commit_value(name, Value::Function(combined));
                return Ok(());
            }
        }

        let taken = existing.is_some() || unresolved || self.config.is_valueless_unit(name);
        if !taken || options.override_existing {
            self.commit_value(name, value);
            return Ok(());
        }
        silence(Error::DuplicateName(name.to_string()), options)
    }

    fn commit_value(&self, name: &str, value: Value) {
        debug!(name, kind = value.type_name(), "registering value");
        self.root.set(name, value.clone());
        self.transforms.import_transform(name, &value);
        self.emit(name, Rc::new(move || Ok(value.clone())), None);
    }
}

/// Turn a function that declares a single signature into a typed function.
fn lift_signature(name: &str, value: &Value) -> Result<Option<FunctionRef>> {
    match value.as_function() {
        Some(f) if !f.is_typed() => match f.signature() {
            Some(signature) => typed::tag_signature(name, vec![(signature, f.clone())]).map(Some),
            None => Ok(None),
        },
        _ => Ok(None),
    }
}

/// Wrap `original` so it receives primitive arguments and the root namespace as receiver.
///
/// The wrapper keeps the transform of `original` but drops its declared signature.
fn wrap(original: &FunctionRef, root: &Namespace) -> FunctionRef {
    let inner = original.clone();
    let receiver = root.downgrade();
    let wrapper = Function::closure(original.name(), move |_this, args| {
        let this = receiver
            .upgrade()
            .map(Value::Scope)
            .unwrap_or(Value::Undefined);
        let args = args.iter().map(Value::to_primitive).collect();
        inner.call(&this, args)
    });
    match original.transform() {
        Some(transform) => wrapper.with_transform_ref(transform).into_ref(),
        None => wrapper.into_ref(),
    }
}
