//! Classification and flattening of import units.

use std::collections::HashMap;

use tracing::debug;

use crate::runner::ds::error::{Error, Result};
use crate::runner::ds::value::Value;
use crate::runner::import::host::Host;
use crate::runner::import::options::ImportOptions;
use crate::runner::import::unit::{Factory, ImportArgument, ImportUnit, LegacyFactory};

/// A leaf of an import unit, ready to be registered.
enum FlatEntry {
    Value { name: String, value: Value },
    Factory { name: String, factory: Factory },
    Legacy(LegacyFactory),
}

impl FlatEntry {
    /// Key used to detect the same name imported twice in one batch.
    /// Transforms get their own key so a function and its transform can travel together.
    fn flat_key(&self) -> Option<String> {
        match self {
            FlatEntry::Value { name, .. } => Some(name.clone()),
            FlatEntry::Factory { name, factory } if factory.is_transform() => {
                Some(format!("{}.transform", name))
            }
            FlatEntry::Factory { name, .. } => Some(name.clone()),
            FlatEntry::Legacy(factory) => factory.name.as_ref().map(|name| {
                if factory.is_transform() {
                    format!("{}.transform", name)
                } else {
                    name.clone()
                }
            }),
        }
    }

    fn same_as(&self, other: &FlatEntry) -> bool {
        match (self, other) {
            (FlatEntry::Value { value: a, .. }, FlatEntry::Value { value: b, .. }) => a == b,
            (FlatEntry::Factory { factory: a, .. }, FlatEntry::Factory { factory: b, .. }) => {
                a.same_as(b)
            }
            (FlatEntry::Legacy(a), FlatEntry::Legacy(b)) => a.same_as(b),
            _ => false,
        }
    }
}

#[derive(Default)]
struct FlatImports {
    entries: Vec<FlatEntry>,
    index: HashMap<String, usize>,
}

impl FlatImports {
    fn push(&mut self, entry: FlatEntry, options: ImportOptions) -> Result<()> {
        if let Some(key) = entry.flat_key() {
            if let Some(&idx) = self.index.get(&key) {
                if self.entries[idx].same_as(&entry) {
                    return Ok(());
                }
                return silence(Error::ImportedTwice(key), options);
            }
            self.index.insert(key, self.entries.len());
        }
        self.entries.push(entry);
        Ok(())
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Swallow `error` if the import is silent and the error may be silenced.
pub(super) fn silence(error: Error, options: ImportOptions) -> Result<()> {
    if options.silent && error.is_silenceable() {
        debug!(%error, "skipped in silent mode");
        Ok(())
    } else {
        Err(error)
    }
}

fn flatten(
    unit: ImportUnit,
    name: Option<String>,
    flat: &mut FlatImports,
    options: ImportOptions,
) -> Result<()> {
    match unit {
        ImportUnit::Factory(factory) => {
            let name = name.unwrap_or_else(|| factory.name.clone());
            flat.push(FlatEntry::Factory { name, factory }, options)
        }
        ImportUnit::Legacy(factory) => flat.push(FlatEntry::Legacy(factory), options),
        ImportUnit::Sequence(units) => {
            for unit in units {
                flatten(unit, None, flat, options)?;
            }
            Ok(())
        }
        ImportUnit::Object(entries) => {
            for (key, unit) in entries {
                flatten(unit, Some(key), flat, options)?;
            }
            Ok(())
        }
        ImportUnit::Value(value) => match name {
            Some(name) if value.is_supported_type() => {
                flat.push(FlatEntry::Value { name, value }, options)
            }
            _ => silence(Error::UnsupportedType(value.type_name().to_string()), options),
        },
    }
}

impl Host {
    /// Import a value, factory, or collection of them into the namespace.
    ///
    /// Without `options` the defaults from the host configuration apply.
    /// The unit is flattened first, so a batch that names the same entry
    /// twice fails before anything is registered. Registration then runs
    /// entry by entry and stops at the first error, leaving earlier entries
    /// in place.
    pub fn import(&self, unit: impl Into<ImportUnit>, options: Option<ImportOptions>) -> Result<()> {
        let options = options.unwrap_or(self.config.import);
        let mut flat = FlatImports::default();
        flatten(unit.into(), None, &mut flat, options)?;
        debug!(entries = flat.len(), ?options, "importing");

        for entry in flat.entries {
            match entry {
                FlatEntry::Value { name, value } => self.import_value(&name, value, options)?,
                FlatEntry::Factory { name, factory } => {
                    self.import_factory(&factory, &name, options)?
                }
                FlatEntry::Legacy(factory) => self.import_legacy(&factory, options)?,
            }
        }
        Ok(())
    }

    /// Dynamically dispatched form of [`Host::import`]: a unit, optionally followed by options.
    pub fn import_args(&self, args: Vec<ImportArgument>) -> Result<()> {
        let count = args.len();
        if !(1..=2).contains(&count) {
            return Err(Error::Arity {
                function: "import".to_string(),
                count,
                min: 1,
                max: 2,
            });
        }
        let mut args = args.into_iter();
        match (args.next(), args.next()) {
            (Some(ImportArgument::Unit(unit)), None) => self.import(unit, None),
            (Some(ImportArgument::Unit(unit)), Some(ImportArgument::Options(options))) => {
                self.import(unit, Some(options))
            }
            _ => Err(Error::Type(
                "import expects a unit followed by optional options".to_string(),
            )),
        }
    }
}
