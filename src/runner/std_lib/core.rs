//! Core bundle registration.

use crate::runner::ds::error::Result;
use crate::runner::import::{Host, ImportUnit};

use super::arithmetic;
use super::constants;

/// The core bundle as one import unit.
pub fn core_imports() -> ImportUnit {
    let mut units: Vec<ImportUnit> = Vec::new();
    // Constants first; tau reads pi.
    units.extend(constants::factories().into_iter().map(ImportUnit::from));
    units.extend(arithmetic::factories().into_iter().map(ImportUnit::from));
    ImportUnit::Sequence(units)
}

/// Import the core bundle into an existing host.
pub fn register_core(host: &Host) -> Result<()> {
    host.import(core_imports(), None)
}
