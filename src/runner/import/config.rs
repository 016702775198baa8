//! Host configuration file parsing.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::runner::ds::error::{Error, Result};
use crate::runner::import::options::ImportOptions;

/// Configuration of a [`Host`](super::Host).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Options used when an import is called without any.
    pub import: ImportOptions,

    /// Unit names that count as taken; importing one of them needs `override`.
    pub valueless_units: Vec<String>,
}

impl HostConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file.
    ///
    /// Expected format:
    /// ```toml
    /// valueless_units = ["cm", "kg"]
    ///
    /// [import]
    /// override = false
    /// silent = true
    /// wrap = false
    /// ```
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn with_valueless_units(mut self, units: &[&str]) -> Self {
        self.valueless_units = units.iter().map(|u| u.to_string()).collect();
        self
    }

    pub fn is_valueless_unit(&self, name: &str) -> bool {
        self.valueless_units.iter().any(|u| u == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_empty_config() {
        let config = HostConfig::parse("").unwrap();
        assert_eq!(config, HostConfig::default());
        assert_eq!(config.import, ImportOptions::default());
    }

    #[test]
    fn test_parse_import_defaults() {
        let config = HostConfig::parse(
            r#"
            valueless_units = ["cm", "kg"]

            [import]
            override = true
            silent = true
            "#,
        )
        .unwrap();
        assert!(config.import.override_existing);
        assert!(config.import.silent);
        assert!(!config.import.wrap);
        assert!(config.is_valueless_unit("cm"));
        assert!(!config.is_valueless_unit("m"));
    }

    #[test]
    fn test_parse_rejects_wrong_types() {
        let result = HostConfig::parse("[import]\nsilent = \"yes\"\n");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[import]\nwrap = true").unwrap();
        let config = HostConfig::load(file.path()).unwrap();
        assert!(config.import.wrap);
    }

    #[test]
    fn test_load_missing_file() {
        let result = HostConfig::load(Path::new("/nonexistent/mathns.toml"));
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
