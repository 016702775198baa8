use serde::Deserialize;

/// Options for one import call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ImportOptions {
    /// Replace existing entries instead of merging or rejecting.
    #[serde(rename = "override")]
    pub override_existing: bool,

    /// Skip conflicting or unsupported entries instead of failing.
    pub silent: bool,

    /// Pass primitive argument values to imported functions.
    pub wrap: bool,
}

impl ImportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn overriding(mut self) -> Self {
        self.override_existing = true;
        self
    }

    pub fn silent(mut self) -> Self {
        self.silent = true;
        self
    }

    pub fn wrapped(mut self) -> Self {
        self.wrap = true;
        self
    }
}
