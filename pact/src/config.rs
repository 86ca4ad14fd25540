//! Consumer-side configuration.

use std::path::PathBuf;

/// Directory contracts are written to when `PACT_OUTPUT_DIR` is unset.
pub const DEFAULT_PACT_DIRECTORY: &str = "/tmp/pacts";

/// [`PactBuilder`](crate::PactBuilder) configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PactBuilderConfig {
    /// Directory contract documents are written to
    pub pact_directory: PathBuf,
    /// Fixed mock server port; reserved from the allocator when unset
    pub port: Option<u16>,
}

impl Default for PactBuilderConfig {
    fn default() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }
}

impl PactBuilderConfig {
    /// Build from an environment lookup function.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            pact_directory: lookup("PACT_OUTPUT_DIR")
                .filter(|dir| !dir.is_empty())
                .map_or_else(|| PathBuf::from(DEFAULT_PACT_DIRECTORY), PathBuf::from),
            port: None,
        }
    }

    /// Set the pact directory.
    #[must_use]
    pub fn with_pact_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.pact_directory = directory.into();
        self
    }

    /// Pin the mock server port.
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }
}
