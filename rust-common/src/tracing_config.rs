//! Tracing subscriber configuration.

use crate::PlatformError;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Tracing configuration.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Log level filter, overridden by `RUST_LOG` when set
    pub log_level: String,
    /// Whether to output JSON format
    pub json_output: bool,
    /// Whether to route output through the test writer
    pub test_writer: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_output: false,
            test_writer: false,
        }
    }
}

impl TracingConfig {
    /// Create config with custom log level.
    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Enable JSON output.
    #[must_use]
    pub const fn with_json_output(mut self) -> Self {
        self.json_output = true;
        self
    }

    /// Capture output with the libtest writer so it only shows for failing tests.
    #[must_use]
    pub const fn for_tests(mut self) -> Self {
        self.test_writer = true;
        self
    }
}

/// Initialize tracing with the given configuration.
///
/// Installs the global subscriber. Test suites call this from several tests,
/// so a second installation is reported as an error rather than a panic.
///
/// # Errors
///
/// Returns [`PlatformError::Tracing`] when a global subscriber is already set.
pub fn init_tracing(config: &TracingConfig) -> Result<(), PlatformError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let result = match (config.json_output, config.test_writer) {
        (true, true) => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_test_writer())
            .try_init(),
        (true, false) => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
        (false, true) => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_test_writer())
            .try_init(),
        (false, false) => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init(),
    };

    result.map_err(|e| PlatformError::Tracing(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TracingConfig::default();
        assert_eq!(config.log_level, "info");
        assert!(!config.json_output);
        assert!(!config.test_writer);
    }

    #[test]
    fn test_config_builder() {
        let config = TracingConfig::default()
            .with_log_level("debug")
            .with_json_output()
            .for_tests();

        assert_eq!(config.log_level, "debug");
        assert!(config.json_output);
        assert!(config.test_writer);
    }

    #[test]
    fn test_second_init_is_an_error() {
        let config = TracingConfig::default().for_tests();
        let _ = init_tracing(&config);
        let second = init_tracing(&config);
        assert!(matches!(second, Err(PlatformError::Tracing(_))));
    }
}
