//! Verifier error types using thiserror 2.0.

use rust_common::{ErrorKind, PlatformError};
use thiserror::Error;

/// Failure reported by the verification engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Provider responses did not satisfy the contract
    #[error("Verification failed: {0}")]
    Mismatch(String),

    /// Provider or pact source could not be reached
    #[error("Network error: {0}")]
    Network(String),

    /// Broker rejected or failed the pact query
    #[error("Broker error: {0}")]
    Broker(String),
}

/// Errors returned by provider verification.
#[derive(Error, Debug)]
pub enum VerifierError {
    /// Verifier setup is invalid; the engine was not invoked
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Engine reported a failure
    #[error(transparent)]
    Verification(#[from] EngineError),

    /// Platform error
    #[error(transparent)]
    Platform(#[from] PlatformError),
}

/// Result type for verifier operations.
pub type VerifierResult<T> = Result<T, VerifierError>;

impl VerifierError {
    /// Kind of failure this error represents.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::Verification(_) => ErrorKind::Verification,
            Self::Platform(e) => e.kind(),
        }
    }

    /// Create a configuration error.
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}
