//! Contract error types using thiserror 2.0.

use crate::builder::Stage;
use pactum_matchers::EncodingError;
use rust_common::{ErrorKind, PlatformError};
use thiserror::Error;

/// Errors raised while building, verifying or persisting a contract.
#[derive(Error, Debug)]
pub enum ContractError {
    /// A required builder stage was never reached
    #[error("Interaction {description:?} is missing its {stage} stage")]
    MissingStage {
        /// Interaction description
        description: String,
        /// The stage that was skipped
        stage: Stage,
    },

    /// A builder stage was supplied twice
    #[error("Interaction {description:?} already has a {stage} stage")]
    StageRepeated {
        /// Interaction description
        description: String,
        /// The repeated stage
        stage: Stage,
    },

    /// A builder stage was supplied after a later one
    #[error("Interaction {description:?} cannot add {stage} after {current}")]
    OutOfOrder {
        /// Interaction description
        description: String,
        /// Stage being added
        stage: Stage,
        /// Stage already reached
        current: Stage,
    },

    /// Request or response could not be encoded
    #[error("Interaction {description:?} could not be encoded: {source}")]
    Encoding {
        /// Interaction description
        description: String,
        /// Underlying encoding failure
        #[source]
        source: EncodingError,
    },

    /// Mock server could not be started or stopped
    #[error("Mock server error: {0}")]
    MockServer(String),

    /// Mock server saw requests that did not match the interaction
    #[error("Mock server reported {} mismatch(es): {}", mismatches.len(), mismatches.join("; "))]
    Mismatch {
        /// Mismatch descriptions as reported by the mock server
        mismatches: Vec<String>,
    },

    /// The consumer test body failed
    #[error("Consumer test failed: {0}")]
    TestFailed(String),

    /// Platform error
    #[error(transparent)]
    Platform(#[from] PlatformError),
}

/// Result type for contract operations.
pub type ContractResult<T> = Result<T, ContractError>;

impl ContractError {
    /// Kind of failure this error represents.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingStage { .. } | Self::StageRepeated { .. } | Self::OutOfOrder { .. } => {
                ErrorKind::Configuration
            }
            Self::Encoding { source, .. } => source.kind(),
            Self::MockServer(_) | Self::Mismatch { .. } | Self::TestFailed(_) => {
                ErrorKind::Verification
            }
            Self::Platform(e) => e.kind(),
        }
    }

    /// Create a missing-stage error.
    #[must_use]
    pub fn missing_stage(description: impl Into<String>, stage: Stage) -> Self {
        Self::MissingStage {
            description: description.into(),
            stage,
        }
    }

    /// Create a mock server error.
    #[must_use]
    pub fn mock_server(msg: impl Into<String>) -> Self {
        Self::MockServer(msg.into())
    }

    /// Create a consumer test failure.
    #[must_use]
    pub fn test_failed(msg: impl Into<String>) -> Self {
        Self::TestFailed(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ContractError::missing_stage("a request for an object", Stage::WithResponse);
        assert_eq!(
            err.to_string(),
            "Interaction \"a request for an object\" is missing its response stage"
        );

        let err = ContractError::Mismatch {
            mismatches: vec!["missing header".to_string(), "wrong path".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Mock server reported 2 mismatch(es): missing header; wrong path"
        );
    }

    #[test]
    fn test_error_kinds() {
        let err = ContractError::StageRepeated {
            description: "x".to_string(),
            stage: Stage::WithRequest,
        };
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_eq!(ContractError::test_failed("boom").kind(), ErrorKind::Verification);

        let err = ContractError::Encoding {
            description: "x".to_string(),
            source: EncodingError::EmptyOneOf {
                path: "$.status".to_string(),
            },
        };
        assert_eq!(err.kind(), ErrorKind::Encoding);
    }
}
