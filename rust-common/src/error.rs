//! Centralized error types for all pactum crates.
//!
//! Every crate-specific error wraps [`PlatformError`] and reports one of the
//! four [`ErrorKind`]s, so callers can branch on the kind of failure without
//! matching on every variant.

use std::fmt;
use thiserror::Error;

/// Classification shared by every error in the workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed matcher tree or a body that cannot be encoded.
    Encoding,
    /// A required builder stage was skipped or a setting is invalid.
    Configuration,
    /// The verification engine reported a failure.
    Verification,
    /// A contract document could not be written or read.
    Persistence,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Encoding => "encoding",
            Self::Configuration => "configuration",
            Self::Verification => "verification",
            Self::Persistence => "persistence",
        };
        f.write_str(name)
    }
}

/// Common error type for platform operations.
#[derive(Error, Debug)]
pub enum PlatformError {
    /// Filesystem operation failed
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path the operation was applied to
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Tracing subscriber could not be installed
    #[error("Tracing initialisation failed: {0}")]
    Tracing(String),
}

impl PlatformError {
    /// Kind of failure this error represents.
    ///
    /// # Examples
    ///
    /// ```
    /// use rust_common::{ErrorKind, PlatformError};
    ///
    /// let err = PlatformError::invalid_input("port out of range");
    /// assert_eq!(err.kind(), ErrorKind::Configuration);
    /// ```
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Io { .. } => ErrorKind::Persistence,
            Self::Serialization(_) => ErrorKind::Encoding,
            Self::InvalidInput(_) | Self::Tracing(_) => ErrorKind::Configuration,
        }
    }

    /// Create an I/O error for the given path.
    #[must_use]
    pub fn io(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().display().to_string(),
            source,
        }
    }

    /// Create an invalid input error with the given message.
    #[must_use]
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
