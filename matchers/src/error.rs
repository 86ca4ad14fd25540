//! Encoding error types using thiserror 2.0.

use crate::matcher::MatcherKind;
use crate::spec::SpecVersion;
use rust_common::{ErrorKind, PlatformError};
use thiserror::Error;

/// Errors raised while encoding a matcher tree or a body.
#[derive(Error, Debug)]
pub enum EncodingError {
    /// `EachLike` minimum exceeds its maximum
    #[error("EachLike at {path} has min {min} greater than max {max}")]
    InvalidCardinality {
        /// Path of the offending matcher
        path: String,
        /// Declared minimum
        min: usize,
        /// Declared maximum
        max: usize,
    },

    /// `EachLike` minimum too large to build an example array for
    #[error("EachLike at {path} has min {min}, examples are limited to {limit} items")]
    ExampleTooLarge {
        /// Path of the offending matcher
        path: String,
        /// Declared minimum
        min: usize,
        /// Largest accepted minimum
        limit: usize,
    },

    /// `OneOf` with nothing to choose from
    #[error("OneOf at {path} has no candidates")]
    EmptyOneOf {
        /// Path of the offending matcher
        path: String,
    },

    /// Regex pattern does not compile
    #[error("Invalid regex {pattern:?} at {path}: {reason}")]
    InvalidRegex {
        /// Path of the offending matcher
        path: String,
        /// The pattern as declared
        pattern: String,
        /// Compiler message
        reason: String,
    },

    /// Regex example is not matched by its own pattern
    #[error("Example {example:?} at {path} does not match regex {pattern:?}")]
    ExampleMismatch {
        /// Path of the offending matcher
        path: String,
        /// The pattern as declared
        pattern: String,
        /// The rejected example
        example: String,
    },

    /// Decimal example is NaN or infinite
    #[error("Decimal at {path} is not a finite number")]
    NonFiniteNumber {
        /// Path of the offending matcher
        path: String,
    },

    /// Matcher kind cannot be expressed by the contract's specification version
    #[error("{kind} matcher at {path} requires pact specification {required}, contract uses {spec}")]
    UnsupportedMatcher {
        /// Path of the offending matcher
        path: String,
        /// Kind of the matcher
        kind: MatcherKind,
        /// Oldest version supporting the kind
        required: SpecVersion,
        /// Version in use
        spec: SpecVersion,
    },

    /// Body cannot be represented in JSON
    #[error("Body cannot be serialized: {0}")]
    NonSerializableBody(String),

    /// Platform error
    #[error(transparent)]
    Platform(#[from] PlatformError),
}

/// Result type for encoding operations.
pub type EncodingResult<T> = Result<T, EncodingError>;

impl EncodingError {
    /// Kind of failure this error represents.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Platform(e) => e.kind(),
            _ => ErrorKind::Encoding,
        }
    }

    /// Create a non-serializable body error.
    #[must_use]
    pub fn non_serializable(msg: impl Into<String>) -> Self {
        Self::NonSerializableBody(msg.into())
    }
}
