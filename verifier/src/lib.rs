//! Provider-side contract verification.
//!
//! Resolves a [`PactSource`] (directory, file, URL or broker query with
//! [`VersionSelector`]s) and dispatches it to an injected
//! [`VerificationEngine`] through a [`ProviderVerifier`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod auth;
pub mod config;
pub mod engine;
pub mod error;
pub mod provider;
pub mod reporter;
pub mod resolve;
pub mod selector;
pub mod source;
pub mod verifier;

pub use auth::{ApiToken, Authentication, SimpleAuth};
pub use config::{BrokerConfig, PublishConfig};
pub use engine::VerificationEngine;
pub use error::{EngineError, VerifierError, VerifierResult};
pub use provider::{
    BrokerSelection, ConsumerInfo, FilterOptions, ProviderInfo, ProviderOptions,
    ProviderStateOptions, PublishOptions, VerificationOptions,
};
pub use reporter::{FailureReporter, TracingReporter};
pub use resolve::{BrokerQuery, ResolvedTarget, resolve};
pub use selector::VersionSelector;
pub use source::PactSource;
pub use verifier::ProviderVerifier;
