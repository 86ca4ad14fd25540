//! Consumer-driven contract model.
//!
//! Interactions are described with an [`InteractionBuilder`], collected into
//! a [`Contract`] and written as a pact document. [`PactBuilder`] drives the
//! consumer side end to end against an injected [`MockServer`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod body;
pub mod builder;
pub mod config;
pub mod contract;
pub mod error;
pub mod pact_builder;

pub use body::Body;
pub use builder::{InteractionBuilder, RequestSpec, ResponseSpec, Stage};
pub use config::{DEFAULT_PACT_DIRECTORY, PactBuilderConfig};
pub use contract::{
    Contract, ContractMetadata, Interaction, Method, PactSpecification, Participant,
    ProviderState, Request, Response, RuleCategories,
};
pub use error::{ContractError, ContractResult};
pub use pact_builder::{
    MockServer, MockServerContext, MockServerHandle, PactBuilder, PortAllocator,
};
