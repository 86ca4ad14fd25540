//! Consumer test harness.
//!
//! [`PactBuilder`] owns the contract for one consumer/provider pair. Each
//! [`PactBuilder::verify`] call runs one consumer test against a mock server
//! seeded with the new interaction; the interaction joins the contract, and
//! the contract is rewritten to disk, only when the test passes and every
//! expectation was matched.

use crate::builder::InteractionBuilder;
use crate::config::PactBuilderConfig;
use crate::contract::Contract;
use crate::error::{ContractError, ContractResult};
use async_trait::async_trait;
use rust_common::PlatformError;
use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Running mock server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockServerHandle {
    /// Port the server listens on
    pub port: u16,
    /// Base URL requests should be sent to
    pub base_url: Url,
}

/// Mock server that replays a contract's interactions.
#[async_trait]
pub trait MockServer: Send + Sync {
    /// Start serving `contract` on `port`.
    async fn start(&self, contract: &Contract, port: u16) -> ContractResult<MockServerHandle>;

    /// Descriptions of requests that did not match, or expectations never met.
    async fn mismatches(&self, handle: &MockServerHandle) -> ContractResult<Vec<String>>;

    /// Shut the server down.
    async fn stop(&self, handle: MockServerHandle) -> ContractResult<()>;
}

/// Source of free local ports.
pub trait PortAllocator: Send + Sync {
    /// Reserve a port for a mock server.
    ///
    /// # Errors
    ///
    /// Returns an error when no port is available.
    fn reserve(&self) -> ContractResult<u16>;
}

/// What a consumer test sees of the mock server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockServerContext {
    /// Base URL of the running mock server
    pub base_url: Url,
}

impl MockServerContext {
    /// Absolute URL for a request path.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `path` does not form a valid URL.
    pub fn build_request_url(&self, path: &str) -> ContractResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| PlatformError::invalid_input(format!("request path {path:?}: {e}")).into())
    }
}

/// Contract under construction for one consumer/provider pair.
pub struct PactBuilder<M, P> {
    contract: Contract,
    config: PactBuilderConfig,
    mock_server: M,
    ports: P,
}

impl<M, P> fmt::Debug for PactBuilder<M, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PactBuilder")
            .field("contract", &self.contract)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<M: MockServer, P: PortAllocator> PactBuilder<M, P> {
    /// Create a builder around an empty or pre-populated contract.
    pub const fn new(contract: Contract, config: PactBuilderConfig, mock_server: M, ports: P) -> Self {
        Self {
            contract,
            config,
            mock_server,
            ports,
        }
    }

    /// Start describing an interaction.
    #[must_use]
    pub fn upon_receiving(&self, description: impl Into<String>) -> InteractionBuilder {
        InteractionBuilder::upon_receiving(description)
    }

    /// Contract with every interaction verified so far.
    #[must_use]
    pub const fn contract(&self) -> &Contract {
        &self.contract
    }

    /// Where the contract document is written.
    #[must_use]
    pub fn pact_file_path(&self) -> PathBuf {
        self.config.pact_directory.join(self.contract.file_name())
    }

    /// Run a consumer test against a mock server seeded with `interaction`.
    ///
    /// The server is always stopped once the test returns. The contract
    /// document is rewritten only on success.
    ///
    /// # Errors
    ///
    /// Returns a configuration or encoding error if the interaction is
    /// incomplete, a verification error if the test fails or the mock server
    /// reports mismatches, and a persistence error if the document cannot be
    /// written.
    #[instrument(skip_all, fields(description = %interaction.description()))]
    pub async fn verify<F, Fut, E>(
        &mut self,
        interaction: InteractionBuilder,
        test: F,
    ) -> ContractResult<PathBuf>
    where
        F: FnOnce(MockServerContext) -> Fut + Send,
        Fut: Future<Output = Result<(), E>> + Send,
        E: fmt::Display,
    {
        let interaction = interaction.build(self.contract.specification())?;
        let mut candidate = self.contract.clone();
        candidate.add_interaction(interaction);

        let port = match self.config.port {
            Some(port) => port,
            None => self.ports.reserve()?,
        };
        let handle = self.mock_server.start(&candidate, port).await?;
        debug!(port, base_url = %handle.base_url, "Mock server started");

        let outcome = test(MockServerContext {
            base_url: handle.base_url.clone(),
        })
        .await;
        let mismatches = self.mock_server.mismatches(&handle).await;
        let stopped = self.mock_server.stop(handle).await;

        if let Err(e) = outcome {
            warn!(error = %e, "Consumer test failed");
            return Err(ContractError::test_failed(e.to_string()));
        }
        let mismatches = mismatches?;
        if !mismatches.is_empty() {
            warn!(count = mismatches.len(), "Mock server reported mismatches");
            return Err(ContractError::Mismatch { mismatches });
        }
        stopped?;

        self.contract = candidate;
        let path = self.contract.persist(&self.config.pact_directory)?;
        info!(
            path = %path.display(),
            interactions = self.contract.interactions().len(),
            "Interaction verified"
        );
        Ok(path)
    }
}
