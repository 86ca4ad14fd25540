//! Verification engine seam.

use crate::auth::Authentication;
use crate::error::EngineError;
use crate::provider::{
    FilterOptions, ProviderInfo, ProviderStateOptions, PublishOptions, VerificationOptions,
};
use crate::resolve::BrokerQuery;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::Path;
use url::Url;

/// External engine that replays contracts against a live provider.
///
/// Setters only record configuration. Each `verify_*` call is one complete
/// verification run and returns whether every interaction passed.
#[async_trait]
pub trait VerificationEngine: Send {
    /// Provider under verification.
    fn set_provider_info(&mut self, info: &ProviderInfo);

    /// Interaction filter.
    fn set_filter(&mut self, filter: &FilterOptions);

    /// Provider-state callback.
    fn set_provider_state(&mut self, options: &ProviderStateOptions);

    /// Transport options.
    fn set_verification_options(&mut self, options: &VerificationOptions);

    /// Headers added to every provider request.
    fn set_custom_headers(&mut self, headers: &BTreeMap<String, String>);

    /// Publish results to the broker.
    fn set_publish_options(&mut self, options: &PublishOptions);

    /// Verify every pact in a directory.
    async fn verify_directory(&mut self, path: &Path) -> Result<bool, EngineError>;

    /// Verify one pact file.
    async fn verify_file(&mut self, path: &Path) -> Result<bool, EngineError>;

    /// Verify a pact served over HTTP.
    async fn verify_url(
        &mut self,
        url: &Url,
        auth: Option<&Authentication>,
    ) -> Result<bool, EngineError>;

    /// Verify pacts selected from a broker.
    async fn verify_broker(&mut self, query: &BrokerQuery) -> Result<bool, EngineError>;
}
