//! Pact source resolution.

use crate::auth::Authentication;
use crate::error::{VerifierError, VerifierResult};
use crate::provider::BrokerSelection;
use crate::source::PactSource;
use chrono::NaiveDate;
use std::path::PathBuf;
use tracing::debug;
use url::Url;

/// Broker query forwarded to the verification engine.
#[derive(Debug)]
pub struct BrokerQuery {
    /// Broker base URL
    pub url: Url,
    /// Broker credentials
    pub auth: Option<Authentication>,
    /// Provider name
    pub provider_name: String,
    /// Provider branch
    pub provider_branch: Option<String>,
    /// Provider tags
    pub provider_tags: Vec<String>,
    /// Consumer version selectors, one JSON document each
    pub selectors: Vec<String>,
    /// Consumer tags
    pub consumer_tags: Vec<String>,
    /// Include work-in-progress pacts created since this date
    pub include_wip_pacts_since: Option<NaiveDate>,
    /// Include pending pacts
    pub include_pending: bool,
}

/// A pact source ready to hand to the engine.
#[derive(Debug)]
pub enum ResolvedTarget {
    /// Every pact file in a directory
    Directory(PathBuf),
    /// A single pact file
    File(PathBuf),
    /// A pact document served over HTTP
    Url {
        /// Document URL
        url: Url,
        /// Credentials
        auth: Option<Authentication>,
    },
    /// Broker query
    Broker(BrokerQuery),
}

/// Resolve a source, attaching the broker selection for broker sources.
///
/// Directory, file and URL sources map to themselves and ignore `selection`.
///
/// # Errors
///
/// Returns a configuration error for a broker source without a selection or
/// provider name, or with a selector that cannot be serialized.
pub fn resolve(
    source: PactSource,
    selection: Option<BrokerSelection>,
) -> VerifierResult<ResolvedTarget> {
    let (url, auth) = match source {
        PactSource::Directory(path) => return Ok(ResolvedTarget::Directory(path)),
        PactSource::File(path) => return Ok(ResolvedTarget::File(path)),
        PactSource::Url { url, auth } => return Ok(ResolvedTarget::Url { url, auth }),
        PactSource::Broker { url, auth } => (url, auth),
    };

    let selection = selection.ok_or_else(|| {
        VerifierError::configuration(format!(
            "broker source {url} needs a provider name and consumer version selectors"
        ))
    })?;
    if selection.provider.name.trim().is_empty() {
        return Err(VerifierError::configuration(format!(
            "broker source {url} needs a provider name"
        )));
    }

    let selectors = selection
        .consumer
        .selectors
        .iter()
        .map(|selector| selector.to_json_string())
        .collect::<VerifierResult<Vec<_>>>()?;

    debug!(
        broker = %url,
        provider = %selection.provider.name,
        selectors = selectors.len(),
        auth = auth.as_ref().map_or("none", Authentication::scheme),
        "Resolved broker query"
    );

    Ok(ResolvedTarget::Broker(BrokerQuery {
        url,
        auth,
        provider_name: selection.provider.name,
        provider_branch: selection.provider.branch,
        provider_tags: selection.provider.tags,
        selectors,
        consumer_tags: selection.consumer.tags,
        include_wip_pacts_since: selection.include_wip_pacts_since,
        include_pending: selection.include_pending,
    }))
}
