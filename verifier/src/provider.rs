//! Provider-side verification settings.

use crate::selector::VersionSelector;
use chrono::NaiveDate;
use std::time::Duration;
use url::Url;

/// Provider under verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderInfo {
    /// Provider name as used in contracts
    pub name: String,
    /// Base URL interactions are replayed against
    pub url: Url,
}

impl ProviderInfo {
    /// Create provider info.
    #[must_use]
    pub fn new(name: impl Into<String>, url: Url) -> Self {
        Self {
            name: name.into(),
            url,
        }
    }
}

/// Provider identity used when querying a broker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderOptions {
    /// Provider name
    pub name: String,
    /// Provider branch
    pub branch: Option<String>,
    /// Provider version tags
    pub tags: Vec<String>,
}

impl ProviderOptions {
    /// Options for the named provider.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the provider branch.
    #[must_use]
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    /// Add a provider tag.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }
}

/// Which consumer versions to verify.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsumerInfo {
    /// Consumer version selectors
    pub selectors: Vec<VersionSelector>,
    /// Consumer tags (older alternative to selectors)
    pub tags: Vec<String>,
}

impl ConsumerInfo {
    /// Consumer info from selectors.
    #[must_use]
    pub fn new(selectors: impl IntoIterator<Item = VersionSelector>) -> Self {
        Self {
            selectors: selectors.into_iter().collect(),
            tags: Vec::new(),
        }
    }

    /// Add a consumer tag.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }
}

/// Everything a broker query needs besides the broker itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrokerSelection {
    /// Provider identity
    pub provider: ProviderOptions,
    /// Consumer versions
    pub consumer: ConsumerInfo,
    /// Include work-in-progress pacts created since this date
    pub include_wip_pacts_since: Option<NaiveDate>,
    /// Include pending pacts
    pub include_pending: bool,
}

impl BrokerSelection {
    /// Selection for a provider and consumer set.
    #[must_use]
    pub fn new(provider: ProviderOptions, consumer: ConsumerInfo) -> Self {
        Self {
            provider,
            consumer,
            ..Self::default()
        }
    }

    /// Include work-in-progress pacts since `date`.
    #[must_use]
    pub const fn with_wip_pacts_since(mut self, date: NaiveDate) -> Self {
        self.include_wip_pacts_since = Some(date);
        self
    }

    /// Include pending pacts.
    #[must_use]
    pub const fn with_pending(mut self, include_pending: bool) -> Self {
        self.include_pending = include_pending;
        self
    }
}

/// Restricts which interactions are replayed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    /// Regex over interaction descriptions
    pub description: Option<String>,
    /// Provider state name
    pub state: Option<String>,
    /// Only interactions without a provider state
    pub no_state: bool,
}

/// Provider-state change callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderStateOptions {
    /// Callback URL
    pub url: Url,
    /// Also call after each interaction for teardown
    pub teardown: bool,
    /// Send the state in the request body instead of the query string
    pub body: bool,
}

/// How the engine talks to the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationOptions {
    /// Skip TLS certificate verification
    pub disable_ssl_verification: bool,
    /// Timeout for each provider request
    pub request_timeout: Duration,
}

impl Default for VerificationOptions {
    fn default() -> Self {
        Self {
            disable_ssl_verification: false,
            request_timeout: Duration::from_secs(5),
        }
    }
}

/// Details attached to verification results published to a broker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishOptions {
    /// Provider version
    pub provider_version: String,
    /// Provider branch
    pub provider_branch: Option<String>,
    /// Build that ran the verification
    pub build_url: Option<Url>,
    /// Provider tags
    pub provider_tags: Vec<String>,
}

impl PublishOptions {
    /// Publish results for a provider version.
    #[must_use]
    pub fn new(provider_version: impl Into<String>) -> Self {
        Self {
            provider_version: provider_version.into(),
            provider_branch: None,
            build_url: None,
            provider_tags: Vec::new(),
        }
    }

    /// Set the provider branch.
    #[must_use]
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.provider_branch = Some(branch.into());
        self
    }

    /// Set the build URL.
    #[must_use]
    pub fn with_build_url(mut self, url: Url) -> Self {
        self.build_url = Some(url);
        self
    }

    /// Add a provider tag.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.provider_tags.push(tag.into());
        self
    }
}
