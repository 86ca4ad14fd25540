//! Broker and publishing configuration from the environment.

use crate::auth::Authentication;
use crate::error::{VerifierError, VerifierResult};
use crate::provider::PublishOptions;
use crate::source::PactSource;
use url::Url;

/// Broker location and credentials.
#[derive(Debug)]
pub struct BrokerConfig {
    /// Broker base URL
    pub url: Url,
    /// Credentials; a token wins over username/password
    pub auth: Option<Authentication>,
}

impl BrokerConfig {
    /// Read `PACT_BROKER_URL`, `PACT_BROKER_TOKEN`, `PACT_BROKER_USERNAME`
    /// and `PACT_BROKER_PASSWORD` from the process environment.
    ///
    /// # Errors
    ///
    /// Same as [`BrokerConfig::from_lookup`].
    pub fn from_env() -> VerifierResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an environment lookup function.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the URL is missing or invalid, or a
    /// username is given without a password.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> VerifierResult<Self> {
        let lookup = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let raw_url = lookup("PACT_BROKER_URL")
            .ok_or_else(|| VerifierError::configuration("PACT_BROKER_URL is not set"))?;
        let url = Url::parse(&raw_url).map_err(|e| {
            VerifierError::configuration(format!("PACT_BROKER_URL {raw_url:?} is invalid: {e}"))
        })?;

        let auth = match (
            lookup("PACT_BROKER_TOKEN"),
            lookup("PACT_BROKER_USERNAME"),
            lookup("PACT_BROKER_PASSWORD"),
        ) {
            (Some(token), _, _) => Some(Authentication::token(token)),
            (None, Some(username), Some(password)) => {
                Some(Authentication::basic(username, password))
            }
            (None, Some(_), None) => {
                return Err(VerifierError::configuration(
                    "PACT_BROKER_USERNAME is set without PACT_BROKER_PASSWORD",
                ));
            }
            (None, None, _) => None,
        };

        Ok(Self { url, auth })
    }

    /// Broker pact source.
    #[must_use]
    pub fn into_source(self) -> PactSource {
        PactSource::broker(self.url, self.auth)
    }
}

/// Whether and how verification results are published.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishConfig {
    /// Publish options; `None` when publishing is off
    pub options: Option<PublishOptions>,
}

impl PublishConfig {
    /// Read `PACT_PUBLISH_RESULTS`, `GIT_COMMIT`, `GIT_BRANCH` and `BUILD_URL`
    /// from the process environment.
    ///
    /// # Errors
    ///
    /// Same as [`PublishConfig::from_lookup`].
    pub fn from_env() -> VerifierResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an environment lookup function.
    ///
    /// Publishing is on when `PACT_PUBLISH_RESULTS` is `true` or `1`; the
    /// provider version is then taken from `GIT_COMMIT`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if publishing is on without a commit,
    /// or `BUILD_URL` is not a valid URL.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> VerifierResult<Self> {
        let lookup = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let enabled = lookup("PACT_PUBLISH_RESULTS")
            .is_some_and(|flag| flag.eq_ignore_ascii_case("true") || flag == "1");
        if !enabled {
            return Ok(Self::default());
        }

        let version = lookup("GIT_COMMIT").ok_or_else(|| {
            VerifierError::configuration("PACT_PUBLISH_RESULTS is set but GIT_COMMIT is not")
        })?;
        let mut options = PublishOptions::new(version);
        if let Some(branch) = lookup("GIT_BRANCH") {
            options = options.with_branch(branch);
        }
        if let Some(raw) = lookup("BUILD_URL") {
            let url = Url::parse(&raw).map_err(|e| {
                VerifierError::configuration(format!("BUILD_URL {raw:?} is invalid: {e}"))
            })?;
            options = options.with_build_url(url);
        }

        Ok(Self {
            options: Some(options),
        })
    }
}
