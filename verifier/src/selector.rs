//! Consumer version selectors.

use crate::error::VerifierResult;
use rust_common::PlatformError;
use serde::{Deserialize, Serialize};

/// Narrows which consumer contract versions a broker query returns.
///
/// Every field is optional and filters on one axis; the broker interprets
/// combinations. `latest` is `true` unless switched off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionSelector {
    /// Consumer version tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// Tag used when no version carries `tag`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_tag: Option<String>,
    /// Only the latest version matching the other criteria
    #[serde(default = "default_latest")]
    pub latest: bool,
    /// Restrict to one consumer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumer: Option<String>,
    /// Consumer's main branch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_branch: Option<bool>,
    /// Consumer branch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    /// Branch used when no version is on `branch`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_branch: Option<String>,
    /// Consumer branch with the same name as the provider branch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matching_branch: Option<bool>,
    /// Deployment environment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    /// Currently deployed versions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployed: Option<bool>,
    /// Released versions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub released: Option<bool>,
    /// Deployed or released versions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployed_or_released: Option<bool>,
}

const fn default_latest() -> bool {
    true
}

impl Default for VersionSelector {
    fn default() -> Self {
        Self {
            tag: None,
            fallback_tag: None,
            latest: default_latest(),
            consumer: None,
            main_branch: None,
            branch: None,
            fallback_branch: None,
            matching_branch: None,
            environment: None,
            deployed: None,
            released: None,
            deployed_or_released: None,
        }
    }
}

impl VersionSelector {
    /// Select by tag.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Fallback tag.
    #[must_use]
    pub fn with_fallback_tag(mut self, tag: impl Into<String>) -> Self {
        self.fallback_tag = Some(tag.into());
        self
    }

    /// Set the `latest` flag.
    #[must_use]
    pub const fn with_latest(mut self, latest: bool) -> Self {
        self.latest = latest;
        self
    }

    /// Restrict to one consumer.
    #[must_use]
    pub fn with_consumer(mut self, consumer: impl Into<String>) -> Self {
        self.consumer = Some(consumer.into());
        self
    }

    /// Consumer's main branch.
    #[must_use]
    pub const fn with_main_branch(mut self, main_branch: bool) -> Self {
        self.main_branch = Some(main_branch);
        self
    }

    /// Select by branch.
    #[must_use]
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    /// Fallback branch.
    #[must_use]
    pub fn with_fallback_branch(mut self, branch: impl Into<String>) -> Self {
        self.fallback_branch = Some(branch.into());
        self
    }

    /// Match the provider's branch name.
    #[must_use]
    pub const fn with_matching_branch(mut self, matching: bool) -> Self {
        self.matching_branch = Some(matching);
        self
    }

    /// Select by deployment environment.
    #[must_use]
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    /// Currently deployed versions.
    #[must_use]
    pub const fn with_deployed(mut self, deployed: bool) -> Self {
        self.deployed = Some(deployed);
        self
    }

    /// Released versions.
    #[must_use]
    pub const fn with_released(mut self, released: bool) -> Self {
        self.released = Some(released);
        self
    }

    /// Deployed or released versions.
    #[must_use]
    pub const fn with_deployed_or_released(mut self, value: bool) -> Self {
        self.deployed_or_released = Some(value);
        self
    }

    /// JSON form sent with broker queries.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the selector cannot be serialized.
    pub fn to_json_string(&self) -> VerifierResult<String> {
        serde_json::to_string(self).map_err(|e| {
            PlatformError::invalid_input(format!("invalid consumer version selector: {e}")).into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[test]
    fn test_latest_defaults_to_true() {
        assert!(VersionSelector::default().latest);

        let parsed: VersionSelector = serde_json::from_str(r#"{"tag":"prod"}"#).unwrap();
        assert!(parsed.latest);
        assert_eq!(parsed.tag.as_deref(), Some("prod"));
    }

    #[test]
    fn test_absent_fields_are_omitted() {
        let json = VersionSelector::default().to_json_string().unwrap();
        assert_eq!(json, r#"{"latest":true}"#);
    }

    #[test]
    fn test_camel_case_fields() {
        let selector = VersionSelector::default()
            .with_branch("feature/x")
            .with_fallback_branch("main")
            .with_main_branch(true)
            .with_deployed_or_released(true)
            .with_latest(false);
        let value: Value = serde_json::from_str(&selector.to_json_string().unwrap()).unwrap();
        assert_eq!(
            value,
            json!({
                "branch": "feature/x",
                "fallbackBranch": "main",
                "mainBranch": true,
                "deployedOrReleased": true,
                "latest": false
            })
        );
    }
}
