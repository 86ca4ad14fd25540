//! Pact contract types.

use crate::error::{ContractError, ContractResult};
use pactum_matchers::SpecVersion;
use rust_common::PlatformError;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

/// A Pact contract between consumer and provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Contract {
    /// Consumer participant
    pub consumer: Participant,
    /// Provider participant
    pub provider: Participant,
    /// Contract interactions, in declaration order
    interactions: Vec<Interaction>,
    /// Contract metadata
    pub metadata: ContractMetadata,
}

impl Contract {
    /// Create an empty contract using the default specification version.
    #[must_use]
    pub fn new(consumer: impl Into<String>, provider: impl Into<String>) -> Self {
        Self {
            consumer: Participant::new(consumer),
            provider: Participant::new(provider),
            interactions: Vec::new(),
            metadata: ContractMetadata::default(),
        }
    }

    /// Set the specification version.
    #[must_use]
    pub fn with_specification(mut self, spec: SpecVersion) -> Self {
        self.metadata.pact_specification = PactSpecification::from(spec);
        self
    }

    /// Specification version declared in the metadata.
    ///
    /// Unknown version strings fall back to the default version.
    #[must_use]
    pub fn specification(&self) -> SpecVersion {
        self.metadata
            .pact_specification
            .version
            .parse()
            .unwrap_or_default()
    }

    /// Append an interaction.
    ///
    /// Duplicate descriptions are accepted; they only matter when results
    /// are attributed during verification.
    pub fn add_interaction(&mut self, interaction: Interaction) {
        if self.interaction(&interaction.description).is_some() {
            warn!(
                description = %interaction.description,
                "Contract already has an interaction with this description"
            );
        }
        debug!(description = %interaction.description, "Adding interaction");
        self.interactions.push(interaction);
    }

    /// Interactions in declaration order.
    #[must_use]
    pub fn interactions(&self) -> &[Interaction] {
        &self.interactions
    }

    /// First interaction with the given description.
    #[must_use]
    pub fn interaction(&self, description: &str) -> Option<&Interaction> {
        self.interactions
            .iter()
            .find(|i| i.description == description)
    }

    /// File name the contract is persisted under.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{}-{}.json", self.consumer.name, self.provider.name)
    }

    /// Render the contract document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be serialized.
    pub fn to_json(&self) -> ContractResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| PlatformError::from(e).into())
    }

    /// Write the contract into `directory` under [`Contract::file_name`].
    ///
    /// # Errors
    ///
    /// Same as [`Contract::write_to`].
    pub fn persist(&self, directory: impl AsRef<Path>) -> ContractResult<PathBuf> {
        let path = directory.as_ref().join(self.file_name());
        self.write_to(&path)?;
        Ok(path)
    }

    /// Write the contract document to `path`, replacing any existing file.
    ///
    /// Parent directories are created as needed.
    ///
    /// # Errors
    ///
    /// Returns a persistence error if the directory or file cannot be written.
    #[instrument(skip(self), fields(consumer = %self.consumer, provider = %self.provider))]
    pub fn write_to(&self, path: &Path) -> ContractResult<()> {
        let document = self.to_json()?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| PlatformError::io(parent, e))?;
        }
        std::fs::write(path, document).map_err(|e| PlatformError::io(path, e))?;
        info!(
            path = %path.display(),
            interactions = self.interactions.len(),
            "Contract written"
        );
        Ok(())
    }

    /// Read a contract document.
    ///
    /// # Errors
    ///
    /// Returns a persistence error if the file cannot be read and an
    /// encoding error if it is not a contract document.
    pub fn load(path: impl AsRef<Path>) -> ContractResult<Self> {
        let path = path.as_ref();
        let document = std::fs::read_to_string(path).map_err(|e| PlatformError::io(path, e))?;
        serde_json::from_str(&document).map_err(|e| ContractError::from(PlatformError::from(e)))
    }
}

/// A participant in a contract (consumer or provider).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Participant {
    /// Participant name
    pub name: String,
}

impl Participant {
    /// Create a new participant.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// An interaction in a contract.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Interaction {
    /// Interaction description
    pub description: String,
    /// Provider state (precondition)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_state: Option<ProviderState>,
    /// Expected request
    pub request: Request,
    /// Expected response
    pub response: Response,
}

/// Provider state an interaction depends on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProviderState {
    /// State name
    pub name: String,
    /// Parameters passed to the provider's state handler
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Map<String, Value>>,
}

impl ProviderState {
    /// Create a provider state without parameters.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: None,
        }
    }
}

/// HTTP method.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    /// GET
    Get,
    /// HEAD
    Head,
    /// POST
    Post,
    /// PUT
    Put,
    /// PATCH
    Patch,
    /// DELETE
    Delete,
    /// OPTIONS
    Options,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Get => "GET",
            Self::Head => "HEAD",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Options => "OPTIONS",
        };
        f.write_str(name)
    }
}

/// HTTP request in an interaction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    /// HTTP method
    pub method: Method,
    /// Request path
    pub path: String,
    /// Request headers
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    /// Query parameters
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub query: BTreeMap<String, Vec<String>>,
    /// Request body; `Some(Value::Null)` expects a literal `null`
    #[serde(default, deserialize_with = "present_body", skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    /// Matching rules by category
    #[serde(default, skip_serializing_if = "RuleCategories::is_empty")]
    pub matching_rules: RuleCategories,
    /// Generators by category
    #[serde(default, skip_serializing_if = "RuleCategories::is_empty")]
    pub generators: RuleCategories,
}

/// HTTP response in an interaction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    /// Response body; `Some(Value::Null)` expects a literal `null`
    #[serde(default, deserialize_with = "present_body", skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    /// Matching rules by category
    #[serde(default, skip_serializing_if = "RuleCategories::is_empty")]
    pub matching_rules: RuleCategories,
    /// Generators by category
    #[serde(default, skip_serializing_if = "RuleCategories::is_empty")]
    pub generators: RuleCategories,
}

/// A `body` key that is present, even as `null`, is a body expectation.
fn present_body<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Matching-rule or generator descriptors grouped by message part.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RuleCategories {
    /// Body descriptors keyed by JSON-path
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub body: BTreeMap<String, Value>,
    /// Header descriptors keyed by header name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub header: BTreeMap<String, Value>,
    /// Query descriptors keyed by parameter name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub query: BTreeMap<String, Value>,
}

impl RuleCategories {
    /// Whether no category holds a descriptor.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty() && self.header.is_empty() && self.query.is_empty()
    }
}

/// Contract metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContractMetadata {
    /// Pact specification version
    #[serde(rename = "pactSpecification")]
    pub pact_specification: PactSpecification,
}

/// Pact specification version.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PactSpecification {
    /// Version string
    pub version: String,
}

impl From<SpecVersion> for PactSpecification {
    fn from(spec: SpecVersion) -> Self {
        Self {
            version: spec.as_str().to_string(),
        }
    }
}

impl Default for ContractMetadata {
    fn default() -> Self {
        Self {
            pact_specification: PactSpecification::from(SpecVersion::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(path: &str) -> Request {
        Request {
            method: Method::Get,
            path: path.to_string(),
            headers: BTreeMap::new(),
            query: BTreeMap::new(),
            body: None,
            matching_rules: RuleCategories::default(),
            generators: RuleCategories::default(),
        }
    }

    fn response(status: u16) -> Response {
        Response {
            status,
            headers: BTreeMap::new(),
            body: None,
            matching_rules: RuleCategories::default(),
            generators: RuleCategories::default(),
        }
    }

    fn interaction(description: &str) -> Interaction {
        Interaction {
            description: description.to_string(),
            provider_state: Some(ProviderState::new("an object exists")),
            request: request("/objects/1"),
            response: response(200),
        }
    }

    #[test]
    fn test_contract_serialization() {
        let mut contract = Contract::new("sanity-consumer", "sanity-provider");
        contract.add_interaction(interaction("a request for an object"));

        let json = contract.to_json().unwrap();
        let restored: Contract = serde_json::from_str(&json).unwrap();
        assert_eq!(contract, restored);
    }

    #[test]
    fn test_document_shape() {
        let mut contract =
            Contract::new("sanity-consumer", "sanity-provider").with_specification(SpecVersion::V4);
        contract.add_interaction(interaction("a request for an object"));

        let document: Value = serde_json::from_str(&contract.to_json().unwrap()).unwrap();
        assert_eq!(
            document,
            json!({
                "consumer": {"name": "sanity-consumer"},
                "provider": {"name": "sanity-provider"},
                "interactions": [{
                    "description": "a request for an object",
                    "providerState": {"name": "an object exists"},
                    "request": {"method": "GET", "path": "/objects/1"},
                    "response": {"status": 200}
                }],
                "metadata": {"pactSpecification": {"version": "4.0"}}
            })
        );
    }

    #[test]
    fn test_duplicate_descriptions_accepted() {
        let mut contract = Contract::new("a", "b");
        contract.add_interaction(interaction("same"));
        contract.add_interaction(interaction("same"));
        assert_eq!(contract.interactions().len(), 2);
    }

    #[test]
    fn test_specification_round_trip() {
        let contract = Contract::new("a", "b").with_specification(SpecVersion::V2);
        assert_eq!(contract.metadata.pact_specification.version, "2.0.0");
        assert_eq!(contract.specification(), SpecVersion::V2);
        assert_eq!(Contract::new("a", "b").specification(), SpecVersion::V3);
    }

    #[test]
    fn test_file_name() {
        let contract = Contract::new("sanity-consumer", "sanity-provider");
        assert_eq!(contract.file_name(), "sanity-consumer-sanity-provider.json");
    }

    #[test]
    fn test_persist_overwrites_and_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("pacts").join("nested");

        let mut contract = Contract::new("consumer", "provider");
        contract.add_interaction(interaction("a request for an object"));
        contract.add_interaction(interaction("a request for another object"));

        let path = contract.persist(&nested).unwrap();
        let first = std::fs::read_to_string(&path).unwrap();
        contract.persist(&nested).unwrap();
        let second = std::fs::read_to_string(&path).unwrap();
        assert_eq!(first, second);

        let loaded = Contract::load(&path).unwrap();
        let descriptions: Vec<&str> = loaded
            .interactions()
            .iter()
            .map(|i| i.description.as_str())
            .collect();
        assert_eq!(
            descriptions,
            vec!["a request for an object", "a request for another object"]
        );
    }

    #[test]
    fn test_null_body_survives_reload() {
        let mut with_null = interaction("a request for nothing");
        with_null.response.body = Some(Value::Null);
        let mut contract = Contract::new("a", "b");
        contract.add_interaction(with_null);
        contract.add_interaction(interaction("a request without a body"));

        let restored: Contract = serde_json::from_str(&contract.to_json().unwrap()).unwrap();
        assert_eq!(restored.interactions()[0].response.body, Some(Value::Null));
        assert_eq!(restored.interactions()[1].response.body, None);
        assert_eq!(restored, contract);

        let document: Value = serde_json::from_str(&restored.to_json().unwrap()).unwrap();
        assert_eq!(document["interactions"][0]["response"]["body"], Value::Null);
        assert!(document["interactions"][0]["response"].get("body").is_some());
        assert!(document["interactions"][1]["response"].get("body").is_none());
    }

    #[test]
    fn test_write_failure_is_persistence_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("file");
        std::fs::write(&file, "not a directory").unwrap();

        let err = Contract::new("a", "b").persist(file.join("sub")).unwrap_err();
        assert_eq!(err.kind(), rust_common::ErrorKind::Persistence);
        assert!(err.to_string().contains("sub"));
    }

    #[test]
    fn test_load_missing_file_is_persistence_error() {
        let err = Contract::load("/nonexistent/pacts/a-b.json").unwrap_err();
        assert_eq!(err.kind(), rust_common::ErrorKind::Persistence);
    }
}
