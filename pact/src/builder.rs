//! Interaction builder.
//!
//! An [`InteractionBuilder`] moves through the [`Stage`]s
//! `Started → WithProviderState? → WithRequest → WithResponse`. Every
//! transition consumes the builder and hands back the next value or a
//! configuration error; [`InteractionBuilder::build`] encodes the collected
//! request and response into an [`Interaction`].

use crate::body::Body;
use crate::contract::{Interaction, Method, ProviderState, Request, Response, RuleCategories};
use crate::error::{ContractError, ContractResult};
use pactum_matchers::{Encoded, Encoder, EncodingResult, JsonPath, Node, SpecVersion};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// Position of an [`InteractionBuilder`] in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    /// Description declared
    Started,
    /// Provider state attached
    WithProviderState,
    /// Expected request attached
    WithRequest,
    /// Expected response attached
    WithResponse,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Started => "description",
            Self::WithProviderState => "provider state",
            Self::WithRequest => "request",
            Self::WithResponse => "response",
        };
        f.write_str(name)
    }
}

/// Expected request.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    method: Method,
    path: String,
    headers: BTreeMap<String, Node>,
    query: BTreeMap<String, Node>,
    body: Option<Body>,
}

impl RequestSpec {
    /// Request with the given method and path.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: BTreeMap::new(),
            query: BTreeMap::new(),
            body: None,
        }
    }

    /// GET request.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    /// POST request.
    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    /// Add a header, optionally matched.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<Node>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Add a query parameter. Array values yield repeated parameters.
    #[must_use]
    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<Node>) -> Self {
        self.query.insert(name.into(), value.into());
        self
    }

    /// Set the body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Body>) -> Self {
        self.body = Some(body.into());
        self
    }

    fn encode(&self, encoder: &Encoder) -> EncodingResult<Request> {
        let mut rules = RuleCategories::default();
        let mut generators = RuleCategories::default();

        let headers = encode_named(&self.headers, encoder, |encoded| {
            rules.header.extend(encoded.matching_rules);
            generators.header.extend(encoded.generators);
        })?
        .into_iter()
        .map(|(name, value)| (name, scalar_text(value)))
        .collect();

        let query = encode_named(&self.query, encoder, |encoded| {
            rules.query.extend(encoded.matching_rules);
            generators.query.extend(encoded.generators);
        })?
        .into_iter()
        .map(|(name, value)| (name, query_values(value)))
        .collect();

        let body = encode_body(self.body.as_ref(), encoder, &mut rules, &mut generators)?;

        Ok(Request {
            method: self.method,
            path: self.path.clone(),
            headers,
            query,
            body,
            matching_rules: rules,
            generators,
        })
    }
}

/// Expected response.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseSpec {
    status: u16,
    headers: BTreeMap<String, Node>,
    body: Option<Body>,
}

impl ResponseSpec {
    /// Response with the given status code.
    #[must_use]
    pub const fn new(status: u16) -> Self {
        Self {
            status,
            headers: BTreeMap::new(),
            body: None,
        }
    }

    /// Add a header, optionally matched.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<Node>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Set the body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Body>) -> Self {
        self.body = Some(body.into());
        self
    }

    fn encode(&self, encoder: &Encoder) -> EncodingResult<Response> {
        let mut rules = RuleCategories::default();
        let mut generators = RuleCategories::default();

        let headers = encode_named(&self.headers, encoder, |encoded| {
            rules.header.extend(encoded.matching_rules);
            generators.header.extend(encoded.generators);
        })?
        .into_iter()
        .map(|(name, value)| (name, scalar_text(value)))
        .collect();

        let body = encode_body(self.body.as_ref(), encoder, &mut rules, &mut generators)?;

        Ok(Response {
            status: self.status,
            headers,
            body,
            matching_rules: rules,
            generators,
        })
    }
}

/// Builder for a single interaction.
#[derive(Debug, Clone)]
pub struct InteractionBuilder {
    description: String,
    stage: Stage,
    provider_state: Option<ProviderState>,
    request: Option<RequestSpec>,
    response: Option<ResponseSpec>,
}

impl InteractionBuilder {
    /// Start describing an interaction.
    #[must_use]
    pub fn upon_receiving(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            stage: Stage::Started,
            provider_state: None,
            request: None,
            response: None,
        }
    }

    /// Interaction description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Stage reached so far.
    #[must_use]
    pub const fn stage(&self) -> Stage {
        self.stage
    }

    /// Require a provider state.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a state or request was already set.
    pub fn given(self, state: impl Into<String>) -> ContractResult<Self> {
        self.with_provider_state(ProviderState::new(state))
    }

    /// Require a provider state with parameters for the provider's state handler.
    ///
    /// # Errors
    ///
    /// Same as [`InteractionBuilder::given`].
    pub fn given_with_params(
        self,
        state: impl Into<String>,
        params: Map<String, Value>,
    ) -> ContractResult<Self> {
        self.with_provider_state(ProviderState {
            name: state.into(),
            params: Some(params),
        })
    }

    fn with_provider_state(mut self, state: ProviderState) -> ContractResult<Self> {
        self.advance(Stage::WithProviderState)?;
        self.provider_state = Some(state);
        Ok(self)
    }

    /// Attach the expected request.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a request was already attached.
    pub fn with_request(mut self, request: RequestSpec) -> ContractResult<Self> {
        self.advance(Stage::WithRequest)?;
        self.request = Some(request);
        Ok(self)
    }

    /// Attach the expected response.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if no request was attached yet or a
    /// response already was.
    pub fn will_respond_with(mut self, response: ResponseSpec) -> ContractResult<Self> {
        self.advance(Stage::WithResponse)?;
        self.response = Some(response);
        Ok(self)
    }

    /// Encode the interaction for a contract of the given specification version.
    ///
    /// # Errors
    ///
    /// Returns a configuration error naming the missing stage, or an
    /// encoding error for malformed matchers.
    pub fn build(self, spec: SpecVersion) -> ContractResult<Interaction> {
        let request = self
            .request
            .ok_or_else(|| ContractError::missing_stage(&self.description, Stage::WithRequest))?;
        let response = self
            .response
            .ok_or_else(|| ContractError::missing_stage(&self.description, Stage::WithResponse))?;

        let encoder = Encoder::new(spec);
        let encoded = request
            .encode(&encoder)
            .and_then(|req| response.encode(&encoder).map(|resp| (req, resp)));
        let (request, response) = match encoded {
            Ok(pair) => pair,
            Err(source) => {
                return Err(ContractError::Encoding {
                    description: self.description,
                    source,
                });
            }
        };

        debug!(description = %self.description, spec = %spec, "Interaction built");
        Ok(Interaction {
            description: self.description,
            provider_state: self.provider_state,
            request,
            response,
        })
    }

    fn advance(&mut self, next: Stage) -> ContractResult<()> {
        if self.stage == next {
            return Err(ContractError::StageRepeated {
                description: self.description.clone(),
                stage: next,
            });
        }
        if self.stage > next {
            return Err(ContractError::OutOfOrder {
                description: self.description.clone(),
                stage: next,
                current: self.stage,
            });
        }
        if next == Stage::WithResponse && self.stage < Stage::WithRequest {
            return Err(ContractError::missing_stage(
                &self.description,
                Stage::WithRequest,
            ));
        }
        self.stage = next;
        Ok(())
    }
}

/// Encode named values (headers, query parameters) each rooted at its name.
fn encode_named(
    values: &BTreeMap<String, Node>,
    encoder: &Encoder,
    mut collect: impl FnMut(Encoded),
) -> EncodingResult<BTreeMap<String, Value>> {
    let mut examples = BTreeMap::new();
    for (name, node) in values {
        let mut encoded = encoder.encode_at(&JsonPath::named(name.as_str()), node)?;
        examples.insert(name.clone(), std::mem::take(&mut encoded.example));
        collect(encoded);
    }
    Ok(examples)
}

fn encode_body(
    body: Option<&Body>,
    encoder: &Encoder,
    rules: &mut RuleCategories,
    generators: &mut RuleCategories,
) -> EncodingResult<Option<Value>> {
    let Some(body) = body else {
        return Ok(None);
    };
    let encoded = body.encode(encoder)?;
    rules.body.extend(encoded.matching_rules);
    generators.body.extend(encoded.generators);
    Ok(Some(encoded.example))
}

fn scalar_text(value: Value) -> String {
    match value {
        Value::String(text) => text,
        other => other.to_string(),
    }
}

fn query_values(value: Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.into_iter().map(scalar_text).collect(),
        other => vec![scalar_text(other)],
    }
}
