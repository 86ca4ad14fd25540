//! Mock implementations for testing.
//!
//! Every mock is cheap to clone and shares its recorded state, so a test can
//! hand one clone to the code under test and inspect the other.

use async_trait::async_trait;
use chrono::NaiveDate;
use pactum_contract::{
    Contract, ContractError, ContractResult, MockServer, MockServerHandle, PortAllocator,
};
use pactum_verifier::{
    Authentication, BrokerQuery, EngineError, FailureReporter, FilterOptions, ProviderInfo,
    ProviderStateOptions, PublishOptions, VerificationEngine, VerificationOptions,
};
use secrecy::ExposeSecret;
use std::collections::BTreeMap;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::RwLock;
use url::Url;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Credentials as the engine received them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedAuth {
    /// Basic authentication
    Basic {
        /// Username
        username: String,
        /// Password
        password: String,
    },
    /// Bearer token
    Token(String),
}

impl From<&Authentication> for RecordedAuth {
    fn from(auth: &Authentication) -> Self {
        match auth {
            Authentication::Basic(basic) => Self::Basic {
                username: basic.username.clone(),
                password: basic.password.expose_secret().to_string(),
            },
            Authentication::Token(token) => Self::Token(token.token.expose_secret().to_string()),
        }
    }
}

/// One call made to [`MockVerificationEngine`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCall {
    /// `set_provider_info`
    ProviderInfo(ProviderInfo),
    /// `set_filter`
    Filter(FilterOptions),
    /// `set_provider_state`
    ProviderState(ProviderStateOptions),
    /// `set_verification_options`
    VerificationOptions(VerificationOptions),
    /// `set_custom_headers`
    CustomHeaders(BTreeMap<String, String>),
    /// `set_publish_options`
    PublishOptions(PublishOptions),
    /// `verify_directory`
    Directory(PathBuf),
    /// `verify_file`
    File(PathBuf),
    /// `verify_url`
    Url {
        /// Document URL
        url: Url,
        /// Credentials
        auth: Option<RecordedAuth>,
    },
    /// `verify_broker`
    Broker {
        /// Broker URL
        url: Url,
        /// Credentials
        auth: Option<RecordedAuth>,
        /// Provider name
        provider_name: String,
        /// Provider branch
        provider_branch: Option<String>,
        /// Provider tags
        provider_tags: Vec<String>,
        /// Selector JSON documents
        selectors: Vec<String>,
        /// Consumer tags
        consumer_tags: Vec<String>,
        /// WIP cut-off date
        include_wip_pacts_since: Option<NaiveDate>,
        /// Include pending pacts
        include_pending: bool,
    },
}

impl EngineCall {
    /// Whether this call ran a verification rather than configuring one.
    #[must_use]
    pub const fn is_verification(&self) -> bool {
        matches!(
            self,
            Self::Directory(_) | Self::File(_) | Self::Url { .. } | Self::Broker { .. }
        )
    }
}

/// Mock verification engine recording every call.
#[derive(Debug, Clone)]
pub struct MockVerificationEngine {
    outcome: Result<bool, EngineError>,
    calls: Arc<Mutex<Vec<EngineCall>>>,
}

impl Default for MockVerificationEngine {
    fn default() -> Self {
        Self::returning(true)
    }
}

impl MockVerificationEngine {
    /// Engine whose verifications all pass.
    #[must_use]
    pub fn passing() -> Self {
        Self::default()
    }

    /// Engine whose verifications return `passed`.
    #[must_use]
    pub fn returning(passed: bool) -> Self {
        Self {
            outcome: Ok(passed),
            calls: Arc::default(),
        }
    }

    /// Engine whose verifications fail with `error`.
    #[must_use]
    pub fn failing(error: EngineError) -> Self {
        Self {
            outcome: Err(error),
            calls: Arc::default(),
        }
    }

    /// Every call so far.
    #[must_use]
    pub fn calls(&self) -> Vec<EngineCall> {
        lock(&self.calls).clone()
    }

    /// Verification calls so far.
    #[must_use]
    pub fn verification_calls(&self) -> Vec<EngineCall> {
        lock(&self.calls)
            .iter()
            .filter(|call| call.is_verification())
            .cloned()
            .collect()
    }

    fn record(&self, call: EngineCall) {
        lock(&self.calls).push(call);
    }

    fn finish(&self, call: EngineCall) -> Result<bool, EngineError> {
        self.record(call);
        self.outcome.clone()
    }
}

#[async_trait]
impl VerificationEngine for MockVerificationEngine {
    fn set_provider_info(&mut self, info: &ProviderInfo) {
        self.record(EngineCall::ProviderInfo(info.clone()));
    }

    fn set_filter(&mut self, filter: &FilterOptions) {
        self.record(EngineCall::Filter(filter.clone()));
    }

    fn set_provider_state(&mut self, options: &ProviderStateOptions) {
        self.record(EngineCall::ProviderState(options.clone()));
    }

    fn set_verification_options(&mut self, options: &VerificationOptions) {
        self.record(EngineCall::VerificationOptions(options.clone()));
    }

    fn set_custom_headers(&mut self, headers: &BTreeMap<String, String>) {
        self.record(EngineCall::CustomHeaders(headers.clone()));
    }

    fn set_publish_options(&mut self, options: &PublishOptions) {
        self.record(EngineCall::PublishOptions(options.clone()));
    }

    async fn verify_directory(&mut self, path: &Path) -> Result<bool, EngineError> {
        self.finish(EngineCall::Directory(path.to_path_buf()))
    }

    async fn verify_file(&mut self, path: &Path) -> Result<bool, EngineError> {
        self.finish(EngineCall::File(path.to_path_buf()))
    }

    async fn verify_url(
        &mut self,
        url: &Url,
        auth: Option<&Authentication>,
    ) -> Result<bool, EngineError> {
        self.finish(EngineCall::Url {
            url: url.clone(),
            auth: auth.map(RecordedAuth::from),
        })
    }

    async fn verify_broker(&mut self, query: &BrokerQuery) -> Result<bool, EngineError> {
        self.finish(EngineCall::Broker {
            url: query.url.clone(),
            auth: query.auth.as_ref().map(RecordedAuth::from),
            provider_name: query.provider_name.clone(),
            provider_branch: query.provider_branch.clone(),
            provider_tags: query.provider_tags.clone(),
            selectors: query.selectors.clone(),
            consumer_tags: query.consumer_tags.clone(),
            include_wip_pacts_since: query.include_wip_pacts_since,
            include_pending: query.include_pending,
        })
    }
}

/// A failure passed to [`RecordingReporter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Failure message
    pub message: String,
    /// Source file, when reported with a location
    pub file: Option<String>,
    /// Source line, when reported with a location
    pub line: Option<u32>,
}

/// Failure reporter that keeps every report.
#[derive(Debug, Clone, Default)]
pub struct RecordingReporter {
    reports: Arc<Mutex<Vec<Report>>>,
}

impl RecordingReporter {
    /// Create a new recording reporter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports so far.
    #[must_use]
    pub fn reports(&self) -> Vec<Report> {
        lock(&self.reports).clone()
    }
}

impl FailureReporter for RecordingReporter {
    fn report(&self, message: &str, location: Option<&Location<'_>>) {
        lock(&self.reports).push(Report {
            message: message.to_string(),
            file: location.map(|l| l.file().to_string()),
            line: location.map(Location::line),
        });
    }
}

/// A mock server session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockSession {
    /// Port the server was started on
    pub port: u16,
    /// Descriptions of the interactions it served
    pub interactions: Vec<String>,
}

#[derive(Debug, Default)]
struct MockServerState {
    sessions: Vec<MockSession>,
    stopped: usize,
}

/// Mock server that accepts any contract and reports canned mismatches.
#[derive(Debug, Clone, Default)]
pub struct StubMockServer {
    mismatches: Vec<String>,
    state: Arc<RwLock<MockServerState>>,
}

impl StubMockServer {
    /// Create a mock server that reports no mismatches.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock server that reports the given mismatches.
    #[must_use]
    pub fn with_mismatches<I, S>(mismatches: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            mismatches: mismatches.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Sessions started so far.
    pub async fn sessions(&self) -> Vec<MockSession> {
        self.state.read().await.sessions.clone()
    }

    /// Number of times the server was stopped.
    pub async fn stopped(&self) -> usize {
        self.state.read().await.stopped
    }
}

#[async_trait]
impl MockServer for StubMockServer {
    async fn start(&self, contract: &Contract, port: u16) -> ContractResult<MockServerHandle> {
        let base_url = Url::parse(&format!("http://127.0.0.1:{port}"))
            .map_err(|e| ContractError::mock_server(e.to_string()))?;
        self.state.write().await.sessions.push(MockSession {
            port,
            interactions: contract
                .interactions()
                .iter()
                .map(|i| i.description.clone())
                .collect(),
        });
        Ok(MockServerHandle { port, base_url })
    }

    async fn mismatches(&self, _handle: &MockServerHandle) -> ContractResult<Vec<String>> {
        Ok(self.mismatches.clone())
    }

    async fn stop(&self, _handle: MockServerHandle) -> ContractResult<()> {
        self.state.write().await.stopped += 1;
        Ok(())
    }
}

/// Port allocator handing out one fixed port, or none.
#[derive(Debug, Clone, Copy)]
pub struct FixedPortAllocator(Option<u16>);

impl FixedPortAllocator {
    /// Always reserve `port`.
    #[must_use]
    pub const fn new(port: u16) -> Self {
        Self(Some(port))
    }

    /// Never has a port available.
    #[must_use]
    pub const fn exhausted() -> Self {
        Self(None)
    }
}

impl PortAllocator for FixedPortAllocator {
    fn reserve(&self) -> ContractResult<u16> {
        self.0
            .ok_or_else(|| ContractError::mock_server("no free port available"))
    }
}
