//! Provider verification dispatcher.
//!
//! A [`ProviderVerifier`] collects provider settings and one pact source,
//! then [`ProviderVerifier::verify`] hands them to the injected
//! [`VerificationEngine`] in a single verification call. Failures go to the
//! [`FailureReporter`] with the caller's source location and are returned.

use crate::engine::VerificationEngine;
use crate::error::{VerifierError, VerifierResult};
use crate::provider::{
    BrokerSelection, FilterOptions, ProviderInfo, ProviderStateOptions, PublishOptions,
    VerificationOptions,
};
use crate::reporter::{FailureReporter, TracingReporter};
use crate::resolve::{ResolvedTarget, resolve};
use crate::source::PactSource;
use std::collections::BTreeMap;
use std::future::Future;
use std::panic::Location;
use tracing::{info, instrument, warn};

/// Verifies a provider against contracts from one pact source.
pub struct ProviderVerifier<E, R = TracingReporter> {
    engine: E,
    reporter: R,
    provider: Option<ProviderInfo>,
    filter: Option<FilterOptions>,
    provider_state: Option<ProviderStateOptions>,
    options: Option<VerificationOptions>,
    custom_headers: BTreeMap<String, String>,
    publish: Option<PublishOptions>,
    target: Option<ResolvedTarget>,
    setup_error: Option<String>,
}

impl<E: VerificationEngine> ProviderVerifier<E> {
    /// Verifier that reports failures through `tracing`.
    pub fn new(engine: E) -> Self {
        Self::with_reporter(engine, TracingReporter)
    }
}

impl<E: VerificationEngine, R: FailureReporter> ProviderVerifier<E, R> {
    /// Verifier with a custom failure reporter.
    pub fn with_reporter(engine: E, reporter: R) -> Self {
        Self {
            engine,
            reporter,
            provider: None,
            filter: None,
            provider_state: None,
            options: None,
            custom_headers: BTreeMap::new(),
            publish: None,
            target: None,
            setup_error: None,
        }
    }

    /// Provider under verification.
    #[must_use]
    pub fn with_provider_info(mut self, info: ProviderInfo) -> Self {
        self.provider = Some(info);
        self
    }

    /// Only replay interactions matching the filter.
    #[must_use]
    pub fn with_filter(mut self, filter: FilterOptions) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Provider-state change callback.
    #[must_use]
    pub fn with_provider_state(mut self, options: ProviderStateOptions) -> Self {
        self.provider_state = Some(options);
        self
    }

    /// Transport options.
    #[must_use]
    pub fn with_verification_options(mut self, options: VerificationOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// Headers added to every provider request.
    ///
    /// Names and values must be printable ASCII; otherwise the next
    /// [`verify`](Self::verify) fails without calling the engine.
    #[must_use]
    pub fn with_custom_headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (name, value) in headers {
            let (name, value) = (name.into(), value.into());
            if !is_header_text(&name) || !is_header_text(&value) {
                self.defer(format!(
                    "custom header {name:?} must contain printable ASCII only"
                ));
                continue;
            }
            self.custom_headers.insert(name, value);
        }
        self
    }

    /// Publish results to the broker.
    #[must_use]
    pub fn with_publish_options(mut self, options: PublishOptions) -> Self {
        self.publish = Some(options);
        self
    }

    /// Verify contracts from a directory, file or URL.
    ///
    /// A broker source given here fails the next [`verify`](Self::verify);
    /// use [`verify_pacts_at_broker`](Self::verify_pacts_at_broker).
    #[must_use]
    pub fn verify_pacts_at(mut self, source: PactSource) -> Self {
        self.set_target(resolve(source, None).map_err(setup_message));
        self
    }

    /// Verify contracts selected from a broker.
    ///
    /// Setup errors, such as a missing provider name, are reported and
    /// returned by every later [`verify`](Self::verify).
    #[must_use]
    pub fn verify_pacts_at_broker(mut self, broker: PactSource, selection: BrokerSelection) -> Self {
        let resolved = resolve(broker, Some(selection))
            .map_err(|e| format!("Failed to set pact broker: {}", setup_message(e)));
        self.set_target(resolved);
        self
    }

    /// Run verification.
    ///
    /// Makes exactly one engine verification call. Failures are reported at
    /// the caller's location and returned; `Ok(false)` means the engine ran
    /// but not every interaction passed.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for invalid setup, on this and every
    /// later call, without invoking the engine. Otherwise returns the
    /// engine's error.
    #[track_caller]
    pub fn verify(&mut self) -> impl Future<Output = VerifierResult<bool>> + '_ {
        let location = Location::caller();
        self.verify_at(Some(location))
    }

    /// Run verification, reporting failures at `location`.
    ///
    /// # Errors
    ///
    /// Same as [`verify`](Self::verify).
    #[instrument(skip_all, fields(provider = self.provider.as_ref().map(|p| p.name.as_str())))]
    pub async fn verify_at(
        &mut self,
        location: Option<&'static Location<'static>>,
    ) -> VerifierResult<bool> {
        let result = self.dispatch().await;
        match &result {
            Ok(passed) => info!(passed, "Provider verification finished"),
            Err(e) => {
                warn!(error = %e, kind = %e.kind(), "Provider verification failed");
                self.reporter.report(&e.to_string(), location);
            }
        }
        result
    }

    async fn dispatch(&mut self) -> VerifierResult<bool> {
        if let Some(message) = &self.setup_error {
            return Err(VerifierError::configuration(message.clone()));
        }
        let target = self.target.as_ref().ok_or_else(|| {
            VerifierError::configuration("no pact source set; call verify_pacts_at first")
        })?;

        if let Some(info) = &self.provider {
            self.engine.set_provider_info(info);
        }
        if let Some(filter) = &self.filter {
            self.engine.set_filter(filter);
        }
        if let Some(state) = &self.provider_state {
            self.engine.set_provider_state(state);
        }
        if let Some(options) = &self.options {
            self.engine.set_verification_options(options);
        }
        if !self.custom_headers.is_empty() {
            self.engine.set_custom_headers(&self.custom_headers);
        }
        if let Some(publish) = &self.publish {
            self.engine.set_publish_options(publish);
        }

        let passed = match target {
            ResolvedTarget::Directory(path) => self.engine.verify_directory(path).await?,
            ResolvedTarget::File(path) => self.engine.verify_file(path).await?,
            ResolvedTarget::Url { url, auth } => self.engine.verify_url(url, auth.as_ref()).await?,
            ResolvedTarget::Broker(query) => self.engine.verify_broker(query).await?,
        };
        Ok(passed)
    }

    fn set_target(&mut self, resolved: Result<ResolvedTarget, String>) {
        match resolved {
            Ok(target) => self.target = Some(target),
            Err(message) => {
                self.target = None;
                self.defer(message);
            }
        }
    }

    /// Keep the first setup error; it fails every later `verify`.
    fn defer(&mut self, message: String) {
        if self.setup_error.is_none() {
            self.setup_error = Some(message);
        }
    }
}

fn setup_message(error: VerifierError) -> String {
    match error {
        VerifierError::Configuration(message) => message,
        other => other.to_string(),
    }
}

fn is_header_text(text: &str) -> bool {
    text.bytes().all(|b| (0x20..0x7f).contains(&b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Authentication;
    use crate::error::EngineError;
    use crate::provider::{ConsumerInfo, ProviderOptions};
    use crate::resolve::BrokerQuery;
    use crate::selector::VersionSelector;
    use async_trait::async_trait;
    use rust_common::ErrorKind;
    use std::path::Path;
    use std::sync::{Arc, Mutex};
    use url::Url;

    #[derive(Default)]
    struct LocalEngine {
        outcome: Option<EngineError>,
        calls: Vec<String>,
        headers: BTreeMap<String, String>,
    }

    impl LocalEngine {
        fn finish(&mut self, call: String) -> Result<bool, EngineError> {
            self.calls.push(call);
            self.outcome.clone().map_or(Ok(true), Err)
        }
    }

    #[async_trait]
    impl VerificationEngine for LocalEngine {
        fn set_provider_info(&mut self, info: &ProviderInfo) {
            self.calls.push(format!("provider:{}", info.name));
        }
        fn set_filter(&mut self, _filter: &FilterOptions) {}
        fn set_provider_state(&mut self, _options: &ProviderStateOptions) {}
        fn set_verification_options(&mut self, _options: &VerificationOptions) {}
        fn set_custom_headers(&mut self, headers: &BTreeMap<String, String>) {
            self.headers.clone_from(headers);
        }
        fn set_publish_options(&mut self, _options: &PublishOptions) {}

        async fn verify_directory(&mut self, path: &Path) -> Result<bool, EngineError> {
            self.finish(format!("directory:{}", path.display()))
        }
        async fn verify_file(&mut self, path: &Path) -> Result<bool, EngineError> {
            self.finish(format!("file:{}", path.display()))
        }
        async fn verify_url(
            &mut self,
            url: &Url,
            _auth: Option<&Authentication>,
        ) -> Result<bool, EngineError> {
            self.finish(format!("url:{url}"))
        }
        async fn verify_broker(&mut self, query: &BrokerQuery) -> Result<bool, EngineError> {
            self.finish(format!("broker:{}", query.provider_name))
        }
    }

    #[derive(Clone, Default)]
    struct LocalReporter(Arc<Mutex<Vec<(String, Option<u32>)>>>);

    impl FailureReporter for LocalReporter {
        fn report(&self, message: &str, location: Option<&Location<'_>>) {
            self.0
                .lock()
                .unwrap()
                .push((message.to_string(), location.map(Location::line)));
        }
    }

    fn verification_calls(engine: &LocalEngine) -> usize {
        engine
            .calls
            .iter()
            .filter(|c| !c.starts_with("provider:"))
            .count()
    }

    #[tokio::test]
    async fn test_directory_verification() {
        let mut verifier = ProviderVerifier::new(LocalEngine::default())
            .with_provider_info(ProviderInfo::new(
                "sanity-provider",
                Url::parse("http://localhost:8080").unwrap(),
            ))
            .verify_pacts_at(PactSource::directory("/tmp/pacts"));

        assert!(verifier.verify().await.unwrap());
        assert_eq!(
            verifier.engine.calls,
            vec!["provider:sanity-provider".to_string(), "directory:/tmp/pacts".to_string()]
        );
    }

    #[tokio::test]
    async fn test_engine_failure_reported_with_location() {
        let reporter = LocalReporter::default();
        let engine = LocalEngine {
            outcome: Some(EngineError::Mismatch("2 interactions failed".to_string())),
            ..LocalEngine::default()
        };
        let mut verifier = ProviderVerifier::with_reporter(engine, reporter.clone())
            .verify_pacts_at(PactSource::file("/tmp/pacts/a-b.json"));

        let line = line!() + 1;
        let err = verifier.verify().await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Verification);
        assert_eq!(verification_calls(&verifier.engine), 1);
        let reports = reporter.0.lock().unwrap().clone();
        assert_eq!(
            reports,
            vec![("Verification failed: 2 interactions failed".to_string(), Some(line))]
        );
    }

    #[tokio::test]
    async fn test_no_source_is_configuration_error() {
        let mut verifier = ProviderVerifier::new(LocalEngine::default());
        let err = verifier.verify().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_eq!(verification_calls(&verifier.engine), 0);
    }

    #[tokio::test]
    async fn test_broker_setup_error_deferred_to_verify() {
        let reporter = LocalReporter::default();
        let broker = PactSource::broker(Url::parse("https://broker.example.com").unwrap(), None);
        let selection = BrokerSelection::new(
            ProviderOptions::new(""),
            ConsumerInfo::new([VersionSelector::default()]),
        );
        let mut verifier = ProviderVerifier::with_reporter(LocalEngine::default(), reporter.clone())
            .verify_pacts_at_broker(broker, selection);

        assert!(reporter.0.lock().unwrap().is_empty());
        let line = line!() + 1;
        let err = verifier.verify().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(err.to_string().contains("Failed to set pact broker"));
        assert_eq!(verification_calls(&verifier.engine), 0);

        let reports = reporter.0.lock().unwrap().clone();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].1, Some(line));
    }

    #[tokio::test]
    async fn test_setup_error_fails_every_verify() {
        let broker = PactSource::broker(Url::parse("https://broker.example.com").unwrap(), None);
        let mut verifier = ProviderVerifier::new(LocalEngine::default())
            .verify_pacts_at_broker(broker, BrokerSelection::default());

        let first = verifier.verify().await.unwrap_err();
        let second = verifier.verify().await.unwrap_err();
        assert_eq!(first.to_string(), second.to_string());
        assert!(second.to_string().contains("Failed to set pact broker"));
        assert!(verifier.engine.calls.is_empty());
    }

    #[tokio::test]
    async fn test_broker_dispatch() {
        let broker = PactSource::broker(
            Url::parse("https://broker.example.com").unwrap(),
            Some(Authentication::token("t0k3n")),
        );
        let selection = BrokerSelection::new(
            ProviderOptions::new("sanity-provider"),
            ConsumerInfo::new([VersionSelector::default().with_main_branch(true)]),
        );
        let mut verifier =
            ProviderVerifier::new(LocalEngine::default()).verify_pacts_at_broker(broker, selection);

        assert!(verifier.verify().await.unwrap());
        assert_eq!(verifier.engine.calls, vec!["broker:sanity-provider".to_string()]);
    }

    #[tokio::test]
    async fn test_non_ascii_header_rejected() {
        let mut verifier = ProviderVerifier::new(LocalEngine::default())
            .with_custom_headers([("X-Trace", "abc"), ("X-Name", "Zoë")])
            .verify_pacts_at(PactSource::directory("/tmp/pacts"));

        for _ in 0..2 {
            let err = verifier.verify().await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Configuration);
            assert!(err.to_string().contains("X-Name"));
        }
        assert!(verifier.engine.calls.is_empty());
        assert!(verifier.engine.headers.is_empty());
    }

    #[tokio::test]
    async fn test_ascii_headers_forwarded() {
        let mut verifier = ProviderVerifier::new(LocalEngine::default())
            .with_custom_headers([("Authorization", "Bearer abc")])
            .verify_pacts_at(PactSource::directory("/tmp/pacts"));

        assert!(verifier.verify().await.unwrap());
        assert_eq!(verifier.engine.headers["Authorization"], "Bearer abc");
    }
}
