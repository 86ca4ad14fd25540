//! Test failure reporting.

use std::panic::Location;
use tracing::error;

/// Surfaces verification failures to the enclosing test framework.
pub trait FailureReporter: Send + Sync {
    /// Report a failure, at the caller's source location when known.
    fn report(&self, message: &str, location: Option<&Location<'_>>);
}

/// Logs failures at error level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl FailureReporter for TracingReporter {
    fn report(&self, message: &str, location: Option<&Location<'_>>) {
        match location {
            Some(location) => error!(
                file = location.file(),
                line = location.line(),
                "{message}"
            ),
            None => error!("{message}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracing_reporter_accepts_both_forms() {
        let reporter = TracingReporter;
        reporter.report("without location", None);
        reporter.report("with location", Some(Location::caller()));
    }
}
