//! Where contracts to verify come from.

use crate::auth::Authentication;
use std::fmt;
use std::path::PathBuf;
use url::Url;

/// Location of the contracts to verify.
#[derive(Debug)]
pub enum PactSource {
    /// Every pact file in a directory
    Directory(PathBuf),
    /// A single pact file
    File(PathBuf),
    /// A pact document served over HTTP
    Url {
        /// Document URL
        url: Url,
        /// Credentials, if the server requires them
        auth: Option<Authentication>,
    },
    /// Pacts selected from a broker
    Broker {
        /// Broker base URL
        url: Url,
        /// Credentials, if the broker requires them
        auth: Option<Authentication>,
    },
}

impl PactSource {
    /// Directory source.
    #[must_use]
    pub fn directory(path: impl Into<PathBuf>) -> Self {
        Self::Directory(path.into())
    }

    /// File source.
    #[must_use]
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }

    /// URL source.
    #[must_use]
    pub const fn url(url: Url, auth: Option<Authentication>) -> Self {
        Self::Url { url, auth }
    }

    /// Broker source.
    #[must_use]
    pub const fn broker(url: Url, auth: Option<Authentication>) -> Self {
        Self::Broker { url, auth }
    }

    /// Whether this source needs a broker selection to resolve.
    #[must_use]
    pub const fn is_broker(&self) -> bool {
        matches!(self, Self::Broker { .. })
    }
}

impl fmt::Display for PactSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Directory(path) => write!(f, "directory {}", path.display()),
            Self::File(path) => write!(f, "file {}", path.display()),
            Self::Url { url, .. } => write!(f, "url {url}"),
            Self::Broker { url, .. } => write!(f, "broker {url}"),
        }
    }
}
