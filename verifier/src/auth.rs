//! Credentials for remote pact sources.

use secrecy::SecretString;

/// Username and password.
#[derive(Debug)]
pub struct SimpleAuth {
    /// Username
    pub username: String,
    /// Password
    pub password: SecretString,
}

impl SimpleAuth {
    /// Create basic credentials.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }
}

/// Bearer token.
#[derive(Debug)]
pub struct ApiToken {
    /// Token value
    pub token: SecretString,
}

impl ApiToken {
    /// Wrap a token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: SecretString::from(token.into()),
        }
    }
}

/// Authentication handed to the verification engine as is.
#[derive(Debug)]
pub enum Authentication {
    /// HTTP basic authentication
    Basic(SimpleAuth),
    /// Bearer token authentication
    Token(ApiToken),
}

impl Authentication {
    /// Basic authentication.
    #[must_use]
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic(SimpleAuth::new(username, password))
    }

    /// Token authentication.
    #[must_use]
    pub fn token(token: impl Into<String>) -> Self {
        Self::Token(ApiToken::new(token))
    }

    /// Scheme name for logging.
    #[must_use]
    pub const fn scheme(&self) -> &'static str {
        match self {
            Self::Basic(_) => "basic",
            Self::Token(_) => "token",
        }
    }
}
