//! Error types for the credential broker.

use std::fmt::Write as _;
use std::path::PathBuf;

use tempcreds_core::CoreError;

use crate::auth_method::AuthMethod;

/// Maximum number of body characters kept from a rejected response.
pub(crate) const BODY_EXCERPT_CHARS: usize = 200;

/// A single request to the credential-issuing API failed.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Transport-level failure: DNS, connect, TLS, timeout.
    #[error("request to credential API failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with something other than 200.
    #[error("credential API returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Leading excerpt of the response body.
        body: String,
    },

    /// A 200 response whose body is not a usable credential set.
    #[error("invalid credential API response: {0}")]
    InvalidResponse(String),

    /// The API key cannot be carried in an HTTP header.
    #[error("API key contains characters that are not allowed in an HTTP header")]
    InvalidApiKey,
}

impl FetchError {
    pub(crate) fn status(status: u16, body: &str) -> Self {
        Self::Status {
            status,
            body: body.chars().take(BODY_EXCERPT_CHARS).collect(),
        }
    }
}

/// Errors surfaced by the broker, probing, and profile persistence.
#[derive(Debug, thiserror::Error)]
pub enum BrokerError {
    /// The cache was absent or stale and a fresh fetch failed.
    #[error("failed to fetch credentials: {0}")]
    CredentialFetch(#[from] FetchError),

    /// The cache was unreadable or corrupt and a fresh fetch failed.
    #[error("credentials unavailable (cache {reason}): {source}")]
    CredentialUnavailable {
        /// Why the cache could not be used.
        reason: String,
        /// The fetch failure.
        #[source]
        source: FetchError,
    },

    /// Fresh credentials were obtained but could not be written to the cache.
    #[error("failed to write credential cache {path}: {source}")]
    CacheWrite {
        /// Cache file path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// No header convention in the probe list was accepted by the API.
    #[error("no authentication method accepted by {url}:{}", format_attempts(.attempts))]
    NoWorkingAuthMethod {
        /// Credential API URL.
        url: String,
        /// Each method tried and why it failed, in probe order.
        attempts: Vec<(AuthMethod, FetchError)>,
    },

    /// The API answered 200 for a method but the body held no usable
    /// credentials. Probing stops at that method.
    #[error("credential API accepted {method} at {url} but returned invalid credentials: {source}")]
    AcceptedInvalidResponse {
        /// Credential API URL.
        url: String,
        /// The method the API answered 200 for.
        method: AuthMethod,
        /// Why the body was rejected.
        #[source]
        source: FetchError,
    },

    /// A profile configuration file could not be parsed or serialized.
    #[error("invalid profile configuration {path}: {source}")]
    ProfileConfig {
        /// Configuration file path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// Filesystem error outside the cache.
    #[error("i/o error on {path}: {source}")]
    Io {
        /// Path being read or written.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Core error (secret resolution, validation).
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl BrokerError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

fn format_attempts(attempts: &[(AuthMethod, FetchError)]) -> String {
    let mut out = String::new();
    for (method, error) in attempts {
        let _ = write!(out, "\n  {method}: {error}");
    }
    out
}

/// Convenience result type for broker operations.
pub type BrokerResult<T> = Result<T, BrokerError>;
