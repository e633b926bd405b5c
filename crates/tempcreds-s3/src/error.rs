//! Error types for signed object downloads.

use std::fmt::Write as _;
use std::path::PathBuf;
use std::time::Duration;

use tempcreds_auth::AuthError;

/// Maximum number of body characters kept from a rejected response.
pub(crate) const BODY_EXCERPT_CHARS: usize = 200;

/// Errors that can occur while locating, signing, or downloading an object.
#[derive(Debug, thiserror::Error)]
pub enum ObjectError {
    /// The object location is neither `s3://bucket/key` nor an HTTP(S) URL.
    #[error("invalid object location {0:?}: expected s3://bucket/key or an https:// URL")]
    InvalidLocation(String),

    /// The request could not be signed.
    #[error("failed to sign request: {0}")]
    Sign(#[from] AuthError),

    /// Transport-level failure.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint sent no response, or stalled mid-body, for this long.
    #[error("no response within {0:?}")]
    Timeout(Duration),

    /// The endpoint answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Leading excerpt of the response body.
        body: String,
    },

    /// Every endpoint failed.
    #[error("all endpoints failed:{}", format_attempts(.attempts))]
    AllEndpointsFailed {
        /// Each endpoint tried and why it failed, in order.
        attempts: Vec<(String, ObjectError)>,
    },

    /// Writing the downloaded object failed.
    #[error("i/o error on {path}: {source}")]
    Io {
        /// Output path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

impl ObjectError {
    pub(crate) fn status(status: u16, body: &str) -> Self {
        Self::Status {
            status,
            body: body.chars().take(BODY_EXCERPT_CHARS).collect(),
        }
    }
}

fn format_attempts(attempts: &[(String, ObjectError)]) -> String {
    let mut out = String::new();
    for (endpoint, error) in attempts {
        let _ = write!(out, "\n  {endpoint}: {error}");
    }
    out
}
