//! Error types for signing and verification.
//!
//! Signing can only fail on malformed input ([`AuthError::InvalidUrl`],
//! [`AuthError::InvalidHeaderValue`]); the remaining variants are produced by the
//! verifier.

/// Errors that can occur while signing or verifying a SigV4 request.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The target URL could not be split into a host and a path.
    #[error("invalid URL {url:?}: {reason}")]
    InvalidUrl {
        /// The URL as given.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A computed header value contains bytes not allowed in HTTP headers.
    #[error("invalid value for header {0}")]
    InvalidHeaderValue(&'static str),

    /// The `Authorization` header is missing from the request.
    #[error("Missing Authorization header")]
    MissingAuthHeader,

    /// The `Authorization` header could not be parsed.
    #[error("Invalid Authorization header format")]
    InvalidAuthHeader,

    /// The signing algorithm is not supported (only AWS4-HMAC-SHA256 is supported).
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// A required HTTP header referenced in `SignedHeaders` is missing.
    #[error("Missing required header: {0}")]
    MissingHeader(String),

    /// The `Credential` component does not match `AKID/date/region/service/aws4_request`.
    #[error("Invalid credential format")]
    InvalidCredential,

    /// The access key ID was not found in the credential store.
    #[error("Access key not found: {0}")]
    AccessKeyNotFound(String),

    /// The computed signature does not match the provided signature.
    #[error("Signature does not match")]
    SignatureDoesNotMatch,
}

impl AuthError {
    pub(crate) fn invalid_url(url: &str, reason: impl Into<String>) -> Self {
        Self::InvalidUrl {
            url: url.to_owned(),
            reason: reason.into(),
        }
    }
}
