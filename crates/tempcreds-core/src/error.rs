//! Error types for the tempcreds core.

/// Core error type for tempcreds infrastructure.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Invalid profile name.
    #[error("invalid profile name: {0:?} (must be non-empty and must not contain brackets, path separators, or whitespace)")]
    InvalidProfileName(String),

    /// An expiration timestamp could not be parsed.
    #[error("invalid expiration timestamp: {0:?}")]
    InvalidExpiration(String),

    /// A secret reference could not be resolved.
    #[error("secret unavailable from {source_desc}: {reason}")]
    SecretUnavailable {
        /// Human-readable description of where the secret was looked up.
        source_desc: String,
        /// Why the lookup failed.
        reason: String,
    },

    /// An inline secret was about to be written to disk.
    #[error("inline secrets cannot be persisted; reference an environment variable or a file instead")]
    InlineSecretNotPersistable,

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}
