//! Secret references.
//!
//! Configuration records never hold an API key in plaintext. They hold a
//! [`SecretRef`] pointing at where the key lives, and the key is resolved into a
//! [`SecretString`] only when a request is about to be made.

use std::fmt;
use std::path::PathBuf;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::CoreError;

/// Where to find a secret value.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum SecretRef {
    /// Read from an environment variable at resolution time.
    Env {
        /// Variable name.
        var: String,
    },
    /// Read from a file; surrounding whitespace is trimmed.
    File {
        /// Path to the file.
        path: PathBuf,
    },
    /// Held in memory only. Refused by [`SecretRef::ensure_persistable`].
    #[serde(skip)]
    Inline(SecretString),
}

impl SecretRef {
    /// Wrap an in-memory secret.
    #[must_use]
    pub fn inline(value: impl Into<String>) -> Self {
        Self::Inline(SecretString::from(value.into()))
    }

    /// Resolve the reference into the secret value.
    pub fn resolve(&self) -> Result<SecretString, CoreError> {
        debug!(source = %self, "resolving secret");
        match self {
            Self::Env { var } => match std::env::var(var) {
                Ok(value) if !value.trim().is_empty() => Ok(SecretString::from(value)),
                Ok(_) => Err(self.unavailable("variable is empty")),
                Err(e) => Err(self.unavailable(e.to_string())),
            },
            Self::File { path } => {
                let raw = std::fs::read_to_string(path)
                    .map_err(|e| self.unavailable(e.to_string()))?;
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return Err(self.unavailable("file is empty"));
                }
                Ok(SecretString::from(trimmed.to_owned()))
            }
            Self::Inline(value) => Ok(value.clone()),
        }
    }

    /// Fail if this reference would embed the secret itself when serialized.
    pub fn ensure_persistable(&self) -> Result<(), CoreError> {
        match self {
            Self::Inline(_) => Err(CoreError::InlineSecretNotPersistable),
            Self::Env { .. } | Self::File { .. } => Ok(()),
        }
    }

    fn unavailable(&self, reason: impl Into<String>) -> CoreError {
        CoreError::SecretUnavailable {
            source_desc: self.to_string(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for SecretRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Env { var } => write!(f, "environment variable {var}"),
            Self::File { path } => write!(f, "file {}", path.display()),
            Self::Inline(_) => f.write_str("inline value"),
        }
    }
}

impl fmt::Debug for SecretRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Env { var } => f.debug_struct("Env").field("var", var).finish(),
            Self::File { path } => f.debug_struct("File").field("path", path).finish(),
            Self::Inline(_) => f.write_str("Inline(<redacted>)"),
        }
    }
}
