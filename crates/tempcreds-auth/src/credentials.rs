//! Secret lookup for the verifier.
//!
//! The verifier only sees an access key ID in the `Authorization` header and
//! needs the matching secret to re-derive the signature. A [`CredentialSet`]
//! answers for its own key; [`StaticCredentialProvider`] holds several.

use std::collections::HashMap;

use tempcreds_core::CredentialSet;

use crate::error::AuthError;

/// Looks up secret access keys by access key ID.
pub trait CredentialProvider: Send + Sync {
    /// Retrieve the secret access key for the given access key ID.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::AccessKeyNotFound`] if the access key ID is not recognized.
    fn get_secret_key(&self, access_key_id: &str) -> Result<String, AuthError>;
}

impl CredentialProvider for CredentialSet {
    fn get_secret_key(&self, access_key_id: &str) -> Result<String, AuthError> {
        if self.access_key_id == access_key_id {
            Ok(self.secret_access_key.clone())
        } else {
            Err(AuthError::AccessKeyNotFound(access_key_id.to_owned()))
        }
    }
}

/// In-memory map of access key ID to secret.
///
/// ```
/// use tempcreds_auth::credentials::{CredentialProvider, StaticCredentialProvider};
///
/// let provider = StaticCredentialProvider::new([("AKIDEXAMPLE".to_owned(), "secret".to_owned())]);
/// assert_eq!(provider.get_secret_key("AKIDEXAMPLE").unwrap(), "secret");
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticCredentialProvider {
    secrets: HashMap<String, String>,
}

impl StaticCredentialProvider {
    /// Create a provider from `(access_key_id, secret_access_key)` pairs.
    pub fn new(secrets: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            secrets: secrets.into_iter().collect(),
        }
    }
}

impl CredentialProvider for StaticCredentialProvider {
    fn get_secret_key(&self, access_key_id: &str) -> Result<String, AuthError> {
        self.secrets
            .get(access_key_id)
            .cloned()
            .ok_or_else(|| AuthError::AccessKeyNotFound(access_key_id.to_owned()))
    }
}
