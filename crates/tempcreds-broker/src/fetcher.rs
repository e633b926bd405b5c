//! Requests to the credential-issuing API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::HeaderValue;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tempcreds_core::CredentialSet;
use tempcreds_core::expiration::parse_expiration;
use tracing::debug;

use crate::auth_method::AuthMethod;
use crate::error::FetchError;

/// Source of fresh credentials for the broker.
///
/// Uses `#[async_trait]` so it stays object-safe (`Box<dyn CredentialFetcher>`).
#[async_trait]
pub trait CredentialFetcher: Send + Sync {
    /// Obtain a new credential set.
    async fn fetch(&self) -> Result<CredentialSet, FetchError>;
}

/// Fetches credentials over HTTP using a bound [`AuthMethod`].
pub struct HttpCredentialFetcher {
    client: reqwest::Client,
    api_url: String,
    method: AuthMethod,
    api_key: SecretString,
    timeout: Duration,
}

impl HttpCredentialFetcher {
    /// Create a fetcher for `api_url`.
    pub fn new(
        client: reqwest::Client,
        api_url: impl Into<String>,
        method: AuthMethod,
        api_key: SecretString,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            api_url: api_url.into(),
            method,
            api_key,
            timeout,
        }
    }
}

impl std::fmt::Debug for HttpCredentialFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpCredentialFetcher")
            .field("api_url", &self.api_url)
            .field("method", &self.method)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl CredentialFetcher for HttpCredentialFetcher {
    async fn fetch(&self) -> Result<CredentialSet, FetchError> {
        request_credentials(
            &self.client,
            &self.api_url,
            self.method,
            &self.api_key,
            self.timeout,
        )
        .await
    }
}

/// Issue one GET against the credential API.
///
/// Only HTTP 200 with a well-formed body is a success.
async fn request_credentials(
    client: &reqwest::Client,
    api_url: &str,
    method: AuthMethod,
    api_key: &SecretString,
    timeout: Duration,
) -> Result<CredentialSet, FetchError> {
    let body = request_accepted_body(client, api_url, method, api_key, timeout).await?;
    parse_credentials(&body)
}

/// Issue one GET and return the body of a 200 response.
///
/// Any other status is a [`FetchError::Status`].
pub(crate) async fn request_accepted_body(
    client: &reqwest::Client,
    api_url: &str,
    method: AuthMethod,
    api_key: &SecretString,
    timeout: Duration,
) -> Result<String, FetchError> {
    let mut value = HeaderValue::from_str(&method.header_value(api_key.expose_secret()))
        .map_err(|_| FetchError::InvalidApiKey)?;
    value.set_sensitive(true);

    debug!(url = %api_url, method = %method, "requesting credentials");
    let response = client
        .get(api_url)
        .header(method.header_name(), value)
        .timeout(timeout)
        .send()
        .await?;

    let status = response.status();
    let body = response.text().await?;
    if status != reqwest::StatusCode::OK {
        debug!(url = %api_url, method = %method, status = status.as_u16(), "credential request rejected");
        return Err(FetchError::status(status.as_u16(), &body));
    }
    Ok(body)
}

/// Parse and validate a 200 response body.
pub(crate) fn parse_credentials(body: &str) -> Result<CredentialSet, FetchError> {
    let wire: ApiCredentials = serde_json::from_str(body)
        .map_err(|e| FetchError::InvalidResponse(format!("malformed JSON: {e}")))?;
    wire.into_credential_set()
}

/// The credential API's response body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ApiCredentials {
    version: Option<u32>,
    access_key_id: Option<String>,
    secret_access_key: Option<String>,
    session_token: Option<String>,
    expiration: Option<String>,
}

impl ApiCredentials {
    fn into_credential_set(self) -> Result<CredentialSet, FetchError> {
        let access_key_id = required(self.access_key_id, "AccessKeyId")?;
        let secret_access_key = required(self.secret_access_key, "SecretAccessKey")?;
        let raw_expiration = required(self.expiration, "Expiration")?;
        let expiration = parse_expiration(&raw_expiration)
            .map_err(|e| FetchError::InvalidResponse(e.to_string()))?;

        Ok(CredentialSet {
            version: self.version.unwrap_or(1),
            access_key_id,
            secret_access_key,
            session_token: self.session_token.filter(|t| !t.is_empty()),
            expiration,
        })
    }
}

fn required(value: Option<String>, field: &str) -> Result<String, FetchError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| FetchError::InvalidResponse(format!("missing {field}")))
}
