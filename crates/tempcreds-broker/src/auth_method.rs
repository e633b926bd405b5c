//! Header conventions for presenting the API key.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How the API key is attached to a credential request.
///
/// Discovered once by [`crate::probe::probe`] and stored in the profile
/// configuration; every later fetch reuses it without re-probing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthMethod {
    /// `api-key: <key>`
    ApiKey,
    /// `x-api-key: <key>`
    XApiKey,
    /// `X-API-Key: <key>`
    #[serde(rename = "X-API-Key")]
    XApiKeyUpper,
    /// `X-Api-Key: <key>`
    #[serde(rename = "X-Api-Key")]
    XApiKeyTitle,
    /// `Authorization: Bearer <key>`
    Bearer,
    /// `Authorization: apikey <key>`
    #[serde(rename = "apikey")]
    ApiKeyScheme,
}

impl AuthMethod {
    /// Probe precedence. The first method the API accepts is bound.
    pub const PROBE_ORDER: [Self; 6] = [
        Self::ApiKey,
        Self::XApiKey,
        Self::XApiKeyUpper,
        Self::XApiKeyTitle,
        Self::Bearer,
        Self::ApiKeyScheme,
    ];

    /// Header name as written in the request.
    #[must_use]
    pub const fn header_name(self) -> &'static str {
        match self {
            Self::ApiKey => "api-key",
            Self::XApiKey => "x-api-key",
            Self::XApiKeyUpper => "X-API-Key",
            Self::XApiKeyTitle => "X-Api-Key",
            Self::Bearer | Self::ApiKeyScheme => "Authorization",
        }
    }

    /// Header value carrying `key`.
    #[must_use]
    pub fn header_value(self, key: &str) -> String {
        match self {
            Self::Bearer => format!("Bearer {key}"),
            Self::ApiKeyScheme => format!("apikey {key}"),
            _ => key.to_owned(),
        }
    }
}

impl fmt::Display for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bearer => f.write_str("Authorization: Bearer"),
            Self::ApiKeyScheme => f.write_str("Authorization: apikey"),
            other => f.write_str(other.header_name()),
        }
    }
}
