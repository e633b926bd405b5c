//! Per-profile broker configuration.
//!
//! Written once by `setup` and read on every credential-process invocation.
//! The API key is stored as a [`SecretRef`], never in plaintext.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tempcreds_core::{AwsRegion, CoreError, ProfileName, SecretRef};
use tracing::debug;
use typed_builder::TypedBuilder;

use crate::auth_method::AuthMethod;
use crate::error::{BrokerError, BrokerResult};

const DEFAULT_EXPIRATION_THRESHOLD_SECS: u64 = 300;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Largest accepted refresh headroom: one day.
pub const MAX_EXPIRATION_THRESHOLD_SECS: u64 = 86_400;

const fn default_expiration_threshold_secs() -> u64 {
    DEFAULT_EXPIRATION_THRESHOLD_SECS
}

const fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

/// Everything the broker needs to serve one profile.
///
/// # Examples
///
/// ```
/// use tempcreds_broker::{AuthMethod, ProfileConfig};
/// use tempcreds_core::{ProfileName, SecretRef};
///
/// let config = ProfileConfig::builder()
///     .profile_name(ProfileName::new("dev").unwrap())
///     .api_url("https://creds.example.com/v1")
///     .auth_method(AuthMethod::XApiKey)
///     .api_key(SecretRef::Env { var: "CREDS_API_KEY".to_owned() })
///     .cache_path("/tmp/credentials_cache_dev.json")
///     .build();
/// assert_eq!(config.expiration_threshold_secs, 300);
/// assert_eq!(config.region.as_str(), "us-west-2");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct ProfileConfig {
    /// Profile name in the shared credentials file.
    pub profile_name: ProfileName,

    /// Region written to the profile and used for signing.
    #[builder(default)]
    #[serde(default)]
    pub region: AwsRegion,

    /// Credential-issuing API endpoint.
    #[builder(setter(into))]
    pub api_url: String,

    /// Header convention bound during setup.
    pub auth_method: AuthMethod,

    /// Where to find the API key.
    pub api_key: SecretRef,

    /// Credential cache file.
    #[builder(setter(into))]
    pub cache_path: PathBuf,

    /// Refresh this many seconds before expiration.
    #[builder(default = DEFAULT_EXPIRATION_THRESHOLD_SECS)]
    #[serde(default = "default_expiration_threshold_secs")]
    pub expiration_threshold_secs: u64,

    /// Timeout for each request to the credential API, in seconds.
    #[builder(default = DEFAULT_REQUEST_TIMEOUT_SECS)]
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// When setup created this configuration.
    #[builder(default = Utc::now())]
    pub created_at: DateTime<Utc>,
}

impl ProfileConfig {
    /// Refresh headroom as a signed duration.
    ///
    /// # Errors
    /// Rejects thresholds above [`MAX_EXPIRATION_THRESHOLD_SECS`].
    pub fn expiration_threshold(&self) -> BrokerResult<chrono::Duration> {
        Some(self.expiration_threshold_secs)
            .filter(|secs| *secs <= MAX_EXPIRATION_THRESHOLD_SECS)
            .and_then(|secs| i64::try_from(secs).ok())
            .and_then(chrono::Duration::try_seconds)
            .ok_or_else(|| {
                CoreError::Config(format!(
                    "expiration threshold out of range: {}s",
                    self.expiration_threshold_secs
                ))
                .into()
            })
    }

    /// Per-request timeout.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Write the configuration as JSON to `path`.
    ///
    /// # Errors
    /// Refuses to persist an inline API key.
    pub async fn save(&self, path: &Path) -> BrokerResult<()> {
        self.api_key.ensure_persistable()?;

        let json = serde_json::to_vec_pretty(self).map_err(|source| BrokerError::ProfileConfig {
            path: path.to_path_buf(),
            source,
        })?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| BrokerError::io(parent, e))?;
        }
        tokio::fs::write(path, json)
            .await
            .map_err(|e| BrokerError::io(path, e))?;

        debug!(path = %path.display(), profile = %self.profile_name, "profile configuration saved");
        Ok(())
    }

    /// Read a configuration previously written by [`ProfileConfig::save`].
    pub async fn load(path: &Path) -> BrokerResult<Self> {
        let raw = tokio::fs::read(path)
            .await
            .map_err(|e| BrokerError::io(path, e))?;
        serde_json::from_slice(&raw).map_err(|source| BrokerError::ProfileConfig {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(api_key: SecretRef) -> ProfileConfig {
        ProfileConfig::builder()
            .profile_name(ProfileName::new("disasters").unwrap())
            .api_url("https://creds.example.com/v1")
            .auth_method(AuthMethod::XApiKeyUpper)
            .api_key(api_key)
            .cache_path("/tmp/credentials_cache_disasters.json")
            .build()
    }

    #[test]
    fn test_should_build_with_typed_builder_defaults() {
        let config = config(SecretRef::Env {
            var: "K".to_owned(),
        });
        assert_eq!(config.region, AwsRegion::default());
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(
            config.expiration_threshold().unwrap(),
            chrono::Duration::seconds(300)
        );
    }

    #[test]
    fn test_should_reject_threshold_above_one_day() {
        let mut config = config(SecretRef::Env {
            var: "K".to_owned(),
        });
        config.expiration_threshold_secs = 9_000_000_000_000;
        assert!(matches!(
            config.expiration_threshold(),
            Err(BrokerError::Core(CoreError::Config(_)))
        ));

        config.expiration_threshold_secs = MAX_EXPIRATION_THRESHOLD_SECS;
        assert_eq!(
            config.expiration_threshold().unwrap(),
            chrono::Duration::days(1)
        );
    }

    #[test]
    fn test_should_serialize_to_camel_case_json() {
        let json = serde_json::to_value(config(SecretRef::File {
            path: PathBuf::from("/home/u/.aws/disasters_api_key"),
        }))
        .unwrap();

        assert_eq!(json["profileName"], "disasters");
        assert_eq!(json["authMethod"], "X-API-Key");
        assert_eq!(json["apiKey"]["source"], "file");
        assert_eq!(json["expirationThresholdSecs"], 300);
        assert!(json.get("createdAt").is_some());
    }

    #[tokio::test]
    async fn test_should_save_and_load_file_reference() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("disasters_config.json");
        let original = config(SecretRef::Env {
            var: "DISASTERS_KEY".to_owned(),
        });

        original.save(&path).await.unwrap();
        let loaded = ProfileConfig::load(&path).await.unwrap();

        assert_eq!(loaded.profile_name, original.profile_name);
        assert_eq!(loaded.auth_method, AuthMethod::XApiKeyUpper);
        assert!(matches!(loaded.api_key, SecretRef::Env { var } if var == "DISASTERS_KEY"));
    }

    #[tokio::test]
    async fn test_should_refuse_to_save_inline_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("disasters_config.json");

        let err = config(SecretRef::inline("plaintext-key"))
            .save(&path)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            BrokerError::Core(CoreError::InlineSecretNotPersistable)
        ));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_should_fill_defaults_for_older_config_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("old_config.json");
        std::fs::write(
            &path,
            r#"{"profileName":"old","apiUrl":"https://x","authMethod":"api-key",
                "apiKey":{"source":"env","var":"K"},"cachePath":"/tmp/c.json",
                "createdAt":"2024-01-01T00:00:00Z"}"#,
        )
        .unwrap();

        let loaded = ProfileConfig::load(&path).await.unwrap();
        assert_eq!(loaded.region.as_str(), "us-west-2");
        assert_eq!(loaded.expiration_threshold_secs, 300);
        assert_eq!(loaded.request_timeout_secs, 10);
    }
}
