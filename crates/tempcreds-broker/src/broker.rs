//! The credential broker: serve from cache until near expiry, then refetch.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use tempcreds_core::CredentialSet;
use tracing::{debug, info, warn};

use crate::cache::{CacheState, CachedCredentialRecord, read_cache, write_cache};
use crate::config::ProfileConfig;
use crate::error::{BrokerError, BrokerResult};
use crate::fetcher::{CredentialFetcher, HttpCredentialFetcher};

/// Default headroom before expiration at which cached credentials are refreshed.
pub const DEFAULT_EXPIRATION_THRESHOLD: Duration = Duration::seconds(300);

/// Where the returned credentials came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialOrigin {
    /// Served from a fresh cache; no network call was made.
    Cache,
    /// Fetched from the credential API.
    Fetched,
}

/// Credentials plus how they were obtained.
#[derive(Debug)]
pub struct Resolution {
    /// Usable credentials.
    pub credentials: CredentialSet,
    /// Cache hit or fresh fetch.
    pub origin: CredentialOrigin,
    /// Set when fresh credentials could not be written to the cache. The
    /// credentials are still valid; the next call will simply refetch.
    pub cache_warning: Option<BrokerError>,
}

/// Serves temporary credentials from a cache file, refetching when stale.
#[derive(Debug)]
pub struct CredentialBroker<F> {
    cache_path: PathBuf,
    threshold: Duration,
    fetcher: F,
}

impl CredentialBroker<HttpCredentialFetcher> {
    /// Build a broker for a persisted profile, resolving its API key.
    pub fn from_config(config: &ProfileConfig, client: reqwest::Client) -> BrokerResult<Self> {
        let api_key = config.api_key.resolve()?;
        let fetcher = HttpCredentialFetcher::new(
            client,
            config.api_url.clone(),
            config.auth_method,
            api_key,
            config.request_timeout(),
        );
        Ok(Self::new(
            config.cache_path.clone(),
            config.expiration_threshold()?,
            fetcher,
        ))
    }
}

impl<F: CredentialFetcher> CredentialBroker<F> {
    /// Create a broker over `cache_path`.
    pub fn new(cache_path: impl Into<PathBuf>, threshold: Duration, fetcher: F) -> Self {
        Self {
            cache_path: cache_path.into(),
            threshold,
            fetcher,
        }
    }

    /// Cache file this broker owns.
    #[must_use]
    pub fn cache_path(&self) -> &Path {
        &self.cache_path
    }

    /// Return usable credentials as of now.
    pub async fn get_credentials(&self) -> BrokerResult<Resolution> {
        self.get_credentials_at(Utc::now()).await
    }

    /// Return credentials usable at `now`.
    ///
    /// A cached set is returned unchanged while `now < expiration - threshold`.
    /// Otherwise the fetcher is called exactly once; its result is cached and
    /// returned. A failed fetch is an error even if a stale cache exists.
    pub async fn get_credentials_at(&self, now: DateTime<Utc>) -> BrokerResult<Resolution> {
        let corrupt = match read_cache(&self.cache_path).await {
            CacheState::Present(record) if record.credentials.is_fresh_at(now, self.threshold) => {
                debug!(
                    path = %self.cache_path.display(),
                    expiration = %record.credentials.expiration,
                    "credential cache hit"
                );
                return Ok(Resolution {
                    credentials: record.credentials,
                    origin: CredentialOrigin::Cache,
                    cache_warning: None,
                });
            }
            CacheState::Present(record) => {
                info!(
                    expiration = %record.credentials.expiration,
                    threshold_secs = self.threshold.num_seconds(),
                    "cached credentials stale, refreshing"
                );
                None
            }
            CacheState::Missing => {
                info!(path = %self.cache_path.display(), "no credential cache, fetching");
                None
            }
            CacheState::Corrupt(reason) => {
                warn!(path = %self.cache_path.display(), reason = %reason, "credential cache unusable, fetching");
                Some(reason)
            }
        };

        let credentials = match self.fetcher.fetch().await {
            Ok(credentials) => credentials,
            Err(source) => {
                return Err(match corrupt {
                    Some(reason) => BrokerError::CredentialUnavailable { reason, source },
                    None => BrokerError::CredentialFetch(source),
                });
            }
        };
        info!(
            access_key_id = %credentials.access_key_id,
            expiration = %credentials.expiration,
            "fetched new credentials"
        );

        let record = CachedCredentialRecord::new(credentials, now);
        let cache_warning = match write_cache(&self.cache_path, &record).await {
            Ok(()) => None,
            Err(e) => {
                warn!(error = %e, "failed to persist credentials; next call will refetch");
                Some(e)
            }
        };

        Ok(Resolution {
            credentials: record.credentials,
            origin: CredentialOrigin::Fetched,
            cache_warning,
        })
    }
}
