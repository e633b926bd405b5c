//! On-disk credential cache.
//!
//! The cache is a single JSON file in the AWS credential-process shape plus a
//! `FetchedAt` timestamp. It is owned by one broker; concurrent writers are not
//! coordinated.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tempcreds_core::CredentialSet;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::error::BrokerError;

/// A cached credential set and when it was fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedCredentialRecord {
    /// The credentials, serialized inline.
    #[serde(flatten)]
    pub credentials: CredentialSet,
    /// Fetch time. Absent in caches written by other tools.
    #[serde(rename = "FetchedAt", default, skip_serializing_if = "Option::is_none")]
    pub fetched_at: Option<DateTime<Utc>>,
}

impl CachedCredentialRecord {
    /// Record `credentials` as fetched at `fetched_at`.
    #[must_use]
    pub fn new(credentials: CredentialSet, fetched_at: DateTime<Utc>) -> Self {
        Self {
            credentials,
            fetched_at: Some(fetched_at),
        }
    }
}

/// Result of reading the cache file.
#[derive(Debug)]
pub enum CacheState {
    /// No cache file.
    Missing,
    /// The file exists but could not be read or parsed.
    Corrupt(String),
    /// A parsed record.
    Present(CachedCredentialRecord),
}

/// Read the cache at `path`. Never fails; problems are reported in the state.
pub async fn read_cache(path: &Path) -> CacheState {
    let raw = match tokio::fs::read(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return CacheState::Missing,
        Err(e) => return CacheState::Corrupt(format!("unreadable: {e}")),
    };

    match serde_json::from_slice(&raw) {
        Ok(record) => CacheState::Present(record),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "ignoring corrupt credential cache");
            CacheState::Corrupt(format!("corrupt: {e}"))
        }
    }
}

/// Overwrite the cache at `path` with `record`, creating parent directories.
///
/// On Unix the file is created owner-only, and an existing file is narrowed to
/// owner-only before any secret is written.
pub async fn write_cache(path: &Path, record: &CachedCredentialRecord) -> Result<(), BrokerError> {
    let cache_err = |source: std::io::Error| BrokerError::CacheWrite {
        path: path.to_path_buf(),
        source,
    };

    let json = serde_json::to_vec_pretty(record).map_err(|e| cache_err(e.into()))?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(cache_err)?;
    }

    let mut options = tokio::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(0o600);
    let mut file = options.open(path).await.map_err(cache_err)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(std::fs::Permissions::from_mode(0o600))
            .await
            .map_err(cache_err)?;
    }

    file.write_all(&json).await.map_err(cache_err)?;
    file.flush().await.map_err(cache_err)?;

    debug!(path = %path.display(), "credential cache written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn record() -> CachedCredentialRecord {
        CachedCredentialRecord::new(
            CredentialSet {
                version: 1,
                access_key_id: "ASIACACHE".to_owned(),
                secret_access_key: "s".to_owned(),
                session_token: Some("t".to_owned()),
                expiration: Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap(),
            },
            Utc.with_ymd_and_hms(2029, 12, 31, 23, 0, 0).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_should_write_flat_record_and_read_it_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("cache.json");

        write_cache(&path, &record()).await.unwrap();

        let json: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(json["AccessKeyId"], "ASIACACHE");
        assert_eq!(json["Expiration"], "2030-01-01T00:00:00Z");
        assert_eq!(json["FetchedAt"], "2029-12-31T23:00:00Z");

        let CacheState::Present(read) = read_cache(&path).await else {
            panic!("expected a cached record");
        };
        assert_eq!(read, record());
    }

    #[tokio::test]
    async fn test_should_accept_cache_without_fetched_at() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        std::fs::write(
            &path,
            r#"{"AccessKeyId":"A","SecretAccessKey":"S","Expiration":"2030-01-01T00:00:00"}"#,
        )
        .unwrap();

        let CacheState::Present(read) = read_cache(&path).await else {
            panic!("expected a cached record");
        };
        assert_eq!(read.fetched_at, None);
        assert_eq!(read.credentials.version, 1);
    }

    #[tokio::test]
    async fn test_should_report_missing_and_corrupt_cache() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        assert!(matches!(read_cache(&path).await, CacheState::Missing));

        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(read_cache(&path).await, CacheState::Corrupt(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_should_restrict_cache_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        write_cache(&path, &record()).await.unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_should_narrow_permissions_of_existing_cache() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        std::fs::write(&path, "{}").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        write_cache(&path, &record()).await.unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert!(matches!(read_cache(&path).await, CacheState::Present(_)));
    }
}
