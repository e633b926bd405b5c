//! Signed GET with endpoint fallback, streamed to disk.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Utc;
use tempcreds_auth::signer::sign;
use tempcreds_core::CredentialSet;
use tempcreds_core::strategy::first_success;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::error::ObjectError;

/// Service name used in the credential scope.
const SERVICE: &str = "s3";

/// A completed download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    /// Endpoint that served the object.
    pub endpoint: String,
    /// Bytes written.
    pub bytes: u64,
    /// Output file.
    pub path: PathBuf,
}

/// Downloads objects with SigV4-signed GET requests.
#[derive(Debug, Clone)]
pub struct ObjectDownloader {
    client: reqwest::Client,
    region: String,
    timeout: Duration,
}

impl ObjectDownloader {
    /// Create a downloader signing for `region`.
    ///
    /// `timeout` bounds the wait for response headers and for each body chunk,
    /// not the whole transfer.
    pub fn new(client: reqwest::Client, region: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            region: region.into(),
            timeout,
        }
    }

    /// Try `endpoints` in order and stream the first 2xx response to `output`.
    ///
    /// Each attempt is signed at the moment it is sent. A non-2xx response or
    /// no response within the timeout moves on to the next endpoint. The object
    /// is written to a temporary file beside `output` and renamed into place
    /// once complete.
    pub async fn download(
        &self,
        endpoints: &[String],
        credentials: &CredentialSet,
        output: &Path,
    ) -> Result<Download, ObjectError> {
        let result = first_success(endpoints, |endpoint| async move {
            let outcome = self.request(endpoint, credentials).await;
            if let Err(e) = &outcome {
                warn!(endpoint = %endpoint, error = %e, "endpoint failed");
            }
            outcome
        })
        .await;

        let winner = result.map_err(|exhausted| ObjectError::AllEndpointsFailed {
            attempts: exhausted
                .failures
                .into_iter()
                .map(|(endpoint, e)| (endpoint.clone(), e))
                .collect(),
        })?;

        let bytes = stream_to_file(winner.value, output, self.timeout).await?;
        info!(
            endpoint = %winner.strategy,
            bytes,
            path = %output.display(),
            "object downloaded"
        );
        Ok(Download {
            endpoint: winner.strategy.clone(),
            bytes,
            path: output.to_path_buf(),
        })
    }

    async fn request(
        &self,
        endpoint: &str,
        credentials: &CredentialSet,
    ) -> Result<reqwest::Response, ObjectError> {
        let signed = sign(
            "GET",
            endpoint,
            b"",
            credentials,
            &self.region,
            SERVICE,
            Utc::now(),
        )?;
        debug!(endpoint = %endpoint, amz_date = %signed.amz_date, "sending signed request");

        let request = self
            .client
            .get(endpoint)
            .headers(signed.to_header_map()?)
            .send();
        let response = tokio::time::timeout(self.timeout, request)
            .await
            .map_err(|_| ObjectError::Timeout(self.timeout))??;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = tokio::time::timeout(self.timeout, response.text())
            .await
            .ok()
            .and_then(Result::ok)
            .unwrap_or_default();
        Err(ObjectError::status(status.as_u16(), &body))
    }
}

async fn stream_to_file(
    mut response: reqwest::Response,
    path: &Path,
    idle_timeout: Duration,
) -> Result<u64, ObjectError> {
    let io_err = |source: std::io::Error| ObjectError::Io {
        path: path.to_path_buf(),
        source,
    };

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    // Removed on drop unless persisted.
    let partial = tempfile::Builder::new()
        .prefix(".tempcreds-")
        .suffix(".part")
        .tempfile_in(dir)
        .map_err(io_err)?;
    let mut file = tokio::fs::File::from_std(partial.as_file().try_clone().map_err(io_err)?);

    let mut written = 0u64;
    loop {
        let next = tokio::time::timeout(idle_timeout, response.chunk())
            .await
            .map_err(|_| ObjectError::Timeout(idle_timeout))??;
        let Some(chunk) = next else { break };
        file.write_all(&chunk).await.map_err(io_err)?;
        written += chunk.len() as u64;
    }
    file.flush().await.map_err(io_err)?;
    drop(file);

    partial.persist(path).map_err(|e| io_err(e.error))?;
    Ok(written)
}
