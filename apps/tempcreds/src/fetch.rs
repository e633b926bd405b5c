//! `fetch`: download an object with a signed GET.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use tempcreds_core::ToolConfig;
use tempcreds_s3::{ObjectDownloader, ObjectSource};

use crate::cli::FetchArgs;
use crate::session::{ProfileSession, http_client};

pub async fn run(tool: &ToolConfig, args: FetchArgs) -> Result<()> {
    let source: ObjectSource = args.source.parse()?;
    let output = output_path(&source, args.output)?;

    let session = ProfileSession::load(tool, &args.profile.profile).await?;
    let client = http_client()?;
    let credentials = session.credentials(client.clone()).await?;
    let region = args
        .region
        .unwrap_or_else(|| session.config.region.to_string());

    let timeout = args
        .timeout
        .map_or_else(|| session.config.request_timeout(), Duration::from_secs);

    let endpoints = source.endpoints(&region);
    let download = ObjectDownloader::new(client, region, timeout)
        .download(&endpoints, &credentials, &output)
        .await
        .with_context(|| format!("failed to download {source}"))?;

    println!(
        "{} bytes from {} -> {}",
        download.bytes,
        download.endpoint,
        download.path.display()
    );
    Ok(())
}

fn output_path(source: &ObjectSource, explicit: Option<PathBuf>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path),
        None => source
            .file_name()
            .map(PathBuf::from)
            .with_context(|| format!("cannot derive a file name from {source}; pass --output")),
    }
}
