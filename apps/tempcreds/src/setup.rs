//! `setup`: bind a profile to the credential API.
//!
//! Probes the API for a working auth method, persists the profile
//! configuration, seeds the cache with the probe's credentials, registers the
//! profile in the shared credentials file, then runs the broker once to check
//! the result.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, ensure};
use chrono::Utc;
use tempcreds_broker::cache::write_cache;
use tempcreds_broker::profile::write_credentials_profile;
use tempcreds_broker::{
    CachedCredentialRecord, CredentialBroker, CredentialOrigin, ProfileConfig, probe,
};
use tempcreds_core::{AwsRegion, ProfileName, SecretRef, ToolConfig};
use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::cli::{ApiKeySource, SetupArgs};
use crate::session::http_client;

pub async fn run(tool: &ToolConfig, args: SetupArgs) -> Result<()> {
    let profile = ProfileName::new(args.profile.profile)?;
    let api_key_ref = key_reference(tool, &profile, args.key).await?;
    let api_key = api_key_ref.resolve().context("failed to read the API key")?;

    let client = http_client()?;
    info!(url = %args.api_url, profile = %profile, "probing credential API");
    let outcome = probe(
        &client,
        &args.api_url,
        &api_key,
        Duration::from_secs(args.timeout),
    )
    .await?;

    let config = ProfileConfig::builder()
        .profile_name(profile.clone())
        .region(AwsRegion::new(args.region))
        .api_url(args.api_url)
        .auth_method(outcome.method)
        .api_key(api_key_ref)
        .cache_path(tool.cache_path(&profile))
        .expiration_threshold_secs(args.expiration_threshold)
        .request_timeout_secs(args.timeout)
        .build();
    let config_path = tool.profile_config_path(&profile);
    config.save(&config_path).await?;

    write_cache(
        &config.cache_path,
        &CachedCredentialRecord::new(outcome.credentials, Utc::now()),
    )
    .await?;

    let executable = std::env::current_exe().context("cannot locate the tempcreds executable")?;
    write_credentials_profile(
        &tool.credentials_file,
        &profile,
        &executable,
        config.region.as_str(),
    )
    .await?;

    let broker = CredentialBroker::from_config(&config, client)?;
    let check = broker
        .get_credentials()
        .await
        .context("self-test failed")?;
    ensure!(
        check.origin == CredentialOrigin::Cache,
        "self-test fetched new credentials instead of using the seeded cache; \
         the API may be issuing credentials that expire within {}s",
        config.expiration_threshold_secs
    );

    info!(
        profile = %profile,
        region = %config.region,
        auth_method = %config.auth_method,
        expiration = %check.credentials.expiration,
        config = %config_path.display(),
        credentials_file = %tool.credentials_file.display(),
        "setup complete"
    );
    println!("Profile {profile} is ready. Try: aws s3 ls --profile {profile}");
    Ok(())
}

/// Turn the chosen key source into a persistable reference.
///
/// A key given on the command line is written to a private file first.
async fn key_reference(
    tool: &ToolConfig,
    profile: &ProfileName,
    source: ApiKeySource,
) -> Result<SecretRef> {
    if let Some(var) = source.api_key_env {
        return Ok(SecretRef::Env { var });
    }
    if let Some(path) = source.api_key_file {
        let path = std::path::absolute(&path)
            .with_context(|| format!("invalid key file path {}", path.display()))?;
        return Ok(SecretRef::File { path });
    }
    let key = source
        .api_key
        .context("one of --api-key-env, --api-key-file or --api-key is required")?;
    let path = tool.api_key_path(profile);
    write_private_file(&path, key.trim()).await?;
    Ok(SecretRef::File { path })
}

/// Write `content` to `path`, readable only by the owner on Unix.
async fn write_private_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let mut options = tokio::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(0o600);

    let mut file = options
        .open(path)
        .await
        .with_context(|| format!("failed to open {}", path.display()))?;
    file.write_all(content.as_bytes()).await?;
    file.write_all(b"\n").await?;
    file.flush().await?;

    info!(path = %path.display(), "API key stored");
    Ok(())
}
