//! `sign`: print SigV4 headers for a GET request.

use anyhow::{Context, Result};
use chrono::Utc;
use tempcreds_auth::{SignedRequest, sign, verify_sigv4};
use tempcreds_core::{CredentialSet, ToolConfig};
use tracing::warn;

use crate::cli::SignArgs;
use crate::session::{ProfileSession, http_client};

pub async fn run(tool: &ToolConfig, args: SignArgs) -> Result<()> {
    let session = ProfileSession::load(tool, &args.profile.profile).await?;
    let credentials = session.credentials(http_client()?).await?;
    let region = args
        .region
        .unwrap_or_else(|| session.config.region.to_string());

    if args.url.contains('?') {
        warn!(url = %args.url, "query string is not covered by the signature");
    }
    let signed = sign(
        "GET",
        &args.url,
        b"",
        &credentials,
        &region,
        &args.service,
        Utc::now(),
    )?;
    self_verify(&signed, &credentials)?;

    for line in header_lines(&signed) {
        println!("{line}");
    }
    Ok(())
}

/// Check the signature with the reference verifier before handing it out.
fn self_verify(signed: &SignedRequest, credentials: &CredentialSet) -> Result<()> {
    let (mut parts, ()) = http::Request::builder()
        .method(signed.method.as_str())
        .uri(signed.canonical_uri.as_str())
        .body(())?
        .into_parts();
    parts.headers = signed.to_header_map()?;
    verify_sigv4(&parts, &signed.payload_hash, credentials)
        .context("signature failed self-verification")?;
    Ok(())
}

fn header_lines(signed: &SignedRequest) -> Vec<String> {
    signed
        .headers()
        .into_iter()
        .map(|(name, value)| format!("{name}: {value}"))
        .collect()
}
