//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint};
use tempcreds_broker::config::MAX_EXPIRATION_THRESHOLD_SECS;

/// Profile used when `--profile` is not given.
pub const DEFAULT_PROFILE: &str = "nasa-disasters-temp-creds";

#[derive(Debug, Parser)]
#[command(
    name = "tempcreds",
    version,
    about = "Temporary AWS credentials from an API-key-protected endpoint",
    next_display_order = None,
)]
pub struct Cli {
    /// Log filter, e.g. `debug` or `tempcreds_broker=trace`. `RUST_LOG` takes precedence.
    #[arg(long, global = true, value_name = "FILTER")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Probe the credential API, save the profile, and register it in the AWS
    /// shared credentials file as a `credential_process`.
    Setup(SetupArgs),

    /// Print credentials as `credential_process` JSON. Invoked by AWS clients.
    CredentialProcess(ProfileArgs),

    /// Print SigV4 headers for a GET request to a URL.
    Sign(SignArgs),

    /// Download an object with a signed GET, trying each endpoint in turn.
    Fetch(FetchArgs),
}

#[derive(Debug, Args)]
pub struct ProfileArgs {
    /// Profile name.
    #[arg(long, short, env = "TEMPCREDS_PROFILE", default_value = DEFAULT_PROFILE)]
    pub profile: String,
}

#[derive(Debug, Args)]
pub struct SetupArgs {
    #[command(flatten)]
    pub profile: ProfileArgs,

    /// Credential-issuing API endpoint.
    #[arg(long, env = "TEMPCREDS_API_URL", value_hint = ValueHint::Url)]
    pub api_url: String,

    /// AWS region written to the profile.
    #[arg(long, env = "AWS_REGION", default_value = tempcreds_core::AwsRegion::DEFAULT)]
    pub region: String,

    #[command(flatten)]
    pub key: ApiKeySource,

    /// Refresh cached credentials this many seconds before they expire (at most one day).
    #[arg(
        long,
        default_value_t = 300,
        value_name = "SECS",
        value_parser = clap::value_parser!(u64).range(..=MAX_EXPIRATION_THRESHOLD_SECS)
    )]
    pub expiration_threshold: u64,

    /// Timeout for each request to the credential API.
    #[arg(long, default_value_t = 10, value_name = "SECS")]
    pub timeout: u64,
}

/// Exactly one way of supplying the API key.
#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct ApiKeySource {
    /// Read the key from this environment variable on every use.
    #[arg(long, value_name = "VAR")]
    pub api_key_env: Option<String>,

    /// Read the key from this file on every use.
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub api_key_file: Option<PathBuf>,

    /// Store this key in a private file next to the profile configuration.
    #[arg(long, value_name = "KEY")]
    pub api_key: Option<String>,
}

#[derive(Debug, Args)]
pub struct SignArgs {
    #[command(flatten)]
    pub profile: ProfileArgs,

    /// URL to sign.
    #[arg(value_hint = ValueHint::Url)]
    pub url: String,

    /// Region for the credential scope. Defaults to the profile's region.
    #[arg(long)]
    pub region: Option<String>,

    /// Service for the credential scope.
    #[arg(long, default_value = "s3")]
    pub service: String,
}

#[derive(Debug, Args)]
pub struct FetchArgs {
    #[command(flatten)]
    pub profile: ProfileArgs,

    /// `s3://bucket/key` or an `https://` URL.
    pub source: String,

    /// Output file. Defaults to the object's file name in the current directory.
    #[arg(long, short, value_hint = ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Seconds to wait for response headers and between body chunks.
    /// Defaults to the profile's request timeout.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Region for signing and the regional endpoint. Defaults to the profile's region.
    #[arg(long)]
    pub region: Option<String>,
}
