//! tempcreds: temporary AWS credentials from an API-key-protected endpoint.
//!
//! `setup` binds a profile once; AWS clients then call `credential-process`
//! on demand. `sign` and `fetch` use the same credentials for SigV4-signed
//! requests without a cloud SDK.
//!
//! All logging goes to stderr: `credential-process` owns stdout.

mod cli;
mod fetch;
mod process;
mod session;
mod setup;
mod sign;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tempcreds_core::ToolConfig;
use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};

/// Initialize the tracing subscriber on stderr.
///
/// `RUST_LOG` takes precedence over `filter`.
fn init_tracing(filter: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(filter).with_context(|| format!("invalid log level filter: {filter}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

/// `--log-level`, then `LOG_LEVEL`, then `warn` for credential-process and
/// `info` otherwise.
fn log_filter(cli_level: Option<&str>, tool: Option<&ToolConfig>, quiet: bool) -> String {
    if let Some(level) = cli_level {
        return level.to_owned();
    }
    if quiet && std::env::var_os("LOG_LEVEL").is_none() {
        return "warn".to_owned();
    }
    tool.map_or_else(|| "info".to_owned(), |t| t.log_level.clone())
}

async fn dispatch(tool: Result<ToolConfig>, command: Command) -> Result<()> {
    let tool = tool?;
    match command {
        Command::Setup(args) => setup::run(&tool, args).await,
        Command::CredentialProcess(args) => process::run(&tool, &args).await,
        Command::Sign(args) => sign::run(&tool, args).await,
        Command::Fetch(args) => fetch::run(&tool, args).await,
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let is_credential_process = matches!(cli.command, Command::CredentialProcess(_));

    let tool = ToolConfig::from_env().context("failed to load configuration");
    let filter = log_filter(
        cli.log_level.as_deref(),
        tool.as_ref().ok(),
        is_credential_process,
    );
    if let Err(e) = init_tracing(&filter) {
        eprintln!("Error: {e:#}");
        return ExitCode::FAILURE;
    }

    match dispatch(tool, cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %format!("{e:#}"), "command failed");
            if is_credential_process {
                println!("{}", process::error_json(&e));
            }
            ExitCode::FAILURE
        }
    }
}
