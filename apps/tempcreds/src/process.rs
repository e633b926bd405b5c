//! `credential-process`: the AWS `credential_process` provider protocol.
//!
//! Stdout carries exactly one JSON document, either the credentials or
//! `{"error": ...}`. Logs go to stderr.

use anyhow::{Context, Result};
use tempcreds_core::{CredentialSet, ToolConfig};

use crate::cli::ProfileArgs;
use crate::session::{ProfileSession, http_client};

pub async fn run(tool: &ToolConfig, args: &ProfileArgs) -> Result<()> {
    let session = ProfileSession::load(tool, &args.profile).await?;
    let credentials = session.credentials(http_client()?).await?;
    println!("{}", credentials_json(&credentials)?);
    Ok(())
}

fn credentials_json(credentials: &CredentialSet) -> Result<String> {
    serde_json::to_string(credentials).context("failed to serialize credentials")
}

/// The error document printed in place of credentials.
pub fn error_json(error: &anyhow::Error) -> String {
    serde_json::json!({ "error": format!("{error:#}") }).to_string()
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    #[test]
    fn test_should_print_single_line_credential_process_json() {
        let credentials = CredentialSet {
            version: 1,
            access_key_id: "ASIAPROC".to_owned(),
            secret_access_key: "s".to_owned(),
            session_token: None,
            expiration: Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap(),
        };
        let json = credentials_json(&credentials).unwrap();
        assert!(!json.contains('\n'));
        assert_eq!(
            json,
            r#"{"Version":1,"AccessKeyId":"ASIAPROC","SecretAccessKey":"s","Expiration":"2030-01-01T00:00:00Z"}"#
        );
    }

    #[test]
    fn test_should_wrap_error_chain_in_json() {
        let err = anyhow::anyhow!("HTTP 403").context("no credentials for profile dev");
        let value: serde_json::Value = serde_json::from_str(&error_json(&err)).unwrap();
        assert_eq!(value["error"], "no credentials for profile dev: HTTP 403");
    }
}
