//! Loading a configured profile and obtaining its credentials.

use anyhow::{Context, Result};
use tempcreds_broker::{CredentialBroker, CredentialOrigin, ProfileConfig};
use tempcreds_core::{CredentialSet, ProfileName, ToolConfig};
use tracing::debug;

/// A profile that `setup` has already configured.
#[derive(Debug)]
pub struct ProfileSession {
    pub profile: ProfileName,
    pub config: ProfileConfig,
}

impl ProfileSession {
    pub async fn load(tool: &ToolConfig, name: &str) -> Result<Self> {
        let profile = ProfileName::new(name)?;
        let path = tool.profile_config_path(&profile);
        let config = ProfileConfig::load(&path).await.with_context(|| {
            format!("profile {profile} is not set up; run `tempcreds setup --profile {profile}`")
        })?;
        Ok(Self { profile, config })
    }

    /// Cached credentials if still fresh, otherwise freshly fetched ones.
    pub async fn credentials(&self, client: reqwest::Client) -> Result<CredentialSet> {
        let broker = CredentialBroker::from_config(&self.config, client)?;
        let resolution = broker
            .get_credentials()
            .await
            .with_context(|| format!("no credentials for profile {}", self.profile))?;
        debug!(
            profile = %self.profile,
            from_cache = resolution.origin == CredentialOrigin::Cache,
            "credentials resolved"
        );
        Ok(resolution.credentials)
    }
}

pub fn http_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(concat!("tempcreds/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("failed to build HTTP client")
}
