//! Tool-wide configuration.
//!
//! Configuration is driven by environment variables, falling back to the AWS
//! CLI's own conventions for where shared files live.

use std::ffi::OsString;
use std::path::PathBuf;

use crate::CoreError;
use crate::types::ProfileName;

/// Global configuration for tempcreds.
#[derive(Debug, Clone)]
pub struct ToolConfig {
    /// Directory holding profile configs, caches, and key files (`~/.aws`).
    pub aws_dir: PathBuf,
    /// Shared credentials file that receives `credential_process` profiles.
    pub credentials_file: PathBuf,
    /// Log level.
    pub log_level: String,
}

impl ToolConfig {
    /// Build a configuration rooted at `aws_dir`.
    #[must_use]
    pub fn with_aws_dir(aws_dir: impl Into<PathBuf>) -> Self {
        let aws_dir = aws_dir.into();
        Self {
            credentials_file: aws_dir.join("credentials"),
            aws_dir,
            log_level: "info".to_owned(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `TEMPCREDS_AWS_DIR` | `~/.aws` |
    /// | `AWS_SHARED_CREDENTIALS_FILE` | `<aws_dir>/credentials` |
    /// | `LOG_LEVEL` | `info` |
    ///
    /// # Errors
    /// Returns an error if no home directory can be determined and
    /// `TEMPCREDS_AWS_DIR` is unset.
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_vars(|name| std::env::var_os(name))
    }

    fn from_vars(var: impl Fn(&str) -> Option<OsString>) -> Result<Self, CoreError> {
        let aws_dir = match var("TEMPCREDS_AWS_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => dirs::home_dir()
                .ok_or_else(|| CoreError::Config("cannot determine home directory".to_owned()))?
                .join(".aws"),
        };

        let mut config = Self::with_aws_dir(aws_dir);

        if let Some(v) = var("AWS_SHARED_CREDENTIALS_FILE") {
            config.credentials_file = PathBuf::from(v);
        }
        if let Some(v) = var("LOG_LEVEL").and_then(|v| v.into_string().ok()) {
            config.log_level = v;
        }

        Ok(config)
    }

    /// Path of the persisted configuration for `profile`.
    #[must_use]
    pub fn profile_config_path(&self, profile: &ProfileName) -> PathBuf {
        self.aws_dir.join(format!("{profile}_config.json"))
    }

    /// Path of the credential cache for `profile`.
    #[must_use]
    pub fn cache_path(&self, profile: &ProfileName) -> PathBuf {
        self.aws_dir.join(format!("credentials_cache_{profile}.json"))
    }

    /// Path of the API key file written by `setup` for `profile`.
    #[must_use]
    pub fn api_key_path(&self, profile: &ProfileName) -> PathBuf {
        self.aws_dir.join(format!("{profile}_api_key"))
    }
}
