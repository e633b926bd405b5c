//! AWS shared-credentials file profile writer.
//!
//! Registers the broker as the `credential_process` of a named profile so any
//! AWS-compatible client can obtain credentials by invoking it.

use std::path::Path;

use tempcreds_core::ProfileName;
use tracing::info;

use crate::error::{BrokerError, BrokerResult};

/// Replace (or add) the `[profile]` section of an INI document.
///
/// Any existing section with that name is removed up to the next `[` header,
/// runs of blank lines are collapsed, and the new section is appended.
///
/// # Examples
///
/// ```
/// use tempcreds_broker::profile::upsert_profile;
/// use tempcreds_core::ProfileName;
///
/// let existing = "[default]\nregion = us-east-1\n\n[dev]\nregion = old\n";
/// let updated = upsert_profile(
///     existing,
///     &ProfileName::new("dev").unwrap(),
///     &[("region", "us-west-2")],
/// );
/// assert_eq!(updated, "[default]\nregion = us-east-1\n\n[dev]\nregion = us-west-2\n");
/// ```
#[must_use]
pub fn upsert_profile(existing: &str, profile: &ProfileName, entries: &[(&str, &str)]) -> String {
    let header = format!("[{profile}]");

    let mut kept = String::with_capacity(existing.len());
    let mut skipping = false;
    for line in existing.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with('[') {
            skipping = trimmed == header;
        }
        if !skipping {
            kept.push_str(line);
            kept.push('\n');
        }
    }

    while kept.contains("\n\n\n") {
        kept = kept.replace("\n\n\n", "\n\n");
    }
    let mut out = kept.trim_end().to_owned();
    if !out.is_empty() {
        out.push_str("\n\n");
    }

    out.push_str(&header);
    out.push('\n');
    for (key, value) in entries {
        out.push_str(key);
        out.push_str(" = ");
        out.push_str(value);
        out.push('\n');
    }
    out
}

/// The `credential_process` command line for `profile`.
///
/// The executable path is quoted so paths with spaces survive the AWS CLI's
/// shell-style splitting.
#[must_use]
pub fn credential_process_command(executable: &Path, profile: &ProfileName) -> String {
    format!(
        "\"{}\" credential-process --profile {profile}",
        executable.display()
    )
}

/// Upsert `profile` in the shared credentials file at `path`.
///
/// The file and its parent directory are created if missing.
pub async fn write_credentials_profile(
    path: &Path,
    profile: &ProfileName,
    executable: &Path,
    region: &str,
) -> BrokerResult<()> {
    let existing = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(BrokerError::io(path, e)),
    };

    let command = credential_process_command(executable, profile);
    let updated = upsert_profile(
        &existing,
        profile,
        &[("credential_process", &command), ("region", region)],
    );

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| BrokerError::io(parent, e))?;
    }
    tokio::fs::write(path, updated)
        .await
        .map_err(|e| BrokerError::io(path, e))?;

    info!(path = %path.display(), profile = %profile, "credential_process profile written");
    Ok(())
}
