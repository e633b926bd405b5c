//! Temporary AWS credentials as issued by the credential API.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A short-lived credential tuple.
///
/// Serializes to the JSON shape expected from an AWS `credential_process`
/// provider (`Version`, `AccessKeyId`, `SecretAccessKey`, `SessionToken`,
/// `Expiration`). A set is never mutated after it has been issued; the next
/// fetch produces a new one.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CredentialSet {
    /// Credential format version. Always `1` for AWS-compatible consumers.
    #[serde(default = "default_version")]
    pub version: u32,
    /// Access key ID.
    pub access_key_id: String,
    /// Secret access key. Required together with `access_key_id`.
    pub secret_access_key: String,
    /// Session token accompanying temporary keys.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_token: Option<String>,
    /// Instant after which the credentials are rejected.
    #[serde(with = "crate::expiration")]
    pub expiration: DateTime<Utc>,
}

/// The only credential format version AWS clients understand.
pub(crate) const fn default_version() -> u32 {
    1
}

impl CredentialSet {
    /// Whether the set can still be served at `now` with `threshold` of headroom.
    ///
    /// A set is considered usable while `now < expiration - threshold`. A
    /// threshold that reaches past the representable range counts as stale.
    #[must_use]
    pub fn is_fresh_at(&self, now: DateTime<Utc>, threshold: Duration) -> bool {
        self.expiration
            .checked_sub_signed(threshold)
            .is_some_and(|refresh_at| now < refresh_at)
    }
}

impl fmt::Debug for CredentialSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialSet")
            .field("version", &self.version)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field(
                "session_token",
                &self.session_token.as_ref().map(|_| "<redacted>"),
            )
            .field("expiration", &self.expiration)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn sample() -> CredentialSet {
        CredentialSet {
            version: 1,
            access_key_id: "ASIAEXAMPLE".to_owned(),
            secret_access_key: "secret".to_owned(),
            session_token: Some("token".to_owned()),
            expiration: Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_should_be_fresh_before_threshold() {
        let creds = sample();
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 11, 54, 59).unwrap();
        assert!(creds.is_fresh_at(now, Duration::minutes(5)));
    }

    #[test]
    fn test_should_be_stale_within_threshold() {
        let creds = sample();
        let boundary = Utc.with_ymd_and_hms(2025, 6, 1, 11, 55, 0).unwrap();
        assert!(!creds.is_fresh_at(boundary, Duration::minutes(5)));
        let past = Utc.with_ymd_and_hms(2025, 6, 2, 0, 0, 0).unwrap();
        assert!(!creds.is_fresh_at(past, Duration::minutes(5)));
    }

    #[test]
    fn test_should_treat_out_of_range_threshold_as_stale() {
        let creds = sample();
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        let threshold = Duration::try_seconds(9_000_000_000_000).unwrap();
        assert!(!creds.is_fresh_at(now, threshold));
    }

    #[test]
    fn test_should_serialize_in_credential_process_shape() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["Version"], 1);
        assert_eq!(json["AccessKeyId"], "ASIAEXAMPLE");
        assert_eq!(json["SecretAccessKey"], "secret");
        assert_eq!(json["SessionToken"], "token");
        assert_eq!(json["Expiration"], "2025-06-01T12:00:00Z");
    }

    #[test]
    fn test_should_omit_absent_session_token() {
        let mut creds = sample();
        creds.session_token = None;
        let json = serde_json::to_value(creds).unwrap();
        assert!(json.get("SessionToken").is_none());
    }

    #[test]
    fn test_should_default_version_when_deserializing() {
        let creds: CredentialSet = serde_json::from_str(
            r#"{"AccessKeyId":"A","SecretAccessKey":"S","Expiration":"2025-06-01T12:00:00"}"#,
        )
        .unwrap();
        assert_eq!(creds.version, 1);
        assert_eq!(creds.expiration, sample().expiration);
    }

    #[test]
    fn test_should_redact_secrets_in_debug_output() {
        let rendered = format!("{:?}", sample());
        assert!(rendered.contains("ASIAEXAMPLE"));
        assert!(!rendered.contains("secret\""));
        assert!(!rendered.contains("token\""));
    }
}
