//! Expiration timestamp parsing and normalization.
//!
//! The credential API may return an ISO-8601 timestamp without a UTC offset.
//! Such values are always interpreted as UTC, never as local time. Timestamps
//! that do carry an offset are converted to UTC.
//!
//! Normalized timestamps are written as RFC 3339 with a `Z` suffix.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serializer};

use crate::CoreError;

/// Offset-less layouts accepted in addition to RFC 3339.
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse an expiration timestamp into a UTC instant.
///
/// # Examples
///
/// ```
/// use tempcreds_core::expiration::parse_expiration;
///
/// let with_offset = parse_expiration("2025-06-01T14:00:00+02:00").unwrap();
/// let naive = parse_expiration("2025-06-01T12:00:00").unwrap();
/// assert_eq!(with_offset, naive);
/// ```
pub fn parse_expiration(raw: &str) -> Result<DateTime<Utc>, CoreError> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| CoreError::InvalidExpiration(raw.to_owned()))
}

/// Render a UTC instant as an explicit UTC ISO-8601 timestamp.
#[must_use]
pub fn format_expiration(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Serde `serialize_with` counterpart of [`format_expiration`].
pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format_expiration(value))
}

/// Serde `deserialize_with` counterpart of [`parse_expiration`].
pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_expiration(&raw).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_should_parse_rfc3339_with_z() {
        assert_eq!(parse_expiration("2025-06-01T12:00:00Z").unwrap(), noon());
    }

    #[test]
    fn test_should_convert_offset_to_utc() {
        assert_eq!(
            parse_expiration("2025-06-01T05:00:00-07:00").unwrap(),
            noon()
        );
    }

    #[test]
    fn test_should_treat_naive_timestamp_as_utc() {
        assert_eq!(parse_expiration("2025-06-01T12:00:00").unwrap(), noon());
        assert_eq!(parse_expiration("2025-06-01 12:00:00").unwrap(), noon());
    }

    #[test]
    fn test_should_keep_fractional_seconds() {
        let parsed = parse_expiration("2025-06-01T12:00:00.250").unwrap();
        assert_eq!(parsed.timestamp_subsec_millis(), 250);
    }

    /// Re-runs itself in a child test process with a non-UTC `TZ`.
    #[test]
    fn test_should_ignore_local_timezone_for_naive_timestamp() {
        const CHILD_MARKER: &str = "TEMPCREDS_TZ_CHILD";
        if std::env::var_os(CHILD_MARKER).is_some() {
            assert_eq!(parse_expiration("2025-06-01T12:00:00").unwrap(), noon());
            assert_eq!(
                format_expiration(&parse_expiration("2025-06-01 12:00:00").unwrap()),
                "2025-06-01T12:00:00Z"
            );
            return;
        }

        let status = std::process::Command::new(std::env::current_exe().unwrap())
            .args([
                "--exact",
                "expiration::tests::test_should_ignore_local_timezone_for_naive_timestamp",
                "--quiet",
            ])
            .env("TZ", "America/Los_Angeles")
            .env(CHILD_MARKER, "1")
            .status()
            .unwrap();
        assert!(status.success());
    }

    #[test]
    fn test_should_reject_garbage() {
        assert!(matches!(
            parse_expiration("tomorrow-ish"),
            Err(CoreError::InvalidExpiration(_))
        ));
    }

    #[test]
    fn test_should_format_with_z_suffix() {
        assert_eq!(format_expiration(&noon()), "2025-06-01T12:00:00Z");
    }
}
