//! SigV4 primitives shared by the signer and the verifier.
//!
//! ```text
//! StringToSign = AWS4-HMAC-SHA256\n<amz_date>\n<scope>\n<hex(SHA256(canonical_request))>
//! SigningKey   = HMAC(HMAC(HMAC(HMAC("AWS4" + secret, date), region), service), "aws4_request")
//! Signature    = hex(HMAC(SigningKey, StringToSign))
//! ```

use chrono::{DateTime, Utc};
use hmac::{Hmac, KeyInit, Mac};
use sha2::{Digest, Sha256};

/// The only algorithm supported by this implementation.
pub const ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// Terminator of every credential scope.
pub const SCOPE_TERMINATOR: &str = "aws4_request";

type HmacSha256 = Hmac<Sha256>;

/// Format `time` as the `X-Amz-Date` value (`YYYYMMDDTHHMMSSZ`).
#[must_use]
pub fn format_amz_date(time: &DateTime<Utc>) -> String {
    time.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Format `time` as the credential-scope date stamp (`YYYYMMDD`).
#[must_use]
pub fn format_date_stamp(time: &DateTime<Utc>) -> String {
    time.format("%Y%m%d").to_string()
}

/// Build `date_stamp/region/service/aws4_request`.
#[must_use]
pub fn credential_scope(date_stamp: &str, region: &str, service: &str) -> String {
    format!("{date_stamp}/{region}/{service}/{SCOPE_TERMINATOR}")
}

/// Build the SigV4 string to sign.
///
/// # Examples
///
/// ```
/// use tempcreds_auth::sigv4::build_string_to_sign;
///
/// let sts = build_string_to_sign(
///     "20130524T000000Z",
///     "20130524/us-east-1/s3/aws4_request",
///     "7344ae5b7ee6c3e7e6b0fe0640412a37625d1fbfff95c48bbb2dc43964946972",
/// );
/// assert!(sts.starts_with("AWS4-HMAC-SHA256\n20130524T000000Z\n"));
/// ```
#[must_use]
pub fn build_string_to_sign(
    amz_date: &str,
    credential_scope: &str,
    canonical_request_hash: &str,
) -> String {
    format!("{ALGORITHM}\n{amz_date}\n{credential_scope}\n{canonical_request_hash}")
}

/// Derive the SigV4 signing key by chaining HMAC-SHA256 over the scope parts.
#[must_use]
pub fn derive_signing_key(secret_key: &str, date: &str, region: &str, service: &str) -> Vec<u8> {
    let k_date = hmac_sha256(format!("AWS4{secret_key}").as_bytes(), date.as_bytes());
    let k_region = hmac_sha256(&k_date, region.as_bytes());
    let k_service = hmac_sha256(&k_region, service.as_bytes());
    hmac_sha256(&k_service, SCOPE_TERMINATOR.as_bytes())
}

/// Compute the hex-encoded HMAC-SHA256 signature of `data`.
#[must_use]
pub fn compute_signature(signing_key: &[u8], data: &str) -> String {
    hex::encode(hmac_sha256(signing_key, data.as_bytes()))
}

/// Hex SHA-256 of `payload`.
///
/// # Examples
///
/// ```
/// use tempcreds_auth::sigv4::hash_payload;
///
/// assert_eq!(
///     hash_payload(b""),
///     "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
/// );
/// ```
#[must_use]
pub fn hash_payload(payload: &[u8]) -> String {
    hex::encode(Sha256::digest(payload))
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can accept keys of any length");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    const SECRET: &str = "wJalrXUtnFEMI/K7MDENG/bPxRfiCYEXAMPLEKEY";

    #[test]
    fn test_should_format_dates_for_scope_and_header() {
        let t = Utc.with_ymd_and_hms(2013, 5, 24, 7, 8, 9).unwrap();
        assert_eq!(format_amz_date(&t), "20130524T070809Z");
        assert_eq!(format_date_stamp(&t), "20130524");
    }

    #[test]
    fn test_should_build_credential_scope() {
        assert_eq!(
            credential_scope("20130524", "us-west-2", "s3"),
            "20130524/us-west-2/s3/aws4_request"
        );
    }

    #[test]
    fn test_should_compute_published_get_object_signature() {
        let key = derive_signing_key(SECRET, "20130524", "us-east-1", "s3");
        assert_eq!(key.len(), 32);

        let sts = build_string_to_sign(
            "20130524T000000Z",
            "20130524/us-east-1/s3/aws4_request",
            "7344ae5b7ee6c3e7e6b0fe0640412a37625d1fbfff95c48bbb2dc43964946972",
        );
        assert_eq!(
            compute_signature(&key, &sts),
            "f0e8bdb87c964420e857bd35b5d6ed310bd44f0170aba48dd91039c6036bdb41"
        );
    }

    #[test]
    fn test_should_vary_signing_key_by_region() {
        let east = derive_signing_key(SECRET, "20130524", "us-east-1", "s3");
        let west = derive_signing_key(SECRET, "20130524", "us-west-2", "s3");
        assert_ne!(east, west);
    }

    #[test]
    fn test_should_hash_nonempty_payload() {
        assert_eq!(
            hash_payload(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
