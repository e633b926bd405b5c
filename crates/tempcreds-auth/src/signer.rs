//! Client-side SigV4 signing of S3 GET requests.
//!
//! [`sign`] is a pure function of its inputs: the same credentials, URL, and
//! instant always yield byte-identical headers. A signature embeds its timestamp
//! and is rejected by the service once it drifts outside the allowed clock skew,
//! so requests must be signed right before they are sent.

use chrono::{DateTime, Utc};
use http::{HeaderMap, HeaderName, HeaderValue};
use sha2::{Digest, Sha256};
use tempcreds_core::CredentialSet;
use tracing::debug;

use crate::canonical::{CanonicalRequest, build_canonical_uri};
use crate::error::AuthError;
use crate::sigv4::{
    ALGORITHM, build_string_to_sign, compute_signature, credential_scope, derive_signing_key,
    format_amz_date, format_date_stamp, hash_payload,
};

/// Header carrying the session token of temporary credentials.
pub const SECURITY_TOKEN_HEADER: &str = "x-amz-security-token";

/// The result of signing a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    /// HTTP method that was signed.
    pub method: String,
    /// Canonical URI path.
    pub canonical_uri: String,
    /// Host (authority) of the target URL.
    pub host: String,
    /// Signed header names, in signing order.
    pub signed_headers: Vec<&'static str>,
    /// Value of the `Authorization` header.
    pub authorization: String,
    /// Hex SHA-256 of the payload.
    pub payload_hash: String,
    /// Value of the `X-Amz-Date` header.
    pub amz_date: String,
    /// Session token forwarded as `X-Amz-Security-Token`.
    session_token: Option<String>,
}

impl SignedRequest {
    /// The headers to attach, in a stable order.
    #[must_use]
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        let mut headers = vec![
            ("Host", self.host.clone()),
            ("X-Amz-Date", self.amz_date.clone()),
            ("Authorization", self.authorization.clone()),
        ];
        if let Some(token) = &self.session_token {
            headers.push(("X-Amz-Security-Token", token.clone()));
        }
        headers
    }

    /// The headers as an [`http::HeaderMap`].
    ///
    /// # Errors
    /// Returns [`AuthError::InvalidHeaderValue`] if a value contains bytes that
    /// are not valid in an HTTP header (e.g. a control character in a token).
    pub fn to_header_map(&self) -> Result<HeaderMap, AuthError> {
        let mut map = HeaderMap::with_capacity(4);
        for (name, value) in self.headers() {
            let value =
                HeaderValue::from_str(&value).map_err(|_| AuthError::InvalidHeaderValue(name))?;
            map.insert(HeaderName::from_static(lowercase_name(name)), value);
        }
        Ok(map)
    }
}

fn lowercase_name(name: &'static str) -> &'static str {
    match name {
        "Host" => "host",
        "X-Amz-Date" => "x-amz-date",
        "Authorization" => "authorization",
        _ => SECURITY_TOKEN_HEADER,
    }
}

/// Sign an HTTP request with AWS Signature Version 4.
///
/// Only `host` is signed, followed by `x-amz-security-token` when the
/// credentials carry a session token. The query string of `url` is not part of
/// the signature.
///
/// # Errors
/// Returns [`AuthError::InvalidUrl`] if `url` is not an absolute URL with a host.
pub fn sign(
    method: &str,
    url: &str,
    payload: &[u8],
    credentials: &CredentialSet,
    region: &str,
    service: &str,
    now: DateTime<Utc>,
) -> Result<SignedRequest, AuthError> {
    let (host, path) = split_url(url)?;
    let canonical_uri = build_canonical_uri(&path);
    let payload_hash = hash_payload(payload);

    let mut headers = vec![("host".to_owned(), host.clone())];
    let mut signed_headers = vec!["host"];
    if let Some(token) = &credentials.session_token {
        headers.push((SECURITY_TOKEN_HEADER.to_owned(), token.clone()));
        signed_headers.push(SECURITY_TOKEN_HEADER);
    }

    let canonical = CanonicalRequest {
        method,
        uri: canonical_uri.clone(),
        query: String::new(),
        headers,
        payload_hash: &payload_hash,
    };
    let canonical_hash = hex::encode(Sha256::digest(canonical.to_string().as_bytes()));

    let amz_date = format_amz_date(&now);
    let date_stamp = format_date_stamp(&now);
    let scope = credential_scope(&date_stamp, region, service);
    let string_to_sign = build_string_to_sign(&amz_date, &scope, &canonical_hash);

    let signing_key =
        derive_signing_key(&credentials.secret_access_key, &date_stamp, region, service);
    let signature = compute_signature(&signing_key, &string_to_sign);

    let signed_headers_str = canonical.signed_headers();
    debug!(
        host = %host,
        uri = %canonical_uri,
        scope = %scope,
        signed_headers = %signed_headers_str,
        "signed request"
    );

    Ok(SignedRequest {
        method: method.to_owned(),
        canonical_uri,
        host,
        authorization: format!(
            "{ALGORITHM} Credential={}/{scope}, SignedHeaders={signed_headers_str}, Signature={signature}",
            credentials.access_key_id
        ),
        signed_headers,
        payload_hash,
        amz_date,
        session_token: credentials.session_token.clone(),
    })
}

/// Split an absolute URL into its authority and path.
fn split_url(url: &str) -> Result<(String, String), AuthError> {
    let uri: http::Uri = url
        .parse()
        .map_err(|e: http::uri::InvalidUri| AuthError::invalid_url(url, e.to_string()))?;

    if uri.scheme().is_none() {
        return Err(AuthError::invalid_url(url, "missing scheme"));
    }
    let host = uri
        .authority()
        .map(http::uri::Authority::as_str)
        .filter(|h| !h.is_empty())
        .ok_or_else(|| AuthError::invalid_url(url, "missing host"))?;

    Ok((host.to_owned(), uri.path().to_owned()))
}
