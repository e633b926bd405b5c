//! Canonical request construction for AWS Signature Version 4.
//!
//! ```text
//! HTTPRequestMethod\n
//! CanonicalURI\n
//! CanonicalQueryString\n
//! CanonicalHeaders\n\n
//! SignedHeaders\n
//! HashedPayload
//! ```
//!
//! The signer always passes an empty query string. The verifier passes the
//! request's raw query so that it can check signatures produced by other clients.

use std::fmt;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

/// Characters left unescaped in a canonical URI segment: RFC 3986 unreserved.
const URI_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// A canonical request, ready to be hashed into the string to sign.
///
/// Headers are kept in the order given; callers pass them already sorted by
/// lower-cased name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalRequest<'a> {
    /// HTTP method, e.g. `GET`.
    pub method: &'a str,
    /// Canonical URI, see [`build_canonical_uri`].
    pub uri: String,
    /// Canonical query string, see [`build_canonical_query_string`].
    pub query: String,
    /// `(lower-cased name, normalized value)` pairs.
    pub headers: Vec<(String, String)>,
    /// Hex SHA-256 of the request payload.
    pub payload_hash: &'a str,
}

impl CanonicalRequest<'_> {
    /// Semicolon-joined list of the signed header names.
    #[must_use]
    pub fn signed_headers(&self) -> String {
        self.headers
            .iter()
            .map(|(name, _)| name.as_str())
            .collect::<Vec<_>>()
            .join(";")
    }
}

impl fmt::Display for CanonicalRequest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.method)?;
        writeln!(f, "{}", self.uri)?;
        writeln!(f, "{}", self.query)?;
        for (name, value) in &self.headers {
            writeln!(f, "{name}:{value}")?;
        }
        writeln!(f)?;
        writeln!(f, "{}", self.signed_headers())?;
        f.write_str(self.payload_hash)
    }
}

/// Build the canonical URI by URI-encoding each path segment individually.
///
/// Forward slashes are preserved and empty paths become `/`. Segments are
/// decoded before encoding so an already percent-encoded path is not encoded
/// twice.
///
/// # Examples
///
/// ```
/// use tempcreds_auth::canonical::build_canonical_uri;
///
/// assert_eq!(build_canonical_uri(""), "/");
/// assert_eq!(build_canonical_uri("/cog/tile 1.tif"), "/cog/tile%201.tif");
/// assert_eq!(build_canonical_uri("/cog/tile%201.tif"), "/cog/tile%201.tif");
/// ```
#[must_use]
pub fn build_canonical_uri(path: &str) -> String {
    if path.is_empty() || path == "/" {
        return "/".to_owned();
    }

    path.split('/')
        .map(|segment| {
            let decoded = percent_decode_str(segment).decode_utf8_lossy();
            utf8_percent_encode(&decoded, URI_ENCODE_SET).to_string()
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Build the canonical query string by sorting raw `key=value` pairs.
///
/// Values are kept exactly as they appear on the wire, since the signing client
/// chose the encoding.
///
/// # Examples
///
/// ```
/// use tempcreds_auth::canonical::build_canonical_query_string;
///
/// assert_eq!(build_canonical_query_string(""), "");
/// assert_eq!(build_canonical_query_string("b=2&a=1&a"), "a=&a=1&b=2");
/// ```
#[must_use]
pub fn build_canonical_query_string(query: &str) -> String {
    let mut params: Vec<(&str, &str)> = query
        .split('&')
        .filter(|s| !s.is_empty())
        .map(|param| param.split_once('=').unwrap_or((param, "")))
        .collect();
    params.sort_unstable();

    params
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// Normalize a header value: trim, then collapse inner whitespace runs to one space.
#[must_use]
pub fn normalize_header_value(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}
