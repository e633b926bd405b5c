//! Object locations and the endpoints that can serve them.

use std::fmt;
use std::str::FromStr;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::error::ObjectError;

/// Characters left unescaped in an object key path segment.
const KEY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// What to download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectSource {
    /// `s3://bucket/key`
    S3 {
        /// Bucket name.
        bucket: String,
        /// Object key, without a leading slash.
        key: String,
    },
    /// A fully qualified HTTP(S) URL, used as the only endpoint.
    Url(String),
}

impl ObjectSource {
    /// Endpoints to try, in order.
    ///
    /// For an S3 location: virtual-hosted style, then regional path style.
    ///
    /// # Examples
    ///
    /// ```
    /// use tempcreds_s3::ObjectSource;
    ///
    /// let source: ObjectSource = "s3://my-bucket/cog/a b.tif".parse().unwrap();
    /// assert_eq!(
    ///     source.endpoints("us-west-2"),
    ///     vec![
    ///         "https://my-bucket.s3.amazonaws.com/cog/a%20b.tif".to_owned(),
    ///         "https://s3.us-west-2.amazonaws.com/my-bucket/cog/a%20b.tif".to_owned(),
    ///     ]
    /// );
    /// ```
    #[must_use]
    pub fn endpoints(&self, region: &str) -> Vec<String> {
        match self {
            Self::S3 { bucket, key } => {
                let key = encode_key(key);
                vec![
                    format!("https://{bucket}.s3.amazonaws.com/{key}"),
                    format!("https://s3.{region}.amazonaws.com/{bucket}/{key}"),
                ]
            }
            Self::Url(url) => vec![url.clone()],
        }
    }

    /// Last path segment, used as the default output file name.
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        let path = match self {
            Self::S3 { key, .. } => key.as_str(),
            Self::Url(url) => {
                let without_query = url.split(['?', '#']).next().unwrap_or(url);
                without_query
                    .split_once("://")
                    .and_then(|(_, rest)| rest.split_once('/'))
                    .map_or("", |(_, path)| path)
            }
        };
        path.rsplit('/').next().filter(|name| !name.is_empty())
    }
}

impl FromStr for ObjectSource {
    type Err = ObjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(rest) = s.strip_prefix("s3://") {
            let (bucket, key) = rest
                .split_once('/')
                .ok_or_else(|| ObjectError::InvalidLocation(s.to_owned()))?;
            if bucket.is_empty() || key.is_empty() {
                return Err(ObjectError::InvalidLocation(s.to_owned()));
            }
            return Ok(Self::S3 {
                bucket: bucket.to_owned(),
                key: key.to_owned(),
            });
        }
        if s.starts_with("https://") || s.starts_with("http://") {
            return Ok(Self::Url(s.to_owned()));
        }
        Err(ObjectError::InvalidLocation(s.to_owned()))
    }
}

impl fmt::Display for ObjectSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::S3 { bucket, key } => write!(f, "s3://{bucket}/{key}"),
            Self::Url(url) => f.write_str(url),
        }
    }
}

fn encode_key(key: &str) -> String {
    key.split('/')
        .map(|segment| utf8_percent_encode(segment, KEY_ENCODE_SET).to_string())
        .collect::<Vec<_>>()
        .join("/")
}
