//! Signed S3 object download for tempcreds.
//!
//! Resolves an `s3://bucket/key` location into candidate HTTPS endpoints and
//! downloads the object with SigV4-signed GET requests, falling back from one
//! endpoint to the next until one answers with a 2xx status.

pub mod download;
pub mod error;
pub mod location;

pub use download::{Download, ObjectDownloader};
pub use error::ObjectError;
pub use location::ObjectSource;
