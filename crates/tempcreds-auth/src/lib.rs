//! AWS Signature Version 4 request signing for tempcreds.
//!
//! This crate builds signed HTTPS GET requests for S3 objects from a set of
//! temporary credentials, without relying on a cloud SDK. It never performs I/O:
//! the caller attaches the returned headers to its own HTTP request.
//!
//! # Overview
//!
//! Only `host` (and `x-amz-security-token` when a session token is present) is
//! signed, and the canonical query string is always empty. Query parameters are
//! therefore never covered by the signature.
//!
//! # Usage
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use tempcreds_auth::signer::sign;
//! use tempcreds_core::CredentialSet;
//!
//! let credentials = CredentialSet {
//!     version: 1,
//!     access_key_id: "AKIDEXAMPLE".to_owned(),
//!     secret_access_key: "wJalrXUtnFEMI/K7MDENG/bPxRfiCYEXAMPLEKEY".to_owned(),
//!     session_token: None,
//!     expiration: Utc.with_ymd_and_hms(2013, 5, 24, 1, 0, 0).unwrap(),
//! };
//! let signed = sign(
//!     "GET",
//!     "https://examplebucket.s3.amazonaws.com/test.txt",
//!     b"",
//!     &credentials,
//!     "us-east-1",
//!     "s3",
//!     Utc.with_ymd_and_hms(2013, 5, 24, 0, 0, 0).unwrap(),
//! )
//! .unwrap();
//! assert!(signed.authorization.starts_with("AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/"));
//! ```
//!
//! # Modules
//!
//! - [`canonical`] - Canonical request construction
//! - [`credentials`] - Secret lookup used by the verifier
//! - [`error`] - Signing and verification error types
//! - [`sigv4`] - Hashing, string-to-sign, and signing-key derivation
//! - [`signer`] - The client-side signed request builder
//! - [`verify`] - Reference SigV4 verifier used to self-check signatures

pub mod canonical;
pub mod credentials;
pub mod error;
pub mod signer;
pub mod sigv4;
pub mod verify;

pub use credentials::{CredentialProvider, StaticCredentialProvider};
pub use error::AuthError;
pub use signer::{SignedRequest, sign};
pub use sigv4::hash_payload;
pub use verify::{AuthResult, verify_sigv4};
