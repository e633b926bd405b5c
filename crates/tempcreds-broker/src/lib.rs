//! Credential broker for tempcreds.
//!
//! Obtains short-lived AWS credentials from an API-key-protected HTTP endpoint,
//! caches them in a JSON file, and re-serves the cache until shortly before it
//! expires.
//!
//! # Modules
//!
//! - [`auth_method`] - Header conventions for presenting the API key
//! - [`broker`] - Cache-or-fetch credential resolution
//! - [`cache`] - The on-disk cache record
//! - [`config`] - Persisted per-profile configuration
//! - [`fetcher`] - HTTP requests to the credential API
//! - [`probe`] - One-time discovery of the accepted auth method
//! - [`profile`] - `credential_process` entries in the shared credentials file

pub mod auth_method;
pub mod broker;
pub mod cache;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod probe;
pub mod profile;

#[cfg(test)]
mod test_server;

pub use auth_method::AuthMethod;
pub use broker::{CredentialBroker, CredentialOrigin, DEFAULT_EXPIRATION_THRESHOLD, Resolution};
pub use cache::CachedCredentialRecord;
pub use config::ProfileConfig;
pub use error::{BrokerError, BrokerResult, FetchError};
pub use fetcher::{CredentialFetcher, HttpCredentialFetcher};
pub use probe::{ProbeOutcome, probe};
