//! Core types, configuration, and secret handling for tempcreds.
//!
//! This crate provides the building blocks shared by the signer, the credential
//! broker, and the CLI: the [`CredentialSet`] issued by the credential API,
//! lenient UTC expiration parsing, the [`SecretRef`] indirection used to keep API
//! keys out of configuration files, and environment-driven [`ToolConfig`].

mod config;
mod credentials;
mod error;
pub mod expiration;
mod secret;
pub mod strategy;
mod types;

pub use config::ToolConfig;
pub use credentials::CredentialSet;
pub use error::CoreError;
pub use secret::SecretRef;
pub use types::{AwsRegion, ProfileName};
