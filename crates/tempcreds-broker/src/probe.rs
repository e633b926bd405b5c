//! Discovery of the header convention the credential API accepts.
//!
//! Used once during setup. Methods are tried in [`AuthMethod::PROBE_ORDER`];
//! the first HTTP 200 ends the probe. Its body must hold valid credentials,
//! otherwise the probe fails without trying the remaining methods.

use std::time::Duration;

use secrecy::SecretString;
use tempcreds_core::CredentialSet;
use tempcreds_core::strategy::first_success;
use tracing::{info, warn};

use crate::auth_method::AuthMethod;
use crate::error::BrokerError;
use crate::fetcher::{parse_credentials, request_accepted_body};

/// The bound method and the credentials from its successful response.
#[derive(Debug, Clone)]
pub struct ProbeOutcome {
    /// First method the API accepted.
    pub method: AuthMethod,
    /// Credentials returned by that request.
    pub credentials: CredentialSet,
}

/// Probe `api_url` with `api_key` using each known header convention in turn.
///
/// # Errors
/// Returns [`BrokerError::NoWorkingAuthMethod`] listing every attempt when no
/// method yields a 200, and [`BrokerError::AcceptedInvalidResponse`] when the
/// first 200 carries an unusable body.
pub async fn probe(
    client: &reqwest::Client,
    api_url: &str,
    api_key: &SecretString,
    timeout: Duration,
) -> Result<ProbeOutcome, BrokerError> {
    let result = first_success(&AuthMethod::PROBE_ORDER, |method| async move {
        let outcome = request_accepted_body(client, api_url, *method, api_key, timeout).await;
        if let Err(e) = &outcome {
            warn!(method = %method, error = %e, "authentication method rejected");
        }
        outcome
    })
    .await;

    match result {
        Ok(winner) => {
            let method = *winner.strategy;
            let credentials = parse_credentials(&winner.value).map_err(|source| {
                BrokerError::AcceptedInvalidResponse {
                    url: api_url.to_owned(),
                    method,
                    source,
                }
            })?;
            info!(method = %method, attempt = winner.index + 1, "authentication method found");
            Ok(ProbeOutcome { method, credentials })
        }
        Err(exhausted) => Err(BrokerError::NoWorkingAuthMethod {
            url: api_url.to_owned(),
            attempts: exhausted
                .failures
                .into_iter()
                .map(|(method, e)| (*method, e))
                .collect(),
        }),
    }
}
