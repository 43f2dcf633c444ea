//! API credentials and the lightweight credential probe.

use crate::config::Config;
use crate::error::OfferError;
use crate::etilbud::OfferClient;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

/// API key and secret sent with every request.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub api_key: String,
    pub api_secret: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self { api_key: api_key.into(), api_secret: api_secret.into() }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

/// Checks credentials with a one-result search.
///
/// Uses its own short-lived session. Returns false on a 401, any other
/// error status, or a connection failure.
pub async fn validate_credentials(config: &Config, credentials: Credentials) -> bool {
    let client = OfferClient::new(config, credentials);
    validate_with_client(&client).await
}

/// Runs the probe with a provided client (for testing).
pub async fn validate_with_client(client: &OfferClient) -> bool {
    debug!("Probing credentials against {}", client.base_url());
    let result = client.probe().await;
    client.close();

    match result {
        Ok(()) => {
            info!("API credentials accepted");
            true
        }
        Err(e @ OfferError::Status { .. }) if e.is_auth() => {
            warn!("Invalid API credentials");
            false
        }
        Err(OfferError::Status { status }) => {
            warn!("HTTP error during credential validation: {}", status);
            false
        }
        Err(e) => {
            warn!("Connection error during credential validation: {}", e);
            false
        }
    }
}
