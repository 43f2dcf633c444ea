//! Credential validation command implementation.

use crate::config::Config;
use crate::credentials::{validate_credentials, validate_with_client};
use crate::etilbud::OfferClient;
use anyhow::Result;

/// Checks that the configured API credentials are accepted.
pub struct ValidateCommand {
    config: Config,
}

impl ValidateCommand {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Runs the probe against the configured endpoint.
    pub async fn execute(&self) -> Result<String> {
        let credentials = self.config.credentials()?;
        Self::verdict(validate_credentials(&self.config, credentials).await)
    }

    /// Runs the probe with a provided client (for testing).
    pub async fn execute_with_client(&self, client: &OfferClient) -> Result<String> {
        Self::verdict(validate_with_client(client).await)
    }

    fn verdict(valid: bool) -> Result<String> {
        if !valid {
            anyhow::bail!("Authentication failed: the API did not accept the credentials");
        }
        Ok("Credentials OK".to_string())
    }
}
