//! HTTP registration client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, instrument};

use modship_core::config::RegistryConfig;

use crate::credentials::Credentials;
use crate::error::{RegistryError, Result};
use crate::traits::{Registrar, Registration, RegistrationReceipt};

/// Posts `{module, version, hash}` as JSON with basic auth
pub struct RegistryClient {
    endpoint: String,
    timeout_secs: u64,
    credentials: Option<Credentials>,
    client: Client,
}

impl RegistryClient {
    /// Build a client from configuration. Missing credentials are allowed
    /// here and reported when [`Registrar::register`] is called.
    pub fn from_config(config: &RegistryConfig, credentials: Option<Credentials>) -> Result<Self> {
        Self::new(&config.endpoint, config.timeout_secs, credentials)
    }

    pub fn new(
        endpoint: impl Into<String>,
        timeout_secs: u64,
        credentials: Option<Credentials>,
    ) -> Result<Self> {
        if timeout_secs == 0 {
            return Err(RegistryError::ConfigurationError(
                "timeout must be at least one second".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(concat!("modship/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            endpoint: endpoint.into(),
            timeout_secs,
            credentials,
            client,
        })
    }
}

#[async_trait]
impl Registrar for RegistryClient {
    fn name(&self) -> &str {
        "registry"
    }

    fn is_available(&self) -> bool {
        self.credentials.is_some()
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    #[instrument(skip(self, registration), fields(module = %registration.module, version = %registration.version))]
    async fn register(&self, registration: &Registration) -> Result<RegistrationReceipt> {
        let credentials = self.credentials.as_ref().ok_or_else(|| {
            RegistryError::MissingCredentials("registry user or password not set".to_string())
        })?;

        let start = std::time::Instant::now();
        debug!(endpoint = %self.endpoint, "sending registration");

        let response = self
            .client
            .post(&self.endpoint)
            .basic_auth(&credentials.username, Some(&credentials.password))
            .json(registration)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RegistryError::Timeout(self.timeout_secs)
                } else {
                    RegistryError::Http(e)
                }
            })?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(RegistryError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        debug!(body = %body, "registry response");
        info!(
            status = status.as_u16(),
            duration_ms = start.elapsed().as_millis(),
            "release registered"
        );
        Ok(RegistrationReceipt {
            status: status.as_u16(),
            body,
        })
    }
}
