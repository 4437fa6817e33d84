//! Registrar trait

use serde::Serialize;

use crate::error::Result;

/// Release announcement sent to a registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    /// Module slug
    pub module: String,
    /// Released version
    pub version: String,
    /// Lowercase hex SHA-256 of the release payload
    pub hash: String,
}

impl Registration {
    pub fn new(
        module: impl Into<String>,
        version: impl Into<String>,
        hash: impl Into<String>,
    ) -> Self {
        Self {
            module: module.into(),
            version: version.into(),
            hash: hash.into(),
        }
    }
}

/// Successful registration response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationReceipt {
    /// HTTP status code
    pub status: u16,
    /// Raw response body
    pub body: String,
}

/// A destination that release announcements can be sent to
#[async_trait::async_trait]
pub trait Registrar: Send + Sync {
    /// Registrar name for logs and output
    fn name(&self) -> &str;

    /// Whether credentials are configured
    fn is_available(&self) -> bool;

    /// Where announcements are sent
    fn endpoint(&self) -> &str;

    /// Announce a release
    async fn register(&self, registration: &Registration) -> Result<RegistrationReceipt>;
}
