//! modship registry - announce releases to the central module registry
//!
//! Registration is the last step of a release and is never fatal: callers
//! downgrade every [`RegistryError`] to a warning.
//!
//! ## Usage
//!
//! ```ignore
//! use modship_registry::{Credentials, EnvFile, Registrar, Registration, RegistryClient};
//!
//! let env = EnvFile::load(&paths.credentials)?;
//! let credentials = Credentials::lookup(&env, "KIW_CENTRAL_USER", "KIW_CENTRAL_PASS");
//! let client = RegistryClient::from_config(&config.registry, credentials)?;
//! client.register(&Registration::new("my-plugin", "1.2.4", digest)).await?;
//! ```

pub mod client;
pub mod credentials;
pub mod error;
pub mod traits;

pub use client::RegistryClient;
pub use credentials::{Credentials, EnvFile};
pub use error::{RegistryError, Result};
pub use traits::{Registrar, Registration, RegistrationReceipt};
