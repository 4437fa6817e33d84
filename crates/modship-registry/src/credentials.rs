//! Registry credentials
//!
//! Credentials live in a dotenv-style file next to the project (`.env` by
//! default). The process environment is never consulted.

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, instrument};

use crate::error::Result;

/// Parsed `KEY=VALUE` file
#[derive(Debug, Clone, Default)]
pub struct EnvFile {
    values: HashMap<String, String>,
}

impl EnvFile {
    /// Load a file; a missing file yields an empty set
    #[instrument(fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            debug!(path = %path.display(), "no credentials file");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(Self::parse(&content))
    }

    /// Parse `KEY=VALUE` lines.
    ///
    /// Blank lines and `#` comments are skipped, an optional `export ` prefix
    /// is dropped, the value is everything after the first `=` with matching
    /// surrounding quotes removed.
    pub fn parse(content: &str) -> Self {
        let mut values = HashMap::new();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let line = line.strip_prefix("export ").unwrap_or(line);
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            if key.is_empty() {
                continue;
            }
            values.insert(key.to_string(), unquote(value.trim()).to_string());
        }

        Self { values }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Username and password for HTTP basic auth
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Resolve both keys from the credentials file.
    ///
    /// Returns `None` unless both values are present and non-empty.
    pub fn lookup(file: &EnvFile, user_key: &str, password_key: &str) -> Option<Self> {
        let resolve = |key: &str| file.get(key).filter(|v| !v.is_empty()).map(str::to_string);

        let username = resolve(user_key);
        let password = resolve(password_key);
        debug!(
            user_found = username.is_some(),
            password_found = password.is_some(),
            "resolved registry credentials"
        );
        Some(Self::new(username?, password?))
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}
