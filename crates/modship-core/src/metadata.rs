//! Module metadata record (`module.json`)
//!
//! The file is kept as an ordered JSON object so a rewrite only touches the
//! fields the release changes; key order and unknown fields survive.

use std::path::Path;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info, instrument};

use crate::error::{MetadataError, Result};

/// Slug reported when the metadata does not carry one
pub const UNKNOWN_SLUG: &str = "unknown";

/// Module metadata: the raw document plus a typed view of the fields a
/// release reads
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleMetadata {
    version: String,
    slug: Option<String>,
    document: Map<String, Value>,
}

impl ModuleMetadata {
    /// Create metadata with a version and slug
    pub fn new(version: impl Into<String>, slug: impl Into<String>) -> Self {
        let version = version.into();
        let slug = slug.into();
        let mut document = Map::new();
        document.insert("version".to_string(), Value::String(version.clone()));
        document.insert("slug".to_string(), Value::String(slug.clone()));
        Self {
            version,
            slug: Some(slug),
            document,
        }
    }

    /// Load metadata from path
    #[instrument(fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(MetadataError::NotFound(path.to_path_buf()).into());
        }

        let content = std::fs::read_to_string(path)?;
        let metadata = Self::parse(&content).map_err(|e| match e {
            MetadataError::ParseFailed { reason, .. } => MetadataError::ParseFailed {
                path: path.to_path_buf(),
                reason,
            },
            other => other,
        })?;

        debug!(version = %metadata.version, slug = metadata.slug(), "loaded module metadata");
        Ok(metadata)
    }

    /// Parse metadata from JSON text
    pub fn parse(content: &str) -> std::result::Result<Self, MetadataError> {
        let parse_failed = |reason: String| MetadataError::ParseFailed {
            path: Default::default(),
            reason,
        };

        let document = match serde_json::from_str::<Value>(content) {
            Ok(Value::Object(document)) => document,
            Ok(_) => return Err(parse_failed("expected a JSON object".to_string())),
            Err(e) => return Err(parse_failed(e.to_string())),
        };

        let version = match document.get("version") {
            Some(Value::String(version)) => version.clone(),
            Some(_) => return Err(parse_failed("`version` must be a string".to_string())),
            None => return Err(MetadataError::MissingField("version".to_string())),
        };
        let slug = match document.get("slug") {
            Some(Value::String(slug)) => Some(slug.clone()),
            Some(Value::Null) | None => None,
            Some(_) => return Err(parse_failed("`slug` must be a string".to_string())),
        };

        Ok(Self {
            version,
            slug,
            document,
        })
    }

    /// Dotted version string
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Replace the version in place, keeping its position in the document
    pub fn set_version(&mut self, version: impl Into<String>) {
        self.version = version.into();
        self.document
            .insert("version".to_string(), Value::String(self.version.clone()));
    }

    /// Module slug, or `"unknown"`
    pub fn slug(&self) -> &str {
        self.slug.as_deref().unwrap_or(UNKNOWN_SLUG)
    }

    /// Whether the document has a `system` object
    pub fn has_system(&self) -> bool {
        matches!(self.document.get("system"), Some(Value::Object(_)))
    }

    /// Architecture recorded in the system block
    pub fn architecture(&self) -> Option<&str> {
        self.document.get("system")?.get("architecture")?.as_str()
    }

    /// Write `system.architecture`; returns false when there is no `system` object
    pub fn set_architecture(&mut self, architecture: impl Into<String>) -> bool {
        match self.document.get_mut("system") {
            Some(Value::Object(system)) => {
                system.insert(
                    "architecture".to_string(),
                    Value::String(architecture.into()),
                );
                true
            }
            _ => false,
        }
    }

    /// Render as pretty-printed JSON with four-space indentation and a trailing newline
    pub fn to_pretty_json(&self) -> Result<String> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.document.serialize(&mut ser)?;

        let mut content = String::from_utf8_lossy(&buf).into_owned();
        content.push('\n');
        Ok(content)
    }

    /// Save metadata to path, replacing the previous content
    #[instrument(skip(self), fields(path = %path.display(), version = %self.version))]
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = self.to_pretty_json()?;
        std::fs::write(path, content).map_err(|e| MetadataError::WriteFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        info!(path = %path.display(), version = %self.version, "wrote module metadata");
        Ok(())
    }
}
