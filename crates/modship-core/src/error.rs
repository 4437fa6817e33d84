//! Error types for modship

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using ModshipError
pub type Result<T> = std::result::Result<T, ModshipError>;

/// Main error type for modship operations
#[derive(Debug, Error)]
pub enum ModshipError {
    /// Configuration-related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Module metadata errors
    #[error(transparent)]
    Metadata(#[from] MetadataError),

    /// Version-related errors
    #[error(transparent)]
    Version(#[from] VersionError),

    /// Linter errors
    #[error(transparent)]
    Lint(#[from] LintError),

    /// Git-related errors
    #[error(transparent)]
    Git(#[from] GitError),

    /// Workflow-related errors
    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ModshipError {
    /// Whether this error belongs to the configuration class (fatal before any mutation)
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::Config(_) | Self::Metadata(_) | Self::Version(_)
        )
    }
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found at {0}")]
    NotFound(PathBuf),

    /// Invalid configuration value
    #[error("Invalid configuration: {field} - {message}")]
    InvalidValue { field: String, message: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// IO error
    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),
}

/// Module metadata errors
#[derive(Debug, Error)]
pub enum MetadataError {
    /// Metadata file does not exist
    #[error("Module metadata not found at {0}")]
    NotFound(PathBuf),

    /// Metadata file is not valid JSON or has the wrong shape
    #[error("Failed to parse module metadata {path}: {reason}")]
    ParseFailed { path: PathBuf, reason: String },

    /// A required field is absent
    #[error("Module metadata is missing required field: {0}")]
    MissingField(String),

    /// Failed to write the metadata back
    #[error("Failed to write module metadata {path}: {reason}")]
    WriteFailed { path: PathBuf, reason: String },
}

/// Version-related errors
#[derive(Debug, Error)]
pub enum VersionError {
    /// Failed to parse version
    #[error("Failed to parse version '{0}': {1}")]
    ParseFailed(String, String),
}

/// Linter errors
#[derive(Debug, Error)]
pub enum LintError {
    /// A rule pattern failed to compile
    #[error("Invalid pattern for rule {rule}: {reason}")]
    InvalidPattern { rule: String, reason: String },

    /// Unknown rule category in configuration
    #[error("Unknown lint category: {0}")]
    UnknownCategory(String),
}

/// Git-related errors
#[derive(Debug, Error)]
pub enum GitError {
    /// Not a git repository
    #[error("Not a git repository: {0}")]
    NotARepository(PathBuf),

    /// Failed to open repository
    #[error("Failed to open repository: {0}")]
    OpenFailed(String),

    /// Nothing staged for the release commit
    #[error("Nothing to commit")]
    NothingToCommit,

    /// Tag already exists
    #[error("Tag already exists: {0}")]
    TagExists(String),

    /// Failed to push
    #[error("Failed to push to remote: {0}")]
    PushFailed(String),

    /// Remote not found
    #[error("Remote not found: {0}")]
    RemoteNotFound(String),

    /// Git CLI invocation failed to start
    #[error("Failed to run git: {0}")]
    CommandFailed(String),

    /// Git2 library error
    #[error("Git error: {0}")]
    Git2(#[from] git2::Error),
}

/// Workflow-related errors
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// The pre-flight linter found violations
    #[error("Linter failed with {violations} violation(s)")]
    GateFailed { violations: usize },
}
