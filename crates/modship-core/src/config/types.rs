//! Configuration types

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration for modship
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Project name (display only; the registry uses the metadata slug)
    pub name: Option<String>,

    /// File locations
    pub paths: PathsConfig,

    /// Pre-flight linter configuration
    pub lint: LintConfig,

    /// Versioning configuration
    pub versioning: VersioningConfig,

    /// Git configuration
    pub git: GitConfig,

    /// Release registry configuration
    pub registry: RegistryConfig,

    /// Release notes configuration
    pub release_notes: ReleaseNotesConfig,
}

/// Locations of the release inputs and outputs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Module metadata record
    pub metadata: PathBuf,

    /// Source tree that is linted and hashed
    pub source_dir: PathBuf,

    /// Rendered release notes
    pub release_notes: PathBuf,

    /// KEY=VALUE credentials file for the registry
    pub credentials: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            metadata: PathBuf::from("module.json"),
            source_dir: PathBuf::from("src"),
            release_notes: PathBuf::from("release.md"),
            credentials: PathBuf::from(".env"),
        }
    }
}

impl PathsConfig {
    /// Resolve every path against the project root
    pub fn resolve(&self, root: &Path) -> ProjectPaths {
        ProjectPaths {
            root: root.to_path_buf(),
            metadata: root.join(&self.metadata),
            source_dir: root.join(&self.source_dir),
            release_notes: root.join(&self.release_notes),
            credentials: root.join(&self.credentials),
        }
    }
}

/// Absolute paths for one project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPaths {
    pub root: PathBuf,
    pub metadata: PathBuf,
    pub source_dir: PathBuf,
    pub release_notes: PathBuf,
    pub credentials: PathBuf,
}

/// Linter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LintConfig {
    /// Whether the pre-flight gate runs at all
    pub enabled: bool,

    /// File extensions that are linted (without the dot)
    pub extensions: Vec<String>,

    /// File name of the network proxy wrapper that may call the network directly
    pub proxy_file: String,

    /// Additional rules appended to the built-in table
    #[serde(default)]
    pub extra_rules: Vec<ExtraRuleConfig>,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            extensions: vec!["php".to_string()],
            proxy_file: "ProxyRequest.php".to_string(),
            extra_rules: Vec::new(),
        }
    }
}

/// A user-supplied lint rule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtraRuleConfig {
    /// Category name, e.g. "FORBIDDEN_CALL"
    pub category: String,

    /// Regex that triggers the rule
    pub pattern: String,

    /// Regex that suppresses the rule when found on the same line
    #[serde(default)]
    pub mitigation: Option<String>,

    /// Message shown with the violation
    pub message: String,

    /// Skip comment lines
    #[serde(default)]
    pub code_only: bool,
}

/// Versioning configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VersioningConfig {
    /// Tag format (e.g., "v{version}")
    pub tag_format: String,

    /// Architecture tag stamped into `system.architecture` on bump
    pub architecture: Option<String>,
}

impl Default for VersioningConfig {
    fn default() -> Self {
        Self {
            tag_format: "v{version}".to_string(),
            architecture: None,
        }
    }
}

/// Git configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitConfig {
    /// Whether to commit, tag and push
    pub enabled: bool,

    /// Remote name
    pub remote: String,

    /// Commit message template
    pub commit_message: String,

    /// Whether to push after tagging
    pub push: bool,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            remote: "origin".to_string(),
            commit_message: "Release {tag}".to_string(),
            push: true,
        }
    }
}

/// Remote release registry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Whether to register the release
    pub enabled: bool,

    /// Registration endpoint
    pub endpoint: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Credentials file key holding the registry user
    pub user_key: String,

    /// Credentials file key holding the registry secret
    pub password_key: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: "https://zentrale.kiwerke.com/api/v1/register".to_string(),
            timeout_secs: 10,
            user_key: "KIW_CENTRAL_USER".to_string(),
            password_key: "KIW_CENTRAL_PASS".to_string(),
        }
    }
}

/// Release notes configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleaseNotesConfig {
    /// CMS the module targets, shown in the notes
    pub cms: String,
}

impl Default for ReleaseNotesConfig {
    fn default() -> Self {
        Self {
            cms: "WordPress".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_resolve_against_root() {
        let paths = PathsConfig::default().resolve(Path::new("/work/plugin"));
        assert_eq!(paths.metadata, PathBuf::from("/work/plugin/module.json"));
        assert_eq!(paths.source_dir, PathBuf::from("/work/plugin/src"));
        assert_eq!(paths.credentials, PathBuf::from("/work/plugin/.env"));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: Config = toml::from_str("[git]\nremote = \"upstream\"\n").unwrap();
        assert_eq!(config.git.remote, "upstream");
        assert!(config.git.push);
        assert_eq!(config.lint.extensions, vec!["php"]);
        assert_eq!(config.registry.timeout_secs, 10);
    }
}
