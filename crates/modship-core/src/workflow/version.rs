//! Version bump operations

use std::path::Path;

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::config::Config;
use crate::error::{Result, VersionError};
use crate::metadata::ModuleMetadata;

/// How the next version was derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BumpKind {
    /// `a.b.c` became `a.b.(c+1)`
    Patch,
    /// Version was not a triple; `.1` was appended
    Fallback,
}

/// Result of a version bump
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionBump {
    /// Version before the bump
    pub previous: String,
    /// Version after the bump
    pub next: String,
    /// How `next` was derived
    pub kind: BumpKind,
}

fn parse_component(version: &str, part: &str) -> Result<u64> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(VersionError::ParseFailed(
            version.to_string(),
            format!("'{}' is not a non-negative integer", part),
        )
        .into());
    }

    part.parse::<u64>()
        .map_err(|e| VersionError::ParseFailed(version.to_string(), e.to_string()).into())
}

/// Increment the patch component of a dotted version.
///
/// A version that does not split into exactly three parts gets `.1` appended
/// instead of failing. A three-part version whose components are not all
/// non-negative integers is an error.
pub fn bump_patch(version: &str) -> Result<VersionBump> {
    let parts: Vec<&str> = version.split('.').collect();

    if parts.len() != 3 {
        let next = format!("{}.1", version);
        warn!(previous = version, next = %next, "version is not a dotted triple, appending .1");
        return Ok(VersionBump {
            previous: version.to_string(),
            next,
            kind: BumpKind::Fallback,
        });
    }

    parse_component(version, parts[0])?;
    parse_component(version, parts[1])?;
    let patch = parse_component(version, parts[2])?;
    let patch = patch.checked_add(1).ok_or_else(|| {
        VersionError::ParseFailed(version.to_string(), "patch component overflows".to_string())
    })?;

    let next = format!("{}.{}.{}", parts[0], parts[1], patch);
    debug!(previous = version, next = %next, "bumped patch version");
    Ok(VersionBump {
        previous: version.to_string(),
        next,
        kind: BumpKind::Patch,
    })
}

/// Bumps the metadata version and persists it
pub struct VersionBumper<'a> {
    config: &'a Config,
}

impl<'a> VersionBumper<'a> {
    /// Create a new bumper
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Compute the bumped metadata without touching storage.
    ///
    /// When an architecture tag is configured and the metadata carries a
    /// `system` block, the tag is stamped into `system.architecture`.
    pub fn bump(&self, metadata: &ModuleMetadata) -> Result<(ModuleMetadata, VersionBump)> {
        let bump = bump_patch(metadata.version())?;

        let mut updated = metadata.clone();
        updated.set_version(bump.next.clone());

        if let Some(arch) = &self.config.versioning.architecture {
            if !updated.set_architecture(arch.clone()) {
                debug!("no system block, architecture not stamped");
            }
        }

        Ok((updated, bump))
    }

    /// Load, bump and rewrite the metadata file
    #[instrument(skip(self), fields(path = %path.display()))]
    pub fn bump_file(&self, path: &Path) -> Result<(ModuleMetadata, VersionBump)> {
        let metadata = ModuleMetadata::load(path)?;
        let (updated, bump) = self.bump(&metadata)?;
        updated.save(path)?;
        info!(previous = %bump.previous, next = %bump.next, "version bumped");
        Ok((updated, bump))
    }
}

/// Format a version tag based on the configuration
pub fn format_tag(config: &Config, version: &str) -> String {
    config.versioning.tag_format.replace("{version}", version)
}

/// Render the release commit message from the configured template
pub fn format_commit_message(
    config: &Config,
    version: &str,
    slug: &str,
    architecture: &str,
) -> String {
    config
        .git
        .commit_message
        .replace("{tag}", &format_tag(config, version))
        .replace("{version}", version)
        .replace("{slug}", slug)
        .replace("{architecture}", architecture)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModshipError;
    use tempfile::TempDir;

    #[test]
    fn test_bump_patch() {
        let bump = bump_patch("1.2.3").unwrap();
        assert_eq!(bump.next, "1.2.4");
        assert_eq!(bump.kind, BumpKind::Patch);
    }

    #[test]
    fn test_bump_patch_carries_over_digits() {
        assert_eq!(bump_patch("0.9.9").unwrap().next, "0.9.10");
        assert_eq!(bump_patch("10.20.99").unwrap().next, "10.20.100");
    }

    #[test]
    fn test_bump_leaves_major_minor_literal() {
        assert_eq!(bump_patch("01.002.3").unwrap().next, "01.002.4");
    }

    #[test]
    fn test_two_part_version_appends_suffix() {
        let bump = bump_patch("1.0").unwrap();
        assert_eq!(bump.next, "1.0.1");
        assert_eq!(bump.kind, BumpKind::Fallback);
    }

    #[test]
    fn test_four_part_version_appends_suffix() {
        assert_eq!(bump_patch("1.2.3.4").unwrap().next, "1.2.3.4.1");
    }

    #[test]
    fn test_non_numeric_triple_is_error() {
        let err = bump_patch("1.2.x").unwrap_err();
        assert!(matches!(err, ModshipError::Version(_)));
        assert!(bump_patch("1.-2.3").is_err());
        assert!(bump_patch("1.2.+3").is_err());
    }

    #[test]
    fn test_bumper_stamps_architecture_only_with_system_block() {
        let mut config = Config::default();
        config.versioning.architecture = Some("v1.1.2".to_string());
        let bumper = VersionBumper::new(&config);

        let plain = ModuleMetadata::new("1.2.3", "demo");
        let (updated, _) = bumper.bump(&plain).unwrap();
        assert!(!updated.has_system());

        let with_system =
            ModuleMetadata::parse(r#"{"version": "1.2.3", "slug": "demo", "system": {}}"#).unwrap();
        let (updated, bump) = bumper.bump(&with_system).unwrap();
        assert_eq!(updated.architecture(), Some("v1.1.2"));
        assert_eq!(updated.version(), "1.2.4");
        assert_eq!(bump.previous, "1.2.3");
    }

    #[test]
    fn test_bump_file_rewrites_metadata() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("module.json");
        std::fs::write(&path, r#"{"version":"1.2.3","slug":"demo"}"#).unwrap();

        let config = Config::default();
        let (_, bump) = VersionBumper::new(&config).bump_file(&path).unwrap();
        assert_eq!(bump.next, "1.2.4");

        let reloaded = ModuleMetadata::load(&path).unwrap();
        assert_eq!(reloaded.version(), "1.2.4");
        assert_eq!(reloaded.slug(), "demo");
    }

    #[test]
    fn test_format_tag() {
        let config = Config::default();
        assert_eq!(format_tag(&config, "1.0.0"), "v1.0.0");
    }

    #[test]
    fn test_format_commit_message() {
        let mut config = Config::default();
        config.git.commit_message = "Release {tag} - Architecture {architecture}".to_string();
        let msg = format_commit_message(&config, "1.2.4", "demo", "v1.1.2");
        assert_eq!(msg, "Release v1.2.4 - Architecture v1.1.2");
    }
}
