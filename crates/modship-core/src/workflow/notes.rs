//! Release notes rendering

use std::path::Path;

use chrono::NaiveDate;
use tracing::info;

use crate::config::Config;
use crate::error::Result;
use crate::walker::normalize;

/// Architecture tag used when neither the config nor the metadata names one
pub const UNSPECIFIED_ARCHITECTURE: &str = "unspecified";

/// Inputs for one rendered release summary
#[derive(Debug, Clone)]
pub struct ReleaseNotes<'a> {
    pub version: &'a str,
    pub digest: &'a str,
    pub date: NaiveDate,
    pub architecture: &'a str,
}

/// Renders and writes the release summary file
pub struct ReleaseNotesWriter<'a> {
    config: &'a Config,
}

impl<'a> ReleaseNotesWriter<'a> {
    /// Create a new writer
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Render the notes as markdown
    pub fn render(&self, notes: &ReleaseNotes<'_>) -> String {
        let metadata = normalize(&self.config.paths.metadata);
        let source_dir = normalize(&self.config.paths.source_dir);

        let mut output = String::new();
        output.push_str("# Release Metadata\n\n");
        output.push_str(&format!("- **Version:** {}\n", notes.version));
        output.push_str(&format!("- **Date:** {}\n", notes.date.format("%Y-%m-%d")));
        output.push_str(&format!("- **Build Hash (SHA-256):** {}\n", notes.digest));
        output.push_str(&format!("- **Architecture:** {}\n", notes.architecture));
        output.push_str(&format!("- **CMS:** {}\n", self.config.release_notes.cms));
        output.push('\n');
        output.push_str("## Integrity\n");
        output.push_str("The SHA-256 hash above is calculated over:\n");
        output.push_str(&format!("- `{}`\n", metadata));
        output.push_str(&format!("- `{}/**/*`\n", source_dir.trim_end_matches('/')));
        output.push('\n');
        output.push_str("## Changelog\n");
        output.push_str(&format!("- **[UPDATE]** Version bump to {}.\n", notes.version));
        output
    }

    /// Render and write the notes, replacing any previous file
    pub fn write(&self, path: &Path, notes: &ReleaseNotes<'_>) -> Result<String> {
        let content = self.render(notes);
        std::fs::write(path, &content)?;
        info!(path = %path.display(), version = notes.version, "wrote release notes");
        Ok(content)
    }
}

/// Pick the architecture tag: configured, else recorded in metadata, else unspecified
pub fn resolve_architecture<'a>(config: &'a Config, recorded: Option<&'a str>) -> &'a str {
    config
        .versioning
        .architecture
        .as_deref()
        .or(recorded)
        .unwrap_or(UNSPECIFIED_ARCHITECTURE)
}
