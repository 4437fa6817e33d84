//! Hash command - digest of the current release payload

use clap::Args;
use serde::Serialize;
use tracing::info;

use modship_core::{FileSet, IntegrityHasher};

use super::Project;
use crate::cli::{output, Cli, OutputFormat};

/// Print the integrity hash of the release payload as it is on disk
#[derive(Debug, Args)]
pub struct HashCommand {
    /// List the files that feed the digest, in hash order
    #[arg(long)]
    pub files: bool,
}

#[derive(Debug, Serialize)]
struct HashReport<'a> {
    hash: &'a str,
    files_hashed: usize,
    skipped: &'a [String],
    files: Vec<&'a str>,
}

impl HashCommand {
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(files = self.files, "executing hash command");
        let project = Project::load(cli)?;

        let files = FileSet::collect(&project.paths);
        let digest = IntegrityHasher::new().hash(&files)?;

        match cli.format {
            OutputFormat::Json => {
                let report = HashReport {
                    hash: &digest.hex,
                    files_hashed: digest.files_hashed,
                    skipped: &digest.skipped,
                    files: files.entries().iter().map(|e| e.relative.as_str()).collect(),
                };
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
            OutputFormat::Text => {
                if (self.files || cli.verbose) && !cli.quiet {
                    for entry in files.entries() {
                        println!("  {}", output::path_style().apply_to(&entry.relative));
                    }
                    for skipped in &digest.skipped {
                        output::warning(&format!("Skipped unreadable file {}", skipped));
                    }
                }
                println!("{}", digest.hex);
            }
        }
        Ok(())
    }
}
