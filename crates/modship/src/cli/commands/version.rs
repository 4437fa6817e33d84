//! Version command

use clap::Args;
use tracing::info;

use modship_core::workflow::format_tag;
use modship_core::{BumpKind, ModuleMetadata, VersionBumper};

use super::Project;
use crate::cli::{output, Cli, OutputFormat};

/// Show the current and next version
#[derive(Debug, Args)]
pub struct VersionCommand {
    /// Show current version only
    #[arg(long)]
    pub current: bool,
}

impl VersionCommand {
    /// Execute the version command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(current = self.current, "executing version command");
        let project = Project::load(cli)?;

        let metadata = ModuleMetadata::load(&project.paths.metadata)?;

        if self.current {
            match cli.format {
                OutputFormat::Json => {
                    let output = serde_json::json!({ "current": metadata.version() });
                    println!("{}", serde_json::to_string_pretty(&output)?);
                }
                OutputFormat::Text => println!("{}", metadata.version()),
            }
            return Ok(());
        }

        let (_, bump) = VersionBumper::new(&project.config).bump(&metadata)?;
        let tag = format_tag(&project.config, &bump.next);

        match cli.format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "module": metadata.slug(),
                    "current": bump.previous,
                    "next": bump.next,
                    "tag": tag,
                    "kind": bump.kind,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Text => {
                if !cli.quiet {
                    println!("{}", output::header("Version Calculation"));
                    println!("{}", output::key_value("Module", metadata.slug()));
                    println!("{}", output::key_value("Current", &bump.previous));
                    println!(
                        "{}",
                        output::key_value(
                            "Next",
                            &output::version_style().apply_to(&bump.next).to_string()
                        )
                    );
                    println!(
                        "{}",
                        output::key_value("Tag", &output::tag_style().apply_to(&tag).to_string())
                    );
                    if bump.kind == BumpKind::Fallback {
                        output::warning(
                            "Current version is not a dotted triple, .1 will be appended",
                        );
                    }
                } else {
                    println!("{}", bump.next);
                }
            }
        }
        Ok(())
    }
}
