//! Lint command - run the pre-flight gate on its own

use clap::Args;
use tracing::info;

use modship_core::error::{ModshipError, WorkflowError};
use modship_lint::PatternLinter;

use super::Project;
use crate::cli::{output, Cli, OutputFormat};

/// Run the pre-flight linter
#[derive(Debug, Args)]
pub struct LintCommand {
    /// Print the active rule table and exit
    #[arg(long)]
    pub list_rules: bool,
}

impl LintCommand {
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(list_rules = self.list_rules, "executing lint command");
        let project = Project::load(cli)?;
        let linter = PatternLinter::new(&project.config.lint).map_err(ModshipError::from)?;

        if self.list_rules {
            for rule in linter.rules() {
                println!("{:<18} {}", rule.category.as_str(), rule.message);
            }
            return Ok(());
        }

        if cli.chatty() {
            output::info(&format!(
                "Linting {}",
                output::path_style().apply_to(project.paths.source_dir.display())
            ));
        }

        let report = linter.lint_tree(&project.paths);

        match cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
            OutputFormat::Text => {
                for violation in &report.violations {
                    output::violation(violation);
                }
                if !cli.quiet {
                    for file in &report.unreadable {
                        output::warning(&format!("Could not read {}", file.display()));
                    }
                    if report.passed() {
                        output::success(&format!(
                            "Lint passed ({} files checked)",
                            report.files_checked
                        ));
                    }
                }
            }
        }

        if !report.passed() {
            return Err(ModshipError::from(WorkflowError::GateFailed {
                violations: report.violations.len(),
            })
            .into());
        }
        Ok(())
    }
}
