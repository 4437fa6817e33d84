//! CLI definition and command handling

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};

use commands::{HashCommand, LintCommand, ReleaseCommand, VersionCommand};

/// modship - lint, bump, hash, tag and register a plugin release
#[derive(Debug, Parser)]
#[command(name = "modship")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Working directory
    #[arg(short = 'C', long, global = true)]
    pub directory: Option<std::path::PathBuf>,

    /// Print every mutating action instead of performing it
    #[arg(long, visible_alias = "dry-run", global = true)]
    pub simulate: bool,

    /// Defaults to `release`
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Output format for CLI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the full release: lint, bump, hash, notes, git, registry
    Release(ReleaseCommand),

    /// Run the pre-flight linter only
    Lint(LintCommand),

    /// Print the integrity hash of the current release payload
    Hash(HashCommand),

    /// Show the current and next version without writing anything
    Version(VersionCommand),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> anyhow::Result<()> {
        // Change to specified directory if provided
        if let Some(dir) = &self.directory {
            std::env::set_current_dir(dir)?;
        }

        match self.command {
            Some(Commands::Release(ref cmd)) => cmd.execute(&self),
            Some(Commands::Lint(ref cmd)) => cmd.execute(&self),
            Some(Commands::Hash(ref cmd)) => cmd.execute(&self),
            Some(Commands::Version(ref cmd)) => cmd.execute(&self),
            None => ReleaseCommand::default().execute(&self),
        }
    }

    /// Whether human-readable progress should be printed
    pub fn chatty(&self) -> bool {
        !self.quiet && self.format == OutputFormat::Text
    }
}
