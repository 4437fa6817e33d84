//! CLI commands

mod hash;
mod lint;
mod release;
mod version;

pub use hash::HashCommand;
pub use lint::LintCommand;
pub use release::ReleaseCommand;
pub use version::VersionCommand;

use modship_core::config::{load_config_or_default, project_root_for, Config, ProjectPaths};

use crate::cli::{output, Cli};

/// Configuration and resolved paths for the project in the working directory
pub struct Project {
    pub config: Config,
    pub paths: ProjectPaths,
}

impl Project {
    /// Discover the config file upward from the working directory.
    ///
    /// Paths resolve against the directory holding the config file, or the
    /// working directory when running on defaults.
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        let cwd = std::env::current_dir()?;
        let (config, config_path) = load_config_or_default(&cwd)?;

        let root = config_path
            .as_deref()
            .map(project_root_for)
            .unwrap_or(cwd);
        let paths = config.paths.resolve(&root);

        if cli.verbose && cli.chatty() {
            match &config_path {
                Some(path) => output::info(&format!(
                    "Using configuration {}",
                    output::path_style().apply_to(path.display())
                )),
                None => output::info("No configuration found, using defaults"),
            }
        }

        Ok(Self { config, paths })
    }
}
