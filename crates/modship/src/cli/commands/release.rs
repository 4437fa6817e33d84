//! Release command

use clap::Args;
use tracing::{info, warn};

use modship_core::{ReleaseOptions, ReleaseSummary};
use modship_git::{GitPublisher, VcsPublisher};
use modship_registry::{Credentials, EnvFile, Registrar, RegistryClient};

use super::Project;
use crate::cli::{output, Cli, OutputFormat};
use crate::pipeline::{Collaborator, Pipeline};

/// Create a new release
#[derive(Debug, Default, Args)]
pub struct ReleaseCommand {
    /// Skip git operations (commit, tag, push)
    #[arg(long)]
    pub no_git: bool,

    /// Skip registration with the module registry
    #[arg(long)]
    pub no_register: bool,
}

impl ReleaseCommand {
    /// Execute the release command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(
            simulate = cli.simulate,
            no_git = self.no_git,
            no_register = self.no_register,
            "executing release command"
        );
        let Project { config, paths } = Project::load(cli)?;

        let options = ReleaseOptions {
            simulate: cli.simulate,
            skip_git: self.no_git,
            skip_register: self.no_register,
        };

        // Only open the repository when the git stage will touch it
        let mut publisher: Collaborator<GitPublisher> =
            if options.simulate || options.skip_git || !config.git.enabled {
                Err("not opened".to_string())
            } else {
                GitPublisher::discover(&paths.root, config.git.remote.clone()).map_err(|e| {
                    warn!(error = %e, "could not open git repository");
                    e.to_string()
                })
            };

        let registrar: Collaborator<RegistryClient> =
            if options.skip_register || !config.registry.enabled {
                Err("not configured".to_string())
            } else {
                EnvFile::load(&paths.credentials)
                    .and_then(|env| {
                        let credentials = Credentials::lookup(
                            &env,
                            &config.registry.user_key,
                            &config.registry.password_key,
                        );
                        RegistryClient::from_config(&config.registry, credentials)
                    })
                    .map_err(|e| e.to_string())
            };

        let vcs: Collaborator<&mut dyn VcsPublisher> = match &mut publisher {
            Ok(publisher) => Ok(publisher as &mut dyn VcsPublisher),
            Err(reason) => Err(reason.clone()),
        };
        let registrar: Collaborator<&dyn Registrar> = match &registrar {
            Ok(client) => Ok(client as &dyn Registrar),
            Err(reason) => Err(reason.clone()),
        };

        let pipeline = Pipeline::new(&config, &paths, options).quiet(!cli.chatty());
        let rt = tokio::runtime::Runtime::new()?;
        let summary = rt.block_on(pipeline.run(vcs, registrar))?;

        match cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            }
            OutputFormat::Text => {
                if !cli.quiet {
                    print_summary(&summary);
                }
            }
        }

        Ok(())
    }
}

fn print_summary(summary: &ReleaseSummary) {
    println!();
    println!("{}", output::header("Release Summary"));
    println!("{}", output::key_value("Module", &summary.module));
    println!(
        "{}",
        output::key_value(
            "Version",
            &format!(
                "{} → {}",
                summary.previous_version,
                output::version_style().apply_to(&summary.version)
            )
        )
    );
    println!(
        "{}",
        output::key_value("Tag", &output::tag_style().apply_to(&summary.tag).to_string())
    );
    println!("{}", output::key_value("Hash", &summary.hash));
    println!("{}", output::key_value("Git", &output::outcome(&summary.vcs)));
    println!(
        "{}",
        output::key_value("Registration", &output::outcome(&summary.registration))
    );
    println!();

    if summary.simulated {
        output::success(&format!(
            "Simulation complete. Version {} would be released.",
            output::version_style().apply_to(&summary.version)
        ));
    } else if summary.warnings.is_empty() {
        output::success(&format!(
            "Released version {}",
            output::version_style().apply_to(&summary.version)
        ));
    } else {
        output::success(&format!(
            "Released version {} with {} warning(s)",
            output::version_style().apply_to(&summary.version),
            summary.warnings.len()
        ));
    }
}
