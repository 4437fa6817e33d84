//! Remote operations

use std::path::Path;
use std::process::{Command, Output};

use tracing::{info, instrument};

use modship_core::error::GitError;

use crate::repository::{GitRepo, Result};

impl GitRepo {
    /// Configured remote names
    pub fn remotes(&self) -> Result<Vec<String>> {
        let remotes = self.repo.remotes()?;
        Ok(remotes
            .iter()
            .filter_map(|r| r.map(|s| s.to_string()))
            .collect())
    }

    /// Check if a remote exists
    pub fn has_remote(&self, name: &str) -> Result<bool> {
        Ok(self.remotes()?.iter().any(|r| r == name))
    }

    /// Push HEAD and all tags to `remote` through the git CLI
    #[instrument(skip(self))]
    pub fn push_with_tags(&self, remote: &str) -> Result<()> {
        if !self.has_remote(remote)? {
            return Err(GitError::RemoteNotFound(remote.to_string()));
        }

        let output = git_push_with_tags(self.path(), remote)
            .map_err(|e| GitError::CommandFailed(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GitError::PushFailed(stderr.trim().to_string()));
        }
        Ok(())
    }
}

/// Run `git push <remote> HEAD --tags` in `workdir`
#[instrument(fields(workdir = %workdir.display()))]
fn git_push_with_tags(workdir: &Path, remote: &str) -> std::io::Result<Output> {
    let start = std::time::Instant::now();
    let output = Command::new("git")
        .current_dir(workdir)
        .args(["push", remote, "HEAD", "--tags"])
        .output()?;
    info!(
        remote,
        duration_ms = start.elapsed().as_millis(),
        success = output.status.success(),
        "git push with tags (CLI)"
    );
    Ok(output)
}
