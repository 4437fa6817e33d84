//! Publishing seam between the release pipeline and version control

use std::path::{Path, PathBuf};

use tracing::{debug, instrument, warn};

use crate::repository::{GitRepo, Result};

/// What happened when publishing to the remote
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushOutcome {
    /// HEAD and tags reached the remote
    Pushed { remote: String },
    /// The remote is not configured; the commit and tag stay local
    NoRemote { remote: String },
}

/// Version control operations the release pipeline needs.
///
/// Implemented over git by [`GitPublisher`]; tests substitute a recorder.
pub trait VcsPublisher {
    /// Stage every change in the working tree
    fn stage_all(&mut self) -> Result<()>;

    /// Commit the staged changes
    fn commit(&mut self, message: &str) -> Result<()>;

    /// Tag the new commit
    fn tag(&mut self, name: &str) -> Result<()>;

    /// Push HEAD and tags, if there is somewhere to push to
    fn push(&mut self) -> Result<PushOutcome>;
}

/// [`VcsPublisher`] backed by a local git repository.
///
/// Staging is limited to the project's subtree so a plugin living inside a
/// larger repository never commits its neighbours' changes.
pub struct GitPublisher {
    repo: GitRepo,
    remote: String,
    subtree: PathBuf,
}

impl GitPublisher {
    /// Discover the repository containing `project_root`
    pub fn discover(project_root: &Path, remote: impl Into<String>) -> Result<Self> {
        let repo = GitRepo::discover(project_root)?;
        let subtree = repo.relative_path(project_root)?;
        debug!(subtree = %subtree.display(), "project location inside repository");
        Ok(Self {
            repo,
            remote: remote.into(),
            subtree,
        })
    }

    /// Publisher for the whole working tree of `repo`
    pub fn new(repo: GitRepo, remote: impl Into<String>) -> Self {
        Self {
            repo,
            remote: remote.into(),
            subtree: PathBuf::new(),
        }
    }

    pub fn repo(&self) -> &GitRepo {
        &self.repo
    }
}

impl VcsPublisher for GitPublisher {
    fn stage_all(&mut self) -> Result<()> {
        self.repo.stage(&self.subtree).map(|_| ())
    }

    fn commit(&mut self, message: &str) -> Result<()> {
        self.repo.commit(message).map(|_| ())
    }

    fn tag(&mut self, name: &str) -> Result<()> {
        self.repo.create_tag(name).map(|_| ())
    }

    #[instrument(skip(self), fields(remote = %self.remote))]
    fn push(&mut self) -> Result<PushOutcome> {
        if !self.repo.has_remote(&self.remote)? {
            warn!(remote = %self.remote, "remote not configured, skipping push");
            return Ok(PushOutcome::NoRemote {
                remote: self.remote.clone(),
            });
        }

        self.repo.push_with_tags(&self.remote)?;
        Ok(PushOutcome::Pushed {
            remote: self.remote.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{index_paths, init_repo};
    use git2::Repository;
    use std::process::Command;

    #[test]
    fn test_publish_without_remote() {
        let temp = init_repo();
        std::fs::write(temp.path().join("module.json"), "{\"version\": \"1.0.1\"}").unwrap();

        let mut publisher = GitPublisher::discover(temp.path(), "origin").unwrap();
        publisher.stage_all().unwrap();
        publisher.commit("Release v1.0.1").unwrap();
        publisher.tag("v1.0.1").unwrap();

        assert_eq!(
            publisher.push().unwrap(),
            PushOutcome::NoRemote {
                remote: "origin".to_string()
            }
        );
        assert!(publisher.repo().tag_exists("v1.0.1").unwrap());
    }

    #[test]
    fn test_publish_from_plugin_inside_larger_repository() {
        let temp = init_repo();
        let plugin = temp.path().join("plugins/demo");
        std::fs::create_dir_all(&plugin).unwrap();
        std::fs::create_dir_all(temp.path().join("unrelated")).unwrap();
        std::fs::write(plugin.join("module.json"), "{\"version\": \"1.0.1\"}").unwrap();
        std::fs::write(temp.path().join("unrelated/wip.txt"), "work in progress").unwrap();

        let mut publisher = GitPublisher::discover(&plugin, "origin").unwrap();
        publisher.stage_all().unwrap();
        publisher.commit("Release v1.0.1").unwrap();
        publisher.tag("v1.0.1").unwrap();

        assert_eq!(index_paths(temp.path()), vec!["plugins/demo/module.json"]);
        let head = publisher.repo().head_commit().unwrap().unwrap();
        let tree = head.tree().unwrap();
        assert!(tree.get_path(Path::new("plugins/demo/module.json")).is_ok());
        assert!(tree.get_path(Path::new("unrelated/wip.txt")).is_err());
    }

    #[test]
    fn test_push_to_local_bare_remote() {
        // Requires a git binary on PATH
        if Command::new("git").arg("--version").output().is_err() {
            return;
        }

        let remote_dir = tempfile::TempDir::new().unwrap();
        Repository::init_bare(remote_dir.path()).unwrap();

        let temp = init_repo();
        let raw = Repository::open(temp.path()).unwrap();
        raw.remote("origin", &remote_dir.path().to_string_lossy())
            .unwrap();
        std::fs::write(temp.path().join("module.json"), "{}").unwrap();

        let mut publisher = GitPublisher::discover(temp.path(), "origin").unwrap();
        publisher.stage_all().unwrap();
        publisher.commit("Release v0.0.1").unwrap();
        publisher.tag("v0.0.1").unwrap();

        assert!(matches!(publisher.push().unwrap(), PushOutcome::Pushed { .. }));
        let bare = Repository::open_bare(remote_dir.path()).unwrap();
        assert!(bare.find_reference("refs/tags/v0.0.1").is_ok());
    }
}
