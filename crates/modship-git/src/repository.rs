//! Repository handle

use std::path::{Path, PathBuf};

use git2::{Repository, Signature};
use tracing::{debug, instrument};

use modship_core::error::GitError;

/// Result type for git operations
pub type Result<T> = std::result::Result<T, GitError>;

/// Committer identity used when the repository has none configured
const FALLBACK_NAME: &str = "modship";
const FALLBACK_EMAIL: &str = "modship@localhost";

/// Git repository wrapper
pub struct GitRepo {
    pub(crate) repo: Repository,
    path: PathBuf,
}

impl GitRepo {
    /// Open the repository whose working tree is exactly `path`
    #[instrument(fields(path = %path.display()))]
    pub fn open(path: &Path) -> Result<Self> {
        let repo = Repository::open(path).map_err(|e| map_open_error(e, path))?;
        debug!(path = %path.display(), "opened git repository");
        Ok(Self {
            path: path.to_path_buf(),
            repo,
        })
    }

    /// Discover and open a repository by searching parent directories
    #[instrument(fields(start_path = %start_path.display()))]
    pub fn discover(start_path: &Path) -> Result<Self> {
        let repo = Repository::discover(start_path).map_err(|e| map_open_error(e, start_path))?;
        let path = repo.workdir().unwrap_or_else(|| repo.path()).to_path_buf();
        debug!(path = %path.display(), "discovered git repository");
        Ok(Self { repo, path })
    }

    /// Working tree root (or the git dir for bare repositories)
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `path` relative to the working tree root; empty for the root itself
    pub fn relative_path(&self, path: &Path) -> Result<PathBuf> {
        let canonical = |p: &Path| {
            p.canonicalize()
                .map_err(|e| GitError::OpenFailed(format!("{}: {}", p.display(), e)))
        };
        let root = canonical(&self.path)?;
        let target = canonical(path)?;

        target
            .strip_prefix(&root)
            .map(Path::to_path_buf)
            .map_err(|_| {
                GitError::OpenFailed(format!(
                    "{} is outside the working tree {}",
                    path.display(),
                    root.display()
                ))
            })
    }

    /// The HEAD commit, or `None` on an unborn branch
    pub fn head_commit(&self) -> Result<Option<git2::Commit<'_>>> {
        match self.repo.head() {
            Ok(head) => Ok(Some(head.peel_to_commit()?)),
            Err(e)
                if e.code() == git2::ErrorCode::UnbornBranch
                    || e.code() == git2::ErrorCode::NotFound =>
            {
                Ok(None)
            }
            Err(e) => Err(GitError::Git2(e)),
        }
    }

    /// Configured committer signature, falling back to a tool identity
    pub(crate) fn signature(&self) -> Result<Signature<'static>> {
        match self.repo.signature() {
            Ok(sig) => Ok(sig.to_owned()),
            Err(e) => {
                debug!(error = %e, "no committer identity configured, using fallback");
                Ok(Signature::now(FALLBACK_NAME, FALLBACK_EMAIL)?)
            }
        }
    }
}

fn map_open_error(e: git2::Error, path: &Path) -> GitError {
    if e.code() == git2::ErrorCode::NotFound {
        GitError::NotARepository(path.to_path_buf())
    } else {
        GitError::OpenFailed(e.to_string())
    }
}
