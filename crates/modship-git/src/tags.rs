//! Tag operations

use tracing::{info, instrument};

use modship_core::error::GitError;

use crate::repository::{GitRepo, Result};

impl GitRepo {
    /// Whether `refs/tags/<name>` exists
    pub fn tag_exists(&self, name: &str) -> Result<bool> {
        match self.repo.find_reference(&format!("refs/tags/{}", name)) {
            Ok(_) => Ok(true),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(false),
            Err(e) => Err(GitError::Git2(e)),
        }
    }

    /// Put a lightweight tag on HEAD; returns the tagged commit id
    #[instrument(skip(self))]
    pub fn create_tag(&self, name: &str) -> Result<String> {
        if self.tag_exists(name)? {
            return Err(GitError::TagExists(name.to_string()));
        }

        let head = self
            .head_commit()?
            .ok_or_else(|| GitError::OpenFailed("cannot tag an empty repository".to_string()))?;

        self.repo.tag_lightweight(name, head.as_object(), false)?;

        info!(tag = name, commit = %head.id(), "created tag");
        Ok(head.id().to_string())
    }
}
