//! Index and commit operations

use std::path::Path;

use git2::IndexAddOption;
use tracing::{info, instrument};

use modship_core::error::GitError;
use modship_core::walker::normalize;

use crate::repository::{GitRepo, Result};

/// Pathspec covering everything below `subtree` (workdir-relative; empty is the whole tree)
fn subtree_pathspec(subtree: &Path) -> String {
    let prefix = normalize(subtree);
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        "*".to_string()
    } else {
        format!("{}/*", prefix)
    }
}

impl GitRepo {
    /// Stage every change below `subtree`, deletions included. Changes
    /// elsewhere in the working tree are left alone.
    ///
    /// Returns the number of index entries afterwards.
    #[instrument(skip(self), fields(subtree = %subtree.display()))]
    pub fn stage(&self, subtree: &Path) -> Result<usize> {
        let pathspec = subtree_pathspec(subtree);
        let mut index = self.repo.index()?;
        index.add_all([pathspec.as_str()].iter(), IndexAddOption::DEFAULT, None)?;
        index.update_all([pathspec.as_str()].iter(), None)?;
        index.write()?;

        info!(entries = index.len(), pathspec = %pathspec, "staged release changes");
        Ok(index.len())
    }

    /// Commit the current index on top of HEAD; returns the new commit id.
    ///
    /// Fails with [`GitError::NothingToCommit`] when the index matches HEAD.
    #[instrument(skip(self, message))]
    pub fn commit(&self, message: &str) -> Result<String> {
        let mut index = self.repo.index()?;
        let tree_id = index.write_tree()?;
        let tree = self.repo.find_tree(tree_id)?;

        let parent = self.head_commit()?;
        if let Some(parent) = &parent {
            if parent.tree_id() == tree_id {
                return Err(GitError::NothingToCommit);
            }
        }

        let sig = self.signature()?;
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();
        let oid = self
            .repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)?;

        info!(commit = %oid, "created release commit");
        Ok(oid.to_string())
    }
}
