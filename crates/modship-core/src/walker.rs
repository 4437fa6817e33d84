//! Deterministic source tree enumeration

use std::path::{Path, PathBuf};

use tracing::{debug, instrument, warn};
use walkdir::WalkDir;

/// Normalized, platform-independent form of a path used as the sort key
pub fn normalize(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Enumerates every regular file under a directory in a stable total order
#[derive(Debug, Clone, Default)]
pub struct FileWalker {
    extensions: Option<Vec<String>>,
}

impl FileWalker {
    /// Walker that yields every regular file
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict results to the given extensions (without the dot, case-insensitive)
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = Some(
            extensions
                .into_iter()
                .map(|e| e.into().trim_start_matches('.').to_lowercase())
                .collect(),
        );
        self
    }

    fn accepts(&self, path: &Path) -> bool {
        match &self.extensions {
            None => true,
            Some(exts) => path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| exts.iter().any(|x| x.eq_ignore_ascii_case(e))),
        }
    }

    /// Enumerate files under `root`, sorted lexicographically on the normalized path.
    ///
    /// A missing root yields an empty list. Unreadable entries are skipped with a warning.
    #[instrument(skip(self), fields(root = %root.display()))]
    pub fn enumerate(&self, root: &Path) -> Vec<PathBuf> {
        if !root.exists() {
            debug!(root = %root.display(), "source tree missing, treating as empty");
            return Vec::new();
        }

        let mut files: Vec<(String, PathBuf)> = WalkDir::new(root)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!(error = %e, "skipping unreadable entry");
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| self.accepts(path))
            .map(|path| (normalize(&path), path))
            .collect();

        files.sort_by(|a, b| a.0.cmp(&b.0));
        debug!(count = files.len(), "enumerated files");
        files.into_iter().map(|(_, path)| path).collect()
    }
}
