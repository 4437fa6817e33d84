//! Release payload hashing
//!
//! The release digest is a single SHA-256 over the byte concatenation of
//! every payload file, in the order of their normalized project-relative
//! paths. No separators or file names enter the hash, so the digest depends
//! only on the sorted file contents.

use std::collections::HashMap;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};

use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument, warn};

use crate::config::ProjectPaths;
use crate::error::Result;
use crate::walker::{normalize, FileWalker};

/// Read buffer size used when streaming files into the hash
pub const CHUNK_SIZE: usize = 64 * 1024;

/// One file of the release payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Normalized path relative to the project root (the sort key)
    pub relative: String,
    /// Location on disk
    pub path: PathBuf,
}

/// The deterministic, sorted list of files that make up a release
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSet {
    entries: Vec<FileEntry>,
}

impl FileSet {
    /// Build a file set from arbitrary paths, keyed relative to `root`
    pub fn from_paths<I>(root: &Path, paths: I) -> Self
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let mut entries: Vec<FileEntry> = paths
            .into_iter()
            .map(|path| {
                let relative = normalize(path.strip_prefix(root).unwrap_or(&path));
                FileEntry { relative, path }
            })
            .collect();

        entries.sort_by(|a, b| a.relative.cmp(&b.relative));
        entries.dedup_by(|a, b| a.relative == b.relative);
        Self { entries }
    }

    /// Collect the release payload: every file under the source tree plus the metadata file
    #[instrument(skip(paths), fields(root = %paths.root.display()))]
    pub fn collect(paths: &ProjectPaths) -> Self {
        let mut files = FileWalker::new().enumerate(&paths.source_dir);
        files.push(paths.metadata.clone());

        let set = Self::from_paths(&paths.root, files);
        debug!(count = set.len(), "collected release file set");
        set
    }

    /// Entries in hash order
    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    /// Number of files
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Combined digest of a release payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseDigest {
    /// Lowercase hex SHA-256
    pub hex: String,
    /// Number of files that contributed bytes
    pub files_hashed: usize,
    /// Files that vanished or could not be read
    pub skipped: Vec<String>,
}

impl std::fmt::Display for ReleaseDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.hex)
    }
}

/// Streams a [`FileSet`] into one running SHA-256 state
#[derive(Debug, Clone, Default)]
pub struct IntegrityHasher {
    overrides: HashMap<String, Vec<u8>>,
}

impl IntegrityHasher {
    /// Create a hasher that reads every file from disk
    pub fn new() -> Self {
        Self::default()
    }

    /// Hash `content` in place of the file at `relative`.
    ///
    /// Used to preview the digest of a state that has not been written yet.
    pub fn with_override(mut self, relative: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        self.overrides.insert(relative.into(), content.into());
        self
    }

    /// Compute the combined digest.
    ///
    /// Files that disappear between enumeration and reading are skipped with a warning.
    #[instrument(skip(self, files), fields(files = files.len()))]
    pub fn hash(&self, files: &FileSet) -> Result<ReleaseDigest> {
        let mut hasher = Sha256::new();
        let mut buf = vec![0u8; CHUNK_SIZE];
        let mut files_hashed = 0;
        let mut skipped = Vec::new();

        for entry in files.entries() {
            if let Some(content) = self.overrides.get(&entry.relative) {
                for chunk in content.chunks(CHUNK_SIZE) {
                    hasher.update(chunk);
                }
                files_hashed += 1;
                continue;
            }

            match stream_file(&mut hasher, &entry.path, &mut buf) {
                Ok(bytes) => {
                    debug!(file = %entry.relative, bytes, "hashed file");
                    files_hashed += 1;
                }
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    warn!(file = %entry.relative, "file disappeared before hashing, skipping");
                    skipped.push(entry.relative.clone());
                }
                Err(e) => {
                    warn!(file = %entry.relative, error = %e, "failed to read file, skipping");
                    skipped.push(entry.relative.clone());
                }
            }
        }

        let hex = format!("{:x}", hasher.finalize());
        info!(digest = %hex, files_hashed, skipped = skipped.len(), "release digest computed");
        Ok(ReleaseDigest {
            hex,
            files_hashed,
            skipped,
        })
    }
}

fn stream_file(hasher: &mut Sha256, path: &Path, buf: &mut [u8]) -> std::io::Result<u64> {
    let mut file = File::open(path)?;
    let mut total = 0u64;
    loop {
        let n = match file.read(buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buf[..n]);
        total += n as u64;
    }
    Ok(total)
}
