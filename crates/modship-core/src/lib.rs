//! modship core - building blocks for plugin release automation
//!
//! This crate provides the error taxonomy, configuration, deterministic file
//! enumeration, module metadata handling, version bumping, release payload
//! hashing and release notes rendering used by the `modship` CLI.

pub mod config;
pub mod error;
pub mod integrity;
pub mod metadata;
pub mod walker;
pub mod workflow;

pub use config::{Config, ProjectPaths};
pub use error::{ModshipError, Result};
pub use integrity::{FileSet, IntegrityHasher, ReleaseDigest};
pub use metadata::ModuleMetadata;
pub use walker::FileWalker;
pub use workflow::{
    bump_patch, BumpKind, ReleaseNotes, ReleaseNotesWriter, ReleaseOptions, ReleaseSummary,
    StageOutcome, VersionBump, VersionBumper,
};
