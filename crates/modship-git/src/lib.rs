//! modship git - version control publishing for plugin releases
//!
//! Stage, commit and tag go through libgit2. Pushing shells out to the git
//! CLI so the user's credential helpers and SSH agent apply.

mod publisher;
mod remote;
mod repository;
mod staging;
mod tags;

pub use publisher::{GitPublisher, PushOutcome, VcsPublisher};
pub use repository::{GitRepo, Result};
