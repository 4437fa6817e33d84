//! Release options and outcome types

use serde::Serialize;

/// Options for a release run
#[derive(Debug, Clone, Default)]
pub struct ReleaseOptions {
    /// Print every mutating action instead of executing it
    pub simulate: bool,
    /// Skip git operations (commit, tag, push)
    pub skip_git: bool,
    /// Skip registry registration
    pub skip_register: bool,
}

impl ReleaseOptions {
    /// Create options for a simulated run
    pub fn simulate() -> Self {
        Self {
            simulate: true,
            ..Default::default()
        }
    }
}

/// Outcome of one pipeline stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "lowercase")]
pub enum StageOutcome {
    /// Stage completed
    Done,
    /// Stage only printed its intended actions
    Simulated,
    /// Stage was not attempted
    Skipped(String),
    /// Stage failed and was downgraded to a warning
    Failed(String),
}

impl StageOutcome {
    /// Whether the stage completed or was simulated
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Done | Self::Simulated)
    }
}

impl std::fmt::Display for StageOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Done => f.write_str("done"),
            Self::Simulated => f.write_str("simulated"),
            Self::Skipped(reason) => write!(f, "skipped ({})", reason),
            Self::Failed(reason) => write!(f, "failed ({})", reason),
        }
    }
}

/// Final summary printed at the end of every run
#[derive(Debug, Clone, Serialize)]
pub struct ReleaseSummary {
    /// Module slug
    pub module: String,
    /// Version before the bump
    pub previous_version: String,
    /// Released version
    pub version: String,
    /// Tag name
    pub tag: String,
    /// Release digest
    pub hash: String,
    /// Whether this was a simulated run
    pub simulated: bool,
    /// Git stage outcome
    pub vcs: StageOutcome,
    /// Registry stage outcome
    pub registration: StageOutcome,
    /// Warnings collected along the way
    pub warnings: Vec<String>,
}

impl ReleaseSummary {
    /// Add a warning
    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }
}
