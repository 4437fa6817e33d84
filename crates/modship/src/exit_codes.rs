//! Exit codes for the CLI

use modship_core::error::{ModshipError, WorkflowError};

/// Success, including runs where push or registration were downgraded to warnings
pub const SUCCESS: i32 = 0;

/// General error
pub const ERROR: i32 = 1;

/// Configuration error (invalid config, missing or malformed metadata)
pub const CONFIG_ERROR: i32 = 2;

/// Version error
pub const VERSION_ERROR: i32 = 4;

/// Pre-flight lint gate failed
pub const GATE_FAILED: i32 = 5;

/// Map a command error to its exit code
pub fn for_error(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<ModshipError>() {
        Some(ModshipError::Workflow(WorkflowError::GateFailed { .. })) => GATE_FAILED,
        Some(ModshipError::Version(_)) => VERSION_ERROR,
        Some(ModshipError::Config(_) | ModshipError::Metadata(_) | ModshipError::Lint(_)) => {
            CONFIG_ERROR
        }
        _ => ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modship_core::error::{MetadataError, VersionError};
    use std::path::PathBuf;

    #[test]
    fn test_error_mapping() {
        let gate: anyhow::Error = ModshipError::from(WorkflowError::GateFailed { violations: 3 }).into();
        assert_eq!(for_error(&gate), GATE_FAILED);

        let missing: anyhow::Error =
            ModshipError::from(MetadataError::NotFound(PathBuf::from("module.json"))).into();
        assert_eq!(for_error(&missing), CONFIG_ERROR);

        let version: anyhow::Error =
            ModshipError::from(VersionError::ParseFailed("1.x.3".into(), "not a number".into())).into();
        assert_eq!(for_error(&version), VERSION_ERROR);

        assert_eq!(for_error(&anyhow::anyhow!("boom")), ERROR);
    }
}
