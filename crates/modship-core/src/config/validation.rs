//! Configuration validation

use tracing::debug;

use crate::error::{ConfigError, Result};

use super::types::Config;

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    debug!("validating configuration");
    validate_lint(config)?;
    validate_versioning(config)?;
    validate_git(config)?;
    validate_registry(config)?;
    debug!("configuration validation passed");
    Ok(())
}

fn invalid(field: &str, message: impl Into<String>) -> crate::error::ModshipError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        message: message.into(),
    }
    .into()
}

fn validate_lint(config: &Config) -> Result<()> {
    if config.lint.enabled && config.lint.extensions.is_empty() {
        return Err(invalid("lint.extensions", "at least one extension is required"));
    }

    for (i, rule) in config.lint.extra_rules.iter().enumerate() {
        if rule.pattern.is_empty() {
            return Err(invalid(
                &format!("lint.extra_rules[{}].pattern", i),
                "pattern cannot be empty",
            ));
        }
    }

    Ok(())
}

fn validate_versioning(config: &Config) -> Result<()> {
    if !config.versioning.tag_format.contains("{version}") {
        return Err(invalid(
            "versioning.tag_format",
            "must contain {version} placeholder",
        ));
    }

    Ok(())
}

fn validate_git(config: &Config) -> Result<()> {
    if config.git.remote.is_empty() {
        return Err(invalid("git.remote", "remote cannot be empty"));
    }

    let message = &config.git.commit_message;
    if !message.contains("{version}") && !message.contains("{tag}") {
        return Err(invalid(
            "git.commit_message",
            "must contain {version} or {tag} placeholder",
        ));
    }

    Ok(())
}

fn validate_registry(config: &Config) -> Result<()> {
    if let Err(e) = url::Url::parse(&config.registry.endpoint) {
        return Err(invalid("registry.endpoint", e.to_string()));
    }

    if config.registry.timeout_secs == 0 {
        return Err(invalid("registry.timeout_secs", "must be greater than zero"));
    }

    Ok(())
}
