//! Configuration validation

use chrono::format::{Item, StrftimeItems};
use tracing::debug;

use crate::error::{ConfigError, Result};

use super::types::Config;

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    debug!("validating configuration");
    validate_files(config)?;
    validate_templates(config)?;
    validate_tokens(config)?;
    debug!("configuration validation passed");
    Ok(())
}

fn validate_files(config: &Config) -> Result<()> {
    if !config.files.is_empty() {
        debug!(count = config.files.len(), "validating version files");
    }
    for (path, entry) in &config.files {
        let rules = entry.rules();
        if rules.is_empty() {
            return Err(invalid(format!("files.{}", path), "at least one rule is required"));
        }
        for rule in rules {
            rule.compile(path)
                .map_err(|e| invalid(format!("files.{}", path), e.to_string()))?;
        }
    }
    Ok(())
}

fn validate_templates(config: &Config) -> Result<()> {
    if config.commit.enabled && config.commit.message.trim().is_empty() {
        return Err(invalid("commit.message", "message cannot be empty"));
    }

    if config.tag.enabled && config.tag.name.trim().is_empty() {
        return Err(invalid("tag.name", "tag name cannot be empty"));
    }

    if config.changelog.enabled && config.changelog.file.trim().is_empty() {
        return Err(invalid("changelog.file", "file cannot be empty"));
    }

    Ok(())
}

fn validate_tokens(config: &Config) -> Result<()> {
    for (field, format) in [
        ("tokens.date.format", &config.tokens.date.format),
        ("tokens.version_date.format", &config.tokens.version_date.format),
    ] {
        if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
            return Err(invalid(field, format!("invalid date format '{}'", format)));
        }
    }
    Ok(())
}

fn invalid(field: impl Into<String>, message: impl Into<String>) -> crate::error::BumprError {
    ConfigError::InvalidValue {
        field: field.into(),
        message: message.into(),
    }
    .into()
}
