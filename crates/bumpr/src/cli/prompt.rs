//! Interactive prompts

use dialoguer::{Confirm, Input, Select};
use thiserror::Error;

use bumpr_core::error::VersionError;
use bumpr_core::{normalize_version, Increment};

/// The user declined to go on
#[derive(Debug, Error)]
#[error("Cancelled")]
pub struct Cancelled;

/// Ask which increment to apply
pub fn select_increment(increments: &[Increment]) -> anyhow::Result<Increment> {
    if increments.is_empty() {
        return Err(VersionError::NoIncrements.into());
    }

    let items: Vec<&str> = increments.iter().map(Increment::as_str).collect();
    let selection = Select::new()
        .with_prompt("Select an increment")
        .items(&items)
        .default(0)
        .interact()?;
    Ok(increments[selection])
}

/// Ask for an explicit version number
pub fn input_version() -> anyhow::Result<String> {
    let version: String = Input::new()
        .with_prompt("Enter a version number")
        .validate_with(|input: &String| -> Result<(), String> {
            normalize_version(input).map(|_| ()).map_err(|e| e.to_string())
        })
        .interact_text()?;
    Ok(normalize_version(&version)?)
}

/// Ask a yes/no question
pub fn confirm(prompt: &str, default: bool) -> anyhow::Result<bool> {
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}

/// Ask a yes/no question; a "no" cancels the command
pub fn confirm_or_cancel(prompt: &str) -> anyhow::Result<()> {
    if confirm(prompt, false)? {
        Ok(())
    } else {
        Err(Cancelled.into())
    }
}
