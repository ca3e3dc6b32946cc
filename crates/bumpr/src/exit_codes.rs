//! Exit codes for the CLI

use bumpr_core::error::{ChangelogError, ConfigError, GitError, ProviderError, VersionError};
use bumpr_core::BumprError;
use bumpr_release::ReleaseError;

use crate::cli::prompt::Cancelled;

/// Success
#[cfg_attr(not(test), allow(dead_code))]
pub const SUCCESS: i32 = 0;

/// General error
pub const ERROR: i32 = 1;

/// Configuration error, including an unsupported repository
pub const CONFIG_ERROR: i32 = 2;

/// Git error
pub const GIT_ERROR: i32 = 3;

/// Version error
pub const VERSION_ERROR: i32 = 4;

/// Release publishing error
pub const RELEASE_ERROR: i32 = 5;

/// User cancelled
pub const CANCELLED: i32 = 130;

/// Exit code for an error returned by a command
pub fn for_error(err: &anyhow::Error) -> i32 {
    if err.is::<Cancelled>() {
        return CANCELLED;
    }
    if err.is::<ReleaseError>() {
        return RELEASE_ERROR;
    }
    if err.is::<ConfigError>() {
        return CONFIG_ERROR;
    }
    if err.is::<GitError>() {
        return GIT_ERROR;
    }
    if err.is::<VersionError>() {
        return VERSION_ERROR;
    }

    match err.downcast_ref::<BumprError>() {
        Some(BumprError::Config(_)) => CONFIG_ERROR,
        Some(BumprError::Provider(ProviderError::Unsupported(_))) => CONFIG_ERROR,
        Some(BumprError::Changelog(ChangelogError::Missing(_))) => CONFIG_ERROR,
        Some(BumprError::Git(_)) => GIT_ERROR,
        Some(BumprError::Version(_)) => VERSION_ERROR,
        _ => ERROR,
    }
}
