//! Error types for bumpr

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using BumprError
pub type Result<T> = std::result::Result<T, BumprError>;

/// Main error type for bumpr operations
#[derive(Debug, Error)]
pub enum BumprError {
    /// Configuration-related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Git-related errors
    #[error(transparent)]
    Git(#[from] GitError),

    /// Version-related errors
    #[error(transparent)]
    Version(#[from] VersionError),

    /// Changelog-related errors
    #[error(transparent)]
    Changelog(#[from] ChangelogError),

    /// Version provider errors
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Script errors
    #[error(transparent)]
    Hook(#[from] HookError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found at {0}")]
    NotFound(PathBuf),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {field} - {message}")]
    InvalidValue { field: String, message: String },

    /// Unsupported configuration file extension
    #[error("Unsupported configuration format: {0}")]
    UnsupportedFormat(PathBuf),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// IO error
    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),
}

/// Git-related errors
#[derive(Debug, Error)]
pub enum GitError {
    /// Repository not found
    #[error("Git repository not found at {0}")]
    RepositoryNotFound(PathBuf),

    /// Not a git repository
    #[error("Not a git repository: {0}")]
    NotARepository(PathBuf),

    /// Failed to open repository
    #[error("Failed to open repository: {0}")]
    OpenFailed(String),

    /// Repository has no working directory
    #[error("Repository has no working directory")]
    BareRepository,

    /// No commits found
    #[error("No commits found in repository")]
    NoCommits,

    /// Nothing to commit
    #[error("Nothing to commit, working tree clean")]
    NothingToCommit,

    /// Tag already exists
    #[error("Tag already exists: {0}")]
    TagExists(String),

    /// Remote not found
    #[error("Remote not found: {0}")]
    RemoteNotFound(String),

    /// Git2 library error
    #[error("Git error: {0}")]
    Git2(#[from] git2::Error),
}

/// Version-related errors
#[derive(Debug, Error)]
pub enum VersionError {
    /// Failed to parse version
    #[error("Failed to parse version '{0}': {1}")]
    ParseFailed(String, String),

    /// Invalid version number
    #[error("Invalid version number: \"{0}\"")]
    InvalidFormat(String),

    /// Neither an increment name nor a version number
    #[error("Invalid version number or version increment: \"{0}\"")]
    InvalidTarget(String),

    /// Unknown increment name
    #[error("Unknown increment: {0}")]
    InvalidIncrement(String),

    /// Nothing to bump to and prompting is disabled
    #[error("No version or increment given")]
    MissingTarget,

    /// A custom increment was requested without a version
    #[error("A custom increment requires an explicit version number")]
    MissingVersion,

    /// No increments are configured and no version was given
    #[error("You have to explicitly provide a version number when no increments are enabled")]
    NoIncrements,
}

/// Changelog-related errors
#[derive(Debug, Error)]
pub enum ChangelogError {
    /// Changelog file is missing or empty
    #[error("Changelog missing at {0}")]
    Missing(PathBuf),

    /// History yielded no version groups
    #[error("No commits found")]
    NoCommits,

    /// Failed to write changelog
    #[error("Failed to write changelog: {0}")]
    WriteFailed(String),
}

/// Version provider errors
#[derive(Debug, Error)]
pub enum ProviderError {
    /// No provider matched the repository
    #[error("Unsupported repository: no version provider matched {0}")]
    Unsupported(PathBuf),

    /// A configured pattern failed to compile
    #[error("Invalid pattern for {path}: {message}")]
    InvalidPattern { path: String, message: String },

    /// Writing a version file failed
    #[error("Failed to update {path}: {message}")]
    UpdateFailed { path: String, message: String },
}

/// Script execution errors
#[derive(Debug, Error)]
pub enum HookError {
    /// Script could not be spawned or exited non-zero
    #[error("Script '{stage}' failed ({command}): {message}")]
    ExecutionFailed {
        stage: String,
        command: String,
        message: String,
    },
}

impl BumprError {
    /// Create a new "other" error with a message
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Self::Other(msg.into())
    }
}
