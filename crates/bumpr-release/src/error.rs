//! Release error types

use std::path::PathBuf;

use thiserror::Error;

/// Result type for release operations
pub type Result<T> = std::result::Result<T, ReleaseError>;

/// Release-related errors
#[derive(Debug, Error)]
pub enum ReleaseError {
    /// No token configured or in the environment
    #[error("Missing GitHub token: set release.github.token or GITHUB_TOKEN")]
    MissingToken,

    /// Owner/repository could not be determined
    #[error("Missing GitHub repository: set release.github.owner and release.github.repo or add an origin remote")]
    MissingRepository,

    /// API error from GitHub
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Asset glob failed to parse
    #[error("Invalid asset pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// Asset upload failed
    #[error("Upload failed for {path}: {message}")]
    UploadFailed { path: PathBuf, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
