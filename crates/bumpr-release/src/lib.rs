//! bumpr release - publishes GitHub releases
//!
//! A release is created for the version tag, with the newest changelog
//! section as its body, and files matched by the configured globs are
//! uploaded as assets.

pub mod error;
pub mod github;
pub mod types;

pub use error::{ReleaseError, Result};
pub use github::{collect_assets, GitHubReleaser};
pub use types::{AssetInfo, ReleaseInfo, ReleaseRequest};
