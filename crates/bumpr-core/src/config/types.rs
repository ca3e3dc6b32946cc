//! Configuration types

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::defaults;
use super::rules::FileEntry;
use crate::types::Increment;

/// Main configuration for bumpr
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Never prompt; take the non-interactive answer everywhere
    pub force: bool,

    /// Minimize terminal output
    pub silent: bool,

    /// Version files: relative path to one or more `[pattern, replacement, flags?]` rules.
    ///
    /// Kept sorted by path so every run visits files in the same order.
    pub files: BTreeMap<String, FileEntry>,

    /// Version configuration
    pub version: VersionConfig,

    /// Changelog configuration
    pub changelog: ChangelogConfig,

    /// Commit configuration
    pub commit: CommitConfig,

    /// Tag configuration
    pub tag: TagConfig,

    /// Release configuration
    pub release: ReleaseConfig,

    /// Token formatting options
    pub tokens: TokensConfig,

    /// Lifecycle scripts
    pub scripts: ScriptsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            force: false,
            silent: false,
            files: BTreeMap::new(),
            version: VersionConfig::default(),
            changelog: ChangelogConfig::default(),
            commit: CommitConfig::default(),
            tag: TagConfig::default(),
            release: ReleaseConfig::default(),
            tokens: TokensConfig::default(),
            scripts: ScriptsConfig::default(),
        }
    }
}

impl Config {
    /// Apply cross-section rules that hold regardless of where values came from
    pub fn normalize(&mut self) {
        if !self.commit.enabled {
            self.tag.enabled = false;
        }
    }

    /// Apply environment overrides (`GITHUB_TOKEN`)
    pub fn apply_env(&mut self) {
        if let Ok(token) = std::env::var(defaults::GITHUB_TOKEN_ENV) {
            if !token.is_empty() {
                self.release.github.token = token;
            }
        }
    }
}

/// Version configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VersionConfig {
    /// Bump the version number
    pub enabled: bool,

    /// Version reported when no version can be found anywhere
    pub initial: String,

    /// Increments offered when none is given on the command line
    pub increments: Vec<Increment>,
}

impl Default for VersionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            initial: defaults::INITIAL_VERSION.to_string(),
            increments: Increment::ALL.to_vec(),
        }
    }
}

/// Changelog configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangelogConfig {
    /// Update the changelog
    pub enabled: bool,

    /// Create the changelog without asking when it is missing
    pub create: bool,

    /// Changelog path, relative to the repository root
    pub file: String,

    /// Template for the version header line
    pub version: String,

    /// Template for each commit line
    pub commit: String,

    /// Template appended after each section
    pub separator: String,
}

impl Default for ChangelogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            create: false,
            file: "CHANGELOG.md".to_string(),
            version: "### Version [version]".to_string(),
            commit: "- [message]".to_string(),
            separator: "\n".to_string(),
        }
    }
}

/// Commit configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommitConfig {
    /// Commit the changes
    pub enabled: bool,

    /// Commit message template
    pub message: String,
}

impl Default for CommitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            message: "Bumped version to [version]".to_string(),
        }
    }
}

/// Tag configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TagConfig {
    /// Tag the bump commit
    pub enabled: bool,

    /// Tag name template
    pub name: String,
}

impl Default for TagConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            name: "v[version]".to_string(),
        }
    }
}

/// Release configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleaseConfig {
    /// Release to every enabled provider
    pub enabled: bool,

    /// GitHub release settings
    pub github: GitHubReleaseConfig,
}

/// GitHub release settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitHubReleaseConfig {
    /// Make a GitHub release
    pub enabled: bool,

    /// Create the release as a draft
    pub draft: bool,

    /// Mark the release as a pre-release
    pub prerelease: bool,

    /// Globs of files to attach, relative to the repository root
    pub files: Vec<String>,

    /// API token (overridden by `GITHUB_TOKEN`)
    #[serde(skip_serializing_if = "String::is_empty")]
    pub token: String,

    /// Repository owner (defaults to the origin remote's owner)
    pub owner: String,

    /// Repository name (defaults to the origin remote's name)
    pub repo: String,
}

impl Default for GitHubReleaseConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            draft: true,
            prerelease: false,
            files: Vec::new(),
            token: String::new(),
            owner: String::new(),
            repo: String::new(),
        }
    }
}

/// Token formatting options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TokensConfig {
    /// Format of the `[date]` token (commit date)
    pub date: DateFormat,

    /// Format of the `[version_date]` token (release date of the version)
    pub version_date: DateFormat,
}

impl Default for TokensConfig {
    fn default() -> Self {
        Self {
            date: DateFormat::default(),
            version_date: DateFormat::default(),
        }
    }
}

/// A strftime-style date format
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DateFormat {
    /// chrono strftime format string
    pub format: String,
}

impl Default for DateFormat {
    fn default() -> Self {
        Self {
            format: defaults::DATE_FORMAT.to_string(),
        }
    }
}

/// Lifecycle scripts, run through the shell from the repository root
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptsConfig {
    /// Run scripts at all
    pub enabled: bool,
    pub prebump: String,
    pub postbump: String,
    pub prechangelog: String,
    pub postchangelog: String,
    pub precommit: String,
    pub postcommit: String,
    pub pretag: String,
    pub posttag: String,
    pub prerelease: String,
    pub postrelease: String,
}

impl Default for ScriptsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            prebump: String::new(),
            postbump: String::new(),
            prechangelog: String::new(),
            postchangelog: String::new(),
            precommit: String::new(),
            postcommit: String::new(),
            pretag: String::new(),
            posttag: String::new(),
            prerelease: String::new(),
            postrelease: String::new(),
        }
    }
}
