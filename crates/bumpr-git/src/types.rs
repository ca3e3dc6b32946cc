//! Git types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One commit from the history log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// Commit hash (full)
    pub hash: String,
    /// Author name
    pub author_name: String,
    /// Author email
    pub author_email: String,
    /// Commit timestamp
    pub date: DateTime<Utc>,
    /// Commit message (first line)
    pub message: String,
    /// Set once when the commit is the seam between two version groups
    #[serde(default)]
    pub is_bump: bool,
}

impl Commit {
    /// Create a new Commit
    pub fn new(
        hash: impl Into<String>,
        message: impl Into<String>,
        author_name: impl Into<String>,
        author_email: impl Into<String>,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            hash: hash.into(),
            author_name: author_name.into(),
            author_email: author_email.into(),
            date,
            message: message.into(),
            is_bump: false,
        }
    }

    /// The first `len` characters of the hash
    pub fn short_hash(&self, len: usize) -> &str {
        match self.hash.char_indices().nth(len) {
            Some((idx, _)) => &self.hash[..idx],
            None => &self.hash,
        }
    }
}

/// Owner and name of a GitHub-hosted repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoSlug {
    /// Account or organization
    pub owner: String,
    /// Repository name without `.git`
    pub repo: String,
}
