//! History access for version attribution
//!
//! Version providers read history through the [`History`] trait so the
//! grouping walk can run against a real repository or an in-memory log.
//! Neither operation fails: git errors are logged and surface as "no more
//! history" or "file absent".

use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::warn;

use crate::repository::{GitRepo, Result};
use crate::types::Commit;

/// Read-only access to commit history
#[async_trait]
pub trait History: Send + Sync {
    /// Up to `count` commits, newest first, after skipping `skip`.
    /// Empty exactly when no more history exists.
    async fn log(&self, skip: usize, count: usize) -> Vec<Commit>;

    /// Content of a repository-relative path as of a commit
    async fn show_file_at(&self, hash: &str, path: &str) -> Option<String>;
}

/// History backed by a git repository
pub struct GitHistory {
    repo: Mutex<GitRepo>,
}

impl GitHistory {
    /// Wrap an opened repository
    pub fn new(repo: GitRepo) -> Self {
        Self {
            repo: Mutex::new(repo),
        }
    }

    /// Discover the repository containing `path`
    pub fn discover(path: &Path) -> Result<Self> {
        Ok(Self::new(GitRepo::discover(path)?))
    }

    fn with_repo<T>(&self, f: impl FnOnce(&GitRepo) -> T) -> T {
        let guard = self.repo.lock().unwrap_or_else(|e| e.into_inner());
        f(&guard)
    }
}

#[async_trait]
impl History for GitHistory {
    async fn log(&self, skip: usize, count: usize) -> Vec<Commit> {
        self.with_repo(|repo| repo.log(skip, count))
            .unwrap_or_else(|e| {
                warn!(skip, count, error = %e, "failed to read log");
                Vec::new()
            })
    }

    async fn show_file_at(&self, hash: &str, path: &str) -> Option<String> {
        self.with_repo(|repo| repo.show_file_at(hash, path))
            .unwrap_or_else(|e| {
                warn!(hash, path, error = %e, "failed to read file at commit");
                None
            })
    }
}
