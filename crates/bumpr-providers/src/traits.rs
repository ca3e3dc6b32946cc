//! Version provider trait

use async_trait::async_trait;
use tracing::{debug, info, warn};

use bumpr_core::error::Result;
use bumpr_core::{increment_version, Increment};
use bumpr_git::{Commit, History};

use crate::bumps::{commits_bumps, Bump};

/// Knows where a repository stores its version, now and in history
#[async_trait]
pub trait VersionProvider: Send + Sync {
    /// Provider name (e.g., "files", "npm")
    fn name(&self) -> &'static str;

    /// History the provider reads past versions from
    fn history(&self) -> &dyn History;

    /// Version reported when no other signal exists
    fn initial_version(&self) -> &str;

    /// Check whether the repository follows this provider's convention
    async fn is_supported(&self) -> bool;

    /// Version found in the working tree, if any
    async fn working_version(&self) -> Option<String>;

    /// Version as of `commit`; the initial version when `commit` is absent or
    /// its content yields no version. Never fails.
    async fn get_version_by_commit(&self, commit: Option<&Commit>) -> String;

    /// Write `version` into every file the provider manages
    async fn update_version(&self, version: &str) -> Result<()>;

    /// Current version: working tree, then the most recent commit, then the
    /// initial version
    async fn get_version(&self) -> String {
        if let Some(version) = self.working_version().await {
            return version;
        }

        let latest = self.history().log(0, 1).await;
        let version = self.get_version_by_commit(latest.first()).await;
        debug!(provider = self.name(), %version, "version from history");
        version
    }

    /// Move to the next version and write it.
    ///
    /// An explicit `version` wins over `increment`. Returns the version
    /// written, or `None` when the current version cannot be incremented.
    async fn bump(&self, increment: Increment, version: Option<&str>) -> Result<Option<String>> {
        let next = match version {
            Some(v) => v.to_string(),
            None => {
                let current = self.get_version().await;
                match increment_version(&current, increment) {
                    Some(next) => next,
                    None => {
                        warn!(provider = self.name(), %current, %increment, "cannot increment version");
                        return Ok(None);
                    }
                }
            }
        };

        self.update_version(&next).await?;
        info!(provider = self.name(), version = %next, "bumped version");
        Ok(Some(next))
    }

    /// Group history into version eras, newest first; `limit` caps the number
    /// of eras returned
    async fn commits_bumps(&self, limit: Option<usize>) -> Vec<Bump> {
        commits_bumps(self, limit).await
    }
}
