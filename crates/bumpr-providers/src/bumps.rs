//! Bump grouping
//!
//! Walks history newest first, one page at a time, and splits it into
//! version eras. When the version changes between two adjacent commits the
//! newer era's oldest commit (the one that changed the version) moves into
//! the next group as its seam and is flagged `is_bump`. Group labels lag one
//! boundary behind: a group is named after the version that was current
//! before the boundary that opened it.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use bumpr_git::Commit;

use crate::traits::VersionProvider;

/// Commits read per history page
pub const PAGE_SIZE: usize = 50;

/// One version era and the commits attributed to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bump {
    /// Version label; empty only while the era is being built
    pub version: String,
    /// Commits, newest first
    pub commits: Vec<Commit>,
}

impl Bump {
    /// Create a bump
    pub fn new(version: impl Into<String>, commits: Vec<Commit>) -> Self {
        Self {
            version: version.into(),
            commits,
        }
    }
}

/// Group the provider's history into bumps, newest first.
///
/// Pages of [`PAGE_SIZE`] commits are read until one comes back empty or
/// `limit` bumps have been collected.
#[instrument(skip(provider), fields(provider = provider.name()))]
pub async fn commits_bumps<P>(provider: &P, limit: Option<usize>) -> Vec<Bump>
where
    P: VersionProvider + ?Sized,
{
    let limit = limit.unwrap_or(usize::MAX);
    let history = provider.history();

    // The last element is the bump being built.
    let mut bumps: Vec<Bump> = Vec::new();
    let mut prev_version: Option<String> = None;
    let mut page_index = 0;

    'pages: loop {
        let page = history.log(page_index * PAGE_SIZE, PAGE_SIZE).await;
        if page.is_empty() {
            break;
        }
        debug!(page = page_index, commits = page.len(), "grouping page");

        for commit in page {
            let version = provider.get_version_by_commit(Some(&commit)).await;

            if prev_version.as_deref() != Some(version.as_str()) {
                let boundary = bumps.last_mut().and_then(|current| current.commits.pop());

                if bumps.len() >= limit {
                    break 'pages;
                }

                let mut commits = Vec::with_capacity(2);
                if let Some(mut boundary) = boundary {
                    boundary.is_bump = true;
                    commits.push(boundary);
                }
                commits.push(commit);

                if bumps.last().is_some_and(|current| current.commits.is_empty()) {
                    bumps.pop();
                }

                let label = prev_version.clone().unwrap_or_else(|| version.clone());
                bumps.push(Bump::new(label, commits));
            } else if let Some(current) = bumps.last_mut() {
                if current.version.is_empty() {
                    current.version = version.clone();
                }
                current.commits.push(commit);
            }

            prev_version = Some(version);
        }

        page_index += 1;
    }

    debug!(bumps = bumps.len(), "grouped history");
    bumps
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::HashMap;

    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};

    use bumpr_core::error::Result;
    use bumpr_git::{Commit, History};

    use crate::traits::VersionProvider;

    /// In-memory history: commits newest first, each with the version its
    /// tree carries
    pub struct FakeHistory {
        pub commits: Vec<Commit>,
        pub versions: HashMap<String, String>,
        pub pages_read: std::sync::Mutex<Vec<usize>>,
    }

    impl FakeHistory {
        /// Build from `(hash, message, version)` triples, newest first
        pub fn new(entries: &[(&str, &str, &str)]) -> Self {
            let count = entries.len() as i64;
            let commits = entries
                .iter()
                .enumerate()
                .map(|(i, (hash, message, _))| {
                    let date = Utc.timestamp_opt(1_700_000_000 + (count - i as i64) * 60, 0).unwrap();
                    Commit::new(*hash, *message, "Test", "test@example.com", date)
                })
                .collect();
            let versions = entries
                .iter()
                .filter(|(_, _, version)| !version.is_empty())
                .map(|(hash, _, version)| (hash.to_string(), version.to_string()))
                .collect();
            Self {
                commits,
                versions,
                pages_read: std::sync::Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl History for FakeHistory {
        async fn log(&self, skip: usize, count: usize) -> Vec<Commit> {
            self.pages_read.lock().unwrap().push(skip);
            self.commits.iter().skip(skip).take(count).cloned().collect()
        }

        async fn show_file_at(&self, hash: &str, _path: &str) -> Option<String> {
            self.versions.get(hash).cloned()
        }
    }

    /// Provider whose file content is the bare version string
    pub struct FakeProvider {
        pub history: FakeHistory,
    }

    #[async_trait]
    impl VersionProvider for FakeProvider {
        fn name(&self) -> &'static str {
            "fake"
        }

        fn history(&self) -> &dyn History {
            &self.history
        }

        fn initial_version(&self) -> &str {
            "0.0.0"
        }

        async fn is_supported(&self) -> bool {
            true
        }

        async fn working_version(&self) -> Option<String> {
            None
        }

        async fn get_version_by_commit(&self, commit: Option<&Commit>) -> String {
            match commit {
                Some(commit) => self
                    .history
                    .show_file_at(&commit.hash, "VERSION")
                    .await
                    .unwrap_or_else(|| self.initial_version().to_string()),
                None => self.initial_version().to_string(),
            }
        }

        async fn update_version(&self, _version: &str) -> Result<()> {
            Ok(())
        }
    }

    pub fn provider(entries: &[(&str, &str, &str)]) -> FakeProvider {
        FakeProvider {
            history: FakeHistory::new(entries),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    fn hashes(bump: &Bump) -> Vec<&str> {
        bump.commits.iter().map(|c| c.hash.as_str()).collect()
    }

    const FIXTURE: &[(&str, &str, &str)] = &[
        ("c3", "Bumped to 1.1.0", "1.1.0"),
        ("c2", "Add feature", "1.1.0"),
        ("c1", "Bumped to 1.0.0", "1.0.0"),
    ];

    #[tokio::test]
    async fn test_three_commit_fixture_limit_one() {
        let provider = provider(FIXTURE);
        let bumps = provider.commits_bumps(Some(1)).await;

        assert_eq!(bumps.len(), 1);
        assert_eq!(bumps[0].version, "1.1.0");
        // c2 was popped as the seam before the limit stopped the walk
        assert_eq!(hashes(&bumps[0]), vec!["c3"]);
    }

    #[tokio::test]
    async fn test_three_commit_fixture_unlimited() {
        let provider = provider(FIXTURE);
        let bumps = provider.commits_bumps(None).await;

        assert_eq!(bumps.len(), 2);
        assert_eq!(bumps[0].version, "1.1.0");
        assert_eq!(hashes(&bumps[0]), vec!["c3"]);

        // Labels lag one boundary behind
        assert_eq!(bumps[1].version, "1.1.0");
        assert_eq!(hashes(&bumps[1]), vec!["c2", "c1"]);
        assert!(bumps[1].commits[0].is_bump);
        assert!(!bumps[1].commits[1].is_bump);
    }

    #[tokio::test]
    async fn test_every_commit_attributed_once() {
        let mut entries = Vec::new();
        let names: Vec<String> = (0..137).map(|i| format!("h{}", i)).collect();
        let versions: Vec<String> = (0..137).map(|i| format!("1.{}.0", (136 - i) / 10)).collect();
        for i in 0..137 {
            entries.push((names[i].as_str(), "change", versions[i].as_str()));
        }
        let provider = provider(&entries);
        let bumps = provider.commits_bumps(None).await;

        let total: usize = bumps.iter().map(|b| b.commits.len()).sum();
        assert_eq!(total, 137);

        let mut seen: Vec<&str> = bumps.iter().flat_map(hashes).collect();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), 137);

        // 137 commits span pages at 0, 50, 100 and the empty page at 150
        assert_eq!(*provider.history.pages_read.lock().unwrap(), vec![0, 50, 100, 150]);
    }

    #[tokio::test]
    async fn test_single_version_history() {
        let provider = provider(&[("b", "two", "1.0.0"), ("a", "one", "1.0.0")]);
        let bumps = provider.commits_bumps(Some(1)).await;

        assert_eq!(bumps.len(), 1);
        assert_eq!(bumps[0].version, "1.0.0");
        assert_eq!(hashes(&bumps[0]), vec!["b", "a"]);
        assert!(bumps[0].commits.iter().all(|c| !c.is_bump));
    }

    #[tokio::test]
    async fn test_missing_versions_fall_back_to_initial() {
        let provider = provider(&[
            ("c", "Bumped to 0.1.0", "0.1.0"),
            ("b", "Add file", ""),
            ("a", "Initial", ""),
        ]);
        let bumps = provider.commits_bumps(None).await;

        // b and a read as 0.0.0; c's era is emptied by the seam and dropped
        assert_eq!(bumps.len(), 1);
        assert_eq!(bumps[0].version, "0.1.0");
        assert_eq!(hashes(&bumps[0]), vec!["c", "b", "a"]);
        assert!(bumps[0].commits[0].is_bump);
    }

    #[tokio::test]
    async fn test_single_commit_era_is_absorbed() {
        let provider = provider(&[
            ("d", "Bumped to 3.0.0", "3.0.0"),
            ("c", "Bumped to 2.0.0", "2.0.0"),
            ("b", "Fix", "1.0.0"),
            ("a", "Bumped to 1.0.0", "1.0.0"),
        ]);
        let bumps = provider.commits_bumps(None).await;

        let total: usize = bumps.iter().map(|b| b.commits.len()).sum();
        assert_eq!(total, 4);
        assert_eq!(bumps.len(), 2);
        assert_eq!(bumps[0].version, "3.0.0");
        assert_eq!(hashes(&bumps[0]), vec!["d"]);
        assert!(bumps[0].commits[0].is_bump);
        assert_eq!(bumps[1].version, "2.0.0");
        assert_eq!(hashes(&bumps[1]), vec!["c", "b", "a"]);
        assert!(bumps[1].commits[0].is_bump);
    }

    #[tokio::test]
    async fn test_empty_history() {
        let provider = provider(&[]);
        assert!(provider.commits_bumps(None).await.is_empty());
    }
}
