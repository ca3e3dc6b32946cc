//! Commit history reads

use chrono::{TimeZone, Utc};
use git2::{ErrorCode, Oid, Sort};
use tracing::{debug, instrument};

use crate::repository::{GitRepo, Result};
use crate::types::Commit;

impl GitRepo {
    /// Read `count` commits reachable from HEAD, newest first, after skipping
    /// the first `skip`.
    ///
    /// An unborn HEAD has no history and yields an empty page.
    #[instrument(skip(self))]
    pub fn log(&self, skip: usize, count: usize) -> Result<Vec<Commit>> {
        let Some(head) = self.head_commit()? else {
            debug!("unborn HEAD, no history");
            return Ok(Vec::new());
        };

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push(head.id())?;

        let mut commits = Vec::with_capacity(count);
        for oid in revwalk.skip(skip).take(count) {
            let commit = self.repo.find_commit(oid?)?;
            commits.push(commit_to_record(&commit));
        }

        debug!(skip, count, found = commits.len(), "read log page");
        Ok(commits)
    }

    /// Content of `path` (relative to the repository root) as of `hash`.
    ///
    /// Returns `None` when the file does not exist in that commit's tree.
    pub fn show_file_at(&self, hash: &str, path: &str) -> Result<Option<String>> {
        let oid = Oid::from_str(hash)?;
        let tree = self.repo.find_commit(oid)?.tree()?;

        let entry = match tree.get_path(std::path::Path::new(path)) {
            Ok(entry) => entry,
            Err(e) if e.code() == ErrorCode::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let object = entry.to_object(&self.repo)?;
        let Some(blob) = object.as_blob() else {
            return Ok(None);
        };
        Ok(Some(String::from_utf8_lossy(blob.content()).into_owned()))
    }
}

/// Convert a git2 commit to a history record
fn commit_to_record(commit: &git2::Commit<'_>) -> Commit {
    let author = commit.author();
    let date = Utc
        .timestamp_opt(commit.time().seconds(), 0)
        .single()
        .unwrap_or_else(Utc::now);

    Commit::new(
        commit.id().to_string(),
        commit.summary().unwrap_or_default(),
        author.name().unwrap_or("Unknown"),
        author.email().unwrap_or_default(),
        date,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::{commit_file, init_repo};

    #[test]
    fn test_log_newest_first() {
        let (temp, raw) = init_repo();
        commit_file(&raw, "VERSION", "1.0.0", "Bumped to 1.0.0");
        commit_file(&raw, "src.txt", "a", "Add feature");
        let last = commit_file(&raw, "VERSION", "1.1.0", "Bumped to 1.1.0");

        let repo = GitRepo::open(temp.path()).unwrap();
        let commits = repo.log(0, 50).unwrap();
        assert_eq!(commits.len(), 3);
        assert_eq!(commits[0].hash, last);
        assert_eq!(commits[0].message, "Bumped to 1.1.0");
        assert_eq!(commits[2].message, "Bumped to 1.0.0");
        assert_eq!(commits[0].author_email, "test@example.com");
    }

    #[test]
    fn test_log_paging() {
        let (temp, raw) = init_repo();
        for i in 0..5 {
            commit_file(&raw, "file.txt", &i.to_string(), &format!("commit {}", i));
        }

        let repo = GitRepo::open(temp.path()).unwrap();
        let first = repo.log(0, 2).unwrap();
        let second = repo.log(2, 2).unwrap();
        let third = repo.log(4, 2).unwrap();
        let past_end = repo.log(6, 2).unwrap();

        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 2);
        assert_eq!(third.len(), 1);
        assert!(past_end.is_empty());
        assert_eq!(first[0].message, "commit 4");
        assert_eq!(second[0].message, "commit 2");
        assert_eq!(third[0].message, "commit 0");
    }

    #[test]
    fn test_log_unborn_head() {
        let (temp, _raw) = init_repo();
        let repo = GitRepo::open(temp.path()).unwrap();
        assert!(repo.log(0, 50).unwrap().is_empty());
    }

    #[test]
    fn test_show_file_at() {
        let (temp, raw) = init_repo();
        let first = commit_file(&raw, "pkg/VERSION", "1.0.0\n", "first");
        let second = commit_file(&raw, "pkg/VERSION", "2.0.0\n", "second");

        let repo = GitRepo::open(temp.path()).unwrap();
        assert_eq!(
            repo.show_file_at(&first, "pkg/VERSION").unwrap().as_deref(),
            Some("1.0.0\n")
        );
        assert_eq!(
            repo.show_file_at(&second, "pkg/VERSION").unwrap().as_deref(),
            Some("2.0.0\n")
        );
        assert!(repo.show_file_at(&first, "missing.txt").unwrap().is_none());
        // Directories are not files
        assert!(repo.show_file_at(&first, "pkg").unwrap().is_none());
    }

    #[test]
    fn test_show_file_at_bad_hash() {
        let (temp, raw) = init_repo();
        commit_file(&raw, "VERSION", "1.0.0", "first");
        let repo = GitRepo::open(temp.path()).unwrap();
        assert!(repo.show_file_at("not-a-hash", "VERSION").is_err());
    }
}
