//! Staging and committing

use git2::IndexAddOption;
use tracing::{info, instrument};

use bumpr_core::error::GitError;

use crate::repository::{GitRepo, Result};

impl GitRepo {
    /// Stage every change in the working tree (new, modified and deleted
    /// files) and commit it on HEAD. Returns the new commit hash.
    #[instrument(skip(self, message))]
    pub fn commit_all(&self, message: &str) -> Result<String> {
        let mut index = self.repo.index()?;
        index.add_all(["*"].iter(), IndexAddOption::DEFAULT, None)?;
        index.update_all(["*"].iter(), None)?;
        index.write()?;

        let tree_id = index.write_tree()?;
        let tree = self.repo.find_tree(tree_id)?;
        let parent = self.head_commit()?;

        if let Some(parent) = &parent {
            if parent.tree_id() == tree_id {
                return Err(GitError::NothingToCommit);
            }
        }

        let sig = self.signature()?;
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();
        let oid = self
            .repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)?;

        info!(hash = %oid, "created commit");
        Ok(oid.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::{commit_file, init_repo};

    #[test]
    fn test_commit_all_stages_everything() {
        let (temp, raw) = init_repo();
        commit_file(&raw, "old.txt", "old", "Initial commit");

        std::fs::write(temp.path().join("VERSION"), "1.0.1").unwrap();
        std::fs::remove_file(temp.path().join("old.txt")).unwrap();

        let repo = GitRepo::open(temp.path()).unwrap();
        let hash = repo.commit_all("Bumped version to 1.0.1").unwrap();

        let log = repo.log(0, 10).unwrap();
        assert_eq!(log[0].hash, hash);
        assert_eq!(log[0].message, "Bumped version to 1.0.1");
        assert_eq!(
            repo.show_file_at(&hash, "VERSION").unwrap().as_deref(),
            Some("1.0.1")
        );
        assert!(repo.show_file_at(&hash, "old.txt").unwrap().is_none());
        assert!(repo.is_clean().unwrap());
    }

    #[test]
    fn test_commit_all_first_commit() {
        let (temp, _raw) = init_repo();
        std::fs::write(temp.path().join("VERSION"), "0.1.0").unwrap();

        let repo = GitRepo::open(temp.path()).unwrap();
        repo.commit_all("Initial").unwrap();
        assert_eq!(repo.log(0, 10).unwrap().len(), 1);
    }

    #[test]
    fn test_commit_all_nothing_to_commit() {
        let (temp, raw) = init_repo();
        commit_file(&raw, "file.txt", "content", "Initial commit");

        let repo = GitRepo::open(temp.path()).unwrap();
        let result = repo.commit_all("empty");
        assert!(matches!(result, Err(GitError::NothingToCommit)));
    }
}
