//! Tag operations

use tracing::{info, instrument};

use bumpr_core::error::GitError;

use crate::repository::{GitRepo, Result};

impl GitRepo {
    /// Check whether a tag exists
    pub fn tag_exists(&self, name: &str) -> Result<bool> {
        let tag_ref = format!("refs/tags/{}", name);

        match self.repo.find_reference(&tag_ref) {
            Ok(_) => Ok(true),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(false),
            Err(e) => Err(GitError::Git2(e)),
        }
    }

    /// Create an annotated tag on HEAD. The tag message is the tag name.
    /// Returns the tagged commit hash.
    #[instrument(skip(self))]
    pub fn create_tag(&self, name: &str) -> Result<String> {
        if self.tag_exists(name)? {
            return Err(GitError::TagExists(name.to_string()));
        }

        let head = self.head_commit()?.ok_or(GitError::NoCommits)?;
        let sig = self.signature()?;
        self.repo.tag(name, head.as_object(), &sig, name, false)?;

        info!(name, commit = %head.id(), "created tag");
        Ok(head.id().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::{commit_file, init_repo};

    #[test]
    fn test_create_tag() {
        let (temp, raw) = init_repo();
        let hash = commit_file(&raw, "file.txt", "content", "Initial commit");

        let repo = GitRepo::open(temp.path()).unwrap();
        assert!(!repo.tag_exists("v1.0.0").unwrap());
        assert_eq!(repo.create_tag("v1.0.0").unwrap(), hash);
        assert!(repo.tag_exists("v1.0.0").unwrap());

        let reference = raw.find_reference("refs/tags/v1.0.0").unwrap();
        let tag = reference.peel_to_tag().unwrap();
        assert_eq!(tag.message(), Some("v1.0.0"));
    }

    #[test]
    fn test_tag_already_exists() {
        let (temp, raw) = init_repo();
        commit_file(&raw, "file.txt", "content", "Initial commit");

        let repo = GitRepo::open(temp.path()).unwrap();
        repo.create_tag("v1.0.0").unwrap();
        let result = repo.create_tag("v1.0.0");
        assert!(matches!(result, Err(GitError::TagExists(_))));
    }

    #[test]
    fn test_tag_without_commits() {
        let (temp, _raw) = init_repo();
        let repo = GitRepo::open(temp.path()).unwrap();
        assert!(matches!(repo.create_tag("v1.0.0"), Err(GitError::NoCommits)));
    }
}
