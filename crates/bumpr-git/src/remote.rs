//! Remote operations

use url::Url;

use bumpr_core::error::GitError;

use crate::repository::{GitRepo, Result};
use crate::types::RepoSlug;

impl GitRepo {
    /// Get the URL for a remote
    pub fn remote_url(&self, name: &str) -> Result<Option<String>> {
        match self.repo.find_remote(name) {
            Ok(remote) => Ok(remote.url().map(|s| s.to_string())),
            Err(e) if e.code() == git2::ErrorCode::NotFound => {
                Err(GitError::RemoteNotFound(name.to_string()))
            }
            Err(e) => Err(GitError::Git2(e)),
        }
    }

    /// Owner and repository name of the `origin` remote, if it has a
    /// recognizable `owner/repo` path
    pub fn origin_slug(&self) -> Result<Option<RepoSlug>> {
        match self.remote_url("origin") {
            Ok(url) => Ok(url.as_deref().and_then(parse_slug)),
            Err(GitError::RemoteNotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// Parse `owner/repo` out of a remote URL.
///
/// Accepts URL forms (`https://host/owner/repo.git`, `ssh://git@host/owner/repo`,
/// `git+https://...`) and scp-like forms (`git@host:owner/repo.git`).
pub fn parse_slug(remote: &str) -> Option<RepoSlug> {
    let remote = remote.trim();
    let path = match Url::parse(remote) {
        Ok(url) if url.has_host() => url.path().to_string(),
        _ => {
            // scp-like syntax: [user@]host:path
            let (host, path) = remote.split_once(':')?;
            if host.is_empty() || host.contains('/') {
                return None;
            }
            path.to_string()
        }
    };

    let mut segments = path
        .trim_matches('/')
        .trim_end_matches(".git")
        .rsplitn(2, '/')
        .map(str::to_string);
    let repo = segments.next().filter(|s| !s.is_empty())?;
    let owner = segments
        .next()
        .map(|s| s.rsplit('/').next().unwrap_or_default().to_string())
        .filter(|s| !s.is_empty())?;

    Some(RepoSlug { owner, repo })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::init_repo;

    fn slug(owner: &str, repo: &str) -> Option<RepoSlug> {
        Some(RepoSlug {
            owner: owner.to_string(),
            repo: repo.to_string(),
        })
    }

    #[test]
    fn test_parse_slug_forms() {
        assert_eq!(parse_slug("https://github.com/acme/widget.git"), slug("acme", "widget"));
        assert_eq!(parse_slug("https://github.com/acme/widget"), slug("acme", "widget"));
        assert_eq!(parse_slug("git@github.com:acme/widget.git"), slug("acme", "widget"));
        assert_eq!(parse_slug("ssh://git@github.com/acme/widget.git"), slug("acme", "widget"));
        assert_eq!(parse_slug("git+https://github.com/acme/widget.git"), slug("acme", "widget"));
    }

    #[test]
    fn test_parse_slug_invalid() {
        assert_eq!(parse_slug("https://github.com/"), None);
        assert_eq!(parse_slug("https://github.com/widget"), None);
        assert_eq!(parse_slug("/local/path"), None);
    }

    #[test]
    fn test_remote_not_found() {
        let (temp, _raw) = init_repo();
        let repo = GitRepo::open(temp.path()).unwrap();
        let result = repo.remote_url("nonexistent");
        assert!(matches!(result, Err(GitError::RemoteNotFound(_))));
        assert!(repo.origin_slug().unwrap().is_none());
    }

    #[test]
    fn test_origin_slug() {
        let (temp, raw) = init_repo();
        raw.remote("origin", "git@github.com:acme/widget.git").unwrap();
        let repo = GitRepo::open(temp.path()).unwrap();
        assert_eq!(repo.origin_slug().unwrap(), slug("acme", "widget"));
    }
}
