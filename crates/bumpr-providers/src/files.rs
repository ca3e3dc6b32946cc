//! Regex-driven version files

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::try_join_all;
use tracing::{debug, info, instrument, warn};

use bumpr_core::config::{CompiledRule, FileEntry, FileRule};
use bumpr_core::error::{ProviderError, Result};
use bumpr_core::fs;
use bumpr_git::{Commit, History};

use crate::traits::VersionProvider;

/// A file and the rules that locate its version
#[derive(Debug, Clone)]
pub struct VersionFile {
    /// Path relative to the repository root
    pub path: String,
    rules: Vec<CompiledRule>,
}

impl VersionFile {
    /// First version any rule extracts from `content`
    pub fn extract(&self, content: &str) -> Option<String> {
        self.rules
            .iter()
            .find_map(|rule| rule.extract(content))
            .map(str::to_string)
    }

    /// Apply every rule in order
    pub fn apply(&self, content: &str, version: &str) -> String {
        self.rules
            .iter()
            .fold(content.to_string(), |acc, rule| rule.apply(&acc, version))
    }
}

/// Reads and writes versions through a table of files and regex rules
pub struct FilesProvider {
    name: &'static str,
    root: PathBuf,
    history: Arc<dyn History>,
    files: Vec<VersionFile>,
    initial: String,
}

impl FilesProvider {
    /// Compile a `files` table. Paths are visited in table order.
    pub fn new(
        root: impl Into<PathBuf>,
        history: Arc<dyn History>,
        table: &BTreeMap<String, FileEntry>,
        initial: impl Into<String>,
    ) -> std::result::Result<Self, ProviderError> {
        let files = table.iter().map(|(path, entry)| (path.clone(), entry.rules()));
        Self::from_rules(root, history, files, initial)
    }

    /// Compile rules for files given in priority order
    pub fn from_rules(
        root: impl Into<PathBuf>,
        history: Arc<dyn History>,
        files: impl IntoIterator<Item = (String, Vec<FileRule>)>,
        initial: impl Into<String>,
    ) -> std::result::Result<Self, ProviderError> {
        let files = files
            .into_iter()
            .map(|(path, rules)| {
                let rules = rules
                    .iter()
                    .map(|rule| rule.compile(&path))
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(VersionFile { path, rules })
            })
            .collect::<std::result::Result<Vec<_>, ProviderError>>()?;

        Ok(Self {
            name: "files",
            root: root.into(),
            history,
            files,
            initial: initial.into(),
        })
    }

    /// Set the provider name
    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Drop files for which `exclude` returns true
    pub fn without(mut self, exclude: impl Fn(&str) -> bool) -> Self {
        self.files.retain(|file| !exclude(&file.path));
        self
    }

    /// Repository root the paths are relative to
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Managed files, in order
    pub fn files(&self) -> &[VersionFile] {
        &self.files
    }

    /// Whether any managed file exists in the working tree with content
    pub async fn any_file_present(&self) -> bool {
        for file in &self.files {
            match fs::read_optional(&self.root.join(&file.path)).await {
                Ok(Some(content)) if !content.is_empty() => return true,
                Ok(_) => {}
                Err(e) => debug!(path = %file.path, error = %e, "unreadable version file"),
            }
        }
        false
    }

    async fn update_file(&self, file: &VersionFile, version: &str) -> Result<()> {
        let path = self.root.join(&file.path);
        let failed = |e: bumpr_core::BumprError| ProviderError::UpdateFailed {
            path: file.path.clone(),
            message: e.to_string(),
        };

        let content = match fs::read_optional(&path).await.map_err(failed)? {
            Some(content) if !content.is_empty() => content,
            _ => {
                debug!(path = %file.path, "skipping missing or empty file");
                return Ok(());
            }
        };

        let updated = file.apply(&content, version);
        if updated.is_empty() {
            warn!(path = %file.path, "refusing to write empty file");
            return Ok(());
        }
        if updated != content {
            fs::write(&path, &updated).await.map_err(failed)?;
            info!(path = %file.path, version, "updated version file");
        }
        Ok(())
    }
}

#[async_trait]
impl VersionProvider for FilesProvider {
    fn name(&self) -> &'static str {
        self.name
    }

    fn history(&self) -> &dyn History {
        self.history.as_ref()
    }

    fn initial_version(&self) -> &str {
        &self.initial
    }

    async fn is_supported(&self) -> bool {
        self.any_file_present().await
    }

    async fn working_version(&self) -> Option<String> {
        for file in &self.files {
            match fs::read_optional(&self.root.join(&file.path)).await {
                Ok(Some(content)) => {
                    if let Some(version) = file.extract(&content) {
                        return Some(version);
                    }
                }
                Ok(None) => {}
                Err(e) => warn!(path = %file.path, error = %e, "failed to read version file"),
            }
        }
        None
    }

    async fn get_version_by_commit(&self, commit: Option<&Commit>) -> String {
        let Some(commit) = commit else {
            return self.initial.clone();
        };

        for file in &self.files {
            if let Some(content) = self.history.show_file_at(&commit.hash, &file.path).await {
                if let Some(version) = file.extract(&content) {
                    return version;
                }
            }
        }
        self.initial.clone()
    }

    #[instrument(skip(self), fields(provider = self.name, files = self.files.len()))]
    async fn update_version(&self, version: &str) -> Result<()> {
        try_join_all(self.files.iter().map(|file| self.update_file(file, version))).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bumps::test_support::FakeHistory;
    use bumpr_core::config::RuleSpec;
    use bumpr_core::Increment;
    use tempfile::TempDir;

    fn table(entries: &[(&str, &str, &str, &str)]) -> BTreeMap<String, FileEntry> {
        entries
            .iter()
            .map(|(path, pattern, replacement, flags)| {
                (
                    path.to_string(),
                    FileEntry::One(RuleSpec::Table(FileRule::new(*pattern, *replacement, *flags))),
                )
            })
            .collect()
    }

    fn provider(root: &Path, history: FakeHistory) -> FilesProvider {
        FilesProvider::new(
            root,
            Arc::new(history),
            &table(&[
                ("VERSION", r"^(\d+\.\d+\.\d+.*)$", "[version]", "m"),
                ("src/version.rs", r#"VERSION: &str = "([^"]*)""#, r#"VERSION: &str = "[version]""#, "g"),
            ]),
            "0.0.0",
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_working_version() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("VERSION"), "1.4.2\n").unwrap();

        let provider = provider(temp.path(), FakeHistory::new(&[]));
        assert!(provider.is_supported().await);
        assert_eq!(provider.get_version().await, "1.4.2");
    }

    #[tokio::test]
    async fn test_empty_file_is_not_supported() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("VERSION"), "").unwrap();

        let provider = provider(temp.path(), FakeHistory::new(&[]));
        assert!(!provider.is_supported().await);

        std::fs::write(temp.path().join("VERSION"), "0.1.0\n").unwrap();
        assert!(provider.is_supported().await);
    }

    #[tokio::test]
    async fn test_version_falls_back_to_history_then_initial() {
        let temp = TempDir::new().unwrap();
        let history = FakeHistory::new(&[("abc", "Bumped", "2.0.0")]);
        let with_history = provider(temp.path(), history);

        assert!(!with_history.is_supported().await);
        assert_eq!(with_history.get_version().await, "2.0.0");

        let empty = provider(temp.path(), FakeHistory::new(&[]));
        assert_eq!(empty.get_version().await, "0.0.0");
    }

    #[tokio::test]
    async fn test_version_by_commit_fallback() {
        let temp = TempDir::new().unwrap();
        let history = FakeHistory::new(&[("abc", "no version here", "")]);
        let provider = provider(temp.path(), history);

        assert_eq!(provider.get_version_by_commit(None).await, "0.0.0");
        let commit = provider.history().log(0, 1).await.remove(0);
        assert_eq!(provider.get_version_by_commit(Some(&commit)).await, "0.0.0");
    }

    #[tokio::test]
    async fn test_update_version_rewrites_all_files() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("src")).unwrap();
        std::fs::write(temp.path().join("VERSION"), "1.0.0\n").unwrap();
        std::fs::write(
            temp.path().join("src/version.rs"),
            "pub const VERSION: &str = \"1.0.0\";\n",
        )
        .unwrap();

        let provider = provider(temp.path(), FakeHistory::new(&[]));
        let next = provider.bump(Increment::Minor, None).await.unwrap();
        assert_eq!(next.as_deref(), Some("1.1.0"));

        assert_eq!(std::fs::read_to_string(temp.path().join("VERSION")).unwrap(), "1.1.0\n");
        assert_eq!(
            std::fs::read_to_string(temp.path().join("src/version.rs")).unwrap(),
            "pub const VERSION: &str = \"1.1.0\";\n"
        );
    }

    #[tokio::test]
    async fn test_update_skips_missing_files() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("VERSION"), "1.0.0").unwrap();

        let provider = provider(temp.path(), FakeHistory::new(&[]));
        provider.update_version("3.0.0").await.unwrap();

        assert_eq!(std::fs::read_to_string(temp.path().join("VERSION")).unwrap(), "3.0.0");
        assert!(!temp.path().join("src/version.rs").exists());
    }

    #[tokio::test]
    async fn test_bump_explicit_version() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("VERSION"), "1.0.0").unwrap();

        let provider = provider(temp.path(), FakeHistory::new(&[]));
        let next = provider.bump(Increment::Custom, Some("5.0.0-rc.1")).await.unwrap();
        assert_eq!(next.as_deref(), Some("5.0.0-rc.1"));
        assert_eq!(provider.get_version().await, "5.0.0-rc.1");
    }

    #[tokio::test]
    async fn test_bump_unparsable_version_is_noop() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("VERSION"), "banana").unwrap();
        let provider = FilesProvider::new(
            temp.path(),
            Arc::new(FakeHistory::new(&[])),
            &table(&[("VERSION", "^(.+)$", "[version]", "m")]),
            "0.0.0",
        )
        .unwrap();

        assert_eq!(provider.bump(Increment::Patch, None).await.unwrap(), None);
        assert_eq!(std::fs::read_to_string(temp.path().join("VERSION")).unwrap(), "banana");
    }

    fn git_commit(repo: &git2::Repository, file: &str, content: &str, message: &str) {
        let root = repo.workdir().unwrap();
        std::fs::write(root.join(file), content).unwrap();
        let mut index = repo.index().unwrap();
        index.add_path(Path::new(file)).unwrap();
        index.write().unwrap();

        let sig = git2::Signature::now("Test", "test@example.com").unwrap();
        let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
        let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();
        repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .unwrap();
    }

    #[tokio::test]
    async fn test_bumps_from_git_history() {
        let temp = TempDir::new().unwrap();
        let repo = git2::Repository::init(temp.path()).unwrap();
        git_commit(&repo, "VERSION", "1.0.0\n", "Bumped to 1.0.0");
        git_commit(&repo, "README.md", "hello", "Add feature");
        git_commit(&repo, "VERSION", "1.1.0\n", "Bumped to 1.1.0");
        git_commit(&repo, "README.md", "hello again", "Fix bug");

        let history = bumpr_git::GitHistory::discover(temp.path()).unwrap();
        let provider = provider(temp.path(), FakeHistory::new(&[]));
        let provider = FilesProvider {
            history: Arc::new(history),
            ..provider
        };

        assert_eq!(provider.get_version().await, "1.1.0");

        let latest = provider.commits_bumps(Some(1)).await;
        assert_eq!(latest.len(), 1);
        assert_eq!(latest[0].version, "1.1.0");
        let messages: Vec<&str> = latest[0].commits.iter().map(|c| c.message.as_str()).collect();
        assert_eq!(messages, vec!["Fix bug"]);

        let all = provider.commits_bumps(None).await;
        assert_eq!(all.len(), 2);
        let messages: Vec<&str> = all[1].commits.iter().map(|c| c.message.as_str()).collect();
        assert_eq!(messages, vec!["Bumped to 1.1.0", "Add feature", "Bumped to 1.0.0"]);
        assert!(all[1].commits[0].is_bump);
    }

    #[tokio::test]
    async fn test_no_changes_since_bump_commit() {
        let temp = TempDir::new().unwrap();
        let repo = git2::Repository::init(temp.path()).unwrap();
        git_commit(&repo, "VERSION", "1.0.0\n", "Bumped to 1.0.0");
        git_commit(&repo, "VERSION", "1.1.0\n", "Bumped to 1.1.0");

        let history = bumpr_git::GitHistory::discover(temp.path()).unwrap();
        let provider = FilesProvider {
            history: Arc::new(history),
            ..provider(temp.path(), FakeHistory::new(&[]))
        };

        // The seam is popped before the limit stops the walk
        let latest = provider.commits_bumps(Some(1)).await;
        assert_eq!(latest.len(), 1);
        assert!(latest[0].commits.is_empty());
    }

    #[test]
    fn test_invalid_pattern() {
        let result = FilesProvider::new(
            "/tmp",
            Arc::new(FakeHistory::new(&[])),
            &table(&[("VERSION", "(unclosed", "[version]", "g")]),
            "0.0.0",
        );
        assert!(matches!(result, Err(ProviderError::InvalidPattern { .. })));
    }

    #[test]
    fn test_without() {
        let provider = provider(Path::new("/tmp"), FakeHistory::new(&[])).without(|p| p == "VERSION");
        let paths: Vec<&str> = provider.files().iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["src/version.rs"]);
    }
}
