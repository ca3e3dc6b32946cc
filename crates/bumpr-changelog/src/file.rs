//! The changelog file

use std::path::{Path, PathBuf};

use chrono::Utc;
use regex::{Regex, RegexBuilder};
use tracing::{debug, info, instrument};

use bumpr_core::config::{ChangelogConfig, TokensConfig};
use bumpr_core::error::{ChangelogError, Result};
use bumpr_core::fs;
use bumpr_git::Commit;
use bumpr_providers::Bump;

use crate::merge::{merge_section, normalize};
use crate::render::SectionRenderer;

/// A changelog on disk
#[derive(Debug, Clone)]
pub struct Changelog {
    path: PathBuf,
    config: ChangelogConfig,
    renderer: SectionRenderer,
}

impl Changelog {
    /// The changelog configured for a repository root
    pub fn new(root: &Path, config: &ChangelogConfig, tokens: &TokensConfig) -> Self {
        Self {
            path: root.join(&config.file),
            config: config.clone(),
            renderer: SectionRenderer::new(config.clone(), tokens.clone()),
        }
    }

    /// Path of the changelog file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Section renderer in use
    pub fn renderer(&self) -> &SectionRenderer {
        &self.renderer
    }

    /// Whether the file exists
    pub async fn exists(&self) -> bool {
        tokio::fs::try_exists(&self.path).await.unwrap_or(false)
    }

    /// Read the file, `None` when missing
    pub async fn read(&self) -> Result<Option<String>> {
        fs::read_optional(&self.path).await
    }

    /// Write normalized content, creating parent directories
    pub async fn write(&self, content: &str) -> Result<()> {
        fs::write(&self.path, &normalize(content))
            .await
            .map_err(|e| ChangelogError::WriteFailed(e.to_string()).into())
    }

    /// Merge `section` into the existing file
    pub async fn add(&self, section: &str) -> Result<()> {
        let existing = match self.read().await? {
            Some(content) if !content.is_empty() => content,
            _ => return Err(ChangelogError::Missing(self.path.clone()).into()),
        };

        let merged = merge_section(&existing, section);
        if merged == existing {
            debug!(path = %self.path.display(), "section already present");
            return Ok(());
        }
        self.write(&merged).await
    }

    /// Create the file from every bump in history
    #[instrument(skip(self, bumps), fields(path = %self.path.display(), bumps = bumps.len()))]
    pub async fn init(&self, bumps: &[Bump]) -> Result<()> {
        if bumps.is_empty() {
            return Err(ChangelogError::NoCommits.into());
        }

        self.write(&self.renderer.render_bumps(bumps)).await?;
        info!("created changelog");
        Ok(())
    }

    /// Add the section for `version` built from `commits` (newest first),
    /// dated now
    #[instrument(skip(self, commits), fields(path = %self.path.display(), commits = commits.len()))]
    pub async fn update(&self, version: &str, commits: &[Commit]) -> Result<()> {
        let section = self.renderer.render_section(version, commits, Utc::now());
        self.add(&section).await?;
        info!(version, "updated changelog");
        Ok(())
    }

    /// Body of the newest section: the text between the first and second
    /// version headers, or to the end of the file when there is only one
    pub async fn read_last_section(&self) -> Result<Option<String>> {
        let Some(content) = self.read().await? else {
            return Ok(None);
        };
        let Some(header) = self.header_regex() else {
            return Ok(None);
        };
        Ok(last_section(&content, &header))
    }

    fn header_regex(&self) -> Option<Regex> {
        header_regex(&self.config.version)
    }
}

/// Regex matching a rendered version header: the template with every
/// `[token]` replaced by a wildcard
fn header_regex(template: &str) -> Option<Regex> {
    let token = Regex::new(r"\\\[\w+\\\]").ok()?;
    let escaped = regex::escape(template.trim());
    let pattern = token.replace_all(&escaped, "(.*)");

    RegexBuilder::new(&format!("^{}$", pattern))
        .multi_line(true)
        .case_insensitive(true)
        .build()
        .ok()
}

fn last_section(content: &str, header: &Regex) -> Option<String> {
    let mut headers = header.find_iter(content);
    let first = headers.next()?;
    let end = headers.next().map_or(content.len(), |m| m.start());
    Some(content[first.end()..end].trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn commit(hash: &str, message: &str) -> Commit {
        let date = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Commit::new(hash, message, "Test", "test@example.com", date)
    }

    fn changelog(root: &Path) -> Changelog {
        Changelog::new(root, &ChangelogConfig::default(), &TokensConfig::default())
    }

    #[tokio::test]
    async fn test_add_requires_existing_file() {
        let temp = TempDir::new().unwrap();
        let result = changelog(temp.path()).add("### Version 1.0.0\n\n").await;
        assert!(matches!(
            result,
            Err(bumpr_core::BumprError::Changelog(ChangelogError::Missing(_)))
        ));
    }

    #[tokio::test]
    async fn test_init_requires_bumps() {
        let temp = TempDir::new().unwrap();
        let result = changelog(temp.path()).init(&[]).await;
        assert!(matches!(
            result,
            Err(bumpr_core::BumprError::Changelog(ChangelogError::NoCommits))
        ));
    }

    #[tokio::test]
    async fn test_init_then_update_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let changelog = changelog(temp.path());

        changelog
            .init(&[Bump::new("1.0.0", vec![commit("b", "Second"), commit("a", "First")])])
            .await
            .unwrap();
        let initial = changelog.read().await.unwrap().unwrap();
        assert_eq!(initial, "### Version 1.0.0\n- First\n- Second\n");

        let commits = vec![commit("c", "Third")];
        changelog.update("1.1.0", &commits).await.unwrap();
        let once = changelog.read().await.unwrap().unwrap();
        assert_eq!(
            once,
            "### Version 1.1.0\n- Third\n\n### Version 1.0.0\n- First\n- Second\n"
        );

        changelog.update("1.1.0", &commits).await.unwrap();
        let twice = changelog.read().await.unwrap().unwrap();
        assert_eq!(once, twice);
    }

    #[tokio::test]
    async fn test_write_creates_directories() {
        let temp = TempDir::new().unwrap();
        let config = ChangelogConfig {
            file: "docs/CHANGELOG.md".to_string(),
            ..Default::default()
        };
        let changelog = Changelog::new(temp.path(), &config, &TokensConfig::default());
        changelog.write("\n\n\n# Changes\n").await.unwrap();

        assert!(changelog.exists().await);
        assert_eq!(
            std::fs::read_to_string(temp.path().join("docs/CHANGELOG.md")).unwrap(),
            "\n# Changes\n"
        );
    }

    #[tokio::test]
    async fn test_read_last_section() {
        let temp = TempDir::new().unwrap();
        let changelog = changelog(temp.path());
        assert!(changelog.read_last_section().await.unwrap().is_none());

        changelog
            .write("### Version 1.1.0\n- Third\n\n### Version 1.0.0\n- First\n")
            .await
            .unwrap();
        assert_eq!(
            changelog.read_last_section().await.unwrap().as_deref(),
            Some("- Third")
        );
    }

    #[tokio::test]
    async fn test_read_last_section_single_header() {
        let temp = TempDir::new().unwrap();
        let changelog = changelog(temp.path());
        changelog.write("### Version 1.0.0\n- First\n- Second\n").await.unwrap();
        assert_eq!(
            changelog.read_last_section().await.unwrap().as_deref(),
            Some("- First\n- Second")
        );
    }

    #[test]
    fn test_header_regex_from_template() {
        let re = header_regex("## [[version]] - [version_date] (*)").unwrap();
        assert!(re.is_match("## [2.0.0] - 2024-01-01 (*)"));
        assert!(!re.is_match("## 2.0.0 - 2024-01-01"));

        let re = header_regex("### Version [version]").unwrap();
        assert!(re.is_match("### version 1.0.0"));
        assert!(!re.is_match("- ### Version 1.0.0"));
    }
}
