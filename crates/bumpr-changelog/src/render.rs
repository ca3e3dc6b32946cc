//! Section rendering

use std::sync::OnceLock;

use chrono::{DateTime, Local, Utc};
use regex::Regex;
use tracing::{debug, instrument};

use bumpr_core::config::{ChangelogConfig, TokensConfig};
use bumpr_core::{render, Tokens};
use bumpr_git::Commit;
use bumpr_providers::Bump;

fn merge_commit_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^(Merge PR|Merge pull request|Merge branch) ").ok())
        .as_ref()
}

fn decoration_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\s*\((?:HEAD(?: -> [^)]*)?|tag: [^)]*)\)\s*$").ok())
        .as_ref()
}

/// Whether a commit message looks like a merge commit
pub fn is_merge_commit(message: &str) -> bool {
    merge_commit_regex().is_some_and(|re| re.is_match(message))
}

/// Strip trailing ref decorations such as ` (HEAD -> main)` or ` (tag: v1.0.0)`
pub fn strip_decorations(message: &str) -> String {
    let mut message = message.to_string();
    if let Some(re) = decoration_regex() {
        while let Some(m) = re.find(&message) {
            message.truncate(m.start());
        }
    }
    message
}

/// Renders changelog sections from bumps
#[derive(Debug, Clone)]
pub struct SectionRenderer {
    config: ChangelogConfig,
    tokens: TokensConfig,
}

impl SectionRenderer {
    /// Create a renderer
    pub fn new(config: ChangelogConfig, tokens: TokensConfig) -> Self {
        Self { config, tokens }
    }

    /// Render one section. `commits` are newest first, as the grouping walk
    /// produces them; they are written oldest first. Seam commits and merge
    /// commits are skipped. A version without commits still gets a header;
    /// an empty header or commit template emits no line at all.
    #[instrument(skip(self, commits), fields(commits = commits.len()))]
    pub fn render_section(
        &self,
        version: &str,
        commits: &[Commit],
        version_date: DateTime<Utc>,
    ) -> String {
        let version_date = version_date
            .with_timezone(&Local)
            .format(&self.tokens.version_date.format)
            .to_string();
        let version_tokens = Tokens::new()
            .with("version", version)
            .with("version_date", version_date.as_str());

        let mut section = String::new();
        if !self.config.version.is_empty() {
            section.push_str(&render(&self.config.version, &version_tokens));
            section.push('\n');
        }

        let mut rendered = 0;
        if !self.config.commit.is_empty() {
            for commit in commits.iter().rev() {
                if commit.is_bump || is_merge_commit(&commit.message) {
                    continue;
                }
                let tokens = self.commit_tokens(commit, &version_tokens);
                section.push_str(&render(&self.config.commit, &tokens));
                section.push('\n');
                rendered += 1;
            }
        }

        section.push_str(&self.config.separator);
        debug!(version, rendered, "rendered changelog section");
        section
    }

    /// Render a historical bump, dated by its newest commit
    pub fn render_bump(&self, bump: &Bump) -> String {
        let date = bump.commits.first().map_or_else(Utc::now, |c| c.date);
        self.render_section(&bump.version, &bump.commits, date)
    }

    /// Render every bump, newest first
    pub fn render_bumps(&self, bumps: &[Bump]) -> String {
        bumps.iter().map(|bump| self.render_bump(bump)).collect()
    }

    fn commit_tokens(&self, commit: &Commit, version_tokens: &Tokens) -> Tokens {
        let date = commit
            .date
            .with_timezone(&Local)
            .format(&self.tokens.date.format)
            .to_string();

        let mut tokens = Tokens::new()
            .with("date", date)
            .with("message", strip_decorations(&commit.message))
            .with("hash", commit.hash.as_str())
            .with("hash4", commit.short_hash(4))
            .with("hash7", commit.short_hash(7))
            .with("hash8", commit.short_hash(8))
            .with("author_name", commit.author_name.as_str())
            .with("author_email", commit.author_email.as_str());
        for (name, value) in version_tokens.iter() {
            tokens.insert(name, value);
        }
        tokens
    }
}
