//! Per-invocation state shared by the stage commands

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use bumpr_changelog::Changelog;
use bumpr_core::config::load_layered;
use bumpr_core::{render, Config, HookContext, HookRunner, HookStage, Tokens};
use bumpr_git::{GitHistory, GitRepo};
use bumpr_providers::ProviderRegistry;

use super::{output, Cli, OutputFormat};

/// Everything a stage needs: configuration, repository, providers, scripts
pub struct Session {
    root: PathBuf,
    pub config: Config,
    pub repo: GitRepo,
    pub registry: ProviderRegistry,
    pub changelog: Changelog,
    pub format: OutputFormat,
    quiet: bool,
    hooks: HookRunner,
}

impl Session {
    /// Open the repository containing the working directory and load its
    /// configuration, with command-line overrides applied
    pub fn open(cli: &Cli) -> anyhow::Result<Self> {
        let dir = cli.working_dir()?;
        let repo = GitRepo::discover(&dir)?;
        let root = repo.path().to_path_buf();

        let (mut config, sources) = load_layered(&dir, cli.config.as_deref())?;
        cli.apply_overrides(&mut config);
        debug!(files = ?sources.files, inline = sources.inline, "configuration sources");

        let history = Arc::new(GitHistory::discover(&root)?);
        let registry = ProviderRegistry::for_repository(&root, history, &config)?;
        let hooks = HookRunner::from_config(&config.scripts, &root);
        let changelog = Changelog::new(&root, &config.changelog, &config.tokens);

        info!(root = %root.display(), providers = ?registry.names(), "session opened");
        Ok(Self {
            quiet: cli.quiet || config.silent,
            format: cli.format,
            root,
            config,
            repo,
            registry,
            changelog,
            hooks,
        })
    }

    /// Repository root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether prompts are allowed
    pub fn interactive(&self) -> bool {
        !self.config.force
    }

    /// Whether human-readable progress should be printed
    pub fn chatty(&self) -> bool {
        !self.quiet && self.format == OutputFormat::Text
    }

    /// Tokens available to the commit message and tag name templates
    pub fn tokens(&self, version: &str) -> Tokens {
        Tokens::new().with("version", version)
    }

    /// Rendered commit message for `version`
    pub fn commit_message(&self, version: &str) -> String {
        render(&self.config.commit.message, &self.tokens(version))
    }

    /// Rendered tag name for `version`
    pub fn tag_name(&self, version: &str) -> String {
        render(&self.config.tag.name, &self.tokens(version))
    }

    /// Values exported to scripts for `version`
    pub fn hook_context(&self, version: &str) -> HookContext {
        HookContext::new()
            .with_version(version)
            .with_tag(self.tag_name(version))
    }

    /// Run the script for `stage`, echoing its output
    pub fn run_hook(&self, stage: HookStage, context: &HookContext) -> anyhow::Result<()> {
        if let Some(result) = self.hooks.run(stage, context)? {
            if self.chatty() && !result.stdout.trim().is_empty() {
                print!("{}", result.stdout);
            }
        }
        Ok(())
    }

    /// Print a success line unless output is suppressed
    pub fn success(&self, message: &str) {
        if self.chatty() {
            output::success(message);
        }
    }

    /// Print a warning line unless output is suppressed
    pub fn warning(&self, message: &str) {
        if self.chatty() {
            output::warning(message);
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;

    #[test]
    fn test_session_renders_templates() {
        let (temp, _repo) = versioned_repo("[tag]\nname = \"release-[version]\"\n");
        let session = open_session(temp.path(), &[]);

        assert!(!session.interactive());
        assert!(!session.chatty());
        assert_eq!(session.commit_message("1.2.0"), "Bumped version to 1.2.0");
        assert_eq!(session.tag_name("1.2.0"), "release-1.2.0");
        assert_eq!(session.registry.names()[0], "files");

        let context = session.hook_context("1.2.0");
        assert_eq!(context.tag.as_deref(), Some("release-1.2.0"));
    }

    #[test]
    fn test_session_hooks_fail_the_stage() {
        let (temp, _repo) = versioned_repo("");
        let session = open_session(temp.path(), &["--pretag", "exit 3"]);
        let result = session.run_hook(bumpr_core::HookStage::PreTag, &session.hook_context("1.0.0"));
        assert!(result.is_err());

        let session = open_session(temp.path(), &["--pretag", "exit 3", "--no-scripts"]);
        assert!(session
            .run_hook(bumpr_core::HookStage::PreTag, &session.hook_context("1.0.0"))
            .is_ok());
    }
}
