//! CLI definition and command handling

pub mod commands;
pub mod context;
pub mod output;
pub mod prompt;

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use bumpr_core::Config;

use commands::{
    ChangelogCommand, CommitCommand, CompletionsCommand, InitCommand, ReleaseCommand, RunCommand,
    TagCommand, VersionCommand,
};

/// bumpr - bump versions, write changelogs, commit, tag and release
#[derive(Debug, Parser)]
#[command(name = "bumpr")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Suppress output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Working directory
    #[arg(short = 'C', long, global = true)]
    pub directory: Option<PathBuf>,

    /// Configuration file path, or an inline JSON object
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Never prompt, take the non-interactive answer everywhere
    #[arg(long, global = true)]
    pub force: bool,

    /// Minimize terminal output
    #[arg(long, global = true)]
    pub silent: bool,

    /// Disable every lifecycle script
    #[arg(long, global = true)]
    pub no_scripts: bool,

    #[command(flatten)]
    pub scripts: ScriptOverrides,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Increment (major, minor, patch, ...) or explicit version for the full run
    pub target: Option<String>,
}

/// Per-stage script overrides
#[derive(Debug, Default, Args)]
pub struct ScriptOverrides {
    /// Script to run before bumping
    #[arg(long, global = true, value_name = "CMD")]
    pub prebump: Option<String>,

    /// Script to run after bumping
    #[arg(long, global = true, value_name = "CMD")]
    pub postbump: Option<String>,

    /// Script to run before updating the changelog
    #[arg(long, global = true, value_name = "CMD")]
    pub prechangelog: Option<String>,

    /// Script to run after updating the changelog
    #[arg(long, global = true, value_name = "CMD")]
    pub postchangelog: Option<String>,

    /// Script to run before committing
    #[arg(long, global = true, value_name = "CMD")]
    pub precommit: Option<String>,

    /// Script to run after committing
    #[arg(long, global = true, value_name = "CMD")]
    pub postcommit: Option<String>,

    /// Script to run before tagging
    #[arg(long, global = true, value_name = "CMD")]
    pub pretag: Option<String>,

    /// Script to run after tagging
    #[arg(long, global = true, value_name = "CMD")]
    pub posttag: Option<String>,

    /// Script to run before releasing
    #[arg(long, global = true, value_name = "CMD")]
    pub prerelease: Option<String>,

    /// Script to run after releasing
    #[arg(long, global = true, value_name = "CMD")]
    pub postrelease: Option<String>,
}

/// Output format for CLI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Write a default configuration file
    Init(InitCommand),

    /// Bump the version in every supported provider
    Version(VersionCommand),

    /// Create or update the changelog
    Changelog(ChangelogCommand),

    /// Commit all changes with the configured message
    Commit(CommitCommand),

    /// Tag HEAD with the configured tag name
    Tag(TagCommand),

    /// Publish a release for the current version
    Release(ReleaseCommand),

    /// Generate shell completions
    Completions(CompletionsCommand),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> anyhow::Result<()> {
        match self.command {
            Some(Commands::Init(ref cmd)) => cmd.execute(&self),
            Some(Commands::Version(ref cmd)) => cmd.execute(&self),
            Some(Commands::Changelog(ref cmd)) => cmd.execute(&self),
            Some(Commands::Commit(ref cmd)) => cmd.execute(&self),
            Some(Commands::Tag(ref cmd)) => cmd.execute(&self),
            Some(Commands::Release(ref cmd)) => cmd.execute(&self),
            Some(Commands::Completions(ref cmd)) => cmd.execute(&self),
            None => RunCommand::new(self.target.clone()).execute(&self),
        }
    }

    /// Directory the command works in
    pub fn working_dir(&self) -> std::io::Result<PathBuf> {
        match &self.directory {
            Some(dir) => Ok(dir.clone()),
            None => std::env::current_dir(),
        }
    }

    /// Apply command-line switches on top of the loaded configuration
    pub fn apply_overrides(&self, config: &mut Config) {
        if self.force {
            config.force = true;
        }
        if self.silent {
            config.silent = true;
        }
        if self.no_scripts {
            config.scripts.enabled = false;
        }

        let scripts = &mut config.scripts;
        let overrides = [
            (&self.scripts.prebump, &mut scripts.prebump),
            (&self.scripts.postbump, &mut scripts.postbump),
            (&self.scripts.prechangelog, &mut scripts.prechangelog),
            (&self.scripts.postchangelog, &mut scripts.postchangelog),
            (&self.scripts.precommit, &mut scripts.precommit),
            (&self.scripts.postcommit, &mut scripts.postcommit),
            (&self.scripts.pretag, &mut scripts.pretag),
            (&self.scripts.posttag, &mut scripts.posttag),
            (&self.scripts.prerelease, &mut scripts.prerelease),
            (&self.scripts.postrelease, &mut scripts.postrelease),
        ];
        for (value, slot) in overrides {
            if let Some(command) = value {
                *slot = command.clone();
            }
        }

        config.normalize();
    }
}
