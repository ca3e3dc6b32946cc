//! Lifecycle scripts
//!
//! Each release step (bump, changelog, commit, tag, release) can run a shell
//! command before and after it. Scripts run from the repository root with the
//! new version in `BUMPR_VERSION`; a failing script aborts the command.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, info, instrument};

use crate::config::ScriptsConfig;
use crate::error::{HookError, Result};

/// Script lifecycle stages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookStage {
    PreBump,
    PostBump,
    PreChangelog,
    PostChangelog,
    PreCommit,
    PostCommit,
    PreTag,
    PostTag,
    PreRelease,
    PostRelease,
}

impl HookStage {
    /// Get the stage name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PreBump => "prebump",
            Self::PostBump => "postbump",
            Self::PreChangelog => "prechangelog",
            Self::PostChangelog => "postchangelog",
            Self::PreCommit => "precommit",
            Self::PostCommit => "postcommit",
            Self::PreTag => "pretag",
            Self::PostTag => "posttag",
            Self::PreRelease => "prerelease",
            Self::PostRelease => "postrelease",
        }
    }

    /// Parse stage from string
    pub fn parse(s: &str) -> Option<Self> {
        Self::all().iter().copied().find(|stage| stage.as_str() == s)
    }

    /// Get all stages in order
    pub fn all() -> &'static [HookStage] {
        &[
            Self::PreBump,
            Self::PostBump,
            Self::PreChangelog,
            Self::PostChangelog,
            Self::PreCommit,
            Self::PostCommit,
            Self::PreTag,
            Self::PostTag,
            Self::PreRelease,
            Self::PostRelease,
        ]
    }

    /// The configured script for this stage
    pub fn script<'a>(&self, scripts: &'a ScriptsConfig) -> &'a str {
        match self {
            Self::PreBump => &scripts.prebump,
            Self::PostBump => &scripts.postbump,
            Self::PreChangelog => &scripts.prechangelog,
            Self::PostChangelog => &scripts.postchangelog,
            Self::PreCommit => &scripts.precommit,
            Self::PostCommit => &scripts.postcommit,
            Self::PreTag => &scripts.pretag,
            Self::PostTag => &scripts.posttag,
            Self::PreRelease => &scripts.prerelease,
            Self::PostRelease => &scripts.postrelease,
        }
    }
}

/// A script to execute
#[derive(Debug, Clone)]
pub struct Hook {
    /// The command to run
    pub command: String,
    /// Environment variables to set
    pub env: HashMap<String, String>,
}

impl Hook {
    /// Create a new hook with just a command
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            env: HashMap::new(),
        }
    }

    /// Add an environment variable
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }
}

/// Result of executing a hook
#[derive(Debug, Clone)]
pub struct HookResult {
    /// The stage that was executed
    pub stage: HookStage,
    /// The command that was run
    pub command: String,
    /// Exit code if available
    pub exit_code: Option<i32>,
    /// Standard output
    pub stdout: String,
    /// Standard error
    pub stderr: String,
    /// Execution time in milliseconds
    pub duration_ms: u64,
}

/// Values exported to scripts
#[derive(Debug, Clone, Default)]
pub struct HookContext {
    /// Version being released
    pub version: Option<String>,
    /// Tag name for the version
    pub tag: Option<String>,
}

impl HookContext {
    /// Create a new hook context
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the version
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Set the tag
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Convert context to environment variables
    pub fn to_env(&self, stage: HookStage) -> HashMap<String, String> {
        let mut env = HashMap::new();
        env.insert("BUMPR_STAGE".to_string(), stage.as_str().to_string());

        if let Some(ref v) = self.version {
            env.insert("BUMPR_VERSION".to_string(), v.clone());
        }
        if let Some(ref v) = self.tag {
            env.insert("BUMPR_TAG".to_string(), v.clone());
        }

        env
    }
}

/// Runs the script registered for a stage
#[derive(Debug, Clone, Default)]
pub struct HookRunner {
    hooks: HashMap<HookStage, Hook>,
    base_dir: Option<PathBuf>,
}

impl HookRunner {
    /// Create an empty runner
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a runner from configured scripts; disabled scripts register nothing
    pub fn from_config(scripts: &ScriptsConfig, base_dir: &Path) -> Self {
        let mut runner = Self::new().with_base_dir(base_dir);
        if !scripts.enabled {
            debug!("scripts disabled");
            return runner;
        }

        for stage in HookStage::all() {
            let command = stage.script(scripts).trim();
            if !command.is_empty() {
                runner.register(*stage, Hook::new(command));
            }
        }
        runner
    }

    /// Set the base directory
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    /// Register the hook for a stage, replacing any previous one
    pub fn register(&mut self, stage: HookStage, hook: Hook) {
        self.hooks.insert(stage, hook);
    }

    /// Check if there is a hook for a stage
    pub fn has_hook(&self, stage: HookStage) -> bool {
        self.hooks.contains_key(&stage)
    }

    /// Execute the hook for a stage, if any
    #[instrument(skip_all, fields(stage = stage.as_str()))]
    pub fn run(&self, stage: HookStage, context: &HookContext) -> Result<Option<HookResult>> {
        let Some(hook) = self.hooks.get(&stage) else {
            return Ok(None);
        };

        info!(command = %hook.command, "running script");
        let result = self.execute_hook(stage, hook, &context.to_env(stage))?;

        if result.exit_code != Some(0) {
            let message = match result.exit_code {
                Some(code) => format!("exited with code {}: {}", code, result.stderr.trim()),
                None => "terminated by signal".to_string(),
            };
            return Err(HookError::ExecutionFailed {
                stage: stage.as_str().to_string(),
                command: hook.command.clone(),
                message,
            }
            .into());
        }

        debug!(duration_ms = result.duration_ms, "script finished");
        Ok(Some(result))
    }

    fn execute_hook(
        &self,
        stage: HookStage,
        hook: &Hook,
        context_env: &HashMap<String, String>,
    ) -> Result<HookResult> {
        let start = std::time::Instant::now();

        let shell = if cfg!(windows) { "cmd" } else { "sh" };
        let shell_arg = if cfg!(windows) { "/C" } else { "-c" };

        let mut cmd = Command::new(shell);
        cmd.arg(shell_arg).arg(&hook.command);

        if let Some(dir) = &self.base_dir {
            cmd.current_dir(dir);
        }

        cmd.envs(context_env);
        cmd.envs(&hook.env);

        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let output = cmd.output().map_err(|e| HookError::ExecutionFailed {
            stage: stage.as_str().to_string(),
            command: hook.command.clone(),
            message: e.to_string(),
        })?;

        Ok(HookResult {
            stage,
            command: hook.command.clone(),
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }
}
