//! Changelog command

use clap::Args;
use serde::Serialize;
use tracing::{info, instrument};

use bumpr_core::error::ChangelogError;
use bumpr_core::{BumprError, HookStage};

use crate::cli::context::Session;
use crate::cli::{output, prompt, Cli, OutputFormat};

/// Create or update the changelog
#[derive(Debug, Args)]
pub struct ChangelogCommand {}

/// What the changelog stage did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangelogAction {
    /// Written from the whole history
    Created,
    /// Newest section merged in
    Updated,
    /// File missing and creation not wanted
    Skipped,
}

/// Outcome of the changelog stage
#[derive(Debug, Clone, Serialize)]
pub struct ChangelogSummary {
    pub path: String,
    pub action: ChangelogAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl ChangelogCommand {
    /// Execute the changelog command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!("executing changelog command");
        let session = Session::open(cli)?;
        let rt = tokio::runtime::Runtime::new()?;
        let summary = rt.block_on(update(&session))?;

        if session.format == OutputFormat::Json {
            output::json(&summary)?;
        }
        Ok(())
    }
}

/// Run the changelog stage: create the file from history when it is missing,
/// otherwise merge the section for the current version
#[instrument(skip(session))]
pub(crate) async fn update(session: &Session) -> anyhow::Result<ChangelogSummary> {
    let changelog = &session.changelog;
    let path = changelog.path().display().to_string();
    let create = session.config.changelog.create;

    let exists = changelog.exists().await;
    if !exists {
        if !create && !session.interactive() {
            info!(%path, "changelog missing, skipping");
            return Ok(ChangelogSummary {
                path,
                action: ChangelogAction::Skipped,
                version: None,
            });
        }
        if !create && !prompt::confirm("No changelog found, do you want to create it?", true)? {
            return Err(BumprError::from(ChangelogError::Missing(changelog.path().to_path_buf())).into());
        }
    }

    let version = session.registry.first_version().await?;
    let context = session.hook_context(&version);
    session.run_hook(HookStage::PreChangelog, &context)?;

    let action = if exists {
        let bumps = session.registry.first_bumps(Some(1)).await?;
        let commits = bumps.first().map(|bump| bump.commits.as_slice()).unwrap_or_default();
        changelog.update(&version, commits).await?;
        ChangelogAction::Updated
    } else {
        let bumps = session.registry.first_bumps(None).await?;
        changelog.init(&bumps).await?;
        ChangelogAction::Created
    };

    session.run_hook(HookStage::PostChangelog, &context)?;

    let verb = match action {
        ChangelogAction::Created => "Created",
        _ => "Updated",
    };
    session.success(&format!(
        "{} changelog {}",
        verb,
        output::path_style().apply_to(&path)
    ));

    Ok(ChangelogSummary {
        path,
        action,
        version: Some(version),
    })
}
