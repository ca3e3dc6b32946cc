//! Commit command

use clap::Args;
use serde::Serialize;
use tracing::{info, instrument};

use bumpr_core::HookStage;

use crate::cli::context::Session;
use crate::cli::{output, Cli, OutputFormat};

/// Commit all changes with the configured message
#[derive(Debug, Args)]
pub struct CommitCommand {}

/// Outcome of the commit stage
#[derive(Debug, Clone, Serialize)]
pub struct CommitSummary {
    pub version: String,
    pub message: String,
    pub hash: String,
}

impl CommitCommand {
    /// Execute the commit command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!("executing commit command");
        let session = Session::open(cli)?;
        let rt = tokio::runtime::Runtime::new()?;
        let summary = rt.block_on(commit(&session))?;

        if session.format == OutputFormat::Json {
            output::json(&summary)?;
        }
        Ok(())
    }
}

/// Run the commit stage: stage everything and commit it
#[instrument(skip(session))]
pub(crate) async fn commit(session: &Session) -> anyhow::Result<CommitSummary> {
    let version = session.registry.first_version().await?;
    let context = session.hook_context(&version);
    session.run_hook(HookStage::PreCommit, &context)?;

    let message = session.commit_message(&version);
    let hash = session.repo.commit_all(&message)?;

    session.run_hook(HookStage::PostCommit, &context)?;
    session.success(&format!("Committed \"{}\"", message));

    Ok(CommitSummary {
        version,
        message,
        hash,
    })
}
