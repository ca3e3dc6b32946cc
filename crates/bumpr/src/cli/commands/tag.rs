//! Tag command

use clap::Args;
use serde::Serialize;
use tracing::{info, instrument};

use bumpr_core::HookStage;

use crate::cli::context::Session;
use crate::cli::{output, Cli, OutputFormat};

/// Tag HEAD with the configured tag name
#[derive(Debug, Args)]
pub struct TagCommand {}

/// Outcome of the tag stage
#[derive(Debug, Clone, Serialize)]
pub struct TagSummary {
    pub version: String,
    pub tag: String,
}

impl TagCommand {
    /// Execute the tag command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!("executing tag command");
        let session = Session::open(cli)?;
        let rt = tokio::runtime::Runtime::new()?;
        let summary = rt.block_on(tag(&session))?;

        if session.format == OutputFormat::Json {
            output::json(&summary)?;
        }
        Ok(())
    }
}

/// Run the tag stage: an annotated tag on HEAD
#[instrument(skip(session))]
pub(crate) async fn tag(session: &Session) -> anyhow::Result<TagSummary> {
    let version = session.registry.first_version().await?;
    let context = session.hook_context(&version);
    session.run_hook(HookStage::PreTag, &context)?;

    let name = session.tag_name(&version);
    session.repo.create_tag(&name)?;

    session.run_hook(HookStage::PostTag, &context)?;
    session.success(&format!("Tagged {}", output::tag_style().apply_to(&name)));

    Ok(TagSummary { version, tag: name })
}
