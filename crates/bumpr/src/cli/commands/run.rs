//! Full release run: version, changelog, commit, tag, release

use serde::Serialize;
use tracing::{info, instrument};

use crate::cli::context::Session;
use crate::cli::{output, Cli, OutputFormat};

use super::changelog::{self, ChangelogSummary};
use super::commit::{self, CommitSummary};
use super::release::{self, ReleaseSummary};
use super::tag::{self, TagSummary};
use super::version::{self, BumpSummary};

/// Every enabled stage, in order
#[derive(Debug)]
pub struct RunCommand {
    target: Option<String>,
}

/// Outcome of each stage that ran
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<BumpSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changelog: Option<ChangelogSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit: Option<CommitSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<TagSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release: Option<ReleaseSummary>,
}

impl RunCommand {
    /// A run towards `target`, an increment or a version
    pub fn new(target: Option<String>) -> Self {
        Self { target }
    }

    /// Execute the full run
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(target = ?self.target, "executing full run");
        let session = Session::open(cli)?;
        let rt = tokio::runtime::Runtime::new()?;
        let summary = rt.block_on(run(&session, self.target.as_deref()))?;

        if session.format == OutputFormat::Json {
            output::json(&summary)?;
        }
        Ok(())
    }
}

/// Run each enabled stage; the first failure stops the run and leaves
/// earlier stages' effects in place
#[instrument(skip(session))]
pub(crate) async fn run(session: &Session, target: Option<&str>) -> anyhow::Result<RunSummary> {
    let config = &session.config;
    let mut summary = RunSummary::default();

    let branch = session.repo.current_branch()?;
    info!(branch = ?branch, "starting release run");
    if config.commit.enabled && !session.repo.is_clean()? {
        session.warning("Uncommitted changes will be included in the release commit");
    }

    if config.version.enabled {
        summary.version = Some(version::bump(session, target).await?);
    }
    if config.changelog.enabled {
        summary.changelog = Some(changelog::update(session).await?);
    }
    if config.commit.enabled {
        summary.commit = Some(commit::commit(session).await?);
    }
    if config.tag.enabled {
        summary.tag = Some(tag::tag(session).await?);
    }
    if config.release.enabled {
        summary.release = Some(release::release(session).await?);
    }

    Ok(summary)
}
