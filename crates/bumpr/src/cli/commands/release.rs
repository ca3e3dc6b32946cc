//! Release command

use std::time::Duration;

use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{info, instrument, warn};

use bumpr_core::HookStage;
use bumpr_release::{collect_assets, GitHubReleaser, ReleaseRequest};

use crate::cli::context::Session;
use crate::cli::{output, Cli, OutputFormat};

/// Publish a release for the current version
#[derive(Debug, Args)]
pub struct ReleaseCommand {}

/// Outcome of the release stage
#[derive(Debug, Clone, Serialize)]
pub struct ReleaseSummary {
    pub version: String,
    pub tag: String,
    pub published: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub assets: Vec<String>,
}

impl ReleaseCommand {
    /// Execute the release command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!("executing release command");
        let session = Session::open(cli)?;
        let rt = tokio::runtime::Runtime::new()?;
        let summary = rt.block_on(release(&session))?;

        if session.format == OutputFormat::Json {
            output::json(&summary)?;
        }
        Ok(())
    }
}

/// Owner and repository detected from the origin remote
fn origin_fallback(session: &Session) -> Option<(String, String)> {
    match session.repo.origin_slug() {
        Ok(slug) => slug.map(|slug| (slug.owner, slug.repo)),
        Err(e) => {
            warn!(error = %e, "could not read origin remote");
            None
        }
    }
}

fn progress(session: &Session, assets: usize) -> ProgressBar {
    if !session.chatty() {
        return ProgressBar::hidden();
    }

    let bar = ProgressBar::new(assets as u64);
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.blue} {msg} [{pos}/{len}]") {
        bar.set_style(style);
    }
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

/// Run the release stage: create the GitHub release for the current tag and
/// upload the configured assets
#[instrument(skip(session))]
pub(crate) async fn release(session: &Session) -> anyhow::Result<ReleaseSummary> {
    let github = &session.config.release.github;
    let version = session.registry.first_version().await?;
    let tag = session.tag_name(&version);

    if !github.enabled {
        session.warning("No release provider enabled, skipping release");
        return Ok(ReleaseSummary {
            version,
            tag,
            published: false,
            url: None,
            assets: Vec::new(),
        });
    }

    let context = session.hook_context(&version);
    session.run_hook(HookStage::PreRelease, &context)?;

    let releaser = GitHubReleaser::new(github, origin_fallback(session))?;
    let body = session
        .changelog
        .read_last_section()
        .await?
        .unwrap_or_default();
    let request = ReleaseRequest::new(tag.clone(), body)
        .draft(github.draft)
        .prerelease(github.prerelease);
    let assets = collect_assets(session.root(), &github.files)?;

    let bar = progress(session, assets.len());
    bar.set_message(format!("Creating release {} on {}", tag, releaser.slug()));
    let created = releaser.create_release(&request).await?;
    for asset in &assets {
        bar.set_message(format!("Uploading {}", asset.display()));
        releaser.upload_asset(&created, asset).await?;
        bar.inc(1);
    }
    bar.finish_and_clear();

    session.run_hook(HookStage::PostRelease, &context)?;
    session.success(&format!("Released {}", output::tag_style().apply_to(&tag)));
    if session.chatty() {
        println!("{}", output::key_value("url", &created.html_url));
    }

    Ok(ReleaseSummary {
        version,
        tag,
        published: true,
        url: Some(created.html_url),
        assets: assets
            .iter()
            .map(|asset| asset.display().to_string())
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::context::test_support::*;
    use bumpr_release::ReleaseError;

    #[tokio::test]
    async fn test_release_disabled_is_skipped() {
        let (temp, _repo) = versioned_repo("");
        let session = open_session(temp.path(), &[]);

        let summary = release(&session).await.unwrap();
        assert!(!summary.published);
        assert_eq!(summary.tag, "v1.0.0");
    }

    #[tokio::test]
    async fn test_release_without_repository_fails_before_network() {
        let (temp, _repo) = versioned_repo(
            "[release.github]\nenabled = true\ntoken = \"secret\"\n",
        );
        let session = open_session(temp.path(), &[]);

        let err = release(&session).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ReleaseError>(),
            Some(ReleaseError::MissingRepository)
        ));
    }
}
