//! Version command

use clap::Args;
use serde::Serialize;
use tracing::{info, instrument};

use bumpr_core::error::VersionError;
use bumpr_core::{increment_version, normalize_version, BumpTarget, HookStage, Increment};

use crate::cli::context::Session;
use crate::cli::{output, prompt, Cli, OutputFormat};

/// Bump the version in every supported provider
#[derive(Debug, Args)]
pub struct VersionCommand {
    /// Increment (major, minor, patch, premajor, preminor, prepatch,
    /// prerelease, custom) or an explicit version
    pub target: Option<String>,
}

/// A version written by one provider
#[derive(Debug, Clone, Serialize)]
pub struct ProviderVersion {
    pub provider: &'static str,
    pub version: String,
}

/// Outcome of the version stage
#[derive(Debug, Clone, Serialize)]
pub struct BumpSummary {
    pub previous: String,
    pub version: String,
    pub increment: Increment,
    pub providers: Vec<ProviderVersion>,
}

impl VersionCommand {
    /// Execute the version command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(target = ?self.target, "executing version command");
        let session = Session::open(cli)?;
        let rt = tokio::runtime::Runtime::new()?;
        let summary = rt.block_on(bump(&session, self.target.as_deref()))?;

        if session.format == OutputFormat::Json {
            output::json(&summary)?;
        }
        Ok(())
    }
}

/// Turn the argument, or the user's answers, into an increment and an
/// optional explicit version
fn resolve_target(
    session: &Session,
    target: Option<&str>,
) -> anyhow::Result<(Increment, Option<String>)> {
    let target = match target {
        Some(arg) => BumpTarget::parse(arg)?,
        None if !session.interactive() => return Err(VersionError::MissingTarget.into()),
        None => BumpTarget::Increment(prompt::select_increment(
            &session.config.version.increments,
        )?),
    };

    match target {
        BumpTarget::Increment(Increment::Custom) => {
            if !session.interactive() {
                return Err(VersionError::MissingVersion.into());
            }
            Ok((Increment::Custom, Some(prompt::input_version()?)))
        }
        BumpTarget::Increment(increment) => Ok((increment, None)),
        BumpTarget::Version(version) => Ok((Increment::Custom, Some(normalize_version(&version)?))),
    }
}

/// Ask before bumping when nothing was committed since the last bump
async fn ensure_changes(session: &Session) -> anyhow::Result<()> {
    if !session.interactive() {
        return Ok(());
    }

    let bumps = session.registry.first_bumps(Some(1)).await?;
    let unchanged = bumps.first().map_or(true, |bump| bump.commits.is_empty());
    if unchanged {
        prompt::confirm_or_cancel("No changes since the last version, bump anyway?")?;
    }
    Ok(())
}

/// Run the version stage
#[instrument(skip(session))]
pub(crate) async fn bump(session: &Session, target: Option<&str>) -> anyhow::Result<BumpSummary> {
    let (increment, explicit) = resolve_target(session, target)?;
    ensure_changes(session).await?;

    let previous = session.registry.first_version().await?;
    let next = match &explicit {
        Some(version) => version.clone(),
        None => increment_version(&previous, increment).unwrap_or_else(|| previous.clone()),
    };

    session.run_hook(HookStage::PreBump, &session.hook_context(&next))?;
    let written = session
        .registry
        .bump_all(increment, explicit.as_deref())
        .await?;
    if written.is_empty() {
        session.warning(&format!("Could not increment version \"{}\"", previous));
    }

    let version = session.registry.first_version().await?;
    session.run_hook(HookStage::PostBump, &session.hook_context(&version))?;

    info!(%previous, %version, "version stage finished");
    session.success(&format!(
        "Bumped version {} → {}",
        previous,
        output::version_style().apply_to(&version)
    ));

    Ok(BumpSummary {
        previous,
        version,
        increment,
        providers: written
            .into_iter()
            .map(|(provider, version)| ProviderVersion { provider, version })
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::context::test_support::*;

    #[tokio::test]
    async fn test_bump_increment() {
        let (temp, _repo) = versioned_repo("");
        let session = open_session(temp.path(), &[]);

        let summary = bump(&session, Some("minor")).await.unwrap();
        assert_eq!(summary.previous, "1.0.0");
        assert_eq!(summary.version, "1.1.0");
        assert_eq!(summary.providers.len(), 1);
        assert_eq!(summary.providers[0].provider, "files");
        assert_eq!(
            std::fs::read_to_string(temp.path().join("VERSION")).unwrap(),
            "1.1.0\n"
        );
    }

    #[tokio::test]
    async fn test_bump_explicit_version() {
        let (temp, _repo) = versioned_repo("");
        let session = open_session(temp.path(), &[]);

        let summary = bump(&session, Some("v2")).await.unwrap();
        assert_eq!(summary.increment, Increment::Custom);
        assert_eq!(summary.version, "2.0.0");
    }

    #[tokio::test]
    async fn test_bump_requires_target_without_prompts() {
        let (temp, _repo) = versioned_repo("");
        let session = open_session(temp.path(), &[]);

        let err = bump(&session, None).await.unwrap_err();
        assert!(matches!(err.downcast_ref::<VersionError>(), Some(VersionError::MissingTarget)));

        let err = bump(&session, Some("custom")).await.unwrap_err();
        assert!(matches!(err.downcast_ref::<VersionError>(), Some(VersionError::MissingVersion)));

        let err = bump(&session, Some("latest")).await.unwrap_err();
        assert!(matches!(err.downcast_ref::<VersionError>(), Some(VersionError::InvalidTarget(_))));
    }

    #[tokio::test]
    async fn test_bump_runs_scripts_with_version() {
        let (temp, _repo) = versioned_repo("");
        let session = open_session(
            temp.path(),
            &["--postbump", "printf \"$BUMPR_VERSION $BUMPR_TAG\" > bumped.txt"],
        );

        bump(&session, Some("patch")).await.unwrap();
        assert_eq!(
            std::fs::read_to_string(temp.path().join("bumped.txt")).unwrap(),
            "1.0.1 v1.0.1"
        );
    }
}
