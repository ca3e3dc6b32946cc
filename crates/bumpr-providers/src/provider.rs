//! The closed set of version providers

use async_trait::async_trait;

use bumpr_core::error::Result;
use bumpr_git::{Commit, History};

use crate::conventions::{CargoProvider, NpmProvider};
use crate::files::FilesProvider;
use crate::traits::VersionProvider;

/// Every provider bumpr knows about
pub enum Provider {
    /// The configured `files` table
    Files(FilesProvider),
    /// `package.json` convention
    Npm(NpmProvider),
    /// `Cargo.toml` convention
    Cargo(CargoProvider),
}

impl Provider {
    fn inner(&self) -> &dyn VersionProvider {
        match self {
            Self::Files(p) => p,
            Self::Npm(p) => p,
            Self::Cargo(p) => p,
        }
    }
}

#[async_trait]
impl VersionProvider for Provider {
    fn name(&self) -> &'static str {
        self.inner().name()
    }

    fn history(&self) -> &dyn History {
        self.inner().history()
    }

    fn initial_version(&self) -> &str {
        self.inner().initial_version()
    }

    async fn is_supported(&self) -> bool {
        self.inner().is_supported().await
    }

    async fn working_version(&self) -> Option<String> {
        self.inner().working_version().await
    }

    async fn get_version_by_commit(&self, commit: Option<&Commit>) -> String {
        self.inner().get_version_by_commit(commit).await
    }

    async fn update_version(&self, version: &str) -> Result<()> {
        self.inner().update_version(version).await
    }
}
