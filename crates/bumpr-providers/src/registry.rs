//! Provider registry

use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::future::try_join_all;
use tracing::{debug, info, instrument};

use bumpr_core::error::{ProviderError, Result};
use bumpr_core::{Config, Increment};
use bumpr_git::History;

use crate::bumps::Bump;
use crate::conventions::{CargoProvider, NpmProvider};
use crate::files::FilesProvider;
use crate::provider::Provider;
use crate::traits::VersionProvider;

/// Providers in priority order
pub struct ProviderRegistry {
    root: PathBuf,
    providers: Vec<Provider>,
}

impl ProviderRegistry {
    /// Create an empty registry
    pub fn empty(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            providers: Vec::new(),
        }
    }

    /// Register the built-in providers for a repository: the configured
    /// `files` table, then npm, then cargo. Conventional providers skip files
    /// the table already manages and are left out when nothing remains.
    pub fn for_repository(root: &Path, history: Arc<dyn History>, config: &Config) -> Result<Self> {
        let initial = config.version.initial.as_str();
        let configured = |path: &str| config.files.contains_key(path);
        let mut registry = Self::empty(root);

        if !config.files.is_empty() {
            let files = FilesProvider::new(root, Arc::clone(&history), &config.files, initial)?;
            registry.register(Provider::Files(files));
        }

        let npm = NpmProvider::new(root, Arc::clone(&history), initial, configured)?;
        if !npm.is_empty() {
            registry.register(Provider::Npm(npm));
        }

        let cargo = CargoProvider::new(root, history, initial, configured)?;
        if !cargo.is_empty() {
            registry.register(Provider::Cargo(cargo));
        }

        debug!(providers = ?registry.names(), "registered version providers");
        Ok(registry)
    }

    /// Register a provider at the lowest priority
    pub fn register(&mut self, provider: Provider) {
        self.providers.push(provider);
    }

    /// Get provider by name
    pub fn get(&self, name: &str) -> Option<&Provider> {
        self.providers.iter().find(|p| p.name() == name)
    }

    /// Get all registered providers
    pub fn all(&self) -> &[Provider] {
        &self.providers
    }

    /// Get provider names
    pub fn names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Providers whose convention the repository follows, in priority order
    pub async fn supported(&self) -> Vec<&Provider> {
        let mut supported = Vec::new();
        for provider in &self.providers {
            if provider.is_supported().await {
                supported.push(provider);
            }
        }
        supported
    }

    async fn require_supported(&self) -> Result<Vec<&Provider>> {
        let supported = self.supported().await;
        if supported.is_empty() {
            return Err(ProviderError::Unsupported(self.root.clone()).into());
        }
        Ok(supported)
    }

    /// Current version from the first supported provider that reports one
    pub async fn first_version(&self) -> Result<String> {
        let supported = self.require_supported().await?;
        for provider in &supported {
            let version = provider.get_version().await;
            if !version.is_empty() {
                debug!(provider = provider.name(), %version, "resolved version");
                return Ok(version);
            }
        }
        Ok(supported[0].initial_version().to_string())
    }

    /// Bumps from the first supported provider whose history yields any
    #[instrument(skip(self))]
    pub async fn first_bumps(&self, limit: Option<usize>) -> Result<Vec<Bump>> {
        for provider in self.require_supported().await? {
            let bumps = provider.commits_bumps(limit).await;
            if !bumps.is_empty() {
                return Ok(bumps);
            }
        }
        Ok(Vec::new())
    }

    /// Bump every supported provider concurrently. Returns the provider names
    /// and versions written.
    #[instrument(skip(self))]
    pub async fn bump_all(
        &self,
        increment: Increment,
        version: Option<&str>,
    ) -> Result<Vec<(&'static str, String)>> {
        let supported = self.require_supported().await?;
        let results = try_join_all(
            supported
                .iter()
                .map(|provider| async move {
                    let next = provider.bump(increment, version).await?;
                    Ok::<_, bumpr_core::BumprError>(next.map(|v| (provider.name(), v)))
                }),
        )
        .await?;

        let written: Vec<_> = results.into_iter().flatten().collect();
        info!(count = written.len(), "bumped providers");
        Ok(written)
    }
}
