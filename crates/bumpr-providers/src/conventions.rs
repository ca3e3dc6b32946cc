//! Providers for well-known manifest conventions
//!
//! Each one is a [`FilesProvider`] with a fixed file and rule table. Only the
//! first `version` in a manifest is rewritten, so dependency versions are
//! left alone.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;

use bumpr_core::config::FileRule;
use bumpr_core::error::{ProviderError, Result};
use bumpr_git::{Commit, History};

use crate::files::FilesProvider;
use crate::traits::VersionProvider;

const NPM_PATTERN: &str = r#""version":\s*"([^"]*)""#;
const NPM_REPLACEMENT: &str = r#""version": "[version]""#;

const CARGO_PATTERN: &str = r#"^version\s*=\s*"([^"]*)""#;
const CARGO_REPLACEMENT: &str = r#"version = "[version]""#;

/// npm rules: `package.json`, then `package-lock.json`
pub fn npm_rules() -> Vec<(String, Vec<FileRule>)> {
    ["package.json", "package-lock.json"]
        .into_iter()
        .map(|path| {
            (
                path.to_string(),
                vec![FileRule::new(NPM_PATTERN, NPM_REPLACEMENT, "i")],
            )
        })
        .collect()
}

/// Cargo rules: the `[package]` version in `Cargo.toml`
pub fn cargo_rules() -> Vec<(String, Vec<FileRule>)> {
    vec![(
        "Cargo.toml".to_string(),
        vec![FileRule::new(CARGO_PATTERN, CARGO_REPLACEMENT, "m")],
    )]
}

macro_rules! convention_provider {
    ($(#[$meta:meta])* $name:ident, $label:literal, $rules:path) => {
        $(#[$meta])*
        pub struct $name {
            files: FilesProvider,
        }

        impl $name {
            /// Create the provider; `exclude` drops files another provider
            /// already manages
            pub fn new(
                root: impl Into<PathBuf>,
                history: Arc<dyn History>,
                initial: impl Into<String>,
                exclude: impl Fn(&str) -> bool,
            ) -> std::result::Result<Self, ProviderError> {
                let files = FilesProvider::from_rules(root, history, $rules(), initial)?
                    .with_name($label)
                    .without(exclude);
                Ok(Self { files })
            }

            /// Whether exclusion left any file to manage
            pub fn is_empty(&self) -> bool {
                self.files.files().is_empty()
            }
        }

        #[async_trait]
        impl VersionProvider for $name {
            fn name(&self) -> &'static str {
                $label
            }

            fn history(&self) -> &dyn History {
                self.files.history()
            }

            fn initial_version(&self) -> &str {
                self.files.initial_version()
            }

            /// A manifest exists and declares a version
            async fn is_supported(&self) -> bool {
                self.files.working_version().await.is_some()
            }

            async fn working_version(&self) -> Option<String> {
                self.files.working_version().await
            }

            async fn get_version_by_commit(&self, commit: Option<&Commit>) -> String {
                self.files.get_version_by_commit(commit).await
            }

            async fn update_version(&self, version: &str) -> Result<()> {
                self.files.update_version(version).await
            }
        }
    };
}

convention_provider!(
    /// Version stored in `package.json` / `package-lock.json`
    NpmProvider,
    "npm",
    npm_rules
);

convention_provider!(
    /// Version stored in a crate's `Cargo.toml`
    CargoProvider,
    "cargo",
    cargo_rules
);
