//! bumpr providers - where versions live and how they changed
//!
//! A version provider reads the current version from the working tree,
//! reconstructs past versions from history, and writes new ones. The bump
//! grouping walk turns a provider's history into version eras for the
//! changelog.

pub mod bumps;
pub mod conventions;
pub mod files;
mod provider;
pub mod registry;
mod traits;

pub use bumps::{commits_bumps, Bump, PAGE_SIZE};
pub use conventions::{CargoProvider, NpmProvider};
pub use files::FilesProvider;
pub use provider::Provider;
pub use registry::ProviderRegistry;
pub use traits::VersionProvider;
