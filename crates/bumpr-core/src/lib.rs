//! bumpr core - shared building blocks for release automation
//!
//! This crate provides error types, configuration, the `[token]` template
//! engine, lifecycle scripts and version arithmetic used by the other bumpr
//! crates.

pub mod config;
pub mod error;
pub mod fs;
pub mod hooks;
pub mod template;
pub mod types;
pub mod version;

pub use config::Config;
pub use error::{BumprError, Result};
pub use hooks::{Hook, HookContext, HookRunner, HookStage};
pub use template::{render, Tokens};
pub use types::Increment;
pub use version::{increment_version, normalize_version, BumpTarget};
