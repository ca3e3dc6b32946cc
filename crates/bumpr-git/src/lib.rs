//! bumpr git - repository access for release automation
//!
//! This crate provides the paged commit log and content-at-commit reads the
//! version providers walk, plus the commit, tag and remote operations used by
//! the release commands.

mod commit;
pub mod history;
mod log;
mod remote;
mod repository;
mod status;
mod tags;
pub mod types;

pub use history::{GitHistory, History};
pub use remote::parse_slug;
pub use repository::{GitRepo, Result};
pub use types::{Commit, RepoSlug};
