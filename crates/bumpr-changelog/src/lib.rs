//! bumpr changelog - renders version sections and merges them into the
//! changelog file
//!
//! Sections are rendered from `[token]` templates, one line per commit, and
//! merged at the top of the file. Merging is idempotent, so re-running a
//! release step never duplicates a section.

pub mod file;
pub mod merge;
pub mod render;

pub use file::Changelog;
pub use merge::{merge_section, normalize};
pub use render::{is_merge_commit, strip_decorations, SectionRenderer};
