//! Configuration system for bumpr

pub mod defaults;
mod loader;
pub mod rules;
mod types;
pub mod validation;

pub use defaults::*;
pub use loader::*;
pub use rules::{CompiledRule, FileEntry, FileRule, RegexFlags, RuleSpec};
pub use types::*;
pub use validation::*;
