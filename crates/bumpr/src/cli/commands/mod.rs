//! CLI commands

mod changelog;
mod commit;
mod completions;
mod init;
mod release;
mod run;
mod tag;
mod version;

pub use changelog::ChangelogCommand;
pub use commit::CommitCommand;
pub use completions::CompletionsCommand;
pub use init::InitCommand;
pub use release::ReleaseCommand;
pub use run::RunCommand;
pub use tag::TagCommand;
pub use version::VersionCommand;
