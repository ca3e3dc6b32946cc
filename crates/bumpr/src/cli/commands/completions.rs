//! Shell completions generation command

use std::io::{self, Write};
use std::path::PathBuf;

use clap::builder::PossibleValuesParser;
use clap::{Arg, Args, Command, CommandFactory};
use clap_complete::{generate, Shell};
use tracing::info;

use bumpr_core::Increment;

use crate::cli::Cli;

/// Generate shell completions
#[derive(Debug, Args)]
pub struct CompletionsCommand {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,

    /// Output to file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl CompletionsCommand {
    /// Execute the completions command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(shell = %self.shell, "executing completions command");

        match &self.output {
            Some(path) => {
                let mut file = std::fs::File::create(path)?;
                write_completions(self.shell, &mut file);
                if !cli.quiet {
                    println!("Completions written to {}", path.display());
                }
            }
            None => write_completions(self.shell, &mut io::stdout()),
        }

        Ok(())
    }
}

/// Completion command tree: bump targets complete to the known increments
fn completion_command() -> Command {
    let targets = |arg: Arg| {
        arg.value_parser(PossibleValuesParser::new(Increment::ALL.map(|i| i.as_str())))
    };
    Cli::command()
        .mut_arg("target", targets)
        .mut_subcommand("version", |version| version.mut_arg("target", targets))
}

fn write_completions(shell: Shell, out: &mut dyn Write) {
    let mut cmd = completion_command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, out);
}
