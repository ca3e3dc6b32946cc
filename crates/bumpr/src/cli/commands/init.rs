//! Init command

use std::path::{Path, PathBuf};

use clap::Args;
use console::style;
use tracing::info;

use bumpr_core::config::{Config, CONFIG_BASENAME, DEFAULT_CONFIG_TEMPLATE};

use crate::cli::{prompt, Cli};

/// Write a default configuration file
#[derive(Debug, Args)]
pub struct InitCommand {
    /// Output file path
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl InitCommand {
    /// Execute the init command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(output = ?self.output, "executing init command");
        let dir = cli.working_dir()?;
        let config_path = self
            .output
            .clone()
            .unwrap_or_else(|| dir.join(format!("{}.toml", CONFIG_BASENAME)));

        if config_path.exists() && !cli.force {
            let overwrite = prompt::confirm(
                &format!(
                    "Configuration file already exists at {}. Overwrite?",
                    config_path.display()
                ),
                false,
            )?;
            if !overwrite {
                println!("{}", style("Aborted.").yellow());
                return Ok(());
            }
        }

        write_default(&config_path)?;

        if !cli.quiet {
            println!(
                "{} Created configuration at {}",
                style("✓").green().bold(),
                style(config_path.display()).cyan()
            );
            println!();
            println!("Next steps:");
            println!("  1. List your version files under {}", style("[files]").cyan());
            println!("  2. Run {} to cut your first release", style("bumpr patch").cyan());
        }

        Ok(())
    }
}

/// Write the default template after checking it parses
fn write_default(path: &Path) -> anyhow::Result<()> {
    let _: Config = toml::from_str(DEFAULT_CONFIG_TEMPLATE)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, DEFAULT_CONFIG_TEMPLATE)?;
    Ok(())
}
