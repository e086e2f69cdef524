//! CLI tools for gitlab-ci-dsl
//!
//! - `generate`: Render this repository's pipeline
//! - `completions`: Generate shell completions

pub mod completions;
pub mod generate;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use gitlab_ci_dsl::infrastructure::{Config, ProcessEnv, init_logging};
use gitlab_ci_dsl::variables::CiContext;
use std::path::PathBuf;

/// CLI arguments for gitlab-ci-dsl
#[derive(Parser, Debug)]
#[command(name = "gitlab-ci-dsl")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the project pipeline as YAML
    Generate {
        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Log level, overridden by RUST_LOG
        #[arg(short, long)]
        log_level: Option<String>,
    },

    /// Generate shell completions
    Completions {
        /// Shell type
        #[arg(value_enum)]
        shell: ShellArg,
        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum ShellArg {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

/// Build the CLI command for completion generation
pub fn build_cli() -> clap::Command {
    Args::command()
}

/// Merges the configuration file with command-line overrides
fn resolve_config(
    config: Option<PathBuf>,
    output: Option<PathBuf>,
    log_level: Option<String>,
) -> Result<Config> {
    let mut resolved = match config {
        Some(path) => Config::load(&path)
            .with_context(|| format!("Failed to load configuration: {}", path.display()))?,
        None => Config::default(),
    };

    if output.is_some() {
        resolved.output = output;
    }
    if let Some(level) = log_level {
        resolved.log_level = level;
    }

    Ok(resolved)
}

/// Parse and execute CLI arguments
pub fn run() -> Result<()> {
    let args = Args::parse();

    match args.command {
        Command::Generate {
            output,
            config,
            log_level,
        } => {
            let config = resolve_config(config, output, log_level)?;
            init_logging(&config.log_level);

            let ctx = CiContext::new(ProcessEnv);
            let document = generate::render_pipeline(&ctx)?;

            if let Some(output_path) = &config.output {
                generate::save_pipeline(&document, output_path)?;
            } else {
                print!("{document}");
            }
        }
        Command::Completions { shell, output } => {
            use clap_complete::Shell;

            let shell_enum = match shell {
                ShellArg::Bash => Shell::Bash,
                ShellArg::Zsh => Shell::Zsh,
                ShellArg::Fish => Shell::Fish,
                ShellArg::PowerShell => Shell::PowerShell,
            };

            let completions = completions::generate_completions(shell_enum)?;

            if let Some(output_path) = output {
                completions::save_completions(&completions, &output_path)?;
            } else {
                println!("{completions}");
            }
        }
    }

    Ok(())
}
