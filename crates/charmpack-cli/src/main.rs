//! charmpack CLI - Packs charms and bundles
//!
//! Commands:
//! - `charmpack pack` - Pack the project into a `.charm` or `.zip` archive

use anyhow::Context;
use charmpack_core::env::{managed_log_path, managed_project_path};
use charmpack_core::{Environment, LogLevel, PackError, ProjectConfig};
use charmpack_logging::init_logging;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

mod build;
mod deprecations;
mod pack;

use build::ExternalBuilder;
use pack::{PackArgs, PackCommand};

#[derive(Parser)]
#[command(name = "charmpack")]
#[command(author, version, about = "Pack charms and bundles", long_about = None)]
struct Cli {
    /// Show debug information
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only show warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the charm or bundle
    Pack(PackArgs),
}

impl Cli {
    fn log_level(&self) -> LogLevel {
        if self.verbose {
            LogLevel::Debug
        } else if self.quiet {
            LogLevel::Warn
        } else {
            LogLevel::Info
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err:#}");
            let code = err
                .downcast_ref::<PackError>()
                .map_or(1, PackError::exit_code);
            ExitCode::from(code)
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let env = Environment::from_process();
    env.ensure_supported()?;
    let managed_mode = env.managed_mode()?;

    let log_file = managed_mode.then(managed_log_path);
    init_logging(cli.log_level(), log_file.as_deref()).context("Failed to open the log file")?;

    match cli.command {
        Commands::Pack(args) => {
            let project_dir = match &args.project_dir {
                Some(dir) => dir.clone(),
                None if managed_mode => managed_project_path(),
                None => PathBuf::from("."),
            };
            let config = ProjectConfig::load(&project_dir, chrono::Utc::now())?;

            PackCommand::new(&config, ExternalBuilder::from_env(&env))
                .managed_mode(managed_mode)
                .run(&args)?;
        }
    }

    Ok(())
}
