//! Command-line interface for trl
//!
//! Provides `sft` and `dpo` subcommands that merge a config file with CLI
//! options and launch the matching training script.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::domain::TrainingMode;
use crate::launch::ProcessEntryPoint;

mod env;
mod train;

pub use env::EnvArgs;
pub use train::{LauncherBins, TrainArgs};

/// Launch SFT and DPO fine-tuning runs from a YAML config and CLI overrides
#[derive(Parser)]
#[command(name = "trl")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Supervised fine-tuning
    Sft(TrainArgs),

    /// Direct preference optimization
    Dpo(TrainArgs),

    /// Print version, platform and launcher information
    Env(EnvArgs),

    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

pub fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    // RUST_LOG in the environment always takes precedence; --verbose falls back to DEBUG.
    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    match cli.command {
        Commands::Sft(args) => {
            train::run(TrainingMode::Sft, args, &ProcessEntryPoint).map(ExitCode::from)
        }
        Commands::Dpo(args) => {
            train::run(TrainingMode::Dpo, args, &ProcessEntryPoint).map(ExitCode::from)
        }
        Commands::Env(args) => env::run(&args).map(|()| ExitCode::SUCCESS),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "trl", &mut std::io::stdout());
            Ok(ExitCode::SUCCESS)
        }
    }
}
