//! `sft` / `dpo` command implementation

use anyhow::{Context, Result};
use clap::Args;
use serde_json::json;
use std::path::PathBuf;

use crate::args::parse_cli_args;
use crate::config::{resolve, ConfigFile};
use crate::domain::TrainingMode;
use crate::launch::{
    build_plan, LaunchError, LaunchOptions, LauncherKind, TrainingEntryPoint, ACCELERATE_BIN_ENV,
    DEFAULT_ACCELERATE_BIN, DEFAULT_PYTHON_BIN, PYTHON_BIN_ENV,
};

/// Launcher executables, shared by the training commands and `trl env`.
#[derive(Args, Debug, Clone)]
pub struct LauncherBins {
    /// accelerate executable
    #[arg(long, value_name = "BIN", env = ACCELERATE_BIN_ENV, default_value = DEFAULT_ACCELERATE_BIN)]
    pub accelerate_bin: String,

    /// Python interpreter used with `--launcher python`
    #[arg(long, value_name = "BIN", env = PYTHON_BIN_ENV, default_value = DEFAULT_PYTHON_BIN)]
    pub python_bin: String,
}

impl Default for LauncherBins {
    fn default() -> Self {
        Self {
            accelerate_bin: DEFAULT_ACCELERATE_BIN.to_string(),
            python_bin: DEFAULT_PYTHON_BIN.to_string(),
        }
    }
}

#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Print the resolved configuration and launch command without running anything
    #[arg(long)]
    pub dry_run: bool,

    /// How to start the training script
    #[arg(long, value_enum, value_name = "KIND", default_value_t = LauncherKind::Accelerate)]
    pub launcher: LauncherKind,

    /// accelerate config file (passed as `--config_file`)
    #[arg(long, value_name = "FILE")]
    pub accelerate_config: Option<PathBuf>,

    /// Training script to run (default: $TRL_<MODE>_SCRIPT or examples/scripts/<mode>.py)
    #[arg(long, value_name = "PATH")]
    pub script: Option<PathBuf>,

    #[command(flatten)]
    pub bins: LauncherBins,

    /// Training options: --config FILE, --key value, --key=value or key=value
    #[arg(value_name = "TRAINING_ARGS", trailing_var_arg = true, allow_hyphen_values = true)]
    pub training_args: Vec<String>,
}

impl TrainArgs {
    fn launch_options(&self) -> LaunchOptions {
        LaunchOptions {
            kind: self.launcher,
            accelerate_bin: self.bins.accelerate_bin.clone(),
            python_bin: self.bins.python_bin.clone(),
            accelerate_config: self.accelerate_config.clone(),
            script: self.script.clone(),
        }
    }
}

/// Resolve, validate and launch one training run, returning the process exit status.
pub fn run(mode: TrainingMode, args: TrainArgs, entry: &dyn TrainingEntryPoint) -> Result<u8> {
    let cli_args = parse_cli_args(mode, &args.training_args)?;

    let file = ConfigFile::load(cli_args.config_path()).with_context(|| {
        format!("Failed loading config for `trl {}`", mode)
    })?;
    let resolved = resolve(mode, &cli_args, &file)?;

    let plan = build_plan(&resolved, &args.launch_options());
    tracing::debug!("Run fingerprint {}", resolved.fingerprint());

    if args.dry_run {
        if let Err(e) = plan.ensure_script_exists() {
            tracing::warn!("{}", e);
        }
        let report = json!({
            "fingerprint": resolved.fingerprint(),
            "command": plan.command_line(),
            "args": resolved.to_args(),
            "config": resolved.to_json(),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(0);
    }

    plan.ensure_script_exists()?;

    match entry.launch(&plan) {
        Ok(()) => Ok(0),
        Err(LaunchError::Failed { program, code: Some(code) }) => {
            tracing::error!("Training process `{}` exited with status {}", program, code);
            eprintln!("error: training process `{}` exited with status {}", program, code);
            Ok(u8::try_from(code).ok().filter(|c| *c != 0).unwrap_or(1))
        }
        Err(e) => Err(e.into()),
    }
}
