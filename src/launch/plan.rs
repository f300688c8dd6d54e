use clap::ValueEnum;
use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};

use super::LaunchError;
use crate::config::ResolvedConfig;
use crate::domain::TrainingMode;
use crate::utils::join_command;

/// Overrides the `accelerate` executable.
pub const ACCELERATE_BIN_ENV: &str = "TRL_ACCELERATE_BIN";
/// Overrides the Python interpreter.
pub const PYTHON_BIN_ENV: &str = "TRL_PYTHON_BIN";
pub const DEFAULT_ACCELERATE_BIN: &str = "accelerate";
pub const DEFAULT_PYTHON_BIN: &str = "python";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LauncherKind {
    /// `accelerate launch <script>`
    #[default]
    Accelerate,
    /// `python <script>`
    Python,
}

#[derive(Debug, Clone)]
pub struct LaunchOptions {
    pub kind: LauncherKind,
    pub accelerate_bin: String,
    pub python_bin: String,
    /// Passed to `accelerate launch` as `--config_file`.
    pub accelerate_config: Option<PathBuf>,
    pub script: Option<PathBuf>,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            kind: LauncherKind::Accelerate,
            accelerate_bin: DEFAULT_ACCELERATE_BIN.to_string(),
            python_bin: DEFAULT_PYTHON_BIN.to_string(),
            accelerate_config: None,
            script: None,
        }
    }
}

/// A fully specified child process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchPlan {
    pub program: String,
    pub args: Vec<String>,
    /// Added to the inherited environment.
    pub env: BTreeMap<String, String>,
    pub script: PathBuf,
}

impl LaunchPlan {
    pub fn command_line(&self) -> String {
        let mut parts = Vec::with_capacity(self.args.len() + 1);
        parts.push(self.program.as_str());
        parts.extend(self.args.iter().map(String::as_str));
        join_command(&parts)
    }

    pub fn ensure_script_exists(&self) -> Result<(), LaunchError> {
        if self.script.is_file() {
            Ok(())
        } else {
            Err(LaunchError::ScriptNotFound { path: self.script.clone() })
        }
    }
}

pub fn script_env_var(mode: TrainingMode) -> &'static str {
    match mode {
        TrainingMode::Sft => "TRL_SFT_SCRIPT",
        TrainingMode::Dpo => "TRL_DPO_SCRIPT",
    }
}

pub fn default_script(mode: TrainingMode) -> PathBuf {
    PathBuf::from("examples").join("scripts").join(format!("{}.py", mode.name()))
}

/// The explicit path, else `$TRL_<MODE>_SCRIPT`, else the bundled example script.
pub fn resolve_script(mode: TrainingMode, explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    match env::var_os(script_env_var(mode)) {
        Some(path) if !path.is_empty() => PathBuf::from(path),
        _ => default_script(mode),
    }
}

pub fn build_plan(config: &ResolvedConfig, options: &LaunchOptions) -> LaunchPlan {
    let script = resolve_script(config.mode(), options.script.as_deref());
    let script_arg = script.display().to_string();

    let (program, mut args) = match options.kind {
        LauncherKind::Accelerate => {
            let mut args = vec!["launch".to_string()];
            if let Some(accelerate_config) = &options.accelerate_config {
                args.push("--config_file".to_string());
                args.push(accelerate_config.display().to_string());
            }
            args.push(script_arg);
            (options.accelerate_bin.clone(), args)
        }
        LauncherKind::Python => (options.python_bin.clone(), vec![script_arg]),
    };
    args.extend(config.to_args());

    LaunchPlan { program, args, env: config.env().clone(), script }
}
