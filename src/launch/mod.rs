//! Hand-off to the external training entry point
//!
//! The training itself runs in a separate process: either through
//! `accelerate launch` or directly with the Python interpreter.

mod plan;

pub use plan::{
    build_plan, default_script, resolve_script, script_env_var, LaunchOptions, LaunchPlan,
    LauncherKind, ACCELERATE_BIN_ENV, DEFAULT_ACCELERATE_BIN, DEFAULT_PYTHON_BIN, PYTHON_BIN_ENV,
};

use std::path::PathBuf;
use std::process::Command;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("training script not found: {}", path.display())]
    ScriptNotFound { path: PathBuf },

    #[error("failed to start `{program}`: {source}")]
    Spawn { program: String, source: std::io::Error },

    #[error("training process `{program}` exited with {}", describe_exit(*code))]
    Failed { program: String, code: Option<i32> },
}

fn describe_exit(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "a signal".to_string(),
    }
}

/// Something that can run a [`LaunchPlan`] to completion.
pub trait TrainingEntryPoint {
    fn launch(&self, plan: &LaunchPlan) -> Result<(), LaunchError>;
}

/// Runs the plan as a child process with inherited stdio.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEntryPoint;

impl TrainingEntryPoint for ProcessEntryPoint {
    fn launch(&self, plan: &LaunchPlan) -> Result<(), LaunchError> {
        tracing::info!("Launching: {}", plan.command_line());

        let status = Command::new(&plan.program)
            .args(&plan.args)
            .envs(&plan.env)
            .status()
            .map_err(|source| LaunchError::Spawn { program: plan.program.clone(), source })?;

        if status.success() {
            Ok(())
        } else {
            Err(LaunchError::Failed { program: plan.program.clone(), code: status.code() })
        }
    }
}
