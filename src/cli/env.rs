//! Env command implementation

use anyhow::Result;
use clap::Args;

use super::train::LauncherBins;
use crate::domain::TrainingMode;
use crate::launch::{resolve_script, script_env_var};
use crate::utils::find_on_path;

#[derive(Args, Debug, Default)]
pub struct EnvArgs {
    #[command(flatten)]
    pub bins: LauncherBins,
}

pub fn run(args: &EnvArgs) -> Result<()> {
    println!("trl-cli version: {}", env!("CARGO_PKG_VERSION"));
    println!("Platform: {}-{}", std::env::consts::OS, std::env::consts::ARCH);

    println!("Launchers:");
    for (name, bin) in [("accelerate", &args.bins.accelerate_bin), ("python", &args.bins.python_bin)] {
        match find_on_path(bin) {
            Some(path) => println!("  {}: {} ({})", name, bin, path.display()),
            None => println!("  {}: {} (not found)", name, bin),
        }
    }

    println!("Training scripts:");
    for mode in [TrainingMode::Sft, TrainingMode::Dpo] {
        let script = resolve_script(mode, None);
        let status = if script.is_file() { "found" } else { "missing" };
        println!(
            "  {}: {} ({}, override with ${})",
            mode,
            script.display(),
            status,
            script_env_var(mode)
        );
    }

    Ok(())
}
