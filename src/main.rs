//! trl: command-line launcher for SFT and DPO fine-tuning

use anyhow::Result;
use std::process::ExitCode;

fn main() -> Result<ExitCode> {
    trl_cli::cli::run()
}
