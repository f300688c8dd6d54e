//! trl-cli: launch SFT and DPO fine-tuning runs
//!
//! Merges a YAML or TOML config file with CLI options
//! (CLI > config file > defaults), validates the result against the training
//! argument schema and hands it to an external training script.

pub mod args;
pub mod cli;
pub mod config;
pub mod domain;
pub mod launch;
pub mod schema;
pub mod utils;
