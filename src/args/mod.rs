//! Training options given on the command line
//!
//! Accepted forms are `--key value`, `--key=value`, `key=value`, bare
//! `--flag` / `--no_flag` for booleans and several values after a list option.

mod parser;

pub use parser::{parse_cli_args, ArgError, CliArgs};
