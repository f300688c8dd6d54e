//! Utility functions

pub mod hashing;
pub mod paths;
pub mod shell;

pub use hashing::args_fingerprint;
pub use paths::find_on_path;
pub use shell::{join_command, quote_arg};
