//! Configuration loading and merging
//!
//! Handles loading from config files and merging with CLI arguments
//! with proper precedence (CLI > File > Defaults).

mod error;
pub mod loader;
pub mod merge;
mod render;

pub use error::ConfigError;
pub use loader::ConfigFile;
pub use merge::{resolve, ResolvedConfig, ResolvedField, ResolvedGroup, Source};
