use std::path::PathBuf;
use thiserror::Error;

use crate::domain::coerce::CoerceError;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed reading config file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML in {origin}: {source}")]
    Yaml { origin: String, source: serde_yaml::Error },

    #[error("invalid TOML in {origin}: {source}")]
    Toml { origin: String, source: toml::de::Error },

    #[error("unsupported config extension '.{extension}' for file {}", path.display())]
    UnsupportedExtension { path: PathBuf, extension: String },

    #[error("config file {origin} must contain a mapping of option names to values")]
    NotAMapping { origin: String },

    #[error("`env` field should be a mapping in the config file")]
    EnvNotMapping,

    #[error("`env.{key}` must be a scalar value")]
    EnvValue { key: String },

    #[error("invalid value for `{key}` in config file: {source}")]
    InvalidValue { key: String, source: CoerceError },

    #[error("missing required option `{key}`; pass --{key} or set it in the config file")]
    MissingRequired { key: &'static str },

    #[error("`{first}` and `{second}` cannot both be enabled")]
    Conflict { first: &'static str, second: &'static str },
}
