//! Config file loading

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::ConfigError;
use crate::domain::{normalize_key, Value};

/// Reserved top-level key holding environment variables for the training run.
pub const ENV_KEY: &str = "env";

/// Top-level options and environment read from a YAML or TOML config file.
#[derive(Debug, Clone, Default)]
pub struct ConfigFile {
    path: Option<PathBuf>,
    entries: BTreeMap<String, Value>,
    env: BTreeMap<String, String>,
}

impl ConfigFile {
    /// Load `path`, or return an empty config when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let content = fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase();
        let origin = path.display().to_string();

        let mut config = match ext.as_str() {
            "yaml" | "yml" => Self::parse_yaml(&content, &origin)?,
            "toml" => Self::parse_toml(&content, &origin)?,
            other => {
                return Err(ConfigError::UnsupportedExtension {
                    path: path.to_path_buf(),
                    extension: other.to_string(),
                })
            }
        };
        config.path = Some(path.to_path_buf());

        tracing::debug!(
            "Loaded {} option(s) and {} env var(s) from {}",
            config.entries.len(),
            config.env.len(),
            origin
        );
        Ok(config)
    }

    pub fn parse_yaml(content: &str, origin: &str) -> Result<Self, ConfigError> {
        let raw: serde_yaml::Value = serde_yaml::from_str(content)
            .map_err(|source| ConfigError::Yaml { origin: origin.to_string(), source })?;
        Self::from_root(Value::from(raw), origin)
    }

    pub fn parse_toml(content: &str, origin: &str) -> Result<Self, ConfigError> {
        let raw: toml::Table = toml::from_str(content)
            .map_err(|source| ConfigError::Toml { origin: origin.to_string(), source })?;
        Self::from_root(Value::from(toml::Value::Table(raw)), origin)
    }

    fn from_root(root: Value, origin: &str) -> Result<Self, ConfigError> {
        let mut map = match root {
            // An empty document
            Value::Null => BTreeMap::new(),
            Value::Map(map) => map,
            _ => return Err(ConfigError::NotAMapping { origin: origin.to_string() }),
        };

        let env = match map.remove(ENV_KEY) {
            None => BTreeMap::new(),
            Some(value) => parse_env(value)?,
        };

        let mut entries: BTreeMap<String, Value> = BTreeMap::new();
        for (key, value) in map {
            let name = normalize_key(&key);
            if !entries.contains_key(&name) {
                entries.insert(name, value);
                continue;
            }
            // Both `output-dir` and `output_dir` present: the underscore spelling wins.
            tracing::warn!("`{}` and another spelling of it are both set in {}", name, origin);
            if key == name {
                entries.insert(name, value);
            }
        }

        Ok(Self { path: None, entries, env })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn env(&self) -> &BTreeMap<String, String> {
        &self.env
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.env.is_empty()
    }
}

fn parse_env(value: Value) -> Result<BTreeMap<String, String>, ConfigError> {
    let Value::Map(vars) = value else {
        return Err(ConfigError::EnvNotMapping);
    };

    vars.into_iter()
        .map(|(key, value)| match value {
            Value::Str(s) => Ok((key, s)),
            Value::Null => Ok((key, String::new())),
            v if v.is_scalar() => Ok((key, v.to_string())),
            _ => Err(ConfigError::EnvValue { key }),
        })
        .collect()
}
