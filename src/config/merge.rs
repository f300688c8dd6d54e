//! Merge CLI options with the config file
//!
//! Precedence is CLI > config file > schema default, decided by where a value
//! came from rather than by comparing it with the default.

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::loader::{ConfigFile, ENV_KEY};
use super::ConfigError;
use crate::args::CliArgs;
use crate::domain::coerce::coerce_value;
use crate::domain::{FieldSpec, GroupSpec, TrainingMode, Value};

const CHECKPOINTING_KWARGS: &str = "gradient_checkpointing_kwargs";
const USE_REENTRANT: &str = "gradient_checkpointing_use_reentrant";

/// Options that must not be enabled together.
const EXCLUSIVE_FLAGS: &[(&str, &str)] = &[("load_in_8bit", "load_in_4bit"), ("bf16", "fp16")];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Default,
    File,
    Cli,
    /// Computed from other options after merging.
    Derived,
}

#[derive(Debug, Clone)]
pub struct ResolvedField {
    pub spec: &'static FieldSpec,
    pub value: Value,
    pub source: Source,
}

#[derive(Debug, Clone)]
pub struct ResolvedGroup {
    pub spec: &'static GroupSpec,
    pub fields: Vec<ResolvedField>,
}

/// The effective configuration of one training run.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    mode: TrainingMode,
    groups: Vec<ResolvedGroup>,
    env: BTreeMap<String, String>,
    config_path: Option<PathBuf>,
}

impl ResolvedConfig {
    pub fn mode(&self) -> TrainingMode {
        self.mode
    }

    pub fn groups(&self) -> &[ResolvedGroup] {
        &self.groups
    }

    pub fn fields(&self) -> impl Iterator<Item = &ResolvedField> {
        self.groups.iter().flat_map(|g| g.fields.iter())
    }

    pub fn field(&self, name: &str) -> Option<&ResolvedField> {
        self.fields().find(|f| f.spec.name == name)
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut ResolvedField> {
        self.groups.iter_mut().flat_map(|g| g.fields.iter_mut()).find(|f| f.spec.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.field(name).map(|f| &f.value)
    }

    pub fn source(&self, name: &str) -> Option<Source> {
        self.field(name).map(|f| f.source)
    }

    fn is_enabled(&self, name: &str) -> bool {
        self.get(name).and_then(Value::as_bool).unwrap_or(false)
    }

    /// Environment variables for the training process.
    pub fn env(&self) -> &BTreeMap<String, String> {
        &self.env
    }

    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }
}

/// Resolve every option of `mode`, then post-process and validate the result.
pub fn resolve(
    mode: TrainingMode,
    cli: &CliArgs,
    file: &ConfigFile,
) -> Result<ResolvedConfig, ConfigError> {
    for key in file.keys() {
        if key != ENV_KEY && mode.lookup(key).is_none() {
            tracing::warn!("Ignoring unknown option `{}` in config file for `{}`", key, mode);
        }
    }

    let mut groups = Vec::with_capacity(mode.groups().len());
    for group in mode.groups() {
        let group: &'static GroupSpec = *group;
        let mut fields = Vec::with_capacity(group.fields.len());

        for spec in &group.fields {
            let (value, source) = if let Some(value) = cli.get(spec.name) {
                if file.get(spec.name).is_some() {
                    tracing::debug!("--{} overrides the config file value", spec.name);
                }
                (value.clone(), Source::Cli)
            } else if let Some(raw) = file.get(spec.name) {
                let value = coerce_value(spec, raw).map_err(|source| ConfigError::InvalidValue {
                    key: spec.name.to_string(),
                    source,
                })?;
                (value, Source::File)
            } else {
                (spec.default.clone(), Source::Default)
            };
            fields.push(ResolvedField { spec, value, source });
        }

        groups.push(ResolvedGroup { spec: group, fields });
    }

    let mut resolved = ResolvedConfig {
        mode,
        groups,
        env: file.env().clone(),
        config_path: cli.config_path().map(Path::to_path_buf),
    };

    post_process(&mut resolved);
    validate(&resolved)?;
    Ok(resolved)
}

/// Forward the script's `use_reentrant` choice to gradient checkpointing.
fn post_process(config: &mut ResolvedConfig) {
    let use_reentrant = config.is_enabled(USE_REENTRANT);
    let Some(kwargs) = config.field_mut(CHECKPOINTING_KWARGS) else {
        return;
    };
    if matches!(kwargs.source, Source::Cli | Source::File) {
        return;
    }

    let mut map = BTreeMap::new();
    map.insert("use_reentrant".to_string(), Value::Bool(use_reentrant));
    kwargs.value = Value::Map(map);
    kwargs.source = Source::Derived;
}

fn validate(config: &ResolvedConfig) -> Result<(), ConfigError> {
    for field in config.fields() {
        if !field.spec.required {
            continue;
        }
        let missing = match &field.value {
            Value::Null => true,
            Value::Str(s) => s.trim().is_empty(),
            _ => false,
        };
        if missing {
            return Err(ConfigError::MissingRequired { key: field.spec.name });
        }
    }

    for &(first, second) in EXCLUSIVE_FLAGS {
        if config.is_enabled(first) && config.is_enabled(second) {
            return Err(ConfigError::Conflict { first, second });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::parse_cli_args;

    fn cli(mode: TrainingMode, tokens: &[&str]) -> CliArgs {
        let tokens: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();
        parse_cli_args(mode, &tokens).expect("cli args")
    }

    fn yaml(content: &str) -> ConfigFile {
        ConfigFile::parse_yaml(content, "test.yaml").expect("yaml")
    }

    const BASE: &str = "model_name_or_path: facebook/opt-350m\noutput_dir: yaml-out\n";

    #[test]
    fn test_cli_value_overrides_config_file() {
        let file = yaml(&format!("{BASE}lr_scheduler_type: cosine\n"));
        let args = cli(TrainingMode::Sft, &["--lr_scheduler_type", "cosine_with_restarts"]);

        let resolved = resolve(TrainingMode::Sft, &args, &file).expect("resolve");
        assert_eq!(resolved.get("lr_scheduler_type"), Some(&Value::from("cosine_with_restarts")));
        assert_eq!(resolved.source("lr_scheduler_type"), Some(Source::Cli));
    }

    #[test]
    fn test_config_file_value_used_when_cli_silent() {
        let file = yaml(&format!("{BASE}learning_rate: 2.0e-4\ndataset_text_field: prompt\n"));
        let resolved = resolve(TrainingMode::Sft, &CliArgs::default(), &file).expect("resolve");

        assert_eq!(resolved.get("learning_rate"), Some(&Value::Float(2.0e-4)));
        assert_eq!(resolved.source("learning_rate"), Some(Source::File));
        assert_eq!(resolved.get("dataset_text_field"), Some(&Value::from("prompt")));
        assert_eq!(resolved.get("output_dir"), Some(&Value::from("yaml-out")));
    }

    #[test]
    fn test_defaults_fill_remaining_options() {
        let resolved = resolve(TrainingMode::Dpo, &CliArgs::default(), &yaml(BASE)).expect("resolve");
        assert_eq!(resolved.get("beta"), Some(&Value::Float(0.1)));
        assert_eq!(resolved.source("beta"), Some(Source::Default));
        assert_eq!(resolved.get("lr_scheduler_type"), Some(&Value::from("linear")));
    }

    #[test]
    fn test_cli_value_equal_to_default_still_wins() {
        let file = yaml(&format!("{BASE}lr_scheduler_type: cosine\n"));
        let args = cli(TrainingMode::Sft, &["--lr_scheduler_type", "linear"]);

        let resolved = resolve(TrainingMode::Sft, &args, &file).expect("resolve");
        assert_eq!(resolved.get("lr_scheduler_type"), Some(&Value::from("linear")));
    }

    #[test]
    fn test_missing_output_dir_is_reported() {
        let file = yaml("model_name_or_path: facebook/opt-350m\n");
        let err = resolve(TrainingMode::Sft, &CliArgs::default(), &file).unwrap_err();
        assert!(matches!(err, ConfigError::MissingRequired { key: "output_dir" }));

        let args = cli(TrainingMode::Sft, &["--output_dir", "  "]);
        let err = resolve(TrainingMode::Sft, &args, &file).unwrap_err();
        assert!(matches!(err, ConfigError::MissingRequired { key: "output_dir" }));
    }

    #[test]
    fn test_invalid_file_value_names_the_key() {
        let file = yaml(&format!("{BASE}max_seq_length: long\n"));
        let err = resolve(TrainingMode::Sft, &CliArgs::default(), &file).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key, .. } if key == "max_seq_length"));
    }

    #[test]
    fn test_invalid_file_value_is_ignored_when_cli_overrides() {
        let file = yaml(&format!("{BASE}max_seq_length: long\n"));
        let args = cli(TrainingMode::Sft, &["--max_seq_length", "1024"]);
        let resolved = resolve(TrainingMode::Sft, &args, &file).expect("resolve");
        assert_eq!(resolved.get("max_seq_length"), Some(&Value::Int(1024)));
    }

    #[test]
    fn test_checkpointing_kwargs_follow_use_reentrant() {
        let args = cli(TrainingMode::Sft, &["--gradient_checkpointing_use_reentrant"]);
        let resolved = resolve(TrainingMode::Sft, &args, &yaml(BASE)).expect("resolve");

        let Some(Value::Map(kwargs)) = resolved.get("gradient_checkpointing_kwargs") else {
            panic!("expected derived kwargs");
        };
        assert_eq!(kwargs["use_reentrant"], Value::Bool(true));
        assert_eq!(resolved.source("gradient_checkpointing_kwargs"), Some(Source::Derived));
    }

    #[test]
    fn test_explicit_checkpointing_kwargs_are_kept() {
        let args = cli(TrainingMode::Sft, &["--gradient_checkpointing_kwargs", r#"{"use_reentrant": true, "x": 1}"#]);
        let resolved = resolve(TrainingMode::Sft, &args, &yaml(BASE)).expect("resolve");
        let Some(Value::Map(kwargs)) = resolved.get("gradient_checkpointing_kwargs") else {
            panic!("expected kwargs");
        };
        assert_eq!(kwargs.len(), 2);
        assert_eq!(resolved.source("gradient_checkpointing_kwargs"), Some(Source::Cli));
    }

    #[test]
    fn test_exclusive_quantization_flags() {
        let file = yaml(&format!("{BASE}load_in_8bit: true\nload_in_4bit: true\n"));
        let err = resolve(TrainingMode::Sft, &CliArgs::default(), &file).unwrap_err();
        assert!(matches!(err, ConfigError::Conflict { first: "load_in_8bit", .. }));

        let args = cli(TrainingMode::Sft, &["--no_load_in_4bit"]);
        assert!(resolve(TrainingMode::Sft, &args, &file).is_ok());
    }

    #[test]
    fn test_exclusive_precision_flags() {
        let file = yaml(&format!("{BASE}bf16: true\nfp16: true\n"));
        let err = resolve(TrainingMode::Dpo, &CliArgs::default(), &file).unwrap_err();
        assert!(matches!(err, ConfigError::Conflict { first: "bf16", second: "fp16" }));

        let args = cli(TrainingMode::Dpo, &["--fp16", "false"]);
        let resolved = resolve(TrainingMode::Dpo, &args, &file).expect("resolve");
        assert_eq!(resolved.get("bf16"), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_env_and_config_path_are_carried() {
        let file = yaml(&format!("{BASE}env:\n  WANDB_PROJECT: dpo\n"));
        let args = cli(TrainingMode::Dpo, &["--config", "dpo.yaml"]);
        let resolved = resolve(TrainingMode::Dpo, &args, &file).expect("resolve");
        assert_eq!(resolved.env().get("WANDB_PROJECT").map(String::as_str), Some("dpo"));
        assert_eq!(resolved.config_path(), Some(Path::new("dpo.yaml")));
        assert_eq!(resolved.mode(), TrainingMode::Dpo);
    }
}
