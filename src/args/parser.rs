use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::domain::coerce::{coerce_tokens, parse_bool, CoerceError};
use crate::domain::{normalize_key, FieldKind, FieldSpec, TrainingMode, Value};

#[derive(Debug, Error)]
pub enum ArgError {
    #[error("unrecognized argument '{0}'")]
    Unknown(String),

    #[error("argument --{0} expects a value")]
    MissingValue(String),

    #[error("invalid value for --{key}: {source}")]
    InvalidValue { key: String, source: CoerceError },

    #[error("--{0} is a flag and does not take a value")]
    FlagWithValue(String),

    #[error("unexpected argument '{0}'; training options take the form --key value or key=value")]
    UnexpectedToken(String),

    #[error("You passed the `config` field twice! Make sure to pass `config` only once.")]
    DuplicateConfig,
}

/// Options explicitly supplied on the command line.
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    values: BTreeMap<&'static str, Value>,
    config_path: Option<PathBuf>,
}

impl CliArgs {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    fn set(&mut self, spec: &'static FieldSpec, value: Value) {
        if let Some(previous) = self.values.insert(spec.name, value) {
            tracing::debug!("--{} given more than once, dropping earlier value {}", spec.name, previous);
        }
    }
}

/// Split a token into its key and inline value, if it names an option at all.
fn split_token(token: &str) -> Option<(&str, Option<&str>)> {
    if let Some(rest) = token.strip_prefix("--") {
        if rest.is_empty() {
            return None;
        }
        return Some(match rest.split_once('=') {
            Some((key, value)) => (key, Some(value)),
            None => (rest, None),
        });
    }
    match token.split_once('=') {
        Some((key, value)) if !key.is_empty() && !key.starts_with('-') => Some((key, Some(value))),
        _ => None,
    }
}

fn is_option_token(token: &str) -> bool {
    token.starts_with("--")
}

/// Whether `token` starts a new option: any `--` token, or `key=value` for a known key.
fn starts_option(mode: TrainingMode, token: &str) -> bool {
    if is_option_token(token) {
        return true;
    }
    split_token(token).is_some_and(|(key, _)| find_field(mode, &normalize_key(key)).is_some())
}

/// Resolve a key to its field; `no_<flag>` negates a boolean field.
fn find_field(mode: TrainingMode, key: &str) -> Option<(&'static FieldSpec, bool)> {
    if let Some((_, field)) = mode.lookup(key) {
        return Some((field, false));
    }
    let (_, field) = mode.lookup(key.strip_prefix("no_")?)?;
    (field.kind == FieldKind::Bool).then_some((field, true))
}

pub fn parse_cli_args(mode: TrainingMode, tokens: &[String]) -> Result<CliArgs, ArgError> {
    let mut args = CliArgs::default();
    let mut i = 0;

    while i < tokens.len() {
        let token = tokens[i].as_str();
        i += 1;

        let (raw_key, inline) =
            split_token(token).ok_or_else(|| ArgError::UnexpectedToken(token.to_string()))?;
        let key = normalize_key(raw_key);
        let (field, negated) =
            find_field(mode, &key).ok_or_else(|| ArgError::Unknown(raw_key.to_string()))?;

        if negated {
            if inline.is_some() {
                return Err(ArgError::FlagWithValue(key));
            }
            args.set(field, Value::Bool(false));
            continue;
        }

        let values: Vec<String> = match inline {
            Some(value) => vec![value.to_string()],
            None => match field.kind {
                // A bare boolean flag means `true`; an explicit value may follow.
                FieldKind::Bool => match tokens.get(i) {
                    Some(next) if parse_bool(next).is_some() => {
                        i += 1;
                        vec![next.clone()]
                    }
                    _ => vec!["true".to_string()],
                },
                FieldKind::StrList => {
                    let start = i;
                    while i < tokens.len() && !starts_option(mode, &tokens[i]) {
                        i += 1;
                    }
                    if start == i {
                        return Err(ArgError::MissingValue(key));
                    }
                    tokens[start..i].to_vec()
                }
                _ => match tokens.get(i) {
                    Some(next) if !is_option_token(next) => {
                        i += 1;
                        vec![next.clone()]
                    }
                    _ => return Err(ArgError::MissingValue(key)),
                },
            },
        };

        let value = coerce_tokens(field, &values)
            .map_err(|source| ArgError::InvalidValue { key: key.clone(), source })?;

        if field.name == "config" {
            if args.config_path.is_some() {
                return Err(ArgError::DuplicateConfig);
            }
            if let Some(path) = value.as_str() {
                args.config_path = Some(PathBuf::from(path));
            }
        }

        args.set(field, value);
    }

    Ok(args)
}
